use crate::auth::{Authenticator, PlatformAuthError, codes};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Device-owner confirmation on a line based input. "y" or "yes" unlocks, "n", "no" or an empty line
/// cancels and any other answer counts as a failed verification.
pub struct ConsoleAuthenticator<R> {
    input: Mutex<R>,
}

impl ConsoleAuthenticator<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        ConsoleAuthenticator::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleAuthenticator<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        ConsoleAuthenticator { input: Mutex::new(input) }
    }
}

#[async_trait]
impl<R> Authenticator for ConsoleAuthenticator<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    #[instrument(skip(self))]
    async fn evaluate(&self, reason: &str) -> Result<(), PlatformAuthError> {
        info!("🔐 {} Continue? [y/N]", reason);

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| PlatformAuthError::new(codes::NOT_INTERACTIVE, e.to_string()))?;

        if read == 0 {
            return Err(PlatformAuthError::new(codes::NOT_INTERACTIVE, "No input available"));
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(()),
            "" | "n" | "no" => Err(PlatformAuthError::new(codes::USER_CANCEL, "Canceled by user")),
            answer => Err(PlatformAuthError::new(
                codes::AUTHENTICATION_FAILED,
                format!("Unrecognized answer '{}'", answer),
            )),
        }
    }
}
