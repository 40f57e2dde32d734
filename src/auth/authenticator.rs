use async_trait::async_trait;
use thiserror::Error;

/// Platform error codes, matching the values the device-owner authentication APIs report.
pub mod codes {
    pub const AUTHENTICATION_FAILED: i64 = -1;
    pub const USER_CANCEL: i64 = -2;
    /// Biometrics are disabled for this application at the OS permission level. Retrying will not
    /// help until the user changes the setting.
    pub const PERMISSION_DENIED: i64 = -6;
    pub const NOT_INTERACTIVE: i64 = -1004;
}

/// A biometric or device-owner prompt.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Checks whether the prompt can be shown at all.
    async fn can_evaluate(&self) -> Result<(), PlatformAuthError> {
        Ok(())
    }

    async fn evaluate(&self, reason: &str) -> Result<(), PlatformAuthError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PlatformAuthError {
    pub code: Option<i64>,
    pub message: String,
}

impl PlatformAuthError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        PlatformAuthError {
            code: Some(code),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("biometric permission denied: {0}")]
    PermissionDenied(String),
    #[error("authentication failed: {0}")]
    Other(String),
}

impl From<PlatformAuthError> for AuthError {
    fn from(error: PlatformAuthError) -> Self {
        match error.code {
            Some(codes::PERMISSION_DENIED) => AuthError::PermissionDenied(error.message),
            _ => AuthError::Other(error.message),
        }
    }
}
