use crate::auth::{AuthError, Authenticator};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

const SETTINGS_URL: &str = "app-settings:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Locked,
    Unlocked,
    DeniedPermission,
}

/// What the user can do about a denied biometric permission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remediation {
    pub title: String,
    pub message: String,
    pub settings_url: String,
}

impl Remediation {
    fn enable_biometrics() -> Self {
        Remediation {
            title: "Biometrics disabled".to_string(),
            message: "Biometric authentication is turned off for this app. Enable it in Settings to unlock your places."
                .to_string(),
            settings_url: SETTINGS_URL.to_string(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthGateError {
    #[error("an authentication request is already in progress")]
    AlreadyAuthenticating,
}

/// Gates access to the saved locations. Once unlocked the gate stays unlocked for the lifetime of
/// the process. At most one prompt is in flight at a time.
pub struct AuthGate<A: Authenticator> {
    authenticator: A,
    reason: String,
    state: RwLock<AuthState>,
    in_flight: AtomicBool,
}

impl<A: Authenticator> AuthGate<A> {
    pub fn new(authenticator: A, reason: impl Into<String>) -> Self {
        AuthGate {
            authenticator,
            reason: reason.into(),
            state: RwLock::new(AuthState::Locked),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> AuthState {
        *self.state.read().await
    }

    pub async fn is_unlocked(&self) -> bool {
        self.state().await == AuthState::Unlocked
    }

    pub async fn remediation(&self) -> Option<Remediation> {
        match self.state().await {
            AuthState::DeniedPermission => Some(Remediation::enable_biometrics()),
            _ => None,
        }
    }

    /// Prompts the user unless the gate is already unlocked. Returns the resulting state; failures
    /// other than a denied permission leave the gate locked.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<AuthState, AuthGateError> {
        if self.is_unlocked().await {
            return Ok(AuthState::Unlocked);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(AuthGateError::AlreadyAuthenticating)?;

        info!("🔐 Authenticating...");
        let result = match self.authenticator.can_evaluate().await {
            Ok(()) => self.authenticator.evaluate(&self.reason).await,
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match result.map_err(AuthError::from) {
            Ok(()) => {
                info!("🔓 Authenticating... OK");
                *state = AuthState::Unlocked;
            }
            Err(AuthError::PermissionDenied(message)) => {
                warn!("🔒 Authenticating... failed, permission denied: {}", message);
                *state = AuthState::DeniedPermission;
            }
            Err(AuthError::Other(message)) => {
                warn!("🔒 Authenticating... failed: {}", message);
            }
        }

        Ok(*state)
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PlatformAuthError, codes};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct StubAuthenticator {
        availability: Result<(), PlatformAuthError>,
        result: Result<(), PlatformAuthError>,
        calls: AtomicUsize,
    }

    impl StubAuthenticator {
        fn evaluating_to(result: Result<(), PlatformAuthError>) -> Self {
            StubAuthenticator {
                availability: Ok(()),
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Authenticator for StubAuthenticator {
        async fn can_evaluate(&self) -> Result<(), PlatformAuthError> {
            self.availability.clone()
        }

        async fn evaluate(&self, _reason: &str) -> Result<(), PlatformAuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct PendingAuthenticator {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Authenticator for PendingAuthenticator {
        async fn evaluate(&self, _reason: &str) -> Result<(), PlatformAuthError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    fn gate(result: Result<(), PlatformAuthError>) -> AuthGate<StubAuthenticator> {
        AuthGate::new(StubAuthenticator::evaluating_to(result), "Unlock your places.")
    }

    #[test_log::test(tokio::test)]
    async fn starts_locked() {
        let gate = gate(Ok(()));

        assert_eq!(gate.state().await, AuthState::Locked);
        assert_eq!(gate.remediation().await, None);
    }

    #[test_log::test(tokio::test)]
    async fn successful_verification_unlocks() {
        let gate = gate(Ok(()));

        assert_eq!(gate.authenticate().await, Ok(AuthState::Unlocked));
        assert!(gate.is_unlocked().await);
    }

    #[test_log::test(tokio::test)]
    async fn permission_denied_ends_in_denied_permission_with_a_remediation() {
        let gate = gate(Err(PlatformAuthError::new(codes::PERMISSION_DENIED, "Biometry is not available")));

        assert_eq!(gate.authenticate().await, Ok(AuthState::DeniedPermission));

        let remediation = gate.remediation().await.expect("a remediation");
        assert!(!remediation.message.is_empty());
        assert_eq!(remediation.settings_url, "app-settings:");
    }

    #[rstest]
    #[case(PlatformAuthError::new(codes::USER_CANCEL, "Canceled by user"))]
    #[case(PlatformAuthError::new(codes::NOT_INTERACTIVE, "Not interactive"))]
    #[case(PlatformAuthError::new(codes::AUTHENTICATION_FAILED, "Application retry limit exceeded"))]
    #[case(PlatformAuthError { code: None, message: "Unknown authentication error".to_string() })]
    #[tokio::test]
    async fn other_failures_stay_locked(#[case] error: PlatformAuthError) {
        let gate = gate(Err(error));

        assert_eq!(gate.authenticate().await, Ok(AuthState::Locked));
        assert_eq!(gate.remediation().await, None);
    }

    #[test_log::test(tokio::test)]
    async fn unavailable_biometrics_are_classified_without_prompting() {
        let authenticator = StubAuthenticator {
            availability: Err(PlatformAuthError::new(codes::PERMISSION_DENIED, "Biometry is not available")),
            result: Ok(()),
            calls: AtomicUsize::new(0),
        };
        let gate = AuthGate::new(authenticator, "Unlock your places.");

        assert_eq!(gate.authenticate().await, Ok(AuthState::DeniedPermission));
        assert_eq!(gate.authenticator.calls.load(Ordering::SeqCst), 0);
    }

    #[test_log::test(tokio::test)]
    async fn an_unlocked_gate_does_not_prompt_again() {
        let gate = gate(Ok(()));

        gate.authenticate().await.expect("first authentication");
        gate.authenticate().await.expect("second authentication");

        assert_eq!(gate.authenticator.calls.load(Ordering::SeqCst), 1);
    }

    #[test_log::test(tokio::test)]
    async fn a_locked_gate_can_be_retried() {
        let gate = gate(Err(PlatformAuthError::new(codes::USER_CANCEL, "Canceled by user")));

        gate.authenticate().await.expect("first authentication");
        gate.authenticate().await.expect("second authentication");

        assert_eq!(gate.authenticator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(gate.state().await, AuthState::Locked);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_second_request_while_one_is_pending() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gate = Arc::new(AuthGate::new(
            PendingAuthenticator {
                started: started.clone(),
                release: release.clone(),
            },
            "Unlock your places.",
        ));

        let pending = tokio::spawn({
            let gate = gate.clone();
            async move { gate.authenticate().await }
        });
        started.notified().await;

        assert_eq!(gate.authenticate().await, Err(AuthGateError::AlreadyAuthenticating));

        release.notify_one();
        assert_eq!(pending.await.expect("joined task"), Ok(AuthState::Unlocked));
    }
}
