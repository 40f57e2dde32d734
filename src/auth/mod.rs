mod authenticator;
mod console;
mod gate;

pub use authenticator::{AuthError, Authenticator, PlatformAuthError, codes};
pub use console::ConsoleAuthenticator;
pub use gate::{AuthGate, AuthGateError, AuthState, Remediation};
