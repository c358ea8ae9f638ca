//! Authentication error types.

use thiserror::Error;

use super::OAuthProvider;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] photoart_core::EmailError),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The access token is unknown, revoked, or expired.
    #[error("session expired")]
    SessionExpired,

    /// OAuth provider is not one of the supported providers.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The OAuth callback did not carry what the exchange needs.
    #[error("invalid session state")]
    InvalidSessionState,

    /// The identity service rejected the request.
    #[error("identity service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The identity service answered with something unexpected.
    #[error("unexpected identity service response: {0}")]
    InvalidResponse(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Message from the identity service, when it sent a usable one.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } if !message.trim().is_empty() => Some(message),
            Self::InvalidCredentials => Some("Invalid login credentials"),
            _ => None,
        }
    }

    /// Whether the failure means the stored session is no longer usable.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::Service { status: 401 | 403, .. }
        )
    }
}

/// A user-initiated authentication action, used to pick the message shown
/// when the action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
    Logout,
    Social(OAuthProvider),
    Callback,
    ResetPassword,
    UpdateProfile,
}

impl AuthAction {
    /// Fallback message for a failed action.
    #[must_use]
    pub fn fallback_message(self) -> String {
        match self {
            Self::Login => "Failed to login".to_string(),
            Self::Register => "Failed to register".to_string(),
            Self::Logout => "Failed to logout".to_string(),
            Self::Social(provider) => format!("Failed to login with {provider}"),
            Self::Callback => "Authentication failed".to_string(),
            Self::ResetPassword => "Failed to send password reset email".to_string(),
            Self::UpdateProfile => "Failed to update profile".to_string(),
        }
    }

    /// The single human-readable message shown for `err`: the identity
    /// service's own message when it has one, otherwise the fallback.
    #[must_use]
    pub fn user_message(self, err: &AuthError) -> String {
        err.service_message()
            .map_or_else(|| self.fallback_message(), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_messages() {
        assert_eq!(AuthAction::Login.fallback_message(), "Failed to login");
        assert_eq!(AuthAction::Register.fallback_message(), "Failed to register");
        assert_eq!(AuthAction::Logout.fallback_message(), "Failed to logout");
        assert_eq!(
            AuthAction::Social(OAuthProvider::Github).fallback_message(),
            "Failed to login with github"
        );
    }

    #[test]
    fn test_user_message_prefers_service_message() {
        let err = AuthError::Service {
            status: 422,
            message: "User already registered".to_string(),
        };
        assert_eq!(AuthAction::Register.user_message(&err), "User already registered");

        let err = AuthError::Service {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(AuthAction::Register.user_message(&err), "Failed to register");

        let err = AuthError::InvalidResponse("no user".to_string());
        assert_eq!(AuthAction::Logout.user_message(&err), "Failed to logout");
    }

    #[test]
    fn test_session_expired_detection() {
        assert!(AuthError::SessionExpired.is_session_expired());
        assert!(
            AuthError::Service {
                status: 401,
                message: "invalid JWT".to_string()
            }
            .is_session_expired()
        );
        assert!(!AuthError::InvalidCredentials.is_session_expired());
    }
}
