//! PKCE (RFC 7636) helpers for the social sign-in flow.
//!
//! The verifier stays in the visitor's session; only the S256 challenge is
//! sent to the identity service with the authorization request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Unreserved URI characters allowed in a code verifier.
const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Alphanumerics for CSRF state values.
const STATE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Verifier length; RFC 7636 allows 43 to 128.
const VERIFIER_LENGTH: usize = 64;

/// Generate a cryptographically secure random string from `charset`.
fn random_from(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .filter_map(|_| {
            charset
                .get(rng.random_range(0..charset.len()))
                .map(|&b| char::from(b))
        })
        .collect()
}

/// Random alphanumeric string for OAuth `state` values.
#[must_use]
pub fn random_state(length: usize) -> String {
    random_from(STATE_CHARSET, length)
}

/// A PKCE code verifier and its derived challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    /// Generate a fresh verifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_verifier(random_from(VERIFIER_CHARSET, VERIFIER_LENGTH))
    }

    /// Derive the S256 challenge for an existing verifier.
    #[must_use]
    pub fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    /// Challenge method sent with the challenge.
    #[must_use]
    pub const fn method() -> &'static str {
        "s256"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc7636_vector() {
        let pkce = Pkce::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(pkce.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_generated_verifier_shape() {
        let pkce = Pkce::generate();
        assert_eq!(pkce.verifier.len(), VERIFIER_LENGTH);
        assert!(pkce.verifier.bytes().all(|b| VERIFIER_CHARSET.contains(&b)));
        assert_ne!(pkce, Pkce::generate());
    }

    #[test]
    fn test_random_state() {
        let state = random_state(32);
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
