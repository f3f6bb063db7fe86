//! Credential checks for the session gate and destructive operations.

use std::fmt;

/// Shared secret used when `ADMIN_PASSWORD` is not configured.
pub const DEFAULT_SHARED_SECRET: &str = "v0";

/// Verifies a presented secret.
///
/// Implementations decide what counts as valid; the service only sees a
/// yes/no answer.
pub trait CredentialCheck: Send + Sync + fmt::Debug {
    /// Returns `true` if `presented` is an accepted credential.
    fn verify(&self, presented: &str) -> bool;
}

/// Single shared plaintext secret.
#[derive(Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    /// Creates a check against `secret`.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns `true` if the built-in default secret is in use.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.secret == DEFAULT_SHARED_SECRET
    }
}

impl Default for SharedSecret {
    fn default() -> Self {
        Self::new(DEFAULT_SHARED_SECRET)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl CredentialCheck for SharedSecret {
    fn verify(&self, presented: &str) -> bool {
        let expected = self.secret.as_bytes();
        let presented = presented.as_bytes();
        // Compare every byte regardless of where the first mismatch is.
        expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_exact_secret() {
        let check = SharedSecret::new("bar-crew");
        assert!(check.verify("bar-crew"));
        assert!(!check.verify("bar-crew "));
        assert!(!check.verify("Bar-crew"));
        assert!(!check.verify(""));
    }

    #[test]
    fn default_secret_is_flagged() {
        assert!(SharedSecret::default().is_default());
        assert!(SharedSecret::default().verify(DEFAULT_SHARED_SECRET));
        assert!(!SharedSecret::new("other").is_default());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", SharedSecret::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
