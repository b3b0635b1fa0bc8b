//! Argon2id password hashing.

use std::sync::OnceLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::types::PasswordHash;

use super::{ServiceError, ServiceResult};

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> ServiceResult<PasswordHash> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })?;
    PasswordHash::new(hash.to_string()).map_err(|_| ServiceError::Internal)
}

/// Check `password` against a stored PHC string.
///
/// The digest comparison inside `verify_password` is constant-time. A
/// malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored: &PasswordHash) -> bool {
    match argon2::password_hash::PasswordHash::new(stored.as_str()) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {e}");
            false
        }
    }
}

/// Hash checked when no account matches a login, so unknown emails cost the
/// same Argon2 work as wrong passwords.
fn dummy_hash() -> Option<&'static PasswordHash> {
    static DUMMY: OnceLock<Option<PasswordHash>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("not the password of any account").ok())
        .as_ref()
}

/// Run a full verification that always fails.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = dummy_hash() {
        verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hash = hash_password("admin_password").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password("admin_password", &hash));
        assert!(!verify_password("Admin_password", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let stored = PasswordHash::new("not-a-phc-string").unwrap();
        assert!(!verify_password("anything", &stored));
    }

    #[test]
    fn dummy_verification_runs_argon2_and_fails() {
        let hash = dummy_hash().unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!verify_dummy("not the password of any account"));
        assert!(!verify_dummy(""));
    }
}
