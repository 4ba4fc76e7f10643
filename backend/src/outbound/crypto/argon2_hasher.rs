//! argon2id implementation of the [`PasswordHasher`] port.
//!
//! Digests are PHC strings carrying their own salt and parameters, so a
//! change of default parameters keeps older hashes verifiable.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes with argon2id using the crate's default parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a hasher with default argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| PasswordHash::new(digest.to_string()))
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = password_hash::PasswordHash::new(hash.as_str())
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn verifies_matching_password(hasher: Argon2PasswordHasher) {
        let digest = hasher.hash("pw123").expect("hash");
        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("pw123", &digest).expect("verify"));
        assert!(!hasher.verify("pw124", &digest).expect("verify"));
    }

    #[rstest]
    fn salts_each_hash(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("pw123").expect("hash");
        let second = hasher.hash("pw123").expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_digest_is_an_error(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("pw123", &PasswordHash::new("plaintext"))
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
