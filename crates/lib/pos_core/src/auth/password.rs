//! Password hashing via bcrypt, and generation of initial passwords.

use rand::distr::Alphanumeric;
use rand::{CryptoRng, Rng, rng};

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Length of generated initial passwords.
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// `Ok(false)` is a mismatch; `Err` means the hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Generate a random alphanumeric password from the thread-local CSPRNG.
pub fn generate_password() -> String {
    generate_password_with(&mut rng())
}

/// Generate a random alphanumeric password from the given CSPRNG.
pub fn generate_password_with<R: Rng + CryptoRng>(rng: &mut R) -> String {
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}
