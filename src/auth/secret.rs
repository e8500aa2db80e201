//! Password handling
//!
//! [`SecureString`] keeps a password out of logs and wipes it on drop.
//! Stored credentials are Argon2id PHC strings; the salt and cost parameters
//! travel inside the string, so verification needs nothing else.

use std::fmt;
use std::ops::Deref;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{FluxoError, FluxoResult};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Memory cost in KiB for new hashes
const MEMORY_COST: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// A string that is zeroed on drop and never printed
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.inner.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Reject passwords the account store would refuse
pub fn check_strength(password: &SecureString) -> FluxoResult<()> {
    if password.char_len() < MIN_PASSWORD_LEN {
        return Err(FluxoError::Validation(format!(
            "Password should be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn hasher() -> FluxoResult<Argon2<'static>> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, None)
        .map_err(|e| FluxoError::Auth(format!("Invalid Argon2 parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &SecureString) -> FluxoResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| FluxoError::Auth(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &SecureString, stored: &str) -> FluxoResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| FluxoError::Storage(format!("Corrupt password hash: {}", e)))?;
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_is_redacted() {
        let s = SecureString::new("hunter22");
        assert_eq!(s.as_str(), "hunter22");
        assert_eq!(s.to_string(), "[REDACTED]");
        assert!(!format!("{:?}", s).contains("hunter22"));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = SecureString::from("segredo123");
        let hash = hash_password(&password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&password, &hash).unwrap());
        assert!(!verify_password(&SecureString::from("segredo124"), &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = SecureString::from("segredo123");
        assert_ne!(
            hash_password(&password).unwrap(),
            hash_password(&password).unwrap()
        );
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        let result = verify_password(&SecureString::from("x"), "not-a-phc-string");
        assert!(matches!(result, Err(FluxoError::Storage(_))));
    }

    #[test]
    fn test_strength() {
        assert!(check_strength(&SecureString::from("12345")).is_err());
        assert!(check_strength(&SecureString::from("123456")).is_ok());
        // Counted in characters, not bytes
        assert!(check_strength(&SecureString::from("ççççç")).is_err());
    }
}
