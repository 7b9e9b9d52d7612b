/// Argon2id password hashing
///
/// Hashes are stored as PHC strings, so each one carries its own algorithm,
/// cost parameters and salt. Verification reads the parameters back from the
/// stored string, which keeps old hashes valid if the costs below change.
///
/// # Example
///
/// ```
/// use contacts_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("rahasia")?;
///
/// assert!(verify_password("rahasia", &hash)?);
/// assert!(!verify_password("salah", &hash)?);
/// # Ok(())
/// # }
/// ```

use std::sync::OnceLock;

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Memory cost in KiB (64 MiB)
const MEMORY_KIB: u32 = 64 * 1024;

/// Number of passes over memory
const PASSES: u32 = 3;

/// Degree of parallelism
const LANES: u32 = 4;

/// Hash output length in bytes
const OUTPUT_LEN: usize = 32;

/// Stand-in hash checked when no account exists, built on first use
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),

    /// The stored value is not a PHC string
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_KIB, PASSES, LANES, Some(OUTPUT_LEN))
        .map_err(PasswordError::Params)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` with a fresh random salt
///
/// Returns a PHC string such as `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Checks `password` against a stored PHC string in constant time
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` if `hash` cannot be parsed, or
/// `PasswordError::Hash` if verification fails for another reason
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;

    match hasher()?.verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordError::Hash(err)),
    }
}

/// Like [`verify_password`], but a missing `hash` still pays for a full
/// verification against a stand-in hash and then reports `Ok(false)`
///
/// Login uses this so an unknown username costs the same as a wrong password.
///
/// # Errors
///
/// Same as [`verify_password`], plus `PasswordError::Hash` if the stand-in
/// hash cannot be built
pub fn verify_password_or_dummy(
    password: &str,
    hash: Option<&str>,
) -> Result<bool, PasswordError> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, dummy_hash()?)?;
            Ok(false)
        }
    }
}

fn dummy_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("contacts-api-unknown-user")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}
