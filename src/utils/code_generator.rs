//! Short code generation.
//!
//! Codes are drawn from the OS CSPRNG and encoded in the URL-safe base64
//! alphabet. Uniqueness is not guaranteed here; the store's unique constraint
//! and the retry loop in [`crate::application::services::ShortenerService`]
//! take care of that.

use crate::error::AppError;
use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of every generated code.
pub const CODE_LENGTH: usize = 8;

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code.
///
/// # Errors
///
/// Returns [`AppError::Generation`] if the system random number generator
/// fails. Callers should treat this as unrecoverable.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| AppError::Generation {
        reason: e.to_string(),
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Returns true if `code` has the shape of a generated code.
///
/// Used to reject obviously malformed input before hitting the store.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
