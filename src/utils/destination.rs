//! Destination URL validation.
//!
//! Destinations are stored exactly as supplied; validation only checks that
//! the input is an absolute URL with both a scheme and a host, with nothing
//! around it.

use url::Url;

use crate::error::AppError;

/// Validates that `input` is a well-formed absolute URL with a host.
///
/// # Errors
///
/// Returns [`AppError::InvalidDestination`] for relative references,
/// unparseable input, leading or trailing whitespace and host-less URLs such
/// as `mailto:` or `data:`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_destination("https://example.com/page").is_ok());
/// assert!(validate_destination("example.com").is_err());
/// assert!(validate_destination("mailto:someone@example.com").is_err());
/// ```
pub fn validate_destination(input: &str) -> Result<Url, AppError> {
    if input.trim().is_empty() {
        return Err(AppError::invalid_destination("destination is empty"));
    }
    if input.trim() != input {
        return Err(AppError::invalid_destination(
            "destination has leading or trailing whitespace",
        ));
    }

    let url = Url::parse(input).map_err(|e| AppError::invalid_destination(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(AppError::invalid_destination(format!(
            "URL must include a host: {input}"
        ))),
    }
}
