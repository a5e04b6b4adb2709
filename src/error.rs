//! Error taxonomy shared by every core operation.
//!
//! Each variant maps to one failure kind callers are expected to handle
//! differently. [`AppError::code`] gives the stable machine-readable code an
//! outer HTTP layer can put on the wire.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Destination is not an absolute URL with a scheme and host.
    #[error("Invalid destination URL: {reason}")]
    InvalidDestination { reason: String },

    /// Any other malformed caller input.
    #[error("{message}")]
    Validation { message: String },

    #[error("Short link not found: {code}")]
    NotFound { code: String },

    #[error("Short link has expired: {code}")]
    Expired { code: String },

    /// Client address locates to a country the link may not be served in.
    #[error("Access from country {country_code} is restricted")]
    GeoRestricted { country_code: String },

    #[error("Rate limit exceeded for {key}, retry after {retry_after:?}")]
    RateLimited { key: String, retry_after: Duration },

    /// Unique constraint violated in the store.
    #[error("Unique constraint violation: {constraint}")]
    Conflict { constraint: String },

    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },

    /// The OS entropy source failed.
    #[error("Failed to generate short code: {reason}")]
    Generation { reason: String },

    #[error("Storage error: {message}")]
    Persistence { message: String },

    #[error("Storage call exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

impl AppError {
    pub fn invalid_destination(reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            reason: reason.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: constraint.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Stable identifier for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidDestination { .. } => "invalid_destination",
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Expired { .. } => "expired",
            AppError::GeoRestricted { .. } => "geo_restricted",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::Conflict { .. } => "conflict",
            AppError::ExhaustedRetries { .. } => "internal_error",
            AppError::Generation { .. } => "internal_error",
            AppError::Persistence { .. } => "storage_error",
            AppError::Timeout(_) => "timeout",
        }
    }

    /// Returns true for failures caused by the caller's input or identity
    /// rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDestination { .. }
                | AppError::Validation { .. }
                | AppError::NotFound { .. }
                | AppError::Expired { .. }
                | AppError::GeoRestricted { .. }
                | AppError::RateLimited { .. }
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(db.constraint().unwrap_or("unknown"));
    }

    if matches!(e, sqlx::Error::RowNotFound) {
        return AppError::persistence("Row not found");
    }

    AppError::persistence(e.to_string())
}
