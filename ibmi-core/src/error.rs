use std::borrow::Cow;
use thiserror::Error;

/// Errors surfaced by the connection layer.
///
/// Native failures never leak as raw codes: every backend translates them at
/// the adapter boundary into one of these variants and attaches the native
/// diagnostic text.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or contradictory connection parameters. Raised before any native call.
    #[error("Invalid connection parameter `{field}`: {reason}")]
    Configuration {
        field: Cow<'static, str>,
        reason: String,
    },
    /// The native connect primitive failed.
    #[error("Could not connect to `{dsn}`: {cause}")]
    ConnectionFailed { dsn: String, cause: String },
    /// The native prepare primitive failed.
    #[error("Could not prepare the query:\n{sql}\n{native}")]
    PrepareFailed { sql: String, native: String },
    /// The native execution of a statement failed.
    #[error("Could not execute the statement:\n{sql}\n{native}")]
    Statement { sql: String, native: String },
    /// The native connection reported a failure (commit, rollback, close).
    #[error("Connection error: {native}")]
    Connection { native: String },
    /// The identity emulation query did not produce a value.
    #[error("Could not read the last identity value: {reason}")]
    IdentityLookupFailed { reason: String },
    /// A value could not be converted to the requested type.
    #[error("{0}")]
    Conversion(String),
}

impl Error {
    pub fn configuration(field: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Error::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}
