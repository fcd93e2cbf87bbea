//! # Error Types
//!
//! Operational errors for the validator crates. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation findings are never errors. A malformed GeoJSON document
//!   produces [`Diagnostic`](crate::Diagnostic) records, not an `Err`.
//! - `GeovalError` covers the surfaces around validation: loading a
//!   [`ValidationProfile`](crate::ValidationProfile) and parsing type names.

use thiserror::Error;

/// Top-level error type for the GeoJSON validator.
#[derive(Error, Debug)]
pub enum GeovalError {
    /// A `type` string is not one of the RFC 7946 type names.
    #[error("unknown GeoJSON type: {0:?}")]
    UnknownType(String),

    /// A diagnostic kind name did not match any known kind.
    #[error("unknown diagnostic kind: {0:?}")]
    UnknownDiagnosticKind(String),

    /// A validation profile could not be loaded.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Error while loading a validation profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The YAML document could not be deserialized into a profile.
    #[error("invalid YAML profile: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON value could not be deserialized into a profile.
    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile deserialized but violates a profile constraint.
    #[error("invalid profile setting '{field}': {reason}")]
    InvalidSetting {
        /// Name of the offending field.
        field: &'static str,
        /// Reason the value was rejected.
        reason: String,
    },
}
