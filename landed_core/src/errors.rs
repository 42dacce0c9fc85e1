//! # Error Types
//!
//! Structured error types for landed_core. The pricing functions themselves
//! never fail: incomplete input yields `None`. These errors exist for callers
//! that need to explain *why* a result is missing, and for the settings and
//! file layers built on top of the engine.
//!
//! ## Example
//!
//! ```rust
//! use landed_core::errors::{CalcError, CalcResult};
//!
//! fn validate_exchange_rate(rate: f64) -> CalcResult<()> {
//!     if rate <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "exchange_rate_krw_per_usd".to_string(),
//!             value: rate.to_string(),
//!             reason: "Exchange rate must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for landed_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and settings operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or zero
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Container or pallet preset name not recognized
    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    /// A calculation could not produce a result
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Settings schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownPreset error
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        CalcError::UnknownPreset { name: name.into() }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from anything displayable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Missing or zero input: the caller should keep waiting for input
    /// rather than report a failure.
    pub fn is_incomplete_input(&self) -> bool {
        matches!(self, CalcError::MissingField { .. })
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownPreset { .. } => "UNKNOWN_PRESET",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("weight_per_box_kg", "-3", "Weight cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("unit_price_usd").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_preset("30ft").error_code(), "UNKNOWN_PRESET");
    }

    #[test]
    fn test_incomplete_input_classification() {
        assert!(CalcError::missing_field("box_quantity").is_incomplete_input());
        assert!(!CalcError::invalid_input("a", "b", "c").is_incomplete_input());
        assert!(CalcError::file_locked("x", "y", "z").is_recoverable());
    }
}
