//! Error types for environment binding and file loading

use crate::value::{CoerceError, Kind};

/// Errors that can occur while populating a record.
///
/// Only a handful of conditions are fatal. Absent environment variables,
/// malformed integers and fields of unsupported kinds are skipped silently
/// and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The record was passed by value, so nothing could be written back.
    #[error("load(non-mutable {type_name})")]
    NotMutable {
        /// Type name of the offending value
        type_name: &'static str,
    },

    /// The target reference was absent.
    #[error("load(null reference to {type_name})")]
    NullTarget {
        /// Type name of the record the reference would point to
        type_name: &'static str,
    },

    /// A floating-point environment value could not be parsed.
    ///
    /// This is the only coercion failure that aborts a load.
    #[error("Failed to parse environment variable '{key}' for field '{field}': {source}")]
    Parse {
        /// Name of the field being bound
        field: &'static str,
        /// Environment variable the raw value came from
        key: &'static str,
        /// Underlying coercion failure
        source: CoerceError,
    },

    /// A custom-decoded value does not fit the field it was returned for.
    #[error("Cannot assign {from} value to field '{field}' of kind {to}")]
    Convert {
        /// Name of the field being bound
        field: &'static str,
        /// Kind of the value the decoder produced
        from: Kind,
        /// Kind of the field
        to: Kind,
    },

    /// A record's custom decoder reported a failure.
    #[error("Failed to decode field '{field}' from environment variable '{key}': {source}")]
    Decode {
        /// Name of the field being bound
        field: &'static str,
        /// Environment variable the raw value came from
        key: &'static str,
        /// Error returned by the decoder
        source: anyhow::Error,
    },

    /// A configuration file could not be read.
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A configuration file was read but its contents could not be decoded.
    #[error("Failed to decode file '{path}': {source}")]
    FileDecode {
        /// Path of the file
        path: String,
        /// Error returned by the file decoder
        source: anyhow::Error,
    },
}

impl LoadError {
    /// Create a by-value target error (used by macro-generated code)
    #[doc(hidden)]
    pub fn not_mutable<T: ?Sized>() -> Self {
        Self::NotMutable {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a null target error
    #[doc(hidden)]
    pub fn null_target<T: ?Sized>() -> Self {
        Self::NullTarget {
            type_name: std::any::type_name::<T>(),
        }
    }
}
