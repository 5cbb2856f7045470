// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for the document store.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose
//! error variant carries structured fields rather than a bare message so
//! callers can log with `tracing`'s structured fields instead of parsing
//! prose.

use std::fmt;

/// Errors that can occur during chunk read/write operations.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Any underlying I/O failure (open, read, write, flush).
    IoError {
        /// What operation was being attempted.
        context: String,
        /// Underlying message.
        message: String,
    },

    /// Unexpected EOF, unknown control byte, or mismatched record counts
    /// between column streams.
    CorruptInput {
        /// Where in the decode the corruption was detected.
        context: String,
        /// Description of what was wrong.
        reason: String,
    },

    /// Schema is not an object, or a leaf names an unsupported primitive tag.
    SchemaError {
        /// Path within the schema tree, if known.
        path: String,
        /// Validation error message.
        reason: String,
    },

    /// A requested format has no implementation.
    NotImplemented {
        /// Name of the missing feature.
        feature: String,
    },

    /// The projection DSL string could not be parsed.
    BadProjection {
        /// The offending projection string.
        input: String,
        /// Parse error message.
        reason: String,
    },
}

impl StoreError {
    /// Build an [`StoreError::IoError`].
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::IoError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Build a [`StoreError::CorruptInput`].
    pub fn corrupt(context: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::CorruptInput {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StoreError::SchemaError`].
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::SchemaError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StoreError::NotImplemented`].
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        StoreError::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Build a [`StoreError::BadProjection`].
    pub fn bad_projection(input: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::BadProjection {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Structured fields for `tracing`-style logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            StoreError::IoError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            StoreError::CorruptInput { context, reason } => {
                vec![("context", context.clone()), ("reason", reason.clone())]
            }
            StoreError::SchemaError { path, reason } => {
                vec![("path", path.clone()), ("reason", reason.clone())]
            }
            StoreError::NotImplemented { feature } => vec![("feature", feature.clone())],
            StoreError::BadProjection { input, reason } => {
                vec![("input", input.clone()), ("reason", reason.clone())]
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError { context, message } => {
                write!(f, "I/O error during {context}: {message}")
            }
            StoreError::CorruptInput { context, reason } => {
                write!(f, "corrupt input in {context}: {reason}")
            }
            StoreError::SchemaError { path, reason } => {
                if path.is_empty() {
                    write!(f, "invalid schema: {reason}")
                } else {
                    write!(f, "invalid schema at '{path}': {reason}")
                }
            }
            StoreError::NotImplemented { feature } => {
                write!(f, "not implemented: {feature}")
            }
            StoreError::BadProjection { input, reason } => {
                write!(f, "bad projection '{input}': {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError {
            context: "io".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
