// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout the document store.
//!
//! This module provides the foundational types for the library:
//! - [`StoreError`] - Structured error handling
//! - [`Value`] - The eleven-variant document value model
//! - [`ChunkFormat`] - On-disk format identifier

pub mod error;
pub mod value;

pub use error::{Result, StoreError};
pub use value::{Document, List, Value};

/// On-disk chunk format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkFormat {
    /// Line-delimited, UTF-8, JSON-style text (§4.3).
    Textual,
    /// Self-describing binary concatenation of documents (§4.2).
    Packed,
    /// Dremel-style per-leaf column streams (§4.4-§4.7).
    Columnar,
}

/// Error returned when parsing a [`ChunkFormat`] from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseChunkFormatError {
    _private: (),
}

impl std::fmt::Display for ParseChunkFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid chunk format, expected 'textual', 'packed', or 'columnar'"
        )
    }
}

impl std::error::Error for ParseChunkFormatError {}

impl std::str::FromStr for ChunkFormat {
    type Err = ParseChunkFormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "textual" | "text" | "txt" => Ok(ChunkFormat::Textual),
            "packed" | "bin" | "binary" => Ok(ChunkFormat::Packed),
            "columnar" | "column" => Ok(ChunkFormat::Columnar),
            _ => Err(ParseChunkFormatError { _private: () }),
        }
    }
}

impl ChunkFormat {
    /// True for the columnar format.
    pub fn is_columnar(&self) -> bool {
        matches!(self, ChunkFormat::Columnar)
    }

    /// Whether a schema path is required to open a chunk in this format.
    pub fn requires_schema(&self) -> bool {
        self.is_columnar()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkFormat::Textual => "textual",
            ChunkFormat::Packed => "packed",
            ChunkFormat::Columnar => "columnar",
        }
    }
}

impl std::fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chunk_format() {
        assert_eq!("textual".parse::<ChunkFormat>().unwrap(), ChunkFormat::Textual);
        assert_eq!("PACKED".parse::<ChunkFormat>().unwrap(), ChunkFormat::Packed);
        assert_eq!("columnar".parse::<ChunkFormat>().unwrap(), ChunkFormat::Columnar);
        assert!("mcap".parse::<ChunkFormat>().is_err());
    }

    #[test]
    fn schema_requirement() {
        assert!(ChunkFormat::Columnar.requires_schema());
        assert!(!ChunkFormat::Textual.requires_schema());
        assert!(!ChunkFormat::Packed.requires_schema());
    }
}
