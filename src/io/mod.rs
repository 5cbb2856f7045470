// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O capabilities consumed by the codecs (§6).
//!
//! [`open_input`] and [`open_output`] are the only places in the crate
//! that know about paths: the special paths `"stdin"`/`"stdout"` map to
//! the standard-stream wrappers, and every other path is a regular file
//! (memory-mapped for reading, buffered for writing).

pub mod file;
pub mod mmap;
pub mod stdio;
pub mod stream;

pub use file::FileOutputStream;
pub use mmap::MmapInputStream;
pub use stdio::{StdinStream, StdoutStream};
pub use stream::{InputStream, OutputStream};

use crate::core::Result;

/// Open `path` for reading. `"stdin"` reads from the process's standard
/// input; anything else is memory-mapped.
pub fn open_input(path: &str) -> Result<Box<dyn InputStream>> {
    if path == "stdin" {
        Ok(Box::new(StdinStream::new()))
    } else {
        Ok(Box::new(MmapInputStream::open(path)?))
    }
}

/// Open `path` for writing (truncating if it exists). `"stdout"` writes
/// to the process's standard output; anything else is a regular file.
pub fn open_output(path: &str) -> Result<Box<dyn OutputStream>> {
    if path == "stdout" {
        Ok(Box::new(StdoutStream::new()))
    } else {
        Ok(Box::new(FileOutputStream::create(path)?))
    }
}
