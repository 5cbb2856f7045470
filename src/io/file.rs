// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Buffered regular-file backed [`OutputStream`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{Result, StoreError};

use super::stream::OutputStream;

/// Buffer size used for the writer, matching the 32 KiB buffer the
/// original tooling sized its file streams with.
const WRITE_BUFFER_SIZE: usize = 32 * 1024;

/// An `OutputStream` writing to a regular file through a buffered writer.
pub struct FileOutputStream {
    inner: BufWriter<File>,
}

impl FileOutputStream {
    /// Create (or truncate) `path` for writing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref)
            .map_err(|e| StoreError::io(format!("create '{}'", path_ref.display()), e.to_string()))?;
        Ok(FileOutputStream {
            inner: BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
        })
    }
}

impl OutputStream for FileOutputStream {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner
            .write_all(bytes)
            .map_err(|e| StoreError::io("file write", e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|e| StoreError::io("file flush", e.to_string()))
    }
}

impl Drop for FileOutputStream {
    fn drop(&mut self) {
        let _ = self.inner.flush();
    }
}
