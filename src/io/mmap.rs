// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Memory-mapped file backed [`InputStream`], preferred for large inputs.
//! The mapping is opened once and all reads are served from the resident
//! pages, with the read position tracked separately from the backing map.

use std::fs::File;
use std::path::Path;

use crate::core::{Result, StoreError};

use super::stream::InputStream;

/// An `InputStream` reading from a memory-mapped regular file.
pub struct MmapInputStream {
    mmap: memmap2::Mmap,
    pos: usize,
}

impl MmapInputStream {
    /// Open and memory-map `path` for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|e| StoreError::io(format!("open '{}'", path_ref.display()), e.to_string()))?;

        // Safety: the mapping is owned exclusively by this stream and only
        // ever read; the file is not modified concurrently by this process.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| StoreError::io(format!("mmap '{}'", path_ref.display()), e.to_string()))?;

        Ok(MmapInputStream { mmap, pos: 0 })
    }

    fn data(&self) -> &[u8] {
        &self.mmap[..]
    }
}

impl InputStream for MmapInputStream {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let data = self.data();
        if self.pos + n > data.len() {
            return Err(StoreError::corrupt(
                "mmap read",
                format!("requested {n} bytes at offset {}, only {} available", self.pos, data.len() - self.pos),
            ));
        }
        let slice = data[self.pos..self.pos + n].to_vec();
        self.pos += n;
        Ok(slice)
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.data().get(self.pos).copied())
    }

    fn seek(&mut self, offset: i64) -> Result<()> {
        let new_pos = self.pos as i64 + offset;
        if new_pos < 0 || new_pos as usize > self.mmap.len() {
            return Err(StoreError::corrupt("mmap seek", format!("offset {offset} out of range")));
        }
        self.pos = new_pos as usize;
        Ok(())
    }

    fn get1(&mut self) -> Result<Option<u8>> {
        match self.data().get(self.pos).copied() {
            Some(b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn eof(&mut self) -> Result<bool> {
        Ok(self.pos >= self.mmap.len())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let data = self.data();
        if self.pos >= data.len() {
            return Ok(None);
        }
        let rest = &data[self.pos..];
        let line_len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        let consumed = if line_len < rest.len() { line_len + 1 } else { line_len };
        let line = String::from_utf8(rest[..line_len].to_vec())
            .map_err(|e| StoreError::corrupt("mmap read_line", format!("invalid UTF-8: {e}")))?;
        self.pos += consumed;
        Ok(Some(line))
    }
}
