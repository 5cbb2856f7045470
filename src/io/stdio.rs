// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Standard-stream wrappers for chunk paths `"stdin"`/`"stdout"` (§6).

use std::io::{BufRead, BufReader, Read, Stdin, Stdout, Write};

use crate::core::{Result, StoreError};

use super::stream::{InputStream, OutputStream};

/// An `InputStream` reading from the process's standard input.
pub struct StdinStream {
    inner: BufReader<Stdin>,
    peeked: Option<u8>,
}

impl StdinStream {
    /// Wrap `std::io::stdin()`.
    pub fn new() -> Self {
        StdinStream {
            inner: BufReader::new(std::io::stdin()),
            peeked: None,
        }
    }
}

impl Default for StdinStream {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinStream {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(StoreError::io("stdin read", e.to_string())),
        }
    }
}

impl InputStream for StdinStream {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            match self.next_byte()? {
                Some(b) => out.push(b),
                None => {
                    return Err(StoreError::corrupt("stdin read", format!("expected {n} bytes, stream ended after {}", out.len())));
                }
            }
        }
        Ok(out)
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = self.next_byte()?;
        }
        Ok(self.peeked)
    }

    fn seek(&mut self, offset: i64) -> Result<()> {
        if offset == 0 {
            return Ok(());
        }
        Err(StoreError::not_implemented("seeking on a stdin stream"))
    }

    fn get1(&mut self) -> Result<Option<u8>> {
        self.next_byte()
    }

    fn eof(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if let Some(b) = self.peeked.take() {
            line.push(b as char);
        }
        let read = self
            .inner
            .read_line(&mut line)
            .map_err(|e| StoreError::io("stdin read_line", e.to_string()))?;
        if read == 0 && line.is_empty() {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// An `OutputStream` writing to the process's standard output.
pub struct StdoutStream {
    inner: Stdout,
}

impl StdoutStream {
    /// Wrap `std::io::stdout()`.
    pub fn new() -> Self {
        StdoutStream { inner: std::io::stdout() }
    }
}

impl Default for StdoutStream {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputStream for StdoutStream {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner
            .write_all(bytes)
            .map_err(|e| StoreError::io("stdout write", e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|e| StoreError::io("stdout flush", e.to_string()))
    }
}
