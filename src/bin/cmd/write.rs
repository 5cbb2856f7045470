// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `write` subcommand: read textual documents from stdin, write them to a chunk.

use anyhow::{Context, Result};
use archebase_store::codec::textual;
use archebase_store::io::StdinStream;
use archebase_store::{Chunk, ChunkFormat};
use clap::Args;

/// Read textual documents from stdin and write them to the target chunk.
#[derive(Args)]
pub struct WriteCmd {
    /// Path to the chunk (a file for textual/packed, a directory for columnar).
    chunk: String,

    /// Chunk format.
    #[arg(long, value_name = "textual|packed|columnar")]
    format: ChunkFormat,

    /// Schema file path (required for `columnar`).
    #[arg(long)]
    schema: Option<String>,
}

impl WriteCmd {
    pub fn run(self) -> Result<()> {
        let mut stdin = StdinStream::new();
        let documents = textual::read_all(&mut stdin, None).context("reading documents from stdin")?;

        let chunk = Chunk::open(&self.chunk, self.format, self.schema.as_deref())
            .with_context(|| format!("opening chunk '{}'", self.chunk))?;
        chunk.write(&documents).context("writing chunk")?;

        eprintln!("wrote {} document(s) to {}", documents.len(), self.chunk);
        Ok(())
    }
}
