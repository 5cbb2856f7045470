// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `read` subcommand: print a chunk's documents as one JSON line each.

use anyhow::{Context, Result};
use archebase_store::codec::textual::document_to_line;
use archebase_store::{Chunk, ChunkFormat, ProjectionNode};
use clap::Args;

/// Read a chunk and print one JSON document per line to stdout.
#[derive(Args)]
pub struct ReadCmd {
    /// Path to the chunk (a file for textual/packed, a directory for columnar).
    chunk: String,

    /// Chunk format.
    #[arg(long, value_name = "textual|packed|columnar")]
    format: ChunkFormat,

    /// Schema file path (required for `columnar`).
    #[arg(long)]
    schema: Option<String>,

    /// Projection DSL, e.g. `"user.id,event_type"`. Omit to select every field.
    #[arg(long)]
    projection: Option<String>,
}

impl ReadCmd {
    pub fn run(self) -> Result<()> {
        let chunk = Chunk::open(&self.chunk, self.format, self.schema.as_deref())
            .with_context(|| format!("opening chunk '{}'", self.chunk))?;

        let projection = self
            .projection
            .as_deref()
            .map(ProjectionNode::parse)
            .transpose()
            .context("parsing --projection")?;

        let documents = chunk.read(projection.as_ref()).context("reading chunk")?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        use std::io::Write as _;
        for doc in &documents {
            let line = document_to_line(doc).context("serializing document")?;
            writeln!(handle, "{line}").context("writing to stdout")?;
        }
        Ok(())
    }
}
