// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `convert` subcommand: read one chunk, optionally project it, write it
//! out in another format.

use anyhow::{Context, Result};
use archebase_store::{Chunk, ChunkFormat, ProjectionNode};
use clap::Args;

/// Read the input chunk, optionally project it, and write every
/// surviving document to the output chunk in the target format.
#[derive(Args)]
pub struct ConvertCmd {
    /// Input chunk path.
    input: String,
    /// Input chunk format.
    input_format: ChunkFormat,
    /// Output chunk path.
    output: String,
    /// Output chunk format.
    output_format: ChunkFormat,

    /// Schema file path, used for whichever side (or both) is `columnar`.
    #[arg(long)]
    schema: Option<String>,

    /// Projection DSL applied while reading the input chunk.
    #[arg(long)]
    projection: Option<String>,
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        let input_chunk = Chunk::open(&self.input, self.input_format, self.schema.as_deref())
            .with_context(|| format!("opening input chunk '{}'", self.input))?;

        let projection = self
            .projection
            .as_deref()
            .map(ProjectionNode::parse)
            .transpose()
            .context("parsing --projection")?;

        let documents = input_chunk.read(projection.as_ref()).context("reading input chunk")?;

        let output_chunk = Chunk::open(&self.output, self.output_format, self.schema.as_deref())
            .with_context(|| format!("opening output chunk '{}'", self.output))?;
        output_chunk.write(&documents).context("writing output chunk")?;

        eprintln!("converted {} document(s)", documents.len());
        Ok(())
    }
}
