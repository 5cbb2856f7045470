// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # ArcheBase Store CLI
//!
//! Command-line tool for reading, writing, and converting document
//! chunks across the textual, packed, and columnar formats.
//!
//! ## Usage
//!
//! ```sh
//! # Read a chunk, printing one JSON document per line
//! archebase-store read data.jsonl --format textual
//!
//! # Read a columnar chunk with a projection
//! archebase-store read events/ --format columnar --schema schema.json --projection user.id,event_type
//!
//! # Write textual documents from stdin into a packed chunk
//! archebase-store write out.bin --format packed
//!
//! # Convert textual to columnar
//! archebase-store convert in.jsonl textual events/ columnar --schema schema.json
//! ```

mod cmd;

use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, ReadCmd, WriteCmd};

/// ArcheBase Store - Dremel-style document chunk toolkit.
#[derive(Parser)]
#[command(name = "archebase-store")]
#[command(about = "Read, write, and convert document chunks", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a chunk and print one JSON document per line to stdout.
    Read(ReadCmd),
    /// Read textual documents from stdin and write them to a chunk.
    Write(WriteCmd),
    /// Read a chunk, optionally project it, and write it in another format.
    Convert(ConvertCmd),
}

fn run() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Read(cmd) => cmd.run(),
        Commands::Write(cmd) => cmd.run(),
        Commands::Convert(cmd) => cmd.run(),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
