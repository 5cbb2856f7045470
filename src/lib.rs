// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # ArcheBase Store
//!
//! A Dremel-style document store: three chunk formats (textual, packed,
//! columnar) sharing one value model and one projection DSL.
//!
//! - **[`Value`]** / **[`Document`]** - the eleven-variant value model
//!   every codec reads and writes.
//! - **[`SchemaNode`]** - the schema tree a columnar chunk is shredded
//!   against.
//! - **[`ProjectionNode`]** - the prefix tree that every codec's
//!   projection pushdown is built on.
//! - **[`Chunk`]** - the external handle unifying `read`/`write` across
//!   formats.
//!
//! ## Example: round-tripping through the columnar format
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use archebase_store::{Chunk, ChunkFormat, ProjectionNode};
//!
//! let chunk = Chunk::open("data/events", ChunkFormat::Columnar, Some("schema.json"))?;
//! let projection = ProjectionNode::parse("user.id,event_type")?;
//! let documents = chunk.read(Some(&projection))?;
//! println!("read {} documents", documents.len());
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod codec;
pub mod core;
pub mod fieldgraph;
pub mod io;
pub mod projection;
pub mod schema;

pub use chunk::Chunk;
pub use core::{ChunkFormat, Document, List, Result, StoreError, Value};
pub use fieldgraph::{FieldGraph, FieldKind, FieldLabel, FieldNode, NodeId};
pub use io::{InputStream, OutputStream};
pub use projection::ProjectionNode;
pub use schema::{PrimitiveTag, SchemaNode};
