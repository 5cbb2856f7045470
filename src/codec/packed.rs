// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The packed codec (§4.2): a self-describing binary format of
//! concatenated top-level documents, each encoded with the primitive
//! codec (§4.1). Reading can apply a projection, skipping the bytes of
//! any field not selected instead of materializing it.

use crate::core::{Document, List, Result, StoreError, Value};
use crate::io::{InputStream, OutputStream};
use crate::projection::ProjectionNode;

use super::primitive::{encode_value, skip_value};

/// Read every top-level document from `input` until EOF.
pub fn read_all(input: &mut dyn InputStream, projection: Option<&ProjectionNode>) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    while !input.eof()? {
        let value = read_value(input, projection)?;
        match value {
            Value::Document(doc) => docs.push(doc),
            other => {
                return Err(StoreError::corrupt(
                    "packed chunk",
                    format!("expected a top-level document, found a {}", other.type_name()),
                ))
            }
        }
    }
    Ok(docs)
}

/// Write every document to `output`, each as a top-level value.
pub fn write_all(output: &mut dyn OutputStream, documents: &[Document]) -> Result<()> {
    for doc in documents {
        let mut buf = Vec::new();
        encode_value(&Value::Document(doc.clone()), &mut buf);
        output.write(&buf)?;
    }
    output.flush()
}

/// Read one value, applying `projection` to Document bodies as they are
/// decoded: fields absent from the projection are skipped rather than
/// materialized.
fn read_value(input: &mut dyn InputStream, projection: Option<&ProjectionNode>) -> Result<Value> {
    let tag_byte = input
        .get1()?
        .ok_or_else(|| StoreError::corrupt("packed read_value", "unexpected end of stream reading control byte"))?;

    match tag_byte {
        b'o' => read_document_projected(input, projection),
        b'l' => read_list_projected(input, projection),
        _ => {
            input.seek(-1)?;
            super::primitive::decode_value(input)
        }
    }
}

fn read_length(input: &mut dyn InputStream) -> Result<usize> {
    let bytes = input.read(4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
}

fn read_document_projected(input: &mut dyn InputStream, projection: Option<&ProjectionNode>) -> Result<Value> {
    let len = read_length(input)?;
    let mut consumed = 0usize;
    let mut doc = Document::new();

    while consumed < len {
        let key_len = read_length_tracking(input, &mut consumed)?;
        let key_bytes = read_tracking(input, key_len, &mut consumed)?;
        let key = String::from_utf8(key_bytes)
            .map_err(|e| StoreError::corrupt("document key", format!("invalid UTF-8: {e}")))?;

        let child_projection = match projection {
            None => None,
            Some(p) if p.is_leaf() => None,
            Some(p) => match p.child(&key) {
                Some(child) => Some(child),
                None => {
                    skip_value_tracking(input, &mut consumed)?;
                    continue;
                }
            },
        };

        let value = read_value_tracking(input, child_projection, &mut consumed)?;
        doc.insert(key, value);
    }
    Ok(Value::Document(doc))
}

/// Packed bodies are length-prefixed rather than self-terminating, so
/// every nested read is routed through a [`CountingInputStream`] to know
/// how many of the declared length's bytes it consumed.
fn read_length_tracking(input: &mut dyn InputStream, consumed: &mut usize) -> Result<usize> {
    let mut counting = CountingInputStream { inner: input, count: 0 };
    let len = read_length(&mut counting)?;
    *consumed += counting.count;
    Ok(len)
}

fn read_tracking(input: &mut dyn InputStream, n: usize, consumed: &mut usize) -> Result<Vec<u8>> {
    let mut counting = CountingInputStream { inner: input, count: 0 };
    let bytes = counting.read(n)?;
    *consumed += counting.count;
    Ok(bytes)
}

fn skip_value_tracking(input: &mut dyn InputStream, consumed: &mut usize) -> Result<()> {
    let mut counting = CountingInputStream { inner: input, count: 0 };
    skip_value(&mut counting)?;
    *consumed += counting.count;
    Ok(())
}

fn read_value_tracking(
    input: &mut dyn InputStream,
    projection: Option<&ProjectionNode>,
    consumed: &mut usize,
) -> Result<Value> {
    let mut counting = CountingInputStream { inner: input, count: 0 };
    let value = read_value(&mut counting, projection)?;
    *consumed += counting.count;
    Ok(value)
}

/// Wraps an `InputStream`, counting bytes consumed through `read`/`get1`/
/// `seek` so packed document bodies (which are length-prefixed, not
/// self-terminating) can track how much of their declared length each
/// nested value used.
struct CountingInputStream<'a> {
    inner: &'a mut dyn InputStream,
    count: usize,
}

impl<'a> InputStream for CountingInputStream<'a> {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let bytes = self.inner.read(n)?;
        self.count += bytes.len();
        Ok(bytes)
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        self.inner.peek()
    }

    fn seek(&mut self, offset: i64) -> Result<()> {
        self.inner.seek(offset)?;
        if offset < 0 {
            self.count = self.count.saturating_sub((-offset) as usize);
        } else {
            self.count += offset as usize;
        }
        Ok(())
    }

    fn get1(&mut self) -> Result<Option<u8>> {
        let b = self.inner.get1()?;
        if b.is_some() {
            self.count += 1;
        }
        Ok(b)
    }

    fn eof(&mut self) -> Result<bool> {
        self.inner.eof()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.inner.read_line()
    }
}

fn read_list_projected(input: &mut dyn InputStream, projection: Option<&ProjectionNode>) -> Result<Value> {
    let len = read_length(input)?;
    let mut consumed = 0usize;
    let mut list = List::new();
    while consumed < len {
        let element = read_value_tracking(input, projection, &mut consumed)?;
        list.push(element);
    }
    Ok(Value::List(list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::SliceInputStream;

    fn doc_of(pairs: &[(&str, Value)]) -> Document {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn round_trip_bytes(documents: &[Document]) -> Vec<u8> {
        let mut buf = Vec::new();
        for doc in documents {
            encode_value(&Value::Document(doc.clone()), &mut buf);
        }
        buf
    }

    #[test]
    fn reads_multiple_top_level_documents() {
        let docs = vec![
            doc_of(&[("a", Value::Int32(1))]),
            doc_of(&[("a", Value::Int32(2))]),
        ];
        let bytes = round_trip_bytes(&docs);
        let mut stream = SliceInputStream::new(&bytes);
        let decoded = read_all(&mut stream, None).unwrap();
        assert_eq!(decoded, docs);
    }

    #[test]
    fn projection_skips_unselected_fields() {
        let doc = doc_of(&[
            ("keep", Value::Int32(1)),
            ("drop", Value::String("x".repeat(50))),
        ]);
        let bytes = round_trip_bytes(&[doc]);
        let projection = ProjectionNode::parse("keep").unwrap();

        let mut stream = SliceInputStream::new(&bytes);
        let decoded = read_all(&mut stream, Some(&projection)).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].get("keep"), Some(&Value::Int32(1)));
        assert!(!decoded[0].contains_key("drop"));
    }

    #[test]
    fn nested_document_projection_prunes_recursively() {
        let mut inner = Document::new();
        inner.insert("x".to_string(), Value::Int32(1));
        inner.insert("y".to_string(), Value::Int32(2));
        let doc = doc_of(&[("outer", Value::Document(inner))]);
        let bytes = round_trip_bytes(&[doc]);

        let projection = ProjectionNode::parse("outer.x").unwrap();
        let mut stream = SliceInputStream::new(&bytes);
        let decoded = read_all(&mut stream, Some(&projection)).unwrap();

        let outer = decoded[0].get("outer").unwrap().as_document().unwrap();
        assert_eq!(outer.get("x"), Some(&Value::Int32(1)));
        assert!(!outer.contains_key("y"));
    }

    #[test]
    fn no_projection_keeps_everything() {
        let doc = doc_of(&[("a", Value::Int32(1)), ("b", Value::Boolean(true))]);
        let bytes = round_trip_bytes(&[doc.clone()]);
        let mut stream = SliceInputStream::new(&bytes);
        let decoded = read_all(&mut stream, None).unwrap();
        assert_eq!(decoded[0], doc);
    }
}
