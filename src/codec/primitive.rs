// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The primitive codec (§4.1): fixed-endianness, little-endian, no
//! alignment, no framing between primitives. This is the shared building
//! block both the packed codec and every columnar leaf stream encode
//! values with.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{Document, List, Result, StoreError, Value};
use crate::io::InputStream;

/// Control byte tagging a value's variant.
mod tag {
    pub const NULL: u8 = b'n';
    pub const BOOLEAN: u8 = b'b';
    pub const INT32: u8 = b'i';
    pub const UINT32: u8 = b'u';
    pub const INT64: u8 = b'g';
    pub const UINT64: u8 = b'z';
    pub const FLOAT32: u8 = b'f';
    pub const FLOAT64: u8 = b'd';
    pub const STRING: u8 = b's';
    pub const DOCUMENT: u8 = b'o';
    pub const LIST: u8 = b'l';
}

/// Encode one value's tag byte and payload.
pub fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.push(tag::NULL),
        Value::Boolean(b) => {
            out.push(tag::BOOLEAN);
            out.push(if *b { 1 } else { 0 });
        }
        Value::Int32(v) => {
            out.push(tag::INT32);
            let mut buf = [0u8; 4];
            LittleEndian::write_i32(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::UInt32(v) => {
            out.push(tag::UINT32);
            let mut buf = [0u8; 4];
            LittleEndian::write_u32(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::Int64(v) => {
            out.push(tag::INT64);
            let mut buf = [0u8; 8];
            LittleEndian::write_i64(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::UInt64(v) => {
            out.push(tag::UINT64);
            let mut buf = [0u8; 8];
            LittleEndian::write_u64(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::Float32(v) => {
            out.push(tag::FLOAT32);
            let mut buf = [0u8; 4];
            LittleEndian::write_f32(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::Float64(v) => {
            out.push(tag::FLOAT64);
            let mut buf = [0u8; 8];
            LittleEndian::write_f64(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        Value::String(s) => {
            out.push(tag::STRING);
            encode_length_prefixed(s.as_bytes(), out);
        }
        Value::Document(doc) => {
            out.push(tag::DOCUMENT);
            let mut body = Vec::new();
            encode_document_body(doc, &mut body);
            encode_length_prefixed(&body, out);
        }
        Value::List(list) => {
            out.push(tag::LIST);
            let mut body = Vec::new();
            encode_list_body(list, &mut body);
            encode_length_prefixed(&body, out);
        }
    }
}

fn encode_length_prefixed(bytes: &[u8], out: &mut Vec<u8>) {
    let mut len_buf = [0u8; 4];
    LittleEndian::write_u32(&mut len_buf, bytes.len() as u32);
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(bytes);
}

fn encode_document_body(doc: &Document, out: &mut Vec<u8>) {
    for (key, value) in doc {
        encode_length_prefixed(key.as_bytes(), out);
        encode_value(value, out);
    }
}

fn encode_list_body(list: &List, out: &mut Vec<u8>) {
    for value in list {
        encode_value(value, out);
    }
}

/// Convenience wrapper returning a fresh buffer.
pub fn encode_value_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_value(value, &mut out);
    out
}

/// Decode one value (tag + payload) from `input`.
pub fn decode_value(input: &mut dyn InputStream) -> Result<Value> {
    let tag_byte = read_tag(input, "decode_value")?;
    decode_value_with_tag(tag_byte, input)
}

/// Read and validate the next control byte, returning a `CorruptInput`
/// error on EOF.
fn read_tag(input: &mut dyn InputStream, context: &str) -> Result<u8> {
    input
        .get1()?
        .ok_or_else(|| StoreError::corrupt(context, "unexpected end of stream reading control byte"))
}

fn decode_value_with_tag(tag_byte: u8, input: &mut dyn InputStream) -> Result<Value> {
    match tag_byte {
        tag::NULL => Ok(Value::Null),
        tag::BOOLEAN => {
            let b = read_exact_byte(input, "boolean payload")?;
            Ok(Value::Boolean(b != 0))
        }
        tag::INT32 => Ok(Value::Int32(LittleEndian::read_i32(&input.read(4)?))),
        tag::UINT32 => Ok(Value::UInt32(LittleEndian::read_u32(&input.read(4)?))),
        tag::INT64 => Ok(Value::Int64(LittleEndian::read_i64(&input.read(8)?))),
        tag::UINT64 => Ok(Value::UInt64(LittleEndian::read_u64(&input.read(8)?))),
        tag::FLOAT32 => Ok(Value::Float32(LittleEndian::read_f32(&input.read(4)?))),
        tag::FLOAT64 => Ok(Value::Float64(LittleEndian::read_f64(&input.read(8)?))),
        tag::STRING => {
            let bytes = read_length_prefixed(input, "string payload")?;
            String::from_utf8(bytes)
                .map(Value::String)
                .map_err(|e| StoreError::corrupt("string payload", format!("invalid UTF-8: {e}")))
        }
        tag::DOCUMENT => {
            let body = read_length_prefixed(input, "document body")?;
            decode_document_body(&body)
        }
        tag::LIST => {
            let body = read_length_prefixed(input, "list body")?;
            decode_list_body(&body)
        }
        other => Err(StoreError::corrupt("decode_value", format!("unknown control byte 0x{other:02x}"))),
    }
}

fn read_exact_byte(input: &mut dyn InputStream, context: &str) -> Result<u8> {
    input.get1()?.ok_or_else(|| StoreError::corrupt(context, "unexpected end of stream"))
}

fn read_length_prefixed(input: &mut dyn InputStream, context: &str) -> Result<Vec<u8>> {
    let len_bytes = input.read(4)?;
    let len = LittleEndian::read_u32(&len_bytes) as usize;
    input.read(len).map_err(|_| StoreError::corrupt(context, format!("expected {len} bytes of payload")))
}

/// Skip one value without materializing it, consuming exactly as many
/// bytes as decoding it would (the skip-length identity, §4.1).
pub fn skip_value(input: &mut dyn InputStream) -> Result<()> {
    let tag_byte = read_tag(input, "skip_value")?;
    match tag_byte {
        tag::NULL => Ok(()),
        tag::BOOLEAN => {
            read_exact_byte(input, "boolean payload")?;
            Ok(())
        }
        tag::INT32 | tag::UINT32 | tag::FLOAT32 => {
            input.read(4)?;
            Ok(())
        }
        tag::INT64 | tag::UINT64 | tag::FLOAT64 => {
            input.read(8)?;
            Ok(())
        }
        tag::STRING | tag::DOCUMENT | tag::LIST => {
            let len_bytes = input.read(4)?;
            let len = LittleEndian::read_u32(&len_bytes) as usize;
            input.read(len)?;
            Ok(())
        }
        other => Err(StoreError::corrupt("skip_value", format!("unknown control byte 0x{other:02x}"))),
    }
}

/// Decode the body of a length-prefixed Document, applying a projection
/// at every nesting level (§4.2). `projection` of `None` means "decode
/// from an in-memory byte slice with no stream to skip against" — used by
/// the non-projected entry points; callers that need pushdown go through
/// [`crate::codec::packed`] directly against an [`InputStream`].
fn decode_document_body(body: &[u8]) -> Result<Value> {
    let mut cursor = SliceInputStream::new(body);
    let mut doc = Document::new();
    while !cursor.eof()? {
        let key_len_bytes = cursor.read(4)?;
        let key_len = LittleEndian::read_u32(&key_len_bytes) as usize;
        let key_bytes = cursor.read(key_len)?;
        let key = String::from_utf8(key_bytes)
            .map_err(|e| StoreError::corrupt("document key", format!("invalid UTF-8: {e}")))?;
        let value = decode_value(&mut cursor)?;
        doc.insert(key, value);
    }
    Ok(Value::Document(doc))
}

fn decode_list_body(body: &[u8]) -> Result<Value> {
    let mut cursor = SliceInputStream::new(body);
    let mut list = List::new();
    while !cursor.eof()? {
        list.push(decode_value(&mut cursor)?);
    }
    Ok(Value::List(list))
}

/// A minimal in-memory `InputStream` over an owned byte slice, used
/// internally to decode a length-prefixed body without a real file
/// behind it.
pub(crate) struct SliceInputStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceInputStream<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        SliceInputStream { data, pos: 0 }
    }
}

impl<'a> InputStream for SliceInputStream<'a> {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        if self.pos + n > self.data.len() {
            return Err(StoreError::corrupt("slice read", "short read"));
        }
        let slice = self.data[self.pos..self.pos + n].to_vec();
        self.pos += n;
        Ok(slice)
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.data.get(self.pos).copied())
    }

    fn seek(&mut self, offset: i64) -> Result<()> {
        let new_pos = self.pos as i64 + offset;
        if new_pos < 0 || new_pos as usize > self.data.len() {
            return Err(StoreError::corrupt("slice seek", "offset out of range"));
        }
        self.pos = new_pos as usize;
        Ok(())
    }

    fn get1(&mut self) -> Result<Option<u8>> {
        match self.data.get(self.pos).copied() {
            Some(b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn eof(&mut self) -> Result<bool> {
        Ok(self.pos >= self.data.len())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        Err(StoreError::not_implemented("read_line on a slice stream"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: Value) {
        let bytes = encode_value_bytes(&value);
        let mut cursor = SliceInputStream::new(&bytes);
        let decoded = decode_value(&mut cursor).unwrap();
        assert_eq!(decoded, value);
        assert!(cursor.eof().unwrap());
    }

    #[test]
    fn round_trips_every_primitive() {
        round_trip(Value::Null);
        round_trip(Value::Boolean(true));
        round_trip(Value::Boolean(false));
        round_trip(Value::Int32(-42));
        round_trip(Value::UInt32(42));
        round_trip(Value::Int64(-1_000_000_000_000));
        round_trip(Value::UInt64(1_000_000_000_000));
        round_trip(Value::Float32(1.5));
        round_trip(Value::Float64(2.5));
        round_trip(Value::String("hello".to_string()));
    }

    #[test]
    fn round_trips_nested_document_and_list() {
        let mut doc = Document::new();
        doc.insert("a".to_string(), Value::Int32(1));
        doc.insert("b".to_string(), Value::List(vec![Value::Int32(1), Value::Null]));
        round_trip(Value::Document(doc));
    }

    #[test]
    fn float32_reads_exactly_four_bytes() {
        let bytes = encode_value_bytes(&Value::Float32(1.0));
        assert_eq!(bytes.len(), 1 + 4);
    }

    #[test]
    fn skip_length_matches_decode_length() {
        let value = Value::String("abcdef".to_string());
        let bytes = encode_value_bytes(&value);

        let mut decode_cursor = SliceInputStream::new(&bytes);
        decode_value(&mut decode_cursor).unwrap();
        let offset_after_decode = decode_cursor.pos;

        let mut skip_cursor = SliceInputStream::new(&bytes);
        skip_value(&mut skip_cursor).unwrap();
        let offset_after_skip = skip_cursor.pos;

        assert_eq!(offset_after_decode, offset_after_skip);
        assert_eq!(offset_after_decode, bytes.len());
    }

    #[test]
    fn unknown_tag_is_corrupt_input() {
        let bytes = vec![b'?'];
        let mut cursor = SliceInputStream::new(&bytes);
        let err = decode_value(&mut cursor).unwrap_err();
        assert!(matches!(err, StoreError::CorruptInput { .. }));
    }

    #[test]
    fn short_read_is_corrupt_input() {
        let bytes = vec![b'i', 0, 0]; // int32 tag but only 2 payload bytes
        let mut cursor = SliceInputStream::new(&bytes);
        let err = decode_value(&mut cursor).unwrap_err();
        assert!(matches!(err, StoreError::CorruptInput { .. }));
    }
}
