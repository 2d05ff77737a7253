// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

//! The recursive "portable storage" payload: a 9-byte magic header
//! followed by a tree of named sections, scalars, and arrays.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use super::constants::PORTABLE_STORAGE_HEADER;
use super::varint::{self, VarintError};

/// Errors from decoding or encoding a portable-storage payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("truncated payload")]
    Truncated,
    #[error("payload does not start with the portable-storage magic header")]
    BadPayloadHeader,
    #[error("unexpected serialize tag {0:#x}")]
    UnknownTag(u8),
    #[error(transparent)]
    Varint(#[from] VarintError),
    #[error("tried to encode a value kind this codec does not produce")]
    UnsupportedValue,
}

/// The scalar kinds a portable-storage entry can carry, tagged as on the
/// wire (see the table in the message-format documentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    I64 = 1,
    I32 = 2,
    I16 = 3,
    I8 = 4,
    U64 = 5,
    U32 = 6,
    U16 = 7,
    U8 = 8,
    Bytes = 10,
    Section = 12,
}

impl ScalarKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, StorageError> {
        Ok(match tag {
            1 => ScalarKind::I64,
            2 => ScalarKind::I32,
            3 => ScalarKind::I16,
            4 => ScalarKind::I8,
            5 => ScalarKind::U64,
            6 => ScalarKind::U32,
            7 => ScalarKind::U16,
            8 => ScalarKind::U8,
            10 => ScalarKind::Bytes,
            12 => ScalarKind::Section,
            other => return Err(StorageError::UnknownTag(other)),
        })
    }
}

const ARRAY_BIT: u8 = 0x80;
const ARRAY_OF_ENTRY_TAG: u8 = 13;

/// A node in the payload value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I64(i64),
    I32(i32),
    I16(i16),
    I8(i8),
    U64(u64),
    U32(u32),
    U16(u16),
    U8(u8),
    /// Opaque byte string; also used for human-readable strings.
    Bytes(Vec<u8>),
    Section(Section),
    /// A homogeneous sequence of one scalar kind. Must not contain `Section`
    /// or another array — use `ArrayOfSection` for sequences of sections.
    ArrayOfScalar(ScalarKind, Vec<Value>),
    ArrayOfSection(Vec<Section>),
}

/// A field-name to value mapping. Field order is preserved on the wire but
/// is not semantically significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    fields: Vec<(String, Value)>,
}

impl Section {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Encode `root` as a full portable-storage payload: 9-byte magic header
/// followed by the top-level section.
pub fn encode_payload(root: &Section) -> Result<Bytes, StorageError> {
    let mut dst = BytesMut::with_capacity(64);
    dst.put_slice(&PORTABLE_STORAGE_HEADER);
    encode_section(root, &mut dst)?;
    Ok(dst.freeze())
}

/// Decode a full portable-storage payload, verifying the magic header.
pub fn decode_payload(src: &[u8]) -> Result<Section, StorageError> {
    if src.len() < PORTABLE_STORAGE_HEADER.len() {
        return Err(StorageError::Truncated);
    }
    if src[..PORTABLE_STORAGE_HEADER.len()] != PORTABLE_STORAGE_HEADER {
        return Err(StorageError::BadPayloadHeader);
    }
    let mut buf = &src[PORTABLE_STORAGE_HEADER.len()..];
    decode_section(&mut buf)
}

fn encode_section(section: &Section, dst: &mut BytesMut) -> Result<(), StorageError> {
    varint::encode(section.fields.len() as u64, dst)?;
    for (name, value) in &section.fields {
        encode_field_name(name, dst)?;
        encode_entry(value, dst)?;
    }
    Ok(())
}

fn encode_field_name(name: &str, dst: &mut BytesMut) -> Result<(), StorageError> {
    let bytes = name.as_bytes();
    if bytes.len() > u8::MAX as usize {
        return Err(StorageError::UnsupportedValue);
    }
    dst.put_u8(bytes.len() as u8);
    dst.put_slice(bytes);
    Ok(())
}

fn encode_entry(value: &Value, dst: &mut BytesMut) -> Result<(), StorageError> {
    match value {
        Value::ArrayOfScalar(kind, items) => {
            dst.put_u8(kind.tag() | ARRAY_BIT);
            varint::encode(items.len() as u64, dst)?;
            for item in items {
                encode_scalar_body(item, dst)?;
            }
        }
        Value::ArrayOfSection(items) => {
            dst.put_u8(ScalarKind::Section.tag() | ARRAY_BIT);
            varint::encode(items.len() as u64, dst)?;
            for section in items {
                encode_section(section, dst)?;
            }
        }
        Value::Section(section) => {
            dst.put_u8(ScalarKind::Section.tag());
            encode_section(section, dst)?;
        }
        scalar => {
            dst.put_u8(scalar_kind_of(scalar)?.tag());
            encode_scalar_body(scalar, dst)?;
        }
    }
    Ok(())
}

fn scalar_kind_of(value: &Value) -> Result<ScalarKind, StorageError> {
    Ok(match value {
        Value::I64(_) => ScalarKind::I64,
        Value::I32(_) => ScalarKind::I32,
        Value::I16(_) => ScalarKind::I16,
        Value::I8(_) => ScalarKind::I8,
        Value::U64(_) => ScalarKind::U64,
        Value::U32(_) => ScalarKind::U32,
        Value::U16(_) => ScalarKind::U16,
        Value::U8(_) => ScalarKind::U8,
        Value::Bytes(_) => ScalarKind::Bytes,
        _ => return Err(StorageError::UnsupportedValue),
    })
}

fn encode_scalar_body(value: &Value, dst: &mut BytesMut) -> Result<(), StorageError> {
    match value {
        Value::I64(v) => dst.put_i64_le(*v),
        Value::I32(v) => dst.put_i32_le(*v),
        Value::I16(v) => dst.put_i16_le(*v),
        Value::I8(v) => dst.put_i8(*v),
        Value::U64(v) => dst.put_u64_le(*v),
        Value::U32(v) => dst.put_u32_le(*v),
        Value::U16(v) => dst.put_u16_le(*v),
        Value::U8(v) => dst.put_u8(*v),
        Value::Bytes(b) => {
            varint::encode(b.len() as u64, dst)?;
            dst.put_slice(b);
        }
        _ => return Err(StorageError::UnsupportedValue),
    }
    Ok(())
}

fn decode_section(src: &mut &[u8]) -> Result<Section, StorageError> {
    let n = varint::decode(src)?;
    let mut section = Section::new();
    for _ in 0..n {
        let name = decode_field_name(src)?;
        let value = decode_entry(src)?;
        section.insert(name, value);
    }
    Ok(section)
}

fn decode_field_name(src: &mut &[u8]) -> Result<String, StorageError> {
    if src.is_empty() {
        return Err(StorageError::Truncated);
    }
    let len = src.get_u8() as usize;
    if src.len() < len {
        return Err(StorageError::Truncated);
    }
    let name_bytes = &src[..len];
    src.advance(len);
    Ok(String::from_utf8_lossy(name_bytes).into_owned())
}

fn decode_entry(src: &mut &[u8]) -> Result<Value, StorageError> {
    if src.is_empty() {
        return Err(StorageError::Truncated);
    }
    let tag = src.get_u8();
    decode_entry_with_tag(tag, src)
}

fn decode_entry_with_tag(tag: u8, src: &mut &[u8]) -> Result<Value, StorageError> {
    if tag & ARRAY_BIT != 0 {
        return decode_array_body(tag & !ARRAY_BIT, src);
    }
    if tag == ARRAY_OF_ENTRY_TAG {
        if src.is_empty() {
            return Err(StorageError::Truncated);
        }
        let inner = src.get_u8();
        if inner & ARRAY_BIT == 0 {
            tracing::warn!(tag = inner, "array-of-entry tag not followed by an array-tagged byte; proceeding anyway");
        }
        return decode_array_body(inner & !ARRAY_BIT, src);
    }
    decode_scalar_body(tag, src)
}

fn decode_array_body(kind_tag: u8, src: &mut &[u8]) -> Result<Value, StorageError> {
    let n = varint::decode(src)?;
    // `n` is untrusted peer input and can claim up to 2^62 - 1 elements;
    // every element needs at least one byte, so reject up front instead of
    // preallocating a `Vec` sized straight from it.
    if n > src.len() as u64 {
        return Err(StorageError::Truncated);
    }
    let n = n as usize;
    if kind_tag == ScalarKind::Section.tag() {
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(decode_section(src)?);
        }
        Ok(Value::ArrayOfSection(items))
    } else {
        let kind = ScalarKind::from_tag(kind_tag)?;
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(decode_scalar_body_of_kind(kind, src)?);
        }
        Ok(Value::ArrayOfScalar(kind, items))
    }
}

fn decode_scalar_body(tag: u8, src: &mut &[u8]) -> Result<Value, StorageError> {
    let kind = ScalarKind::from_tag(tag)?;
    decode_scalar_body_of_kind(kind, src)
}

fn decode_scalar_body_of_kind(kind: ScalarKind, src: &mut &[u8]) -> Result<Value, StorageError> {
    let need = match kind {
        ScalarKind::I64 | ScalarKind::U64 => 8,
        ScalarKind::I32 | ScalarKind::U32 => 4,
        ScalarKind::I16 | ScalarKind::U16 => 2,
        ScalarKind::I8 | ScalarKind::U8 => 1,
        ScalarKind::Bytes => 0, // length-prefixed, checked below
        ScalarKind::Section => return Ok(Value::Section(decode_section(src)?)),
    };
    if kind != ScalarKind::Bytes && src.len() < need {
        return Err(StorageError::Truncated);
    }
    Ok(match kind {
        ScalarKind::I64 => Value::I64(src.get_i64_le()),
        ScalarKind::I32 => Value::I32(src.get_i32_le()),
        ScalarKind::I16 => Value::I16(src.get_i16_le()),
        ScalarKind::I8 => Value::I8(src.get_i8()),
        ScalarKind::U64 => Value::U64(src.get_u64_le()),
        ScalarKind::U32 => Value::U32(src.get_u32_le()),
        ScalarKind::U16 => Value::U16(src.get_u16_le()),
        ScalarKind::U8 => Value::U8(src.get_u8()),
        ScalarKind::Bytes => {
            let len = varint::decode(src)? as usize;
            if src.len() < len {
                return Err(StorageError::Truncated);
            }
            let bytes = src[..len].to_vec();
            src.advance(len);
            Value::Bytes(bytes)
        }
        ScalarKind::Section => unreachable!("handled above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_is_a_single_zero_byte() {
        let mut dst = BytesMut::new();
        encode_section(&Section::new(), &mut dst).unwrap();
        assert_eq!(&dst[..], &[0x00]);
    }

    #[test]
    fn section_roundtrip() {
        let mut root = Section::new();
        root.insert("a", Value::U64(42));
        root.insert("b", Value::Bytes(b"hi".to_vec()));
        let payload = encode_payload(&root).unwrap();
        let decoded = decode_payload(&payload).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn nested_section_roundtrip() {
        let mut inner = Section::new();
        inner.insert("x", Value::I32(-7));
        let mut root = Section::new();
        root.insert("inner", Value::Section(inner));
        let payload = encode_payload(&root).unwrap();
        assert_eq!(decode_payload(&payload).unwrap(), root);
    }

    #[test]
    fn array_of_scalar_roundtrip() {
        let mut root = Section::new();
        root.insert(
            "items",
            Value::ArrayOfScalar(ScalarKind::U8, vec![Value::U8(1), Value::U8(2), Value::U8(3)]),
        );
        let payload = encode_payload(&root).unwrap();
        assert_eq!(decode_payload(&payload).unwrap(), root);
    }

    #[test]
    fn empty_array_of_section_emits_sentinel() {
        let mut root = Section::new();
        root.insert("local_peerlist_new", Value::ArrayOfSection(Vec::new()));
        let payload = encode_payload(&root).unwrap();
        // header(9) + field-count varint(1) + name_len(1) + name(19) + tag(1) + count-varint(1)
        let tag_offset = 9 + 1 + 1 + "local_peerlist_new".len();
        assert_eq!(payload[tag_offset], 0x8C);
        assert_eq!(payload[tag_offset + 1], 0x00);
        let decoded = decode_payload(&payload).unwrap();
        assert_eq!(decoded.get("local_peerlist_new"), Some(&Value::ArrayOfSection(Vec::new())));
    }

    #[test]
    fn array_of_section_roundtrip() {
        let mut entry = Section::new();
        entry.insert("id", Value::U64(7));
        let mut root = Section::new();
        root.insert("local_peerlist_new", Value::ArrayOfSection(vec![entry]));
        let payload = encode_payload(&root).unwrap();
        assert_eq!(decode_payload(&payload).unwrap(), root);
    }

    #[test]
    fn bad_header_is_rejected() {
        let bytes = [0u8; 9];
        assert_eq!(decode_payload(&bytes), Err(StorageError::BadPayloadHeader));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert_eq!(decode_payload(&[0x01, 0x11]), Err(StorageError::Truncated));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut payload = PORTABLE_STORAGE_HEADER.to_vec();
        payload.push(0x04); // varint(1): one field
        payload.push(0x01); // name_len = 1 (raw byte, not a varint)
        payload.push(b'x');
        payload.push(0x09); // tag 9 (double) is reserved / unknown here
        assert_eq!(decode_payload(&payload), Err(StorageError::UnknownTag(9)));
    }

    #[test]
    fn array_count_overflowing_capacity_is_rejected_without_panicking() {
        let mut payload = PORTABLE_STORAGE_HEADER.to_vec();
        payload.push(0x04); // varint(1): one field
        payload.push(0x01); // name_len = 1
        payload.push(b'a');
        payload.push(0x8C); // tag: section (12) | array bit
        // varint 8-byte form claiming ~2^61 elements, far beyond the 3
        // bytes actually following it.
        payload.extend_from_slice(&((1u64 << 61) << 2 | 3).to_le_bytes());
        assert_eq!(decode_payload(&payload), Err(StorageError::Truncated));
    }
}
