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

//! Portable-storage length prefix: a 2-bit tag in the low bits of the
//! first byte selects a 1/2/4/8-byte little-endian container holding the
//! value shifted left by 2.
//!
//! The reference decoder reads the 4- and 8-byte forms big-endian and
//! advances the cursor short (3 and 4 bytes respectively). That arithmetic
//! is not reproduced here: this decoder is little-endian and
//! full-width, matching the (self-consistent) reference encoder.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// Errors from encoding or decoding a varint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VarintError {
    /// Fewer bytes remained than the tag's width requires.
    #[error("truncated varint")]
    Truncated,
    /// The value does not fit in 62 bits.
    #[error("varint overflow: value exceeds 2^62 - 1")]
    Overflow,
}

const MAX_1B: u64 = (1 << 6) - 1;
const MAX_2B: u64 = (1 << 14) - 1;
const MAX_4B: u64 = (1 << 30) - 1;
const MAX_8B: u64 = (1 << 62) - 1;

/// Append the varint encoding of `n` to `dst`.
pub fn encode(n: u64, dst: &mut BytesMut) -> Result<(), VarintError> {
    if n <= MAX_1B {
        dst.put_u8((n << 2) as u8);
    } else if n <= MAX_2B {
        dst.put_u16_le(((n << 2) | 1) as u16);
    } else if n <= MAX_4B {
        dst.put_u32_le(((n << 2) | 2) as u32);
    } else if n <= MAX_8B {
        dst.put_u64_le((n << 2) | 3);
    } else {
        return Err(VarintError::Overflow);
    }
    Ok(())
}

/// The number of bytes `encode(n, ..)` would write, without writing them.
pub fn encoded_len(n: u64) -> usize {
    if n <= MAX_1B {
        1
    } else if n <= MAX_2B {
        2
    } else if n <= MAX_4B {
        4
    } else {
        8
    }
}

/// Decode a varint from the front of `src`, consuming its bytes.
pub fn decode(src: &mut impl Buf) -> Result<u64, VarintError> {
    if !src.has_remaining() {
        return Err(VarintError::Truncated);
    }
    let width = match src.chunk()[0] & 0b11 {
        0 => 1,
        1 => 2,
        2 => 4,
        _ => 8,
    };
    if src.remaining() < width {
        return Err(VarintError::Truncated);
    }
    let raw = match width {
        1 => src.get_u8() as u64,
        2 => src.get_u16_le() as u64,
        4 => src.get_u32_le() as u64,
        _ => src.get_u64_le(),
    };
    Ok(raw >> 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(n: u64, expected_len: usize) {
        let mut buf = BytesMut::new();
        encode(n, &mut buf).unwrap();
        assert_eq!(buf.len(), expected_len, "encoded length for {n}");
        let mut reader = &buf[..];
        assert_eq!(decode(&mut reader).unwrap(), n);
        assert!(!reader.has_remaining());
    }

    #[test]
    fn width_boundaries() {
        roundtrip(0, 1);
        roundtrip(63, 1);
        roundtrip(64, 2);
        roundtrip(16_383, 2);
        roundtrip(16_384, 4);
        roundtrip(1_073_741_823, 4);
        roundtrip(1_073_741_824, 8);
        roundtrip((1u64 << 62) - 1, 8);
    }

    #[test]
    fn overflow_is_rejected() {
        let mut buf = BytesMut::new();
        assert_eq!(encode(1u64 << 62, &mut buf), Err(VarintError::Overflow));
    }

    #[test]
    fn truncated_decode_is_rejected() {
        let mut buf = BytesMut::new();
        encode(100_000, &mut buf).unwrap(); // 4-byte form
        let mut short = &buf[..2];
        assert_eq!(decode(&mut short), Err(VarintError::Truncated));
    }

    #[test]
    fn empty_decode_is_truncated() {
        let mut empty: &[u8] = &[];
        assert_eq!(decode(&mut empty), Err(VarintError::Truncated));
    }

    proptest::proptest! {
        #[test]
        fn roundtrips_every_representable_value(n in 0u64..=MAX_8B) {
            let mut buf = BytesMut::new();
            encode(n, &mut buf).unwrap();
            proptest::prop_assert_eq!(buf.len(), encoded_len(n));
            let mut reader = &buf[..];
            proptest::prop_assert_eq!(decode(&mut reader).unwrap(), n);
            proptest::prop_assert!(!reader.has_remaining());
        }

        #[test]
        fn truncating_any_encoding_by_one_byte_fails(n in 64u64..=MAX_8B) {
            let mut buf = BytesMut::new();
            encode(n, &mut buf).unwrap();
            let short = &buf[..buf.len() - 1];
            let mut reader = short;
            proptest::prop_assert_eq!(decode(&mut reader), Err(VarintError::Truncated));
        }
    }
}
