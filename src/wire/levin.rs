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

//! The 33-byte Levin framing header that precedes every message.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

use super::constants::{LEVIN_FLAG_REQUEST, LEVIN_FLAG_RESPONSE, LEVIN_PROTOCOL_VERSION, LEVIN_SIGNATURE};

/// Errors from decoding a Levin header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevinError {
    #[error("truncated levin header")]
    Truncated,
    #[error("levin header signature mismatch")]
    BadSignature,
    #[error("unsupported levin protocol version")]
    BadFormatVersion,
}

/// The fixed 33-byte frame header: signature, payload length,
/// expect-response flag, command, return code, flags, version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevinHeader {
    pub payload_length: u64,
    pub expect_response: bool,
    pub command: u32,
    pub return_code: i32,
    pub flags: u32,
    pub version: u32,
}

impl LevinHeader {
    /// Header width in bytes.
    pub const SIZE: usize = 33;

    /// Build the header for an outgoing request.
    pub fn request(command: u32, payload_length: u64) -> Self {
        Self {
            payload_length,
            expect_response: true,
            command,
            return_code: 0,
            flags: LEVIN_FLAG_REQUEST,
            version: LEVIN_PROTOCOL_VERSION,
        }
    }

    /// Build the header for an outgoing response.
    pub fn response(command: u32, payload_length: u64) -> Self {
        Self {
            payload_length,
            expect_response: false,
            command,
            return_code: 1,
            flags: LEVIN_FLAG_RESPONSE,
            version: LEVIN_PROTOCOL_VERSION,
        }
    }

    /// Parse a header from exactly `SIZE` bytes without consuming its caller's buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self, LevinError> {
        if bytes.len() < Self::SIZE {
            return Err(LevinError::Truncated);
        }
        if bytes[..LEVIN_SIGNATURE.len()] != LEVIN_SIGNATURE {
            return Err(LevinError::BadSignature);
        }
        let mut rest = &bytes[LEVIN_SIGNATURE.len()..Self::SIZE];
        let payload_length = rest.get_u64_le();
        let expect_response = rest.get_u8() != 0;
        let command = rest.get_u32_le();
        let return_code = rest.get_i32_le();
        let flags = rest.get_u32_le();
        let version = rest.get_u32_le();
        if version != LEVIN_PROTOCOL_VERSION {
            return Err(LevinError::BadFormatVersion);
        }
        Ok(Self {
            payload_length,
            expect_response,
            command,
            return_code,
            flags,
            version,
        })
    }

    /// Serialize the header, appending it to `dst`.
    pub fn write_bytes(&self, dst: &mut BytesMut) {
        dst.reserve(Self::SIZE);
        dst.put_slice(&LEVIN_SIGNATURE);
        dst.put_u64_le(self.payload_length);
        dst.put_u8(if self.expect_response { 1 } else { 0 });
        dst.put_u32_le(self.command);
        dst.put_i32_le(self.return_code);
        dst.put_u32_le(self.flags);
        dst.put_u32_le(self.version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::constants::COMMAND_PING_PONG;

    #[test]
    fn request_roundtrip() {
        let header = LevinHeader::request(COMMAND_PING_PONG, 0);
        let mut buf = BytesMut::new();
        header.write_bytes(&mut buf);
        assert_eq!(buf.len(), LevinHeader::SIZE);
        assert_eq!(LevinHeader::parse(&buf).unwrap(), header);
    }

    #[test]
    fn ping_request_is_exactly_33_bytes() {
        let header = LevinHeader::request(COMMAND_PING_PONG, 0);
        let mut buf = BytesMut::new();
        header.write_bytes(&mut buf);
        assert_eq!(buf.len(), 33);
        assert_eq!(header.payload_length, 0);
        assert_eq!(header.command, 1003);
        assert_eq!(header.flags, 1);
        assert!(header.expect_response);
    }

    #[test]
    fn bad_signature_is_rejected() {
        let mut buf = [0u8; LevinHeader::SIZE];
        buf[0] = 0xff;
        assert_eq!(LevinHeader::parse(&buf), Err(LevinError::BadSignature));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert_eq!(LevinHeader::parse(&[0u8; 10]), Err(LevinError::Truncated));
    }
}
