//! Binary image format for compiled Lilt programs.
//!
//! An image is a two-field header followed by the raw instruction stream:
//!
//! ```text
//! <signed-varint entry-point offset><signed-varint variable-slot count><code>
//! ```
//!
//! Both header fields use the same varint codec as integer-class operands.

use crate::error::DecodeError;
use crate::varint;

/// A compiled program: header fields plus instruction bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Byte offset into `code` where execution begins.
    pub entry: usize,
    /// Number of variable slots the machine must allocate.
    pub slot_count: usize,
    /// The encoded instruction stream.
    pub code: Vec<u8>,
}

impl Image {
    pub fn new(entry: usize, slot_count: usize, code: Vec<u8>) -> Self {
        Self {
            entry,
            slot_count,
            code,
        }
    }

    /// Serializes the image to its on-disk form.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 * varint::MAX_VARINT_LEN + self.code.len());
        varint::write_i64(&mut bytes, self.entry as i64);
        varint::write_i64(&mut bytes, self.slot_count as i64);
        bytes.extend_from_slice(&self.code);
        bytes
    }

    /// Parses an on-disk image.
    ///
    /// Negative header fields are rejected. An entry offset at or past the
    /// end of the code is accepted; executing such an image stops
    /// immediately.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (entry, read) = varint::read_i64(bytes)?;
        if entry < 0 {
            return Err(DecodeError::InvalidHeader {
                field: "entry point",
                value: entry,
            });
        }
        let rest = &bytes[read..];
        let (slot_count, read) = varint::read_i64(rest)?;
        if slot_count < 0 {
            return Err(DecodeError::InvalidHeader {
                field: "slot count",
                value: slot_count,
            });
        }
        Ok(Self {
            entry: entry as usize,
            slot_count: slot_count as usize,
            code: rest[read..].to_vec(),
        })
    }
}
