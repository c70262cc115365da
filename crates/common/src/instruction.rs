//! Instruction encoding and decoding.
//!
//! The wire format is one opcode byte followed by operand bytes as the
//! opcode's [`OperandKind`] dictates:
//!
//! ```text
//! None:  <op>
//! Byte:  <op><u8>
//! Int:   <op><signed varint, 1-10 bytes>
//! ```
//!
//! The interpreter decodes instructions inline, one per cycle; the
//! disassembler walks the same routine over a whole image. Both therefore
//! agree with the encoder by construction.

use crate::error::{DecodeError, EncodeError};
use crate::opcode::{Opcode, OperandKind};
use crate::varint;

/// A decoded operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Signed-integer class: jump targets, slot indices, `push_int64`.
    Int(i64),
    /// Unsigned-byte class: `push_uint8`.
    Byte(u8),
}

/// One instruction: opcode plus optional operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub arg: Option<Arg>,
}

impl Instruction {
    pub fn new(op: Opcode, arg: Option<Arg>) -> Self {
        Self { op, arg }
    }

    /// Appends the encoded form to `buf`, returning the bytes written.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let kind = self
            .op
            .operand_kind()
            .ok_or(EncodeError::ReservedOpcode(self.op))?;
        match (kind, self.arg) {
            (OperandKind::None, None) => {
                buf.push(self.op as u8);
                Ok(1)
            }
            (OperandKind::None, Some(_)) => Err(EncodeError::UnexpectedArgument(self.op)),
            (OperandKind::Byte, Some(Arg::Byte(b))) => {
                buf.push(self.op as u8);
                buf.push(b);
                Ok(2)
            }
            (OperandKind::Int, Some(Arg::Int(n))) => {
                buf.push(self.op as u8);
                Ok(1 + varint::write_i64(buf, n))
            }
            (_, None) => Err(EncodeError::MissingArgument(self.op)),
            (_, Some(_)) => Err(EncodeError::ArgumentMismatch(self.op)),
        }
    }

    /// Length the encoded form would occupy, without writing it.
    pub fn encoded_len(&self) -> Result<usize, EncodeError> {
        let mut scratch = Vec::with_capacity(1 + varint::MAX_VARINT_LEN);
        self.encode(&mut scratch)
    }

    /// Decodes the instruction starting at `offset` in `code`.
    ///
    /// Returns the instruction and the offset just past it.
    pub fn decode(code: &[u8], offset: usize) -> Result<(Instruction, usize), DecodeError> {
        let byte = *code
            .get(offset)
            .ok_or(DecodeError::UnexpectedEnd { at: offset })?;
        let op = Opcode::try_from(byte)?;
        let kind = op
            .operand_kind()
            .ok_or(DecodeError::ReservedOpcode(op))?;
        match kind {
            OperandKind::None => Ok((Instruction::new(op, None), offset + 1)),
            OperandKind::Byte => {
                let b = *code.get(offset + 1).ok_or(DecodeError::TruncatedOperand {
                    opcode: op,
                    at: offset,
                })?;
                Ok((Instruction::new(op, Some(Arg::Byte(b))), offset + 2))
            }
            OperandKind::Int => {
                let (n, read) =
                    varint::read_i64(&code[offset + 1..]).map_err(|_| {
                        DecodeError::TruncatedOperand {
                            opcode: op,
                            at: offset,
                        }
                    })?;
                Ok((Instruction::new(op, Some(Arg::Int(n))), offset + 1 + read))
            }
        }
    }
}
