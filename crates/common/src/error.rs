//! Decode and encode errors for Lilt instruction streams.

use crate::opcode::Opcode;
use thiserror::Error;

/// Errors that occur while decoding a binary image or instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte does not name any opcode.
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    /// Opcode exists in the table but is reserved and has no wire format.
    #[error("reserved opcode: {}", .0.mnemonic())]
    ReservedOpcode(Opcode),

    /// A varint was truncated or ran past the 10-byte maximum.
    #[error("invalid varint at byte {at}")]
    InvalidVarint { at: usize },

    /// An instruction's operand bytes were cut short.
    #[error("truncated operand for {} at byte {at}", .opcode.mnemonic())]
    TruncatedOperand { opcode: Opcode, at: usize },

    /// A header field that must be non-negative was negative.
    #[error("invalid image header: {field} is {value}")]
    InvalidHeader { field: &'static str, value: i64 },

    /// Decoding was asked to start past the end of the stream.
    #[error("unexpected end of instruction stream at byte {at}")]
    UnexpectedEnd { at: usize },
}

/// Errors that occur while encoding an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The opcode is reserved and cannot be serialized.
    #[error("cannot encode reserved opcode {}", .0.mnemonic())]
    ReservedOpcode(Opcode),

    /// An argument was supplied to an opcode that takes none.
    #[error("{} takes no argument", .0.mnemonic())]
    UnexpectedArgument(Opcode),

    /// An opcode that requires an argument was given none.
    #[error("{} requires an argument", .0.mnemonic())]
    MissingArgument(Opcode),

    /// The argument's class does not match the opcode's operand class.
    #[error("wrong argument class for {}", .0.mnemonic())]
    ArgumentMismatch(Opcode),
}
