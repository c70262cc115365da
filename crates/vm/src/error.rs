//! Runtime errors for the Lilt VM.
//!
//! Every variant that can be traced to an instruction carries `at`, the
//! byte offset of the failing opcode within the instruction stream.

use lilt_common::{DecodeError, Opcode};
use thiserror::Error;

/// Errors that halt execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The instruction stream failed to decode at `at`.
    #[error("byte {at}: {source}")]
    Decode {
        at: usize,
        #[source]
        source: DecodeError,
    },

    /// An operand had the wrong variant for the opcode.
    #[error("byte {at}: type mismatch in {}", .op.mnemonic())]
    TypeMismatch { at: usize, op: Opcode },

    /// `jump_lt`/`jump_gt` on values with no numeric ordering.
    #[error("byte {at}: values are not comparable in {}", .op.mnemonic())]
    NotComparable { at: usize, op: Opcode },

    /// `to_uint8` of an `Int64` outside [0,255].
    #[error("byte {at}: value {value} does not fit in uint8")]
    ConversionOutOfRange { at: usize, value: i64 },

    /// `div` or `mod` with a zero divisor.
    #[error("byte {at}: division by zero")]
    DivisionByZero { at: usize },

    /// Push onto a full operand stack.
    #[error("byte {at}: stack overflow")]
    StackOverflow { at: usize },

    /// Pop, peek, or swap on too few operands.
    #[error("byte {at}: stack underflow")]
    StackUnderflow { at: usize },

    /// `call` with a full call stack.
    #[error("byte {at}: call stack overflow")]
    CallStackOverflow { at: usize },

    /// `ret` with an empty call stack.
    #[error("byte {at}: return with empty call stack")]
    CallStackUnderflow { at: usize },

    /// `load`/`store` slot index outside the allocated range.
    #[error("byte {at}: variable slot {slot} out of range (have {count})")]
    SlotOutOfRange { at: usize, slot: i64, count: usize },

    /// A branch or call to a negative offset.
    #[error("byte {at}: jump to negative offset {target}")]
    NegativeJumpTarget { at: usize, target: i64 },

    /// A decoded operand whose shape disagrees with the opcode table.
    #[error("byte {at}: malformed instruction {}", .op.mnemonic())]
    MalformedInstruction { at: usize, op: Opcode },

    /// Writing program output failed.
    #[error("output error: {message}")]
    Output { message: String },
}
