//! Error types for the Lilt assembler and disassembler.

use lilt_common::{DecodeError, EncodeError};
use thiserror::Error;

/// Errors produced while assembling text to a binary image.
///
/// Every variant carries the 1-based line and 0-based byte position of
/// the offending token. Assembly stops at the first error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A character outside the grammar appeared in the source.
    #[error("line {line} pos {pos}: unexpected character {ch:?}")]
    UnexpectedCharacter { line: usize, pos: usize, ch: char },

    /// String literals are not part of the language.
    #[error("line {line} pos {pos}: string literals are not supported")]
    StringLiteral { line: usize, pos: usize },

    /// A `:` with no name attached.
    #[error("line {line} pos {pos}: empty label name")]
    EmptyLabel { line: usize, pos: usize },

    /// A `-` with no digits, or a number token that failed to scan.
    #[error("line {line} pos {pos}: invalid number '{token}'")]
    InvalidNumber {
        line: usize,
        pos: usize,
        token: String,
    },

    /// A token at statement position that names no known mnemonic.
    #[error("line {line} pos {pos}: invalid instruction '{token}'")]
    InvalidInstruction {
        line: usize,
        pos: usize,
        token: String,
    },

    /// `var` was not followed by an identifier.
    #[error("line {line} pos {pos}: expecting identifier after var")]
    ExpectedIdentifier { line: usize, pos: usize },

    /// A jump-family or call mnemonic was not followed by a label name.
    #[error("line {line} pos {pos}: {op} expects a label name")]
    ExpectedLabelName {
        line: usize,
        pos: usize,
        op: &'static str,
    },

    /// `load` or `store` was not followed by a variable name.
    #[error("line {line} pos {pos}: {op} expects a variable name")]
    ExpectedVariableName {
        line: usize,
        pos: usize,
        op: &'static str,
    },

    /// A push mnemonic was not followed by a numeric literal.
    #[error("line {line} pos {pos}: {op} expects a numeric argument")]
    ExpectedNumber {
        line: usize,
        pos: usize,
        op: &'static str,
    },

    /// A `push_uint8` literal outside [0,255] or unparsable.
    #[error("line {line} pos {pos}: invalid uint8 '{token}'")]
    InvalidUint8 {
        line: usize,
        pos: usize,
        token: String,
    },

    /// A `push_int64` literal that does not fit a signed 64-bit integer.
    #[error("line {line} pos {pos}: invalid int64 '{token}'")]
    InvalidInt64 {
        line: usize,
        pos: usize,
        token: String,
    },

    /// The same variable name declared twice.
    #[error("line {line} pos {pos}: variable '{name}' already declared")]
    DuplicateVariable {
        line: usize,
        pos: usize,
        name: String,
    },

    /// The same label name defined twice.
    #[error("line {line} pos {pos}: label '{name}' already defined")]
    DuplicateLabel {
        line: usize,
        pos: usize,
        name: String,
    },

    /// `load`/`store` of a variable with no preceding declaration.
    #[error("line {line} pos {pos}: no such variable '{name}'")]
    UndeclaredVariable {
        line: usize,
        pos: usize,
        name: String,
    },

    /// A jump or call to a label never defined anywhere.
    #[error("line {line} pos {pos}: no such label '{name}'")]
    UndefinedLabel {
        line: usize,
        pos: usize,
        name: String,
    },

    /// The instruction codec rejected a resolved instruction.
    #[error("line {line} pos {pos}: {source}")]
    Encode {
        line: usize,
        pos: usize,
        #[source]
        source: EncodeError,
    },
}

/// Errors produced while disassembling a binary image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisasmError {
    /// The instruction stream failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A jump/call operand that is not an instruction boundary.
    #[error("byte {at}: branch target {target} is not an instruction boundary")]
    MisalignedTarget { at: usize, target: i64 },

    /// A load/store operand outside the header's slot range.
    #[error("byte {at}: slot {slot} out of range")]
    SlotOutOfRange { at: usize, slot: i64 },
}
