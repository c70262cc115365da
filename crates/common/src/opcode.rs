//! Opcode definitions for the Lilt instruction set.
//!
//! The enum doubles as the wire-format authority: `operand_kind` tells the
//! encoder, the disassembler, and the interpreter how many trailing bytes
//! an instruction carries, so the three can never disagree.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute ensures each variant has a stable byte value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// No operation.
    Nop = 0,
    /// Stop execution normally.
    Halt = 1,
    /// Pop a value, write its textual form to output.
    Print = 2,
    /// Pop a `Uint8`, write it as a character.
    PrintCh = 3,
    /// Push a `Uint8`; one raw operand byte.
    PushUint8 = 4,
    /// Push an `Int64`; signed varint operand.
    PushInt64 = 5,
    /// Pop a `Uint8`, push it widened to `Int64`.
    ToInt64 = 6,
    /// Pop an `Int64` in [0,255], push it narrowed to `Uint8`.
    ToUint8 = 7,
    /// Push `Int64(0)`.
    PushZero = 8,
    /// Push `Int64(1)`.
    PushOne = 9,
    /// Pop into the variable slot named by the operand.
    Store = 10,
    /// Push a copy of the variable slot named by the operand.
    Load = 11,
    /// Reserved for array construction. Never emitted, never executed.
    CreateArray = 12,
    /// Reserved for pair construction. Never emitted, never executed.
    CreatePair = 13,
    /// Pop and discard the top of stack.
    Drop = 14,
    /// Duplicate the top of stack.
    Dup = 15,
    /// Exchange the top two stack values.
    Swap = 16,
    /// Unconditional jump to an absolute byte offset.
    Jump = 17,
    /// Pop one value, jump if non-zero.
    JumpTrue = 18,
    /// Pop one value, jump if zero.
    JumpFalse = 19,
    /// Pop two values, jump if exactly equal (variant and payload).
    JumpEq = 20,
    /// Pop two values, jump if not exactly equal.
    JumpNe = 21,
    /// Pop two values, jump if the first pushed is numerically less.
    JumpLt = 22,
    /// Pop two values, jump if the first pushed is numerically greater.
    JumpGt = 23,
    /// Pop two `Int64`s, push their wrapping sum.
    Add = 24,
    /// Pop two `Int64`s, push (first pushed - second pushed), wrapping.
    Sub = 25,
    /// Pop two `Int64`s, push their wrapping product.
    Mul = 26,
    /// Pop two `Int64`s, push the quotient. Division by zero is a runtime error.
    Div = 27,
    /// Add one to the numeric top of stack, wrapping.
    Inc = 28,
    /// Subtract one from the numeric top of stack, wrapping.
    Dec = 29,
    /// Pop two `Int64`s, push the remainder. Zero divisor is a runtime error.
    Mod = 30,
    /// Bitwise AND of two same-variant numeric values.
    And = 31,
    /// Bitwise OR of two same-variant numeric values.
    Or = 32,
    /// Bitwise XOR of two same-variant numeric values.
    Xor = 33,
    /// Bitwise complement of one numeric value.
    Not = 34,
    /// Push the return address, jump to an absolute byte offset.
    Call = 35,
    /// Pop the call stack, resume at the stored address.
    Ret = 36,
}

/// Operand class of an encodable opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Opcode byte only.
    None,
    /// Opcode byte followed by a signed varint.
    Int,
    /// Opcode byte followed by one raw byte.
    Byte,
}

/// All opcodes, in byte-value order. Useful for exhaustive testing and
/// mnemonic lookup.
pub const ALL_OPCODES: [Opcode; 37] = [
    Opcode::Nop,
    Opcode::Halt,
    Opcode::Print,
    Opcode::PrintCh,
    Opcode::PushUint8,
    Opcode::PushInt64,
    Opcode::ToInt64,
    Opcode::ToUint8,
    Opcode::PushZero,
    Opcode::PushOne,
    Opcode::Store,
    Opcode::Load,
    Opcode::CreateArray,
    Opcode::CreatePair,
    Opcode::Drop,
    Opcode::Dup,
    Opcode::Swap,
    Opcode::Jump,
    Opcode::JumpTrue,
    Opcode::JumpFalse,
    Opcode::JumpEq,
    Opcode::JumpNe,
    Opcode::JumpLt,
    Opcode::JumpGt,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Inc,
    Opcode::Dec,
    Opcode::Mod,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Not,
    Opcode::Call,
    Opcode::Ret,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Nop),
            1 => Ok(Opcode::Halt),
            2 => Ok(Opcode::Print),
            3 => Ok(Opcode::PrintCh),
            4 => Ok(Opcode::PushUint8),
            5 => Ok(Opcode::PushInt64),
            6 => Ok(Opcode::ToInt64),
            7 => Ok(Opcode::ToUint8),
            8 => Ok(Opcode::PushZero),
            9 => Ok(Opcode::PushOne),
            10 => Ok(Opcode::Store),
            11 => Ok(Opcode::Load),
            12 => Ok(Opcode::CreateArray),
            13 => Ok(Opcode::CreatePair),
            14 => Ok(Opcode::Drop),
            15 => Ok(Opcode::Dup),
            16 => Ok(Opcode::Swap),
            17 => Ok(Opcode::Jump),
            18 => Ok(Opcode::JumpTrue),
            19 => Ok(Opcode::JumpFalse),
            20 => Ok(Opcode::JumpEq),
            21 => Ok(Opcode::JumpNe),
            22 => Ok(Opcode::JumpLt),
            23 => Ok(Opcode::JumpGt),
            24 => Ok(Opcode::Add),
            25 => Ok(Opcode::Sub),
            26 => Ok(Opcode::Mul),
            27 => Ok(Opcode::Div),
            28 => Ok(Opcode::Inc),
            29 => Ok(Opcode::Dec),
            30 => Ok(Opcode::Mod),
            31 => Ok(Opcode::And),
            32 => Ok(Opcode::Or),
            33 => Ok(Opcode::Xor),
            34 => Ok(Opcode::Not),
            35 => Ok(Opcode::Call),
            36 => Ok(Opcode::Ret),
            other => Err(DecodeError::InvalidOpcode(other)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    ///
    /// Mnemonics are lowercase and case-sensitive. Reserved opcodes have
    /// a name for error messages but no mnemonic table entry: the
    /// assembler refuses them because [`Opcode::operand_kind`] is `None`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Halt => "halt",
            Opcode::Print => "print",
            Opcode::PrintCh => "print_ch",
            Opcode::PushUint8 => "push_uint8",
            Opcode::PushInt64 => "push_int64",
            Opcode::ToInt64 => "to_int64",
            Opcode::ToUint8 => "to_uint8",
            Opcode::PushZero => "push_zero",
            Opcode::PushOne => "push_one",
            Opcode::Store => "store",
            Opcode::Load => "load",
            Opcode::CreateArray => "create_array",
            Opcode::CreatePair => "create_pair",
            Opcode::Drop => "drop",
            Opcode::Dup => "dup",
            Opcode::Swap => "swap",
            Opcode::Jump => "jump",
            Opcode::JumpTrue => "jump_true",
            Opcode::JumpFalse => "jump_false",
            Opcode::JumpEq => "jump_eq",
            Opcode::JumpNe => "jump_ne",
            Opcode::JumpLt => "jump_lt",
            Opcode::JumpGt => "jump_gt",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Not => "not",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
        }
    }

    /// Operand class for the wire format, or `None` for reserved opcodes
    /// that cannot be encoded or executed.
    pub fn operand_kind(&self) -> Option<OperandKind> {
        match self {
            Opcode::CreateArray | Opcode::CreatePair => None,

            Opcode::PushUint8 => Some(OperandKind::Byte),

            Opcode::PushInt64
            | Opcode::Store
            | Opcode::Load
            | Opcode::Jump
            | Opcode::JumpTrue
            | Opcode::JumpFalse
            | Opcode::JumpEq
            | Opcode::JumpNe
            | Opcode::JumpLt
            | Opcode::JumpGt
            | Opcode::Call => Some(OperandKind::Int),

            Opcode::Nop
            | Opcode::Halt
            | Opcode::Print
            | Opcode::PrintCh
            | Opcode::ToInt64
            | Opcode::ToUint8
            | Opcode::PushZero
            | Opcode::PushOne
            | Opcode::Drop
            | Opcode::Dup
            | Opcode::Swap
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Inc
            | Opcode::Dec
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Ret => Some(OperandKind::None),
        }
    }

    /// True for the jump family and `call` — the opcodes whose integer
    /// operand is a label offset in assembly source.
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Opcode::Jump
                | Opcode::JumpTrue
                | Opcode::JumpFalse
                | Opcode::JumpEq
                | Opcode::JumpNe
                | Opcode::JumpLt
                | Opcode::JumpGt
                | Opcode::Call
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 37);
    }

    #[test]
    fn roundtrip_all_valid_opcodes() {
        for &opcode in &ALL_OPCODES {
            let byte = opcode as u8;
            let decoded = Opcode::try_from(byte).unwrap();
            assert_eq!(
                opcode, decoded,
                "roundtrip failed for {opcode:?} ({byte:#04x})"
            );
        }
    }

    #[test]
    fn bytes_past_table_are_invalid() {
        for byte in 37..=255u8 {
            assert_eq!(
                Opcode::try_from(byte),
                Err(DecodeError::InvalidOpcode(byte)),
                "byte {byte:#04x} should be invalid"
            );
        }
    }

    #[test]
    fn every_byte_value_resolves() {
        // Every u8 value must produce either Ok or a specific Err — never panic.
        for byte in 0..=255u8 {
            match Opcode::try_from(byte) {
                Ok(_) | Err(DecodeError::InvalidOpcode(_)) => {}
                other => panic!("unexpected result for byte {byte:#04x}: {other:?}"),
            }
        }
    }

    #[test]
    fn reserved_opcodes_have_no_operand_kind() {
        assert_eq!(Opcode::CreateArray.operand_kind(), None);
        assert_eq!(Opcode::CreatePair.operand_kind(), None);
        for &opcode in &ALL_OPCODES {
            if opcode != Opcode::CreateArray && opcode != Opcode::CreatePair {
                assert!(
                    opcode.operand_kind().is_some(),
                    "{opcode:?} should be encodable"
                );
            }
        }
    }

    #[test]
    fn mnemonics_are_lowercase_and_unique() {
        for (i, &a) in ALL_OPCODES.iter().enumerate() {
            let m = a.mnemonic();
            assert!(!m.is_empty());
            assert_eq!(m, m.to_lowercase(), "mnemonic should be lowercase: {m}");
            for &b in &ALL_OPCODES[i + 1..] {
                assert_ne!(a.mnemonic(), b.mnemonic(), "duplicate mnemonic {m}");
            }
        }
    }

    #[test]
    fn jump_true_and_jump_false_are_distinct() {
        assert_ne!(Opcode::JumpTrue as u8, Opcode::JumpFalse as u8);
        assert_ne!(Opcode::JumpTrue.mnemonic(), Opcode::JumpFalse.mnemonic());
    }

    #[test]
    fn branch_opcodes_take_int_operands() {
        for &opcode in &ALL_OPCODES {
            if opcode.is_branch() {
                assert_eq!(opcode.operand_kind(), Some(OperandKind::Int));
            }
        }
    }
}
