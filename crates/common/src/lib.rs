//! Lilt common types and instruction encoding.
//!
//! This crate provides the foundational data structures shared by the
//! assembler and the VM:
//!
//! - [`Opcode`] — the closed opcode table with mnemonics and operand classes
//! - [`Instruction`] — one opcode plus operand, with encode/decode
//! - [`varint`] — the signed variable-length integer codec
//! - [`Value`] — runtime value representation for stacks and slots
//! - [`Image`] — the binary image format (header + instruction stream)
//! - [`DecodeError`] / [`EncodeError`] — wire-format errors
//!
//! The opcode table is the single authority on the wire format: the
//! encoder, the disassembler, and the interpreter all consult
//! [`Opcode::operand_kind`], so they cannot drift apart.

pub mod error;
pub mod image;
pub mod instruction;
pub mod opcode;
pub mod value;
pub mod varint;

pub use error::{DecodeError, EncodeError};
pub use image::Image;
pub use instruction::{Arg, Instruction};
pub use opcode::{Opcode, OperandKind};
pub use value::Value;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&opcode::ALL_OPCODES[..])
    }

    /// Strategy that generates a random encodable instruction.
    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_opcode(), any::<i64>(), any::<u8>()).prop_filter_map(
            "reserved opcodes have no encoding",
            |(op, n, b)| {
                let arg = match op.operand_kind()? {
                    OperandKind::None => None,
                    OperandKind::Int => Some(Arg::Int(n)),
                    OperandKind::Byte => Some(Arg::Byte(b)),
                };
                Some(Instruction::new(op, arg))
            },
        )
    }

    proptest! {
        /// Varint encode then decode produces the original value and
        /// consumes exactly the written bytes.
        #[test]
        fn varint_roundtrip(value in any::<i64>()) {
            let mut buf = Vec::new();
            let written = varint::write_i64(&mut buf, value);
            prop_assert_eq!(written, varint::encoded_len(value));
            let (decoded, read) = varint::read_i64(&buf).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(read, written);
        }

        /// Instruction encode then decode produces the original.
        #[test]
        fn instruction_roundtrip(instruction in arb_instruction()) {
            let mut buf = Vec::new();
            let written = instruction.encode(&mut buf).unwrap();
            let (decoded, next) = Instruction::decode(&buf, 0).unwrap();
            prop_assert_eq!(decoded, instruction);
            prop_assert_eq!(next, written);
        }

        /// Decoding arbitrary bytes either succeeds (and the result
        /// re-encodes and re-decodes to itself; byte equality is not
        /// guaranteed because non-minimal varints are accepted) or fails
        /// with a specific error — never panics.
        #[test]
        fn random_bytes_decode(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
            match Instruction::decode(&bytes, 0) {
                Ok((instruction, _)) => {
                    let mut reencoded = Vec::new();
                    instruction.encode(&mut reencoded).unwrap();
                    let (again, _) = Instruction::decode(&reencoded, 0).unwrap();
                    prop_assert_eq!(again, instruction);
                }
                Err(
                    DecodeError::InvalidOpcode(_)
                    | DecodeError::ReservedOpcode(_)
                    | DecodeError::InvalidVarint { .. }
                    | DecodeError::TruncatedOperand { .. }
                    | DecodeError::UnexpectedEnd { .. }
                    | DecodeError::InvalidHeader { .. },
                ) => {}
            }
        }

        /// Image encode then decode round-trips.
        #[test]
        fn image_roundtrip(
            entry in 0usize..10_000,
            slot_count in 0usize..256,
            code in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let image = Image::new(entry, slot_count, code);
            let decoded = Image::decode(&image.encode()).unwrap();
            prop_assert_eq!(decoded, image);
        }
    }
}
