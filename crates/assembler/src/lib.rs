//! Lilt assembler — text → binary image translation, and back.
//!
//! Assembly happens in two explicit passes. Pass 1 (the parser) turns the
//! token stream into a statement listing with symbolic operands and the
//! variable table. Pass 2 (the resolver) assigns every label a byte
//! offset — forward references included — substitutes slot indices and
//! offsets, and serializes the instruction stream behind a two-field
//! header.
//!
//! # Usage
//!
//! ```
//! use lilt_assembler::assemble;
//!
//! let image = assemble("push_int64 50 halt").unwrap();
//! assert_eq!(image.entry, 0);
//! assert_eq!(image.slot_count, 0);
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;
mod resolver;

pub use error::{AsmError, DisasmError};

use lexer::Lexer;
use lilt_common::Image;

/// Assembles source text into a binary image.
///
/// Returns the first error encountered; there is no multi-error batching.
pub fn assemble(source: &str) -> Result<Image, AsmError> {
    let listing = parser::parse(Lexer::new(source))?;
    resolver::resolve(&listing)
}

/// Disassembles a binary image into canonical, re-assemblable text.
pub fn disassemble(image: &Image) -> Result<String, DisasmError> {
    disassembler::disassemble(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_minimal() {
        let image = assemble("push_int64 50 halt").unwrap();
        assert_eq!(image.entry, 0);
        assert_eq!(image.slot_count, 0);
        assert_eq!(image.code.len(), 3);
    }

    #[test]
    fn whitespace_layout_is_irrelevant() {
        let flat = assemble("push_int64 50 halt").unwrap();
        let lined = assemble("push_int64 50\nhalt\n").unwrap();
        let ragged = assemble("  push_int64\n\t50\n\n   halt").unwrap();
        assert_eq!(flat, lined);
        assert_eq!(flat, ragged);
    }

    #[test]
    fn error_carries_position() {
        let err = assemble("nop\n  bogus\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::InvalidInstruction {
                line: 2,
                pos: 6,
                token: "bogus".to_string()
            }
        );
    }

    #[test]
    fn first_error_wins() {
        let err = assemble("bogus1 bogus2").unwrap_err();
        assert!(matches!(
            err,
            AsmError::InvalidInstruction { token, .. } if token == "bogus1"
        ));
    }

    #[test]
    fn image_encode_roundtrip() {
        let image = assemble(":main push_uint8 65 print_ch halt").unwrap();
        let decoded = Image::decode(&image.encode()).unwrap();
        assert_eq!(decoded, image);
    }
}
