//! Lilt virtual machine — executes compiled binary images.
//!
//! The VM is a stack machine with:
//! - a fixed-capacity operand stack for computation values
//! - a fixed-capacity call stack holding return addresses
//! - variable slots sized from the image header
//!
//! Execution is single-threaded and runs to completion: it stops on
//! `halt`, on running off the end of the instruction stream, or on the
//! first runtime error.
//!
//! # Usage
//!
//! ```
//! use lilt_common::Image;
//! use lilt_vm::Machine;
//!
//! // push_uint8 65, print_ch, halt
//! let image = Image::new(0, 0, vec![4, 65, 3, 1]);
//! let mut out = Vec::new();
//! Machine::with_output(&image, &mut out).exec().unwrap();
//! assert_eq!(out, b"A");
//! ```

pub mod error;
pub mod execute;
pub mod machine;

pub use error::RuntimeError;
pub use machine::{Machine, Stack, DEFAULT_CALL_STACK_SIZE, DEFAULT_STACK_SIZE};

use lilt_common::Image;

/// Executes an image to completion, writing program output to stdout.
pub fn run(image: &Image) -> Result<(), RuntimeError> {
    Machine::new(image).exec()
}
