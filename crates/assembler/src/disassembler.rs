//! Disassembler: binary image → re-assemblable canonical text.
//!
//! Labels do not survive assembly, so the disassembler synthesizes them:
//! every branch target becomes `:l<offset>`, the entry point becomes
//! `:main`, and the header's slot count becomes `var v0 … var vN`
//! declarations. Output is flat text, one statement per line.

use crate::error::DisasmError;
use lilt_common::{Arg, Image, Instruction, Opcode};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

/// Disassembles an image into canonical assembly text.
///
/// For images produced by this crate's assembler,
/// `assemble(disassemble(image))` reproduces the image exactly.
pub fn disassemble(image: &Image) -> Result<String, DisasmError> {
    let decoded = decode_stream(&image.code)?;
    let boundaries: HashSet<usize> = decoded.iter().map(|&(offset, _)| offset).collect();

    // Branch targets, plus the entry point when it is not the default.
    let mut targets: BTreeMap<usize, String> = BTreeMap::new();
    for &(offset, instruction) in &decoded {
        if !instruction.op.is_branch() {
            continue;
        }
        let Some(Arg::Int(target)) = instruction.arg else {
            continue;
        };
        if target < 0 || (target as usize != image.code.len() && !boundaries.contains(&(target as usize)))
        {
            return Err(DisasmError::MisalignedTarget {
                at: offset,
                target,
            });
        }
        let target = target as usize;
        targets.entry(target).or_insert_with(|| format!("l{target}"));
    }
    if image.entry != 0 {
        if image.entry != image.code.len() && !boundaries.contains(&image.entry) {
            return Err(DisasmError::MisalignedTarget {
                at: 0,
                target: image.entry as i64,
            });
        }
        targets.insert(image.entry, "main".to_string());
    }

    let mut out = String::new();
    for slot in 0..image.slot_count {
        let _ = writeln!(out, "var v{slot}");
    }
    for &(offset, instruction) in &decoded {
        if let Some(name) = targets.get(&offset) {
            let _ = writeln!(out, ":{name}");
        }
        let _ = writeln!(out, "{}", format_instruction(image, offset, instruction)?);
    }
    if let Some(name) = targets.get(&image.code.len()) {
        let _ = writeln!(out, ":{name}");
    }
    Ok(out)
}

fn decode_stream(code: &[u8]) -> Result<Vec<(usize, Instruction)>, DisasmError> {
    let mut decoded = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let (instruction, next) = Instruction::decode(code, offset)?;
        decoded.push((offset, instruction));
        offset = next;
    }
    Ok(decoded)
}

fn format_instruction(
    image: &Image,
    offset: usize,
    instruction: Instruction,
) -> Result<String, DisasmError> {
    let mnemonic = instruction.op.mnemonic();
    Ok(match (instruction.op, instruction.arg) {
        (op, Some(Arg::Int(target))) if op.is_branch() => {
            // Targets were validated above; the entry point may shadow the
            // synthesized name.
            let name = if image.entry != 0 && target as usize == image.entry {
                "main".to_string()
            } else {
                format!("l{target}")
            };
            format!("{mnemonic} {name}")
        }
        (Opcode::Load | Opcode::Store, Some(Arg::Int(slot))) => {
            if slot < 0 || slot as usize >= image.slot_count {
                return Err(DisasmError::SlotOutOfRange { at: offset, slot });
            }
            format!("{mnemonic} v{slot}")
        }
        (_, Some(Arg::Int(n))) => format!("{mnemonic} {n}"),
        (_, Some(Arg::Byte(b))) => format!("{mnemonic} {b}"),
        (_, None) => mnemonic.to_string(),
    })
}
