//! Pass 2: symbol resolution and binary encoding.
//!
//! Walks the listing, assigns every label a byte offset, substitutes
//! symbolic operands, and serializes the instruction stream.
//!
//! Resolution is whole-program: a label may be referenced before its
//! definition. Branch operands are varints, so an operand's width depends
//! on the offset it targets, which in turn depends on the widths of the
//! instructions before the target. Widths are settled by fixed-point
//! iteration: every branch operand starts at the one-byte minimum and
//! grows when its resolved target needs more bytes. Offsets only grow, so
//! the iteration terminates.

use crate::error::AsmError;
use crate::parser::{Listing, Operand, Stmt, StmtKind};
use lilt_common::{varint, Arg, Image, Instruction};
use std::collections::HashMap;

/// Resolves a listing into a binary image.
pub(crate) fn resolve(listing: &Listing) -> Result<Image, AsmError> {
    let mut sizes = initial_sizes(listing)?;

    let labels = loop {
        let labels = label_offsets(&listing.stmts, &sizes)?;
        let mut changed = false;
        for (i, stmt) in listing.stmts.iter().enumerate() {
            if let StmtKind::Instr {
                operand: Operand::Label(name),
                ..
            } = &stmt.kind
            {
                let target = lookup_label(&labels, name, stmt)?;
                let need = 1 + varint::encoded_len(target);
                if need > sizes[i] {
                    sizes[i] = need;
                    changed = true;
                }
            }
        }
        if !changed {
            break labels;
        }
    };

    let mut code = Vec::new();
    for stmt in &listing.stmts {
        let (op, operand) = match &stmt.kind {
            StmtKind::Label(_) => continue,
            StmtKind::Instr { op, operand } => (*op, operand),
        };
        let arg = match operand {
            Operand::None => None,
            Operand::Int(n) => Some(Arg::Int(*n)),
            Operand::Byte(b) => Some(Arg::Byte(*b)),
            Operand::Var(name) => Some(Arg::Int(lookup_var(listing, name, stmt)?)),
            Operand::Label(name) => Some(Arg::Int(lookup_label(&labels, name, stmt)?)),
        };
        Instruction::new(op, arg)
            .encode(&mut code)
            .map_err(|source| AsmError::Encode {
                line: stmt.line,
                pos: stmt.pos,
                source,
            })?;
    }

    let entry = labels.get("main").map(|&n| n as usize).unwrap_or(0);
    Ok(Image::new(entry, listing.vars.len(), code))
}

/// Width of every statement before branch relaxation. Only label operands
/// are provisional; everything else is exact.
fn initial_sizes(listing: &Listing) -> Result<Vec<usize>, AsmError> {
    listing
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Label(_) => Ok(0),
            StmtKind::Instr { operand, .. } => match operand {
                Operand::None => Ok(1),
                Operand::Byte(_) => Ok(2),
                Operand::Int(n) => Ok(1 + varint::encoded_len(*n)),
                Operand::Var(name) => {
                    Ok(1 + varint::encoded_len(lookup_var(listing, name, stmt)?))
                }
                Operand::Label(_) => Ok(2),
            },
        })
        .collect()
}

/// Byte offset of every label definition, given the current widths.
fn label_offsets(stmts: &[Stmt], sizes: &[usize]) -> Result<HashMap<String, i64>, AsmError> {
    let mut labels = HashMap::new();
    let mut offset = 0i64;
    for (stmt, &size) in stmts.iter().zip(sizes) {
        if let StmtKind::Label(name) = &stmt.kind {
            if labels.insert(name.clone(), offset).is_some() {
                return Err(AsmError::DuplicateLabel {
                    line: stmt.line,
                    pos: stmt.pos,
                    name: name.clone(),
                });
            }
        }
        offset += size as i64;
    }
    Ok(labels)
}

fn lookup_label(
    labels: &HashMap<String, i64>,
    name: &str,
    stmt: &Stmt,
) -> Result<i64, AsmError> {
    labels
        .get(name)
        .copied()
        .ok_or_else(|| AsmError::UndefinedLabel {
            line: stmt.line,
            pos: stmt.pos,
            name: name.to_string(),
        })
}

fn lookup_var(listing: &Listing, name: &str, stmt: &Stmt) -> Result<i64, AsmError> {
    listing
        .vars
        .get(name)
        .map(|&slot| slot as i64)
        .ok_or_else(|| AsmError::UndeclaredVariable {
            line: stmt.line,
            pos: stmt.pos,
            name: name.to_string(),
        })
}
