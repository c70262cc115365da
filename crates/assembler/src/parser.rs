//! Pass 1: token stream → instruction listing.
//!
//! The parser builds the intermediate representation the resolver works
//! from: an ordered statement list with operands still symbolic, plus the
//! variable table. No bytes are produced here.

use crate::error::AsmError;
use crate::lexer::{Lexer, Token, TokenKind};
use lilt_common::opcode::ALL_OPCODES;
use lilt_common::Opcode;
use std::collections::HashMap;

/// An operand as written in source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    None,
    /// A label name, resolved to a byte offset in pass 2.
    Label(String),
    /// A variable name, resolved to a slot index in pass 2.
    Var(String),
    /// A literal signed integer.
    Int(i64),
    /// A literal byte.
    Byte(u8),
}

/// What one statement is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StmtKind {
    /// Records the current byte offset under a name; contributes no bytes.
    Label(String),
    /// A concrete instruction.
    Instr { op: Opcode, operand: Operand },
}

/// One statement with the position of the token that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
    pub pos: usize,
}

/// Output of pass 1: statements plus the variable table.
///
/// Slot indices are dense and follow declaration order.
#[derive(Debug, Default)]
pub(crate) struct Listing {
    pub stmts: Vec<Stmt>,
    pub vars: HashMap<String, usize>,
}

fn lookup_mnemonic(name: &str) -> Option<Opcode> {
    ALL_OPCODES
        .iter()
        .find(|op| op.operand_kind().is_some() && op.mnemonic() == name)
        .copied()
}

/// Parses the whole token stream into a listing. Stops at the first error.
pub(crate) fn parse(lexer: Lexer<'_>) -> Result<Listing, AsmError> {
    Parser {
        lexer,
        listing: Listing::default(),
    }
    .run()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    listing: Listing,
}

impl Parser<'_> {
    fn run(mut self) -> Result<Listing, AsmError> {
        while let Some(token) = self.lexer.next().transpose()? {
            match token.kind {
                TokenKind::Label => self.define_label(&token),
                TokenKind::VarKeyword => self.declare_variable(&token)?,
                TokenKind::Ident => self.instruction(&token)?,
                TokenKind::Number | TokenKind::Comma => {
                    return Err(AsmError::InvalidInstruction {
                        line: token.line,
                        pos: token.pos,
                        token: token.text,
                    })
                }
            }
        }
        Ok(self.listing)
    }

    fn next_token(&mut self) -> Result<Option<Token>, AsmError> {
        self.lexer.next().transpose()
    }

    fn define_label(&mut self, token: &Token) {
        // The lexer keeps the colon; the name starts after it.
        let name = token.text[1..].to_string();
        self.listing.stmts.push(Stmt {
            kind: StmtKind::Label(name),
            line: token.line,
            pos: token.pos,
        });
    }

    fn declare_variable(&mut self, keyword: &Token) -> Result<(), AsmError> {
        let name = match self.next_token()? {
            Some(t) if t.kind == TokenKind::Ident => t,
            Some(t) => {
                return Err(AsmError::ExpectedIdentifier {
                    line: t.line,
                    pos: t.pos,
                })
            }
            None => {
                return Err(AsmError::ExpectedIdentifier {
                    line: keyword.line,
                    pos: keyword.pos,
                })
            }
        };
        if self.listing.vars.contains_key(&name.text) {
            return Err(AsmError::DuplicateVariable {
                line: name.line,
                pos: name.pos,
                name: name.text,
            });
        }
        let slot = self.listing.vars.len();
        self.listing.vars.insert(name.text, slot);
        Ok(())
    }

    fn instruction(&mut self, token: &Token) -> Result<(), AsmError> {
        let op = lookup_mnemonic(&token.text).ok_or_else(|| AsmError::InvalidInstruction {
            line: token.line,
            pos: token.pos,
            token: token.text.clone(),
        })?;

        let operand = if op.is_branch() {
            Operand::Label(self.label_operand(token, op)?)
        } else {
            match op {
                Opcode::Load | Opcode::Store => Operand::Var(self.var_operand(token, op)?),
                Opcode::PushUint8 => Operand::Byte(self.uint8_operand(token, op)?),
                Opcode::PushInt64 => Operand::Int(self.int64_operand(token, op)?),
                _ => Operand::None,
            }
        };

        self.listing.stmts.push(Stmt {
            kind: StmtKind::Instr { op, operand },
            line: token.line,
            pos: token.pos,
        });
        Ok(())
    }

    fn label_operand(&mut self, at: &Token, op: Opcode) -> Result<String, AsmError> {
        match self.next_token()? {
            Some(t) if t.kind == TokenKind::Ident => Ok(t.text),
            Some(t) => Err(AsmError::ExpectedLabelName {
                line: t.line,
                pos: t.pos,
                op: op.mnemonic(),
            }),
            None => Err(AsmError::ExpectedLabelName {
                line: at.line,
                pos: at.pos,
                op: op.mnemonic(),
            }),
        }
    }

    fn var_operand(&mut self, at: &Token, op: Opcode) -> Result<String, AsmError> {
        let name = match self.next_token()? {
            Some(t) if t.kind == TokenKind::Ident => t,
            Some(t) => {
                return Err(AsmError::ExpectedVariableName {
                    line: t.line,
                    pos: t.pos,
                    op: op.mnemonic(),
                })
            }
            None => {
                return Err(AsmError::ExpectedVariableName {
                    line: at.line,
                    pos: at.pos,
                    op: op.mnemonic(),
                })
            }
        };
        // Declaration must precede first use.
        if !self.listing.vars.contains_key(&name.text) {
            return Err(AsmError::UndeclaredVariable {
                line: name.line,
                pos: name.pos,
                name: name.text,
            });
        }
        Ok(name.text)
    }

    fn number_operand(&mut self, at: &Token, op: Opcode) -> Result<Token, AsmError> {
        match self.next_token()? {
            Some(t) if t.kind == TokenKind::Number => Ok(t),
            Some(t) => Err(AsmError::ExpectedNumber {
                line: t.line,
                pos: t.pos,
                op: op.mnemonic(),
            }),
            None => Err(AsmError::ExpectedNumber {
                line: at.line,
                pos: at.pos,
                op: op.mnemonic(),
            }),
        }
    }

    fn uint8_operand(&mut self, at: &Token, op: Opcode) -> Result<u8, AsmError> {
        let t = self.number_operand(at, op)?;
        t.text.parse::<u8>().map_err(|_| AsmError::InvalidUint8 {
            line: t.line,
            pos: t.pos,
            token: t.text.clone(),
        })
    }

    fn int64_operand(&mut self, at: &Token, op: Opcode) -> Result<i64, AsmError> {
        let t = self.number_operand(at, op)?;
        t.text.parse::<i64>().map_err(|_| AsmError::InvalidInt64 {
            line: t.line,
            pos: t.pos,
            token: t.text.clone(),
        })
    }
}
