//! Fetch-decode-execute loop and opcode semantics.

use crate::error::RuntimeError;
use crate::machine::Machine;
use lilt_common::{Arg, Instruction, Opcode, Value};
use std::cmp::Ordering;
use std::io::Write;

impl<W: Write> Machine<'_, W> {
    /// Executes until `halt`, the end of the instruction stream, or the
    /// first error.
    pub fn exec(&mut self) -> Result<(), RuntimeError> {
        self.run_loop()?;
        self.out.flush().map_err(|e| RuntimeError::Output {
            message: e.to_string(),
        })
    }

    fn run_loop(&mut self) -> Result<(), RuntimeError> {
        while self.ip < self.code.len() {
            let at = self.ip;
            let (instruction, next) = Instruction::decode(self.code, self.ip)
                .map_err(|source| RuntimeError::Decode { at, source })?;
            // The instruction is fully consumed before dispatch, so a
            // branch overwrites `ip` with the bare target offset.
            self.ip = next;

            match (instruction.op, instruction.arg) {
                (Opcode::Nop, None) => {}
                (Opcode::Halt, None) => return Ok(()),

                (Opcode::PushZero, None) => self.stack.push(Value::Int64(0), at)?,
                (Opcode::PushOne, None) => self.stack.push(Value::Int64(1), at)?,
                (Opcode::PushUint8, Some(Arg::Byte(b))) => {
                    self.stack.push(Value::Uint8(b), at)?
                }
                (Opcode::PushInt64, Some(Arg::Int(n))) => {
                    self.stack.push(Value::Int64(n), at)?
                }

                (Opcode::Print, None) => {
                    let value = self.stack.pop(at)?;
                    self.write_output(format_args!("{value}"))?;
                }
                (Opcode::PrintCh, None) => match self.stack.pop(at)? {
                    Value::Uint8(b) => self.write_output(format_args!("{}", char::from(b)))?,
                    _ => {
                        return Err(RuntimeError::TypeMismatch {
                            at,
                            op: Opcode::PrintCh,
                        })
                    }
                },

                (Opcode::Store, Some(Arg::Int(slot))) => {
                    let index = self.slot_index(slot, at)?;
                    self.slots[index] = self.stack.pop(at)?;
                }
                (Opcode::Load, Some(Arg::Int(slot))) => {
                    let index = self.slot_index(slot, at)?;
                    self.stack.push(self.slots[index].clone(), at)?;
                }

                (Opcode::ToInt64, None) => match self.stack.pop(at)? {
                    Value::Uint8(b) => self.stack.push(Value::Int64(i64::from(b)), at)?,
                    _ => {
                        return Err(RuntimeError::TypeMismatch {
                            at,
                            op: Opcode::ToInt64,
                        })
                    }
                },
                (Opcode::ToUint8, None) => match self.stack.pop(at)? {
                    Value::Int64(n) if (0..=255).contains(&n) => {
                        self.stack.push(Value::Uint8(n as u8), at)?
                    }
                    Value::Int64(n) => {
                        return Err(RuntimeError::ConversionOutOfRange { at, value: n })
                    }
                    _ => {
                        return Err(RuntimeError::TypeMismatch {
                            at,
                            op: Opcode::ToUint8,
                        })
                    }
                },

                (Opcode::Drop, None) => {
                    self.stack.pop(at)?;
                }
                (Opcode::Dup, None) => self.stack.dup(at)?,
                (Opcode::Swap, None) => self.stack.swap(at)?,

                (Opcode::Add, None) => self.arith(at, Opcode::Add, i64::wrapping_add)?,
                (Opcode::Sub, None) => self.arith(at, Opcode::Sub, i64::wrapping_sub)?,
                (Opcode::Mul, None) => self.arith(at, Opcode::Mul, i64::wrapping_mul)?,
                (Opcode::Div, None) => self.div_rem(at, Opcode::Div, i64::wrapping_div)?,
                (Opcode::Mod, None) => self.div_rem(at, Opcode::Mod, i64::wrapping_rem)?,

                (Opcode::Inc, None) => self.step(at, Opcode::Inc, 1)?,
                (Opcode::Dec, None) => self.step(at, Opcode::Dec, -1)?,

                (Opcode::And, None) => {
                    self.bitwise(at, Opcode::And, |a, b| a & b, |a, b| a & b)?
                }
                (Opcode::Or, None) => {
                    self.bitwise(at, Opcode::Or, |a, b| a | b, |a, b| a | b)?
                }
                (Opcode::Xor, None) => {
                    self.bitwise(at, Opcode::Xor, |a, b| a ^ b, |a, b| a ^ b)?
                }
                (Opcode::Not, None) => match self.stack.pop(at)? {
                    Value::Int64(n) => self.stack.push(Value::Int64(!n), at)?,
                    Value::Uint8(b) => self.stack.push(Value::Uint8(!b), at)?,
                    _ => {
                        return Err(RuntimeError::TypeMismatch {
                            at,
                            op: Opcode::Not,
                        })
                    }
                },

                (Opcode::Jump, Some(Arg::Int(target))) => self.jump(target, at)?,
                (Opcode::JumpTrue, Some(Arg::Int(target))) => {
                    match self.stack.pop(at)?.is_zero() {
                        Some(false) => self.jump(target, at)?,
                        Some(true) => {}
                        None => {
                            return Err(RuntimeError::TypeMismatch {
                                at,
                                op: Opcode::JumpTrue,
                            })
                        }
                    }
                }
                (Opcode::JumpFalse, Some(Arg::Int(target))) => {
                    match self.stack.pop(at)?.is_zero() {
                        Some(true) => self.jump(target, at)?,
                        Some(false) => {}
                        None => {
                            return Err(RuntimeError::TypeMismatch {
                                at,
                                op: Opcode::JumpFalse,
                            })
                        }
                    }
                }
                (Opcode::JumpEq, Some(Arg::Int(target))) => {
                    let b = self.stack.pop(at)?;
                    let a = self.stack.pop(at)?;
                    // Exact equality: variant tag and payload.
                    if a == b {
                        self.jump(target, at)?;
                    }
                }
                (Opcode::JumpNe, Some(Arg::Int(target))) => {
                    let b = self.stack.pop(at)?;
                    let a = self.stack.pop(at)?;
                    if a != b {
                        self.jump(target, at)?;
                    }
                }
                (Opcode::JumpLt, Some(Arg::Int(target))) => {
                    self.compare_jump(target, at, Opcode::JumpLt, Ordering::Less)?
                }
                (Opcode::JumpGt, Some(Arg::Int(target))) => {
                    self.compare_jump(target, at, Opcode::JumpGt, Ordering::Greater)?
                }

                (Opcode::Call, Some(Arg::Int(target))) => {
                    // `ip` already points at the next instruction.
                    self.call_stack
                        .push(Value::Int64(self.ip as i64), at)
                        .map_err(|_| RuntimeError::CallStackOverflow { at })?;
                    self.jump(target, at)?;
                }
                (Opcode::Ret, None) => {
                    let addr = self
                        .call_stack
                        .pop(at)
                        .map_err(|_| RuntimeError::CallStackUnderflow { at })?;
                    match addr {
                        Value::Int64(n) => self.jump(n, at)?,
                        _ => {
                            return Err(RuntimeError::TypeMismatch {
                                at,
                                op: Opcode::Ret,
                            })
                        }
                    }
                }

                (op, _) => return Err(RuntimeError::MalformedInstruction { at, op }),
            }
        }
        Ok(())
    }

    fn write_output(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), RuntimeError> {
        self.out.write_fmt(args).map_err(|e| RuntimeError::Output {
            message: e.to_string(),
        })
    }

    fn slot_index(&self, slot: i64, at: usize) -> Result<usize, RuntimeError> {
        if slot < 0 || slot as usize >= self.slots.len() {
            return Err(RuntimeError::SlotOutOfRange {
                at,
                slot,
                count: self.slots.len(),
            });
        }
        Ok(slot as usize)
    }

    /// Sets `ip` to an absolute byte offset. A target at or past the end
    /// of the code ends execution at the top of the loop.
    fn jump(&mut self, target: i64, at: usize) -> Result<(), RuntimeError> {
        if target < 0 {
            return Err(RuntimeError::NegativeJumpTarget { at, target });
        }
        self.ip = target as usize;
        Ok(())
    }

    /// Int64-only binary arithmetic. Pops b then a, pushes f(a, b).
    fn arith(
        &mut self,
        at: usize,
        op: Opcode,
        f: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let b = self.stack.pop(at)?;
        let a = self.stack.pop(at)?;
        match (a, b) {
            (Value::Int64(a), Value::Int64(b)) => self.stack.push(Value::Int64(f(a, b)), at),
            _ => Err(RuntimeError::TypeMismatch { at, op }),
        }
    }

    /// Like `arith`, with a zero check on the divisor.
    fn div_rem(
        &mut self,
        at: usize,
        op: Opcode,
        f: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let b = self.stack.pop(at)?;
        let a = self.stack.pop(at)?;
        match (a, b) {
            (Value::Int64(_), Value::Int64(0)) => Err(RuntimeError::DivisionByZero { at }),
            (Value::Int64(a), Value::Int64(b)) => self.stack.push(Value::Int64(f(a, b)), at),
            _ => Err(RuntimeError::TypeMismatch { at, op }),
        }
    }

    /// Wrapping increment/decrement of either numeric variant.
    fn step(&mut self, at: usize, op: Opcode, delta: i64) -> Result<(), RuntimeError> {
        match self.stack.pop(at)? {
            Value::Int64(n) => self.stack.push(Value::Int64(n.wrapping_add(delta)), at),
            Value::Uint8(b) => self
                .stack
                .push(Value::Uint8(b.wrapping_add(delta as u8)), at),
            _ => Err(RuntimeError::TypeMismatch { at, op }),
        }
    }

    /// Same-variant bitwise operation.
    fn bitwise(
        &mut self,
        at: usize,
        op: Opcode,
        fi: fn(i64, i64) -> i64,
        fb: fn(u8, u8) -> u8,
    ) -> Result<(), RuntimeError> {
        let b = self.stack.pop(at)?;
        let a = self.stack.pop(at)?;
        match (a, b) {
            (Value::Int64(a), Value::Int64(b)) => self.stack.push(Value::Int64(fi(a, b)), at),
            (Value::Uint8(a), Value::Uint8(b)) => self.stack.push(Value::Uint8(fb(a, b)), at),
            _ => Err(RuntimeError::TypeMismatch { at, op }),
        }
    }

    /// Pops b then a, jumps when a orders `wanted` relative to b.
    fn compare_jump(
        &mut self,
        target: i64,
        at: usize,
        op: Opcode,
        wanted: Ordering,
    ) -> Result<(), RuntimeError> {
        let b = self.stack.pop(at)?;
        let a = self.stack.pop(at)?;
        match a.compare(&b) {
            Some(ordering) if ordering == wanted => self.jump(target, at),
            Some(_) => Ok(()),
            None => Err(RuntimeError::NotComparable { at, op }),
        }
    }
}
