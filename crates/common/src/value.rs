//! Runtime value representation for the Lilt VM.
//!
//! Values live on the operand stack and in variable slots. The two
//! composite variants back the reserved construction opcodes; no
//! implemented opcode produces them, and every numeric operation rejects
//! them with a type error.

use std::cmp::Ordering;
use std::fmt;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 8-bit integer.
    Uint8(u8),
    /// Ordered sequence of values. Reserved.
    Array(Vec<Value>),
    /// Two values. Reserved.
    Pair(Box<(Value, Value)>),
}

impl Value {
    /// Numeric ordering. Defined for every `Int64`/`Uint8` combination
    /// (cross-variant pairs compare by numeric value); `None` for
    /// composites.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Uint8(a), Value::Uint8(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Uint8(b)) => Some(a.cmp(&i64::from(*b))),
            (Value::Uint8(a), Value::Int64(b)) => Some(i64::from(*a).cmp(b)),
            _ => None,
        }
    }

    /// Zero test for conditional jumps. `None` for composites.
    pub fn is_zero(&self) -> Option<bool> {
        match self {
            Value::Int64(n) => Some(*n == 0),
            Value::Uint8(n) => Some(*n == 0),
            Value::Array(_) | Value::Pair(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(n) => write!(f, "{n}"),
            Value::Uint8(n) => write!(f, "{n}"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, v) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Pair(p) => write!(f, "({} {})", p.0, p.1),
        }
    }
}
