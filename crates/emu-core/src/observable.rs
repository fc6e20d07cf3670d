//! Read-only state introspection for debuggers and test harnesses.
//!
//! A query never changes emulation state: it is safe to call between any
//! two T-states, including from inside an event handler.

use std::fmt;

/// A dynamically-typed value returned from a state query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    /// Frame-relative T-state stamps and counters.
    U32(u32),
    /// Counters that may outlive a `u32`, such as frames since reset.
    U64(u64),
    /// Symbolic state, e.g. the interrupt mode name.
    Text(&'static str),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "${v:02X}"),
            Value::U16(v) => write!(f, "${v:04X}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

/// A component whose state can be inspected by path.
///
/// Paths are dot-separated and hierarchical: a machine answers `frames`
/// itself and forwards `cpu.pc` to its processor as `pc`.
pub trait Observable {
    /// Query a property by path. `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// Every path `query` answers.
    fn query_paths(&self) -> &'static [&'static str];
}
