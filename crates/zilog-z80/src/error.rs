//! Errors raised by the Z80 core.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Z80Error {
    /// An interrupt mode other than 0, 1 or 2 was presented to the core.
    ///
    /// Emulated programs cannot produce this (`IM n` only encodes valid
    /// modes), so it always means a corrupt snapshot or a host bug.
    InvalidInterruptMode(u8),
}

impl fmt::Display for Z80Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterruptMode(mode) => {
                write!(f, "unknown interrupt mode {mode} (expected 0, 1 or 2)")
            }
        }
    }
}

impl std::error::Error for Z80Error {}
