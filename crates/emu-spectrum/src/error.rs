//! Session errors.

use std::fmt;

use zilog_z80::Z80Error;

use crate::config::SpectrumModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectrumError {
    /// The CPU rejected its part of a snapshot.
    Z80(Z80Error),
    /// ROM image is the wrong size for the model.
    RomSize {
        model: SpectrumModel,
        expected: usize,
        actual: usize,
    },
    /// Snapshot was taken on a different model.
    ModelMismatch {
        expected: SpectrumModel,
        actual: SpectrumModel,
    },
    /// Snapshot carries a different number of RAM pages than the machine.
    RamPageCount { expected: usize, actual: usize },
    /// A snapshot RAM page is not 16K.
    RamPageSize { page: usize, actual: usize },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Z80(err) => write!(f, "Z80: {err}"),
            Self::RomSize {
                model,
                expected,
                actual,
            } => write!(
                f,
                "{} ROM must be {expected} bytes, got {actual}",
                model.name()
            ),
            Self::ModelMismatch { expected, actual } => write!(
                f,
                "snapshot is for a {}, machine is a {}",
                actual.name(),
                expected.name()
            ),
            Self::RamPageCount { expected, actual } => {
                write!(f, "expected {expected} RAM pages, got {actual}")
            }
            Self::RamPageSize { page, actual } => {
                write!(f, "RAM page {page} is {actual} bytes, expected 16384")
            }
        }
    }
}

impl std::error::Error for SpectrumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Z80(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Z80Error> for SpectrumError {
    fn from(err: Z80Error) -> Self {
        Self::Z80(err)
    }
}
