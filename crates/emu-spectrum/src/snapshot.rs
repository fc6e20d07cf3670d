//! Whole-machine state capture.

use zilog_z80::Z80Snapshot;

use crate::config::SpectrumModel;

/// Everything needed to resume a session: CPU registers, the frame clock,
/// paging latches and RAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub model: SpectrumModel,
    pub cpu: Z80Snapshot,
    /// T-states into the current frame.
    pub tstates: u32,
    /// Last value written to $7FFD.
    pub last_byte: u8,
    /// Last value written to $1FFD.
    pub last_byte2: u8,
    /// Timex SCLD control register.
    pub scld_dec: u8,
    /// RAM pages in page order, 16K each.
    pub ram: Vec<Vec<u8>>,
}
