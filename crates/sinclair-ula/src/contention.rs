//! Memory contention.
//!
//! While the ULA fetches screen data it holds the CPU clock for any access to
//! contended RAM. The delay depends only on where the beam is, so it is a
//! function of the frame T-state. It repeats every 8 T-states across the
//! 128 T-states of each screen line and is zero in the borders and retrace.

use crate::timing::{DISPLAY_BORDER_HEIGHT, DISPLAY_HEIGHT, VideoTiming};

/// Delays for the Sinclair ULA (16K, 48K, 128K, +2).
const PATTERN_65432100: [u8; 8] = [5, 4, 3, 2, 1, 0, 0, 6];

/// Delays for the Amstrad gate array (+2A, +3).
const PATTERN_76543210: [u8; 8] = [5, 4, 3, 2, 1, 0, 7, 6];

/// Entries in a [`ContentionTable`]. Covers the longest frame plus the
/// overrun of an instruction that straddles the frame end.
pub const CONTENTION_TABLE_SIZE: usize = 80_000;

/// Which contention the machine has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentionModel {
    /// Uncontended (Pentagon, Scorpion).
    #[default]
    None,
    /// Ferranti/Sinclair ULA: `6,5,4,3,2,1,0,0`.
    Ula65432100,
    /// Amstrad gate array: `7,6,5,4,3,2,1,0`.
    Ula76543210,
}

impl ContentionModel {
    /// Wait states for a contended access starting at frame T-state `time`.
    #[must_use]
    pub fn delay(self, time: u32, timing: &VideoTiming) -> u8 {
        match self {
            Self::None => 0,
            Self::Ula65432100 => delay_common(time, timing, &PATTERN_65432100, 1),
            Self::Ula76543210 => delay_common(time, timing, &PATTERN_76543210, 4),
        }
    }
}

fn delay_common(time: u32, timing: &VideoTiming, pattern: &[u8; 8], offset: u32) -> u8 {
    let Some(since_first_line) = time.checked_sub(timing.line_time(0)) else {
        return 0;
    };

    let line = since_first_line / timing.tstates_per_line();
    if !(DISPLAY_BORDER_HEIGHT..DISPLAY_BORDER_HEIGHT + DISPLAY_HEIGHT).contains(&line) {
        return 0;
    }

    // line_time() is the first displayed pixel, not the start of the ULA's
    // left border.
    let through_line =
        (since_first_line + timing.border_lead_in()) % timing.tstates_per_line();

    let left = timing.left_border().saturating_sub(offset);
    let right = timing.left_border() + timing.horizontal_screen() - offset;
    if !(left..right).contains(&through_line) {
        return 0;
    }

    pattern[(through_line % 8) as usize]
}

/// Precomputed [`ContentionModel::delay`] for every T-state of a frame.
#[derive(Clone)]
pub struct ContentionTable {
    delays: Box<[u8]>,
}

impl ContentionTable {
    #[must_use]
    pub fn new(model: ContentionModel, timing: &VideoTiming) -> Self {
        let delays = (0..CONTENTION_TABLE_SIZE as u32)
            .map(|time| model.delay(time, timing))
            .collect();
        Self { delays }
    }

    /// Wait states at `time`. Zero beyond the end of the table.
    #[must_use]
    pub fn delay(&self, time: u32) -> u8 {
        self.delays.get(time as usize).copied().unwrap_or(0)
    }
}

impl std::fmt::Debug for ContentionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let contended = self.delays.iter().filter(|&&delay| delay != 0).count();
        f.debug_struct("ContentionTable")
            .field("len", &self.delays.len())
            .field("contended", &contended)
            .finish()
    }
}
