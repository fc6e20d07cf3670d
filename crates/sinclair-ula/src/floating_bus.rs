//! Floating bus.
//!
//! Reading a port nothing answers returns whatever is on the data bus. On
//! the Sinclair ULA that is the screen byte it is fetching, if any. Within
//! each 8 T-state group of a screen line the ULA fetches, from T-state 2:
//! bitmap, attribute, next bitmap, next attribute, then four idle cycles.

use crate::screen::{ATTRIBUTE_LINE_OFFSETS, BITMAP_LINE_OFFSETS};
use crate::timing::{DISPLAY_BORDER_HEIGHT, DISPLAY_HEIGHT, VideoTiming};

/// Value of an idle data bus.
pub const IDLE_BUS: u8 = 0xFF;

/// Whether unattached port reads see ULA fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatingBus {
    /// The bus always reads $FF (+2A, +3, Pentagon, TC2048, Scorpion).
    #[default]
    None,
    /// Sinclair ULA leaks screen fetches onto the bus.
    Ula,
}

impl FloatingBus {
    /// Value read from an unattached port at frame T-state `tstates`.
    ///
    /// `screen` is the RAM page the ULA is displaying.
    #[must_use]
    pub fn value(self, tstates: u32, timing: &VideoTiming, screen: &[u8]) -> u8 {
        match self {
            Self::None => IDLE_BUS,
            Self::Ula => ula_fetch(tstates, timing, screen),
        }
    }
}

fn ula_fetch(tstates: u32, timing: &VideoTiming, screen: &[u8]) -> u8 {
    let Some(since_screen) = tstates.checked_sub(timing.line_time(DISPLAY_BORDER_HEIGHT)) else {
        return IDLE_BUS;
    };

    let line = since_screen / timing.tstates_per_line();
    if line >= DISPLAY_HEIGHT {
        return IDLE_BUS;
    }

    let through_line = tstates - timing.line_time(DISPLAY_BORDER_HEIGHT + line)
        + timing.border_lead_in();

    let left = timing.left_border();
    if !(left..left + timing.horizontal_screen()).contains(&through_line) {
        return IDLE_BUS;
    }

    let column = ((through_line - left) / 8 * 2) as usize;
    let row = line as usize;

    let offset = match through_line % 8 {
        2 => usize::from(BITMAP_LINE_OFFSETS[row]) + column,
        3 => usize::from(ATTRIBUTE_LINE_OFFSETS[row]) + column,
        4 => usize::from(BITMAP_LINE_OFFSETS[row]) + column + 1,
        5 => usize::from(ATTRIBUTE_LINE_OFFSETS[row]) + column + 1,
        _ => return IDLE_BUS,
    };
    screen.get(offset).copied().unwrap_or(IDLE_BUS)
}
