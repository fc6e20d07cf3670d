//! Frame geometry in CPU T-states.
//!
//! A frame is described the way the ULA produces it: each line is left
//! border, screen, right border and horizontal retrace; each frame is top
//! border, screen lines, bottom border and vertical retrace. Only part of the
//! border is ever shown, so [`VideoTiming::line_time`] is measured from the
//! first *displayed* pixel: 24 lines above the screen and 4 character columns
//! (16 T-states) to its left.

/// Border lines shown above and below the screen.
pub const DISPLAY_BORDER_HEIGHT: u32 = 24;

/// Screen lines.
pub const DISPLAY_HEIGHT: u32 = 192;

/// Displayed lines including the top and bottom border.
pub const DISPLAY_SCREEN_HEIGHT: u32 = DISPLAY_HEIGHT + 2 * DISPLAY_BORDER_HEIGHT;

/// Character columns of border shown either side of the screen.
pub const DISPLAY_BORDER_WIDTH_COLS: u32 = 4;

/// T-states per character column (8 pixels at two pixels per T-state).
const TSTATES_PER_COLUMN: u32 = 4;

/// Frame layout as the ULA generates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// CPU clock in Hz.
    pub processor_speed: u32,
    pub left_border: u32,
    pub horizontal_screen: u32,
    pub right_border: u32,
    pub horizontal_retrace: u32,
    pub top_border: u32,
    pub vertical_screen: u32,
    pub bottom_border: u32,
    pub vertical_retrace: u32,
    /// T-states /INT is held low at the start of the frame.
    pub interrupt_length: u32,
    /// T-state at which the top-left screen pixel is drawn.
    pub top_left_pixel: u32,
}

impl Geometry {
    /// 16K and 48K Spectrum, TC2048, Scorpion.
    pub const SINCLAIR_48K: Self = Self {
        processor_speed: 3_500_000,
        left_border: 24,
        horizontal_screen: 128,
        right_border: 24,
        horizontal_retrace: 48,
        top_border: 48,
        vertical_screen: 192,
        bottom_border: 56,
        vertical_retrace: 16,
        interrupt_length: 32,
        top_left_pixel: 14_336,
    };

    /// 128K and +2 (Sinclair and early Amstrad boards).
    pub const SINCLAIR_128K: Self = Self {
        processor_speed: 3_546_900,
        left_border: 24,
        horizontal_screen: 128,
        right_border: 24,
        horizontal_retrace: 52,
        top_border: 48,
        vertical_screen: 192,
        bottom_border: 56,
        vertical_retrace: 15,
        interrupt_length: 36,
        top_left_pixel: 14_362,
    };

    /// +2A and +3 gate array.
    pub const AMSTRAD_PLUS3: Self = Self {
        interrupt_length: 32,
        top_left_pixel: 14_365,
        ..Self::SINCLAIR_128K
    };

    /// Pentagon 128. The screen sits lower and further right and the frame
    /// has 320 lines.
    pub const PENTAGON: Self = Self {
        processor_speed: 3_500_000,
        left_border: 36,
        horizontal_screen: 128,
        right_border: 28,
        horizontal_retrace: 32,
        top_border: 64,
        vertical_screen: 192,
        bottom_border: 48,
        vertical_retrace: 16,
        interrupt_length: 36,
        top_left_pixel: 17_988,
    };
}

/// [`Geometry`] plus the values derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTiming {
    geometry: Geometry,
    tstates_per_line: u32,
    tstates_per_frame: u32,
    /// Start of each displayed line, from the top of the displayed border.
    line_times: [u32; DISPLAY_SCREEN_HEIGHT as usize + 1],
}

impl VideoTiming {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let tstates_per_line = geometry.left_border
            + geometry.horizontal_screen
            + geometry.right_border
            + geometry.horizontal_retrace;
        let lines_per_frame = geometry.top_border
            + geometry.vertical_screen
            + geometry.bottom_border
            + geometry.vertical_retrace;

        let first = geometry
            .top_left_pixel
            .saturating_sub(DISPLAY_BORDER_HEIGHT * tstates_per_line)
            .saturating_sub(DISPLAY_BORDER_WIDTH_COLS * TSTATES_PER_COLUMN);
        let mut line_times = [0; DISPLAY_SCREEN_HEIGHT as usize + 1];
        for (line, start) in (0..).zip(line_times.iter_mut()) {
            *start = first + line * tstates_per_line;
        }

        Self {
            geometry,
            tstates_per_line,
            tstates_per_frame: tstates_per_line * lines_per_frame,
            line_times,
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub const fn tstates_per_line(&self) -> u32 {
        self.tstates_per_line
    }

    #[must_use]
    pub const fn tstates_per_frame(&self) -> u32 {
        self.tstates_per_frame
    }

    /// CPU clock in Hz.
    #[must_use]
    pub const fn processor_speed(&self) -> u32 {
        self.geometry.processor_speed
    }

    #[must_use]
    pub const fn interrupt_length(&self) -> u32 {
        self.geometry.interrupt_length
    }

    #[must_use]
    pub const fn left_border(&self) -> u32 {
        self.geometry.left_border
    }

    #[must_use]
    pub const fn horizontal_screen(&self) -> u32 {
        self.geometry.horizontal_screen
    }

    /// Start of displayed line `line`, where line 0 is the top of the
    /// displayed border and [`DISPLAY_SCREEN_HEIGHT`] is one past the bottom.
    ///
    /// # Panics
    ///
    /// Panics if `line > DISPLAY_SCREEN_HEIGHT`.
    #[must_use]
    pub const fn line_time(&self, line: u32) -> u32 {
        self.line_times[line as usize]
    }

    /// T-states from the start of the displayed part of `line` to where the
    /// ULA begins that line's left border.
    pub(crate) const fn border_lead_in(&self) -> u32 {
        self.geometry
            .left_border
            .saturating_sub(DISPLAY_BORDER_WIDTH_COLS * TSTATES_PER_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_lengths() {
        let cases = [
            (Geometry::SINCLAIR_48K, 224, 69_888),
            (Geometry::SINCLAIR_128K, 228, 70_908),
            (Geometry::AMSTRAD_PLUS3, 228, 70_908),
            (Geometry::PENTAGON, 224, 71_680),
        ];
        for (geometry, per_line, per_frame) in cases {
            let timing = VideoTiming::new(geometry);
            assert_eq!(timing.tstates_per_line(), per_line);
            assert_eq!(timing.tstates_per_frame(), per_frame);
        }
    }

    #[test]
    fn clock_speeds() {
        let speed = |geometry| VideoTiming::new(geometry).processor_speed();
        assert_eq!(speed(Geometry::SINCLAIR_48K), 3_500_000);
        assert_eq!(speed(Geometry::SINCLAIR_128K), 3_546_900);
        assert_eq!(speed(Geometry::AMSTRAD_PLUS3), 3_546_900);
        assert_eq!(speed(Geometry::PENTAGON), 3_500_000);
    }

    #[test]
    fn line_times_start_at_displayed_border() {
        let timing = VideoTiming::new(Geometry::SINCLAIR_48K);
        assert_eq!(timing.line_time(0), 14_336 - 24 * 224 - 16);
        assert_eq!(timing.line_time(DISPLAY_BORDER_HEIGHT), 14_336 - 16);
        assert_eq!(
            timing.line_time(DISPLAY_SCREEN_HEIGHT) - timing.line_time(0),
            DISPLAY_SCREEN_HEIGHT * 224
        );
    }
}
