//! Sinclair ULA timing: frame geometry, memory contention and the floating
//! bus.
//!
//! Everything here is a pure function of the frame T-state and the machine's
//! [`VideoTiming`]. The ULA never owns memory; the floating bus is handed the
//! screen page by the caller.
//!
//! # Timing (48K PAL)
//!
//! - 224 T-states per line, 312 lines, 69,888 T-states per frame
//! - /INT held low for the first 32 T-states of the frame
//! - top-left screen pixel drawn at T-state 14,336
//!
//! # Contention
//!
//! During the 128 T-states of each screen line the ULA delays contended
//! accesses. The first contended cycle of a 48K frame is 14,335, where the
//! delay is 6; the pattern then runs `6,5,4,3,2,1,0,0` until the right
//! border.

mod contention;
mod floating_bus;
mod screen;
mod timing;

pub use contention::{CONTENTION_TABLE_SIZE, ContentionModel, ContentionTable};
pub use floating_bus::{FloatingBus, IDLE_BUS};
pub use screen::{ATTRIBUTE_LINE_OFFSETS, BITMAP_LINE_OFFSETS, SCREEN_COLUMNS};
pub use timing::{
    DISPLAY_BORDER_HEIGHT, DISPLAY_BORDER_WIDTH_COLS, DISPLAY_HEIGHT, DISPLAY_SCREEN_HEIGHT,
    Geometry, VideoTiming,
};
