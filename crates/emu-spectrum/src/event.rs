//! Events the session schedules on its frame-relative timeline.

/// Kinds of scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// End of the video frame: rebase the clock and raise /INT.
    FrameEnd,
    /// Retry an interrupt refused because `EI` ran on the same T-state.
    InterruptRetrigger,
    /// Non-maskable interrupt.
    Nmi,
    /// Wake the instruction loop after `LD A,I`/`LD A,R` so an interrupt
    /// arriving now sees the NMOS parity bug. Does nothing when dispatched.
    Iff2Update,
}

impl Event {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FrameEnd => "End of frame",
            Self::InterruptRetrigger => "Retriggered interrupt",
            Self::Nmi => "Non-maskable interrupt",
            Self::Iff2Update => "IFF2 update",
        }
    }
}
