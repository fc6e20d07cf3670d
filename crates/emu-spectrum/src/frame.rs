//! Per-frame services.

/// Whether frame processing should carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    Continue,
    /// The display failed; skip the rest of the frame.
    Abort,
}

/// Subsystems that do work once per frame.
///
/// Called by the session in a fixed order at each frame boundary. Every
/// method defaults to a no-op.
pub trait FrameHooks {
    /// Flush the frame's sound. Only called with sound enabled.
    fn sound_frame(&mut self) {}

    /// Close the AY register log for the frame.
    fn psg_frame(&mut self) {}

    fn display_frame(&mut self) -> FrameFlow {
        FrameFlow::Continue
    }

    /// Only called with profiling enabled.
    fn profile_frame(&mut self, _frame_length: u32) {}

    fn printer_frame(&mut self) {}

    fn loader_frame(&mut self, _frame_length: u32) {}

    /// Advance the automatic typist that drives LOAD "" after reset.
    fn typist_frame(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl FrameHooks for NoHooks {}
