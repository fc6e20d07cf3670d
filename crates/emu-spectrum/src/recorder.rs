//! Input recording and playback.

/// Interface to an input recorder (RZX or similar).
///
/// During playback the recording, not the video timing, decides where each
/// frame ends and when interrupts happen.
pub trait Recorder {
    /// Whether a recording is being played back.
    fn playback_active(&self) -> bool;

    /// An interrupt was taken; close the current recorded frame.
    fn record_frame(&mut self);

    /// An interrupt acknowledge is about to run. Recordings count fetched
    /// instructions, and the acknowledge must not be counted as one.
    fn decrement_instruction_offset(&mut self);
}

/// Recorder that is never recording or playing back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecorder;

impl Recorder for NoRecorder {
    fn playback_active(&self) -> bool {
        false
    }

    fn record_frame(&mut self) {}

    fn decrement_instruction_offset(&mut self) {}
}
