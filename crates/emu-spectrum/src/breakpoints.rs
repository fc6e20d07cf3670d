//! Debugger breakpoints on frame time.
//!
//! A time breakpoint fires once the frame T-state counter reaches its stamp.
//! Stamps live on the same frame-relative timeline as scheduled events and
//! are rebased with them at every frame boundary.

/// Handle returned when a breakpoint is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreakpointId(u32);

#[derive(Debug, Clone, Copy)]
struct TimeBreakpoint {
    id: BreakpointId,
    at: u32,
}

/// One-shot time breakpoints.
#[derive(Debug, Clone, Default)]
pub struct TimeBreakpoints {
    entries: Vec<TimeBreakpoint>,
    next_id: u32,
}

impl TimeBreakpoints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Break when the frame counter reaches `at`.
    pub fn add(&mut self, at: u32) -> BreakpointId {
        let id = BreakpointId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimeBreakpoint { id, at });
        id
    }

    /// Remove a breakpoint. Returns false if it had already fired or was
    /// never set.
    pub fn remove(&mut self, id: BreakpointId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|bp| bp.id != id);
        self.entries.len() != before
    }

    /// Stamp of a pending breakpoint.
    #[must_use]
    pub fn at(&self, id: BreakpointId) -> Option<u32> {
        self.entries.iter().find(|bp| bp.id == id).map(|bp| bp.at)
    }

    /// Shift every stamp back by `frame_length`.
    pub fn rebase(&mut self, frame_length: u32) {
        for bp in &mut self.entries {
            bp.at = bp.at.saturating_sub(frame_length);
        }
    }

    /// Remove and return the breakpoints due at `now`, oldest first.
    pub fn take_hits(&mut self, now: u32) -> Vec<BreakpointId> {
        let mut hits = Vec::new();
        self.entries.retain(|bp| {
            if bp.at <= now {
                hits.push(bp.id);
                false
            } else {
                true
            }
        });
        hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
