//! Top-level Spectrum session.
//!
//! # Frame loop
//!
//! Time is counted in T-states from the start of the current video frame.
//! An `Event::FrameEnd` sits on the scheduler at the frame length. When the
//! instruction loop reaches it, [`Spectrum::end_frame`] shifts the clock,
//! every pending event and every time breakpoint back by one frame, runs the
//! per-frame hooks, re-arms itself and raises /INT.
//!
//! The instruction loop itself lives outside the session. It executes
//! instructions against [`Spectrum::parts_mut`] and calls
//! [`Spectrum::run_events`] after each one.

use emu_core::{Observable, Value};
use zilog_z80::{Variant, Z80};

use crate::breakpoints::BreakpointId;
use crate::config::{MachineInfo, SpectrumConfig};
use crate::error::SpectrumError;
use crate::event::Event;
use crate::frame::{FrameFlow, FrameHooks};
use crate::machine::Machine;
use crate::memory::{Memory, PAGE_SIZE};
use crate::peripheral::Peripheral;
use crate::recorder::Recorder;
use crate::snapshot::Snapshot;

/// ZX Spectrum session.
pub struct Spectrum {
    cpu: Z80,
    machine: Machine,
    frames_since_reset: u32,
    breakpoint_hits: Vec<BreakpointId>,
}

impl Spectrum {
    /// Create a powered-on Spectrum from the given configuration.
    pub fn new(config: &SpectrumConfig) -> Result<Self, SpectrumError> {
        let mut info = MachineInfo::for_model(config.model);
        if config.settings.cmos_z80 {
            info.variant = Variant::Cmos;
        }

        let memory = Memory::new(&info, &config.rom)?;
        let cpu = Z80::new(info.variant);
        let mut spectrum = Self {
            cpu,
            machine: Machine::new(info, config.settings, memory),
            frames_since_reset: 0,
            breakpoint_hits: Vec::new(),
        };
        spectrum.reset(true);
        log::debug!("{} created", config.model.name());
        Ok(spectrum)
    }

    /// Install a recorder. A recorder already playing back takes over frame
    /// timing, so the pending frame end is dropped; any other recorder hands
    /// frame timing back to the video, re-arming the frame end if needed.
    pub fn set_recorder(&mut self, recorder: Box<dyn Recorder>) {
        let playback = recorder.playback_active();
        self.machine.recorder = recorder;
        if playback {
            self.machine
                .scheduler
                .retain(|pending| pending.event != Event::FrameEnd);
        } else if !self
            .machine
            .scheduler
            .iter()
            .any(|pending| pending.event == Event::FrameEnd)
        {
            self.arm_frame_end();
        }
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn FrameHooks>) {
        self.machine.hooks = hooks;
    }

    /// Attach a peripheral. Peripherals are asked about NMIs in the order
    /// they were attached.
    pub fn attach(&mut self, peripheral: Box<dyn Peripheral>) {
        log::debug!("attached {}", peripheral.name());
        self.machine.peripherals.push(peripheral);
    }

    #[must_use]
    pub fn cpu(&self) -> &Z80 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Z80 {
        &mut self.cpu
    }

    #[must_use]
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// The CPU and the rest of the machine, borrowed separately so the CPU
    /// can run against the machine as its bus.
    pub fn parts_mut(&mut self) -> (&mut Z80, &mut Machine) {
        (&mut self.cpu, &mut self.machine)
    }

    #[must_use]
    pub fn tstates(&self) -> u32 {
        self.machine.tstates
    }

    #[must_use]
    pub fn frames_since_reset(&self) -> u32 {
        self.frames_since_reset
    }

    /// Rebase the clock and run the per-frame hooks.
    ///
    /// During playback the frame is as long as the recording says, which is
    /// however far the clock has got; otherwise it is the model's frame
    /// length. Returns [`FrameFlow::Abort`] if the display hook failed, in
    /// which case the later hooks are skipped and the next frame end is not
    /// scheduled.
    pub fn frame(&mut self) -> FrameFlow {
        let machine = &mut self.machine;
        let playback = machine.recorder.playback_active();
        let tstates_per_frame = machine.info.timing.tstates_per_frame();
        let frame_length = if playback {
            machine.tstates
        } else {
            tstates_per_frame
        };

        machine.scheduler.rebase(frame_length);
        machine.breakpoints.rebase(frame_length);
        machine.tstates = machine.tstates.saturating_sub(frame_length);
        self.cpu.rebase_interrupt_enable(frame_length);

        if machine.settings.sound {
            machine.hooks.sound_frame();
        }

        if machine.hooks.display_frame() == FrameFlow::Abort {
            log::warn!("display failed, abandoning frame {}", self.frames_since_reset);
            return FrameFlow::Abort;
        }
        if machine.settings.profiling {
            machine.hooks.profile_frame(frame_length);
        }
        machine.hooks.printer_frame();

        // Interrupts come from the recording during playback.
        if !playback {
            machine.scheduler.add(tstates_per_frame, Event::FrameEnd);
        }

        machine.hooks.loader_frame(frame_length);
        machine.hooks.typist_frame();

        self.frames_since_reset = self.frames_since_reset.wrapping_add(1);
        log::trace!(
            "frame {} done, length {frame_length}",
            self.frames_since_reset
        );
        FrameFlow::Continue
    }

    /// End-of-frame event: close the frame and raise the frame interrupt.
    ///
    /// A recorder in playback calls this directly at the end of each
    /// recorded frame.
    pub fn end_frame(&mut self) -> FrameFlow {
        if self.machine.recorder.playback_active() {
            // The recording decides where frames end, so a stale frame end
            // is dropped rather than run recursively.
            for pending in self.machine.scheduler.drain_all() {
                if pending.event != Event::FrameEnd {
                    self.dispatch(pending.event);
                }
            }
        }

        self.machine.recorder.record_frame();
        self.machine.hooks.psg_frame();
        let flow = self.frame();
        self.cpu.interrupt(&mut self.machine);
        flow
    }

    /// Dispatch every event due at the current T-state, then collect time
    /// breakpoints that have been reached.
    pub fn run_events(&mut self) {
        while let Some(due) = self.machine.scheduler.pop_due(self.machine.tstates) {
            self.dispatch(due.event);
        }

        let hits = self.machine.breakpoints.take_hits(self.machine.tstates);
        for id in &hits {
            log::debug!("time breakpoint {id:?} hit at {}", self.machine.tstates);
        }
        self.breakpoint_hits.extend(hits);
    }

    /// Let `tstates` pass with the CPU idle, then run due events.
    pub fn advance(&mut self, tstates: u32) {
        self.machine.tstates += tstates;
        self.run_events();
    }

    fn dispatch(&mut self, event: Event) {
        log::trace!("{} at {}", event.name(), self.machine.tstates);
        match event {
            Event::FrameEnd => {
                self.end_frame();
            }
            Event::InterruptRetrigger => self.retrigger_interrupt(),
            Event::Nmi => {
                self.cpu.nmi(&mut self.machine);
            }
            Event::Iff2Update => {}
        }
    }

    fn retrigger_interrupt(&mut self) {
        // All interrupts come from the recording during playback.
        if self.machine.recorder.playback_active() {
            return;
        }
        if self.cpu.interrupt(&mut self.machine) {
            self.machine.recorder.record_frame();
        }
    }

    /// `EI`: enable interrupts and check for one straight after the next
    /// instruction.
    pub fn enable_interrupts(&mut self) {
        let now = self.machine.tstates;
        self.cpu.enable_interrupts(now);
        self.machine.scheduler.add(now + 1, Event::InterruptRetrigger);
    }

    /// `LD A,I` or `LD A,R` just copied IFF2 into P/V.
    pub fn note_iff2_read(&mut self) {
        self.cpu.set_iff2_read(true);
        if self.cpu.variant() == Variant::Nmos {
            let now = self.machine.tstates;
            self.machine.scheduler.add(now, Event::Iff2Update);
        }
    }

    /// Take an NMI now. Returns false if a peripheral intercepted it.
    pub fn trigger_nmi(&mut self) -> bool {
        self.cpu.nmi(&mut self.machine)
    }

    /// Schedule an NMI at frame T-state `at`.
    pub fn schedule_nmi(&mut self, at: u32) {
        self.machine.scheduler.add(at, Event::Nmi);
    }

    /// `RETN` executed. Only peripherals care.
    pub fn retn(&mut self) {
        for peripheral in &mut self.machine.peripherals {
            peripheral.retn();
        }
    }

    /// Reset the CPU, paging and every peripheral, and start a new frame.
    pub fn reset(&mut self, hard: bool) {
        self.cpu.reset(hard);
        self.machine.memory.reset(hard);
        self.machine.scld_dec = 0;
        for peripheral in &mut self.machine.peripherals {
            peripheral.reset(hard);
        }

        self.machine.scheduler.clear();
        self.machine.breakpoints.clear();
        self.breakpoint_hits.clear();
        self.machine.tstates = 0;
        self.frames_since_reset = 0;

        self.arm_frame_end();
        log::debug!("{} reset", if hard { "hard" } else { "soft" });
    }

    fn arm_frame_end(&mut self) {
        if !self.machine.recorder.playback_active() {
            let frame_length = self.machine.info.timing.tstates_per_frame();
            self.machine.scheduler.add(frame_length, Event::FrameEnd);
        }
    }

    /// Break when the frame clock reaches `at`.
    pub fn add_time_breakpoint(&mut self, at: u32) -> BreakpointId {
        self.machine.breakpoints.add(at)
    }

    pub fn remove_time_breakpoint(&mut self, id: BreakpointId) -> bool {
        self.machine.breakpoints.remove(id)
    }

    /// Time breakpoints reached since the last call.
    pub fn take_breakpoint_hits(&mut self) -> Vec<BreakpointId> {
        std::mem::take(&mut self.breakpoint_hits)
    }

    /// Pending time breakpoint stamp, after any rebasing.
    #[must_use]
    pub fn time_breakpoint(&self, id: BreakpointId) -> Option<u32> {
        self.machine.breakpoints.at(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let tstates = self.machine.tstates;
        Snapshot {
            model: self.machine.info.model,
            cpu: self.cpu.to_snapshot(tstates),
            tstates,
            last_byte: self.machine.memory.last_byte(),
            last_byte2: self.machine.memory.last_byte2(),
            scld_dec: self.machine.scld_dec,
            ram: self.machine.memory.dump_ram(),
        }
    }

    /// Load a snapshot taken on the same model.
    ///
    /// Nothing is changed if the snapshot is rejected.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SpectrumError> {
        if let Err(err) = self.check_snapshot(snapshot) {
            log::error!("snapshot rejected: {err}");
            return Err(err);
        }
        if let Err(err) = self.cpu.from_snapshot(&snapshot.cpu, snapshot.tstates) {
            log::error!("snapshot rejected: {err}");
            return Err(err.into());
        }

        self.machine
            .memory
            .load(&snapshot.ram, snapshot.last_byte, snapshot.last_byte2);
        self.machine.scld_dec = snapshot.scld_dec;
        self.machine.tstates = snapshot.tstates;

        self.machine.scheduler.clear();
        self.arm_frame_end();
        log::debug!("snapshot restored at T-state {}", snapshot.tstates);
        Ok(())
    }

    fn check_snapshot(&self, snapshot: &Snapshot) -> Result<(), SpectrumError> {
        let model = self.machine.info.model;
        if snapshot.model != model {
            return Err(SpectrumError::ModelMismatch {
                expected: model,
                actual: snapshot.model,
            });
        }

        let expected = self.machine.memory.ram_page_count();
        if snapshot.ram.len() != expected {
            return Err(SpectrumError::RamPageCount {
                expected,
                actual: snapshot.ram.len(),
            });
        }
        if let Some((page, data)) = snapshot
            .ram
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != PAGE_SIZE)
        {
            return Err(SpectrumError::RamPageSize {
                page,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

impl Observable for Spectrum {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            return self.cpu.query(rest);
        }
        if let Some(rest) = path.strip_prefix("memory.") {
            let memory = &self.machine.memory;
            return match rest {
                "last_byte" => Some(memory.last_byte().into()),
                "last_byte2" => Some(memory.last_byte2().into()),
                "screen_page" => Some((memory.screen_page() as u8).into()),
                address => parse_address(address).map(|addr| Value::U8(memory.read(addr))),
            };
        }

        match path {
            "model" => Some(Value::Text(self.machine.info.model.name())),
            "frames" => Some(u64::from(self.frames_since_reset).into()),
            "tstates" => Some(self.machine.tstates.into()),
            "frame_length" => Some(self.machine.info.timing.tstates_per_frame().into()),
            "processor_speed" => Some(self.machine.info.timing.processor_speed().into()),
            "events.pending" => Some((self.machine.scheduler.len() as u32).into()),
            "events.next" => self.machine.scheduler.next_at().map(Value::U32),
            "scld.intdisable" => Some(self.machine.scld_intdisable().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<z80_paths>",
            "memory.<address>",
            "memory.last_byte",
            "memory.last_byte2",
            "memory.screen_page",
            "model",
            "frames",
            "tstates",
            "frame_length",
            "processor_speed",
            "events.pending",
            "events.next",
            "scld.intdisable",
        ]
    }
}

/// `0x8000`, `$8000` or decimal.
fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
    {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
