//! Everything in the Spectrum except the CPU.
//!
//! [`Machine`] owns the frame clock, memory, the event queue and the attached
//! collaborators. It is the CPU's [`Host`]: memory accesses through it are
//! timed (3 T-states plus contention) and interrupt acknowledge reaches the
//! recorder and peripherals through it.

use emu_core::{Bus, Scheduler};
use sinclair_ula::ContentionTable;
use zilog_z80::Host;

use crate::breakpoints::TimeBreakpoints;
use crate::config::{Capabilities, MachineInfo, Settings};
use crate::event::Event;
use crate::frame::{FrameHooks, NoHooks};
use crate::memory::Memory;
use crate::peripheral::{NmiPager, Peripheral};
use crate::recorder::{NoRecorder, Recorder};

/// T-states for one memory read or write cycle.
const MEMORY_CYCLE: u32 = 3;

/// SCLD bit that masks the ULA interrupt.
const SCLD_INTDISABLE: u8 = 0x40;

pub struct Machine {
    pub(crate) info: MachineInfo,
    pub(crate) settings: Settings,
    /// T-states since the start of the current frame.
    pub(crate) tstates: u32,
    pub(crate) memory: Memory,
    contention: ContentionTable,
    pub(crate) scheduler: Scheduler<Event>,
    pub(crate) breakpoints: TimeBreakpoints,
    pub(crate) recorder: Box<dyn Recorder>,
    pub(crate) hooks: Box<dyn FrameHooks>,
    pub(crate) peripherals: Vec<Box<dyn Peripheral>>,
    /// Last value written to the Timex SCLD control port.
    pub(crate) scld_dec: u8,
}

impl Machine {
    pub(crate) fn new(info: MachineInfo, settings: Settings, memory: Memory) -> Self {
        let contention = ContentionTable::new(info.contention, &info.timing);
        Self {
            info,
            settings,
            tstates: 0,
            memory,
            contention,
            scheduler: Scheduler::new(),
            breakpoints: TimeBreakpoints::new(),
            recorder: Box::new(NoRecorder),
            hooks: Box::new(NoHooks),
            peripherals: Vec::new(),
            scld_dec: 0,
        }
    }

    #[must_use]
    pub fn info(&self) -> &MachineInfo {
        &self.info
    }

    #[must_use]
    pub fn tstates(&self) -> u32 {
        self.tstates
    }

    /// Advance the frame clock without a bus access (internal CPU cycles).
    pub fn add_tstates(&mut self, tstates: u32) {
        self.tstates += tstates;
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<Event> {
        &self.scheduler
    }

    /// Contention delay for an access to contended memory at `time`.
    #[must_use]
    pub fn contend_delay(&self, time: u32) -> u8 {
        self.contention.delay(time)
    }

    /// Value read from a port no device answers, at the current T-state.
    #[must_use]
    pub fn unattached_port(&self) -> u8 {
        self.info
            .floating_bus
            .value(self.tstates, &self.info.timing, self.memory.screen())
    }

    /// Write an output port the session decodes: memory paging and the
    /// Timex SCLD. Untimed; the instruction loop charges I/O cycles.
    pub fn write_port(&mut self, port: u16, value: u8) {
        if self.memory.write_port(port, value) {
            log::trace!("paging port {port:#06X} <- {value:#04X}");
            return;
        }
        if self.info.has(Capabilities::TIMEX_SCLD) && port & 0x00FF == 0x00FF {
            self.scld_dec = value;
        }
    }

    /// Whether the SCLD currently masks the frame interrupt.
    #[must_use]
    pub fn scld_intdisable(&self) -> bool {
        self.info.has(Capabilities::TIMEX_SCLD) && self.scld_dec & SCLD_INTDISABLE != 0
    }

    fn contend(&mut self, addr: u16) {
        if self.memory.contended(addr) {
            self.tstates += u32::from(self.contention.delay(self.tstates));
        }
    }
}

impl Bus for Machine {
    fn read(&mut self, address: u16) -> u8 {
        self.contend(address);
        self.tstates += MEMORY_CYCLE;
        self.memory.read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.contend(address);
        self.tstates += MEMORY_CYCLE;
        self.memory.write(address, value);
    }
}

impl Host for Machine {
    fn tstates(&self) -> u32 {
        self.tstates
    }

    fn add_tstates(&mut self, tstates: u32) {
        self.tstates += tstates;
    }

    fn interrupt_length(&self) -> u32 {
        self.info.timing.interrupt_length()
    }

    fn interrupt_disabled_by_scld(&self) -> bool {
        self.scld_intdisable()
    }

    fn schedule_interrupt_retrigger(&mut self, at: u32) {
        self.scheduler.add(at, Event::InterruptRetrigger);
    }

    fn interrupt_accepted(&mut self) {
        self.recorder.decrement_instruction_offset();
    }

    fn nmi_intercepted(&mut self) -> bool {
        self.peripherals.iter_mut().any(|p| p.intercepts_nmi())
    }

    fn nmi_page_in(&mut self) {
        if self.info.has(Capabilities::SCORP_MEMORY) {
            let value = self.memory.last_byte2() | 0x02;
            self.memory.write_port(0x1FFD, value);
            log::debug!("NMI paged in Scorpion ROM 2");
            return;
        }

        let Some(pager) = self
            .peripherals
            .iter_mut()
            .filter(|p| p.nmi_pager().is_some())
            .min_by_key(|p| p.nmi_pager())
        else {
            return;
        };
        // A built-in TR-DOS interface outranks every add-on but the Beta.
        let built_in_trdos = self.info.has(Capabilities::TRDOS_DISK);
        if built_in_trdos && pager.nmi_pager() != Some(NmiPager::BetaDisk) {
            log::debug!("NMI left to built-in TR-DOS, {} not paged", pager.name());
            return;
        }
        let name = pager.name();
        if pager.page_on_nmi() {
            log::debug!("NMI paged in {name}");
        }
    }
}
