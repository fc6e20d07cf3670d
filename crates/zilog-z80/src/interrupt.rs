//! Maskable interrupt and NMI acknowledge.

use emu_core::Bus;

use crate::cpu::{Variant, Z80};
use crate::registers::InterruptMode;
use crate::tables::PF;

/// Restart address for IM 0 (with $FF on the bus) and IM 1.
pub const IM1_VECTOR: u16 = 0x0038;

/// Restart address for a non-maskable interrupt.
pub const NMI_VECTOR: u16 = 0x0066;

/// T-states taken by a maskable interrupt acknowledge before the two stack
/// writes.
const INTERRUPT_ACK_TSTATES: u32 = 7;

/// T-states taken by an NMI acknowledge before the two stack writes.
const NMI_ACK_TSTATES: u32 = 5;

/// The machine a Z80 sits in, as seen from interrupt acknowledge.
///
/// The bus methods charge their own T-states (including any contention) to
/// the host's cycle counter, so the CPU never touches the clock except
/// through [`Host::add_tstates`].
pub trait Host: Bus {
    /// T-states elapsed since the start of the current frame.
    fn tstates(&self) -> u32;

    fn add_tstates(&mut self, tstates: u32);

    /// How long the ULA holds /INT low at the start of each frame.
    fn interrupt_length(&self) -> u32;

    /// Whether the Timex SCLD has masked the ULA interrupt.
    fn interrupt_disabled_by_scld(&self) -> bool {
        false
    }

    /// An interrupt was refused because `EI` executed on this very T-state.
    /// The host should try again at `at`.
    fn schedule_interrupt_retrigger(&mut self, at: u32);

    /// Called once an interrupt is committed, before the acknowledge cycles.
    fn interrupt_accepted(&mut self) {}

    /// Whether a peripheral has swallowed the NMI.
    fn nmi_intercepted(&mut self) -> bool {
        false
    }

    /// Let the machine page in whatever ROM answers at $0066.
    fn nmi_page_in(&mut self) {}
}

impl Z80 {
    /// Try to accept a maskable interrupt.
    ///
    /// Returns `false` with no state change when interrupts are disabled, the
    /// /INT pulse has already ended or the SCLD masks it. Also returns
    /// `false` when `EI` executed on the current T-state; the host is then
    /// asked to retry one T-state later.
    pub fn interrupt<H: Host>(&mut self, host: &mut H) -> bool {
        let now = host.tstates();

        if !self.regs.iff1
            || now >= host.interrupt_length()
            || host.interrupt_disabled_by_scld()
        {
            return false;
        }

        // NMOS parts clear P/V if the interrupt lands straight after
        // LD A,I or LD A,R.
        if self.iff2_read && self.variant == Variant::Nmos {
            self.regs.f &= !PF;
        }

        if self.interrupts_enabled_at == Some(now) {
            log::debug!("interrupt at {now} deferred: EI on the same T-state");
            host.schedule_interrupt_retrigger(now + 1);
            return false;
        }

        self.leave_halt();
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        self.inc_r();
        host.interrupt_accepted();

        host.add_tstates(INTERRUPT_ACK_TSTATES);
        self.push_pc(host);

        self.regs.pc = match self.regs.im {
            InterruptMode::Im0 | InterruptMode::Im1 => IM1_VECTOR,
            InterruptMode::Im2 => {
                // The data bus floats at $FF. Reading the high byte only
                // carries within the low byte of the table address.
                let vector = u16::from_be_bytes([self.regs.i, 0xFF]);
                let low = host.read(vector);
                let high = host.read((vector & 0xFF00) | (vector.wrapping_add(1) & 0x00FF));
                u16::from_be_bytes([high, low])
            }
        };
        self.regs.wz = self.regs.pc;
        self.q = 0;

        log::trace!(
            "interrupt accepted at {now} ({}), vector ${:04X}",
            self.regs.im.name(),
            self.regs.pc
        );
        true
    }

    /// Take a non-maskable interrupt.
    ///
    /// Returns `false` if a peripheral intercepted it, in which case the CPU
    /// is left untouched.
    pub fn nmi<H: Host>(&mut self, host: &mut H) -> bool {
        if host.nmi_intercepted() {
            log::debug!("NMI at {} intercepted", host.tstates());
            return false;
        }

        self.leave_halt();
        // IFF2 keeps the pre-NMI state so RETN can restore it.
        self.regs.iff1 = false;
        self.inc_r();

        host.add_tstates(NMI_ACK_TSTATES);
        self.push_pc(host);

        host.nmi_page_in();

        self.q = 0;
        self.regs.pc = NMI_VECTOR;
        log::trace!("NMI accepted at {}", host.tstates());
        true
    }

    fn push_pc<B: Bus>(&mut self, bus: &mut B) {
        let [high, low] = self.regs.pc.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, high);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, low);
    }
}
