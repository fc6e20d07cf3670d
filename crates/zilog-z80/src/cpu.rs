//! Z80 processor state.

use emu_core::{Observable, Value};

use crate::registers::{InterruptMode, Registers};
use crate::tables::{CF, HF, NF, PF, SF, XF, YF, ZF};

/// Silicon variant. Only NMOS parts show the `LD A,I` / `LD A,R` parity bug
/// when an interrupt is accepted straight after the load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Nmos,
    Cmos,
}

/// Z80 CPU.
///
/// Holds the architectural registers plus the hidden state that decides
/// interrupt timing. The CPU owns no memory and no clock: the interrupt,
/// NMI and snapshot entry points are handed the machine's [`Host`] or its
/// current T-state.
///
/// [`Host`]: crate::Host
#[derive(Debug, Clone)]
pub struct Z80 {
    pub regs: Registers,
    pub(crate) variant: Variant,
    /// Flags written by the last instruction, or 0 if it left F alone.
    /// Drives the undocumented X/Y behaviour of SCF and CCF.
    pub(crate) q: u8,
    /// Set when the last instruction was `LD A,I` or `LD A,R`, which copy
    /// IFF2 into the P/V flag.
    pub(crate) iff2_read: bool,
    /// T-state at which `EI` last executed. An interrupt is never accepted
    /// at this exact T-state.
    pub(crate) interrupts_enabled_at: Option<u32>,
}

impl Z80 {
    /// Create a new Z80 in its hard-reset state.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            variant,
            q: 0,
            iff2_read: false,
            interrupts_enabled_at: None,
        };
        cpu.reset(true);
        cpu
    }

    /// Reset the CPU.
    ///
    /// Both kinds of reset load AF and AF' with $FFFF, SP with $FFFF, clear
    /// PC, I, R, the interrupt flip-flops and the interrupt mode, and leave
    /// HALT. Only a hard (power-on) reset also clears the general purpose
    /// and index registers and WZ.
    pub fn reset(&mut self, hard: bool) {
        let regs = &mut self.regs;
        regs.set_af(0xFFFF);
        regs.set_af_alt(0xFFFF);
        regs.i = 0;
        regs.r = 0;
        regs.r7 = 0;
        regs.pc = 0;
        regs.sp = 0xFFFF;
        regs.iff1 = false;
        regs.iff2 = false;
        regs.im = InterruptMode::Im0;
        regs.halted = false;
        self.iff2_read = false;
        self.q = 0;

        if hard {
            regs.set_bc(0);
            regs.set_de(0);
            regs.set_hl(0);
            regs.set_bc_alt(0);
            regs.set_de_alt(0);
            regs.set_hl_alt(0);
            regs.ix = 0;
            regs.iy = 0;
            regs.wz = 0;
        }

        self.interrupts_enabled_at = None;
        log::debug!("Z80 {} reset", if hard { "hard" } else { "soft" });
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Increment R (once per M1 cycle).
    pub fn inc_r(&mut self) {
        self.regs.r = self.regs.r.wrapping_add(1);
    }

    /// `EI` executed at T-state `now`.
    ///
    /// The caller should also schedule an interrupt check at `now + 1`, since
    /// an interrupt asserted during the EI cannot be accepted until after the
    /// following instruction.
    pub fn enable_interrupts(&mut self, now: u32) {
        self.regs.iff1 = true;
        self.regs.iff2 = true;
        self.interrupts_enabled_at = Some(now);
    }

    /// `DI`.
    pub fn disable_interrupts(&mut self) {
        self.regs.iff1 = false;
        self.regs.iff2 = false;
    }

    pub fn set_interrupt_mode(&mut self, mode: InterruptMode) {
        self.regs.im = mode;
    }

    /// T-state of the most recent `EI`, if it is still relevant.
    #[must_use]
    pub const fn interrupts_enabled_at(&self) -> Option<u32> {
        self.interrupts_enabled_at
    }

    /// Shift the recorded `EI` stamp with the frame counter.
    ///
    /// A stamp that would fall before the start of the new frame can no
    /// longer match any T-state, so it is dropped.
    pub fn rebase_interrupt_enable(&mut self, frame_length: u32) {
        self.interrupts_enabled_at = self
            .interrupts_enabled_at
            .and_then(|at| at.checked_sub(frame_length));
    }

    #[must_use]
    pub const fn q(&self) -> u8 {
        self.q
    }

    /// Record the flags written by the instruction just executed (0 if it
    /// did not write F).
    pub fn set_q(&mut self, flags: u8) {
        self.q = flags;
    }

    #[must_use]
    pub const fn iff2_read(&self) -> bool {
        self.iff2_read
    }

    /// Mark whether the instruction just executed copied IFF2 into P/V.
    pub fn set_iff2_read(&mut self, read: bool) {
        self.iff2_read = read;
    }

    /// Enter the HALT state. PC stays on the HALT opcode.
    pub fn halt(&mut self) {
        self.regs.halted = true;
    }

    /// Leave HALT, stepping PC past the HALT opcode.
    pub(crate) fn leave_halt(&mut self) {
        if self.regs.halted {
            self.regs.pc = self.regs.pc.wrapping_add(1);
            self.regs.halted = false;
        }
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.regs.pc
    }

    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.regs.sp
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.regs.halted
    }
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

/// All query paths supported by the Z80.
const Z80_QUERY_PATHS: &[&str] = &[
    // Main registers
    "a", "f", "b", "c", "d", "e", "h", "l",
    // Register pairs
    "af", "bc", "de", "hl",
    // Alternate pairs
    "af'", "bc'", "de'", "hl'",
    // Index registers
    "ix", "iy",
    // Other registers
    "sp", "pc", "i", "r", "memptr",
    // Flags (individual)
    "flags.s", "flags.z", "flags.y", "flags.h",
    "flags.x", "flags.p", "flags.n", "flags.c",
    // Interrupt state
    "iff1", "iff2", "im", "ei_at",
    // Hidden state
    "halted", "q", "iff2_read", "variant",
];

impl Observable for Z80 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.regs;
        match path {
            "a" => Some(regs.a.into()),
            "f" => Some(regs.f.into()),
            "b" => Some(regs.b.into()),
            "c" => Some(regs.c.into()),
            "d" => Some(regs.d.into()),
            "e" => Some(regs.e.into()),
            "h" => Some(regs.h.into()),
            "l" => Some(regs.l.into()),

            "af" => Some(regs.af().into()),
            "bc" => Some(regs.bc().into()),
            "de" => Some(regs.de().into()),
            "hl" => Some(regs.hl().into()),

            "af'" => Some(regs.af_alt().into()),
            "bc'" => Some(regs.bc_alt().into()),
            "de'" => Some(regs.de_alt().into()),
            "hl'" => Some(regs.hl_alt().into()),

            "ix" => Some(regs.ix.into()),
            "iy" => Some(regs.iy.into()),

            "sp" => Some(regs.sp.into()),
            "pc" => Some(regs.pc.into()),
            "i" => Some(regs.i.into()),
            "r" => Some(regs.r_value().into()),
            "memptr" => Some(regs.wz.into()),

            "flags.s" => Some((regs.f & SF != 0).into()),
            "flags.z" => Some((regs.f & ZF != 0).into()),
            "flags.y" => Some((regs.f & YF != 0).into()),
            "flags.h" => Some((regs.f & HF != 0).into()),
            "flags.x" => Some((regs.f & XF != 0).into()),
            "flags.p" => Some((regs.f & PF != 0).into()),
            "flags.n" => Some((regs.f & NF != 0).into()),
            "flags.c" => Some((regs.f & CF != 0).into()),

            "iff1" => Some(regs.iff1.into()),
            "iff2" => Some(regs.iff2.into()),
            "im" => Some(Value::Text(regs.im.name())),
            "ei_at" => self.interrupts_enabled_at.map(Value::U32),

            "halted" => Some(regs.halted.into()),
            "q" => Some(self.q.into()),
            "iff2_read" => Some(self.iff2_read.into()),
            "variant" => Some(Value::Text(match self.variant {
                Variant::Nmos => "NMOS",
                Variant::Cmos => "CMOS",
            })),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        Z80_QUERY_PATHS
    }
}
