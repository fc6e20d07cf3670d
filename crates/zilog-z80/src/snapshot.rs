//! Register-level state transfer.
//!
//! [`Z80Snapshot`] is the flat record snapshot formats and replay files are
//! built from. It carries every architectural register plus the two hidden
//! bits a snapshot needs to resume mid-stream: whether the last instruction
//! was `EI`, and whether it wrote F.

use crate::cpu::Z80;
use crate::error::Z80Error;
use crate::registers::InterruptMode;

/// Flat Z80 register state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Z80Snapshot {
    pub a: u8,
    pub f: u8,
    pub a_alt: u8,
    pub f_alt: u8,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub bc_alt: u16,
    pub de_alt: u16,
    pub hl_alt: u16,
    pub ix: u16,
    pub iy: u16,
    pub i: u8,
    /// R including the preserved bit 7.
    pub r: u8,
    pub sp: u16,
    pub pc: u16,
    pub memptr: u16,
    pub iff1: bool,
    pub iff2: bool,
    /// Interrupt mode, 0 to 2.
    pub im: u8,
    pub halted: bool,
    pub last_instruction_ei: bool,
    pub last_instruction_set_f: bool,
}

impl Z80 {
    /// Capture the CPU state. `tstates` is the machine's current T-state,
    /// used to tell whether the `EI` delay is still in effect.
    #[must_use]
    pub fn to_snapshot(&self, tstates: u32) -> Z80Snapshot {
        let regs = &self.regs;
        Z80Snapshot {
            a: regs.a,
            f: regs.f,
            a_alt: regs.a_alt,
            f_alt: regs.f_alt,
            bc: regs.bc(),
            de: regs.de(),
            hl: regs.hl(),
            bc_alt: regs.bc_alt(),
            de_alt: regs.de_alt(),
            hl_alt: regs.hl_alt(),
            ix: regs.ix,
            iy: regs.iy,
            i: regs.i,
            r: regs.r_value(),
            sp: regs.sp,
            pc: regs.pc,
            memptr: regs.wz,
            iff1: regs.iff1,
            iff2: regs.iff2,
            im: regs.im.into(),
            halted: regs.halted,
            last_instruction_ei: self.interrupts_enabled_at == Some(tstates),
            last_instruction_set_f: self.q != 0,
        }
    }

    /// Load the CPU state from `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`Z80Error::InvalidInterruptMode`] if the snapshot's
    /// interrupt mode is not 0, 1 or 2. The CPU is unchanged in that case.
    pub fn from_snapshot(&mut self, snapshot: &Z80Snapshot, tstates: u32) -> Result<(), Z80Error> {
        let im = InterruptMode::try_from(snapshot.im)?;

        let regs = &mut self.regs;
        regs.a = snapshot.a;
        regs.f = snapshot.f;
        regs.a_alt = snapshot.a_alt;
        regs.f_alt = snapshot.f_alt;
        regs.set_bc(snapshot.bc);
        regs.set_de(snapshot.de);
        regs.set_hl(snapshot.hl);
        regs.set_bc_alt(snapshot.bc_alt);
        regs.set_de_alt(snapshot.de_alt);
        regs.set_hl_alt(snapshot.hl_alt);
        regs.ix = snapshot.ix;
        regs.iy = snapshot.iy;
        regs.i = snapshot.i;
        regs.set_r_value(snapshot.r);
        regs.sp = snapshot.sp;
        regs.pc = snapshot.pc;
        regs.wz = snapshot.memptr;
        regs.iff1 = snapshot.iff1;
        regs.iff2 = snapshot.iff2;
        regs.im = im;
        regs.halted = snapshot.halted;

        self.interrupts_enabled_at = snapshot.last_instruction_ei.then_some(tstates);
        self.q = if snapshot.last_instruction_set_f {
            snapshot.f
        } else {
            0
        };
        self.iff2_read = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_interrupt_mode_leaves_cpu_untouched() {
        let mut cpu = Z80::default();
        cpu.regs.pc = 0x1234;
        let before = cpu.regs;

        let snapshot = Z80Snapshot {
            pc: 0x8000,
            im: 3,
            ..Z80Snapshot::default()
        };

        assert_eq!(
            cpu.from_snapshot(&snapshot, 0),
            Err(Z80Error::InvalidInterruptMode(3))
        );
        assert_eq!(cpu.regs, before);
    }

    #[test]
    fn ei_flag_tracks_current_tstate() {
        let mut cpu = Z80::default();
        cpu.enable_interrupts(500);
        assert!(cpu.to_snapshot(500).last_instruction_ei);
        assert!(!cpu.to_snapshot(504).last_instruction_ei);
    }

    #[test]
    fn q_restored_from_f_only_when_flagged() {
        let mut cpu = Z80::default();
        let mut snapshot = Z80Snapshot {
            f: 0x29,
            last_instruction_set_f: true,
            ..Z80Snapshot::default()
        };
        assert_eq!(cpu.from_snapshot(&snapshot, 0), Ok(()));
        assert_eq!(cpu.q(), 0x29);

        snapshot.last_instruction_set_f = false;
        assert_eq!(cpu.from_snapshot(&snapshot, 0), Ok(()));
        assert_eq!(cpu.q(), 0);
    }

    #[test]
    fn r_bit_7_survives_import() {
        let mut cpu = Z80::default();
        let snapshot = Z80Snapshot {
            r: 0x81,
            ..Z80Snapshot::default()
        };
        assert_eq!(cpu.from_snapshot(&snapshot, 0), Ok(()));
        cpu.inc_r();
        assert_eq!(cpu.regs.r_value(), 0x82);
        assert_eq!(cpu.to_snapshot(0).r, 0x82);
    }
}
