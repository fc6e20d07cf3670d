//! Register transfer round trips.

use proptest::prelude::*;
use zilog_z80::{InterruptMode, Variant, Z80, Z80Error, Z80Snapshot};

fn snapshot_strategy() -> impl Strategy<Value = Z80Snapshot> {
    (
        any::<[u8; 6]>(),
        any::<[u16; 11]>(),
        any::<[bool; 5]>(),
        0u8..=2,
    )
        .prop_map(|(bytes, words, flags, im)| Z80Snapshot {
            a: bytes[0],
            f: bytes[1],
            a_alt: bytes[2],
            f_alt: bytes[3],
            i: bytes[4],
            r: bytes[5],
            bc: words[0],
            de: words[1],
            hl: words[2],
            bc_alt: words[3],
            de_alt: words[4],
            hl_alt: words[5],
            ix: words[6],
            iy: words[7],
            sp: words[8],
            pc: words[9],
            memptr: words[10],
            iff1: flags[0],
            iff2: flags[1],
            halted: flags[2],
            last_instruction_ei: flags[3],
            last_instruction_set_f: flags[4],
            im,
        })
}

/// A CPU in a state only execution reaches: R counted on past the last load
/// of bit 7, Q left by the last instruction and maybe an `EI` just run.
fn live_cpu(snapshot: &Z80Snapshot, r_steps: u8, q: u8, ei_at: Option<u32>) -> Z80 {
    let mut cpu = Z80::new(Variant::Nmos);
    let regs = &mut cpu.regs;
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
    regs.r = regs.r.wrapping_add(r_steps);
    regs.sp = snapshot.sp;
    regs.pc = snapshot.pc;
    regs.wz = snapshot.memptr;
    regs.iff1 = snapshot.iff1;
    regs.iff2 = snapshot.iff2;
    regs.im = InterruptMode::try_from(snapshot.im).expect("strategy keeps IM in range");
    regs.halted = snapshot.halted;
    cpu.set_q(q);
    if let Some(now) = ei_at {
        cpu.enable_interrupts(now);
    }
    cpu
}

proptest! {
    #[test]
    fn import_then_export_is_identity(snapshot in snapshot_strategy(), tstates in 0u32..71_000) {
        let mut cpu = Z80::new(Variant::Nmos);
        prop_assert_eq!(cpu.from_snapshot(&snapshot, tstates), Ok(()));

        // Q is only recoverable from F, so a zero F reads back as "F untouched".
        let expected = Z80Snapshot {
            last_instruction_set_f: snapshot.last_instruction_set_f && snapshot.f != 0,
            ..snapshot
        };
        prop_assert_eq!(cpu.to_snapshot(tstates), expected);
    }

    #[test]
    fn export_then_import_keeps_live_state(
        snapshot in snapshot_strategy(),
        r_steps in any::<u8>(),
        q in any::<u8>(),
        q_is_f in any::<bool>(),
        ei in any::<bool>(),
        tstates in 0u32..71_000,
    ) {
        let q = if q_is_f { snapshot.f } else { q };
        let live = live_cpu(&snapshot, r_steps, q, ei.then_some(tstates));

        let mut restored = Z80::new(Variant::Nmos);
        prop_assert_eq!(restored.from_snapshot(&live.to_snapshot(tstates), tstates), Ok(()));

        // R and its bit 7 collapse into one byte; nothing else may move.
        let mut expected = live.regs;
        expected.set_r_value(live.regs.r_value());
        prop_assert_eq!(restored.regs, expected);
        prop_assert_eq!(restored.regs.r_value(), live.regs.r_value());
        prop_assert_eq!(restored.interrupts_enabled_at(), live.interrupts_enabled_at());

        // Q comes back as F whenever it was set at all.
        let expected_q = if live.q() == 0 { 0 } else { live.regs.f };
        prop_assert_eq!(restored.q(), expected_q);
        if q == 0 || q_is_f {
            prop_assert_eq!(restored.q(), live.q());
        }
    }

    #[test]
    fn serialized_snapshot_restores_same_cpu(snapshot in snapshot_strategy()) {
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let decoded: Z80Snapshot = serde_json::from_str(&json).expect("deserialize");

        let mut direct = Z80::default();
        let mut via_json = Z80::default();
        prop_assert_eq!(direct.from_snapshot(&snapshot, 7), Ok(()));
        prop_assert_eq!(via_json.from_snapshot(&decoded, 7), Ok(()));
        prop_assert_eq!(direct.regs, via_json.regs);
        prop_assert_eq!(direct.q(), via_json.q());
        prop_assert_eq!(direct.interrupts_enabled_at(), via_json.interrupts_enabled_at());
    }
}

#[test]
fn export_after_reset() {
    let mut cpu = Z80::default();
    cpu.reset(true);
    let snapshot = cpu.to_snapshot(0);

    assert_eq!(snapshot.a, 0xFF);
    assert_eq!(snapshot.f, 0xFF);
    assert_eq!(snapshot.sp, 0xFFFF);
    assert_eq!(snapshot.pc, 0);
    assert_eq!(snapshot.im, 0);
    assert!(!snapshot.iff1 && !snapshot.iff2);
    assert!(!snapshot.last_instruction_ei);
    assert!(!snapshot.last_instruction_set_f);
}

#[test]
fn imported_ei_delays_the_next_interrupt_check() {
    let mut cpu = Z80::default();
    let snapshot = Z80Snapshot {
        iff1: true,
        iff2: true,
        im: 1,
        last_instruction_ei: true,
        ..Z80Snapshot::default()
    };
    assert_eq!(cpu.from_snapshot(&snapshot, 4), Ok(()));
    assert_eq!(cpu.interrupts_enabled_at(), Some(4));
    assert_eq!(cpu.regs.im, InterruptMode::Im1);
}

#[test]
fn interrupt_mode_out_of_range_is_rejected() {
    let mut cpu = Z80::default();
    let snapshot = Z80Snapshot {
        im: 7,
        ..Z80Snapshot::default()
    };
    let error = cpu.from_snapshot(&snapshot, 0).expect_err("im 7");
    assert_eq!(error, Z80Error::InvalidInterruptMode(7));
    assert_eq!(error.to_string(), "unknown interrupt mode 7 (expected 0, 1 or 2)");
}
