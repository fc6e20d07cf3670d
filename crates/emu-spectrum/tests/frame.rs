//! Frame time-base: frame end, rebasing, per-frame hooks and playback.

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::{Bus, Observable, Value};
use emu_spectrum::{
    Event, FrameFlow, FrameHooks, NoRecorder, Recorder, Settings, Spectrum, SpectrumConfig,
    SpectrumModel,
};
use proptest::prelude::*;
use zilog_z80::InterruptMode;

const FRAME_48K: u32 = 69_888;

type Log = Rc<RefCell<Vec<String>>>;

struct LoggingHooks {
    log: Log,
    abort_display: bool,
}

impl FrameHooks for LoggingHooks {
    fn sound_frame(&mut self) {
        self.log.borrow_mut().push("sound_frame".into());
    }

    fn psg_frame(&mut self) {
        self.log.borrow_mut().push("psg_frame".into());
    }

    fn display_frame(&mut self) -> FrameFlow {
        self.log.borrow_mut().push("display_frame".into());
        if self.abort_display {
            FrameFlow::Abort
        } else {
            FrameFlow::Continue
        }
    }

    fn profile_frame(&mut self, frame_length: u32) {
        self.log.borrow_mut().push(format!("profile_frame {frame_length}"));
    }

    fn printer_frame(&mut self) {
        self.log.borrow_mut().push("printer_frame".into());
    }

    fn loader_frame(&mut self, frame_length: u32) {
        self.log.borrow_mut().push(format!("loader_frame {frame_length}"));
    }

    fn typist_frame(&mut self) {
        self.log.borrow_mut().push("typist_frame".into());
    }
}

struct LoggingRecorder {
    log: Log,
    playback: bool,
}

impl Recorder for LoggingRecorder {
    fn playback_active(&self) -> bool {
        self.playback
    }

    fn record_frame(&mut self) {
        self.log.borrow_mut().push("record_frame".into());
    }

    fn decrement_instruction_offset(&mut self) {
        self.log.borrow_mut().push("decrement_instruction_offset".into());
    }
}

fn make_spectrum(settings: Settings) -> Spectrum {
    Spectrum::new(&SpectrumConfig {
        model: SpectrumModel::Spectrum48K,
        rom: vec![0; 0x4000],
        settings,
    })
    .expect("48K ROM is 16K")
}

/// A 48K with hooks and a recorder that write to a shared log.
fn make_logged(settings: Settings, playback: bool, abort_display: bool) -> (Spectrum, Log) {
    let log = Log::default();
    let mut spectrum = make_spectrum(settings);
    spectrum.set_hooks(Box::new(LoggingHooks {
        log: Rc::clone(&log),
        abort_display,
    }));
    spectrum.set_recorder(Box::new(LoggingRecorder {
        log: Rc::clone(&log),
        playback,
    }));
    (spectrum, log)
}

fn enable_im1(spectrum: &mut Spectrum) {
    let regs = &mut spectrum.cpu_mut().regs;
    regs.iff1 = true;
    regs.iff2 = true;
    regs.im = InterruptMode::Im1;
    regs.sp = 0x8000;
    regs.pc = 0x1234;
}

// ---------------------------------------------------------------------------
// Frame end
// ---------------------------------------------------------------------------

#[test]
fn frame_end_runs_hooks_in_order() {
    let settings = Settings {
        profiling: true,
        ..Settings::default()
    };
    let (mut spectrum, log) = make_logged(settings, false, false);

    spectrum.advance(FRAME_48K);

    assert_eq!(
        *log.borrow(),
        [
            "record_frame",
            "psg_frame",
            "sound_frame",
            "display_frame",
            "profile_frame 69888",
            "printer_frame",
            "loader_frame 69888",
            "typist_frame",
        ]
    );
    assert_eq!(spectrum.tstates(), 0);
    assert_eq!(spectrum.frames_since_reset(), 1);
    assert_eq!(spectrum.machine().scheduler().next_at(), Some(FRAME_48K));
}

#[test]
fn sound_hook_skipped_when_sound_disabled() {
    let settings = Settings {
        sound: false,
        ..Settings::default()
    };
    let (mut spectrum, log) = make_logged(settings, false, false);

    spectrum.advance(FRAME_48K);

    assert!(!log.borrow().iter().any(|entry| entry == "sound_frame"));
    assert!(!log.borrow().iter().any(|entry| entry.starts_with("profile")));
}

#[test]
fn display_failure_abandons_frame() {
    let (mut spectrum, log) = make_logged(Settings::default(), false, true);

    spectrum.advance(FRAME_48K);

    assert_eq!(
        *log.borrow(),
        ["record_frame", "psg_frame", "sound_frame", "display_frame"]
    );
    // Clock was rebased before the display ran, but nothing re-armed.
    assert_eq!(spectrum.tstates(), 0);
    assert!(spectrum.machine().scheduler().is_empty());
    assert_eq!(spectrum.frames_since_reset(), 0);
}

#[test]
fn end_frame_reports_display_failure() {
    let (mut spectrum, _log) = make_logged(Settings::default(), false, true);
    spectrum.advance(FRAME_48K - 1);
    assert_eq!(spectrum.end_frame(), FrameFlow::Abort);
}

#[test]
fn overshoot_carries_into_next_frame() {
    let mut spectrum = make_spectrum(Settings::default());
    spectrum.advance(FRAME_48K + 12);
    assert_eq!(spectrum.tstates(), 12);
    assert_eq!(spectrum.frames_since_reset(), 1);
}

#[test]
fn frame_counter_counts_completed_frames() {
    let mut spectrum = make_spectrum(Settings::default());
    for _ in 0..3 {
        spectrum.advance(FRAME_48K);
    }
    assert_eq!(spectrum.frames_since_reset(), 3);
    assert_eq!(spectrum.query("frames"), Some(Value::U64(3)));

    spectrum.reset(false);
    assert_eq!(spectrum.frames_since_reset(), 0);
}

// ---------------------------------------------------------------------------
// Frame interrupt
// ---------------------------------------------------------------------------

#[test]
fn frame_end_raises_im1_interrupt() {
    let (mut spectrum, log) = make_logged(Settings::default(), false, false);
    enable_im1(&mut spectrum);

    spectrum.advance(FRAME_48K);

    // Two stack writes at 3 T-states each plus 7 for the acknowledge.
    assert_eq!(spectrum.tstates(), 13);
    let cpu = spectrum.cpu();
    assert_eq!(cpu.pc(), 0x0038);
    assert_eq!(cpu.sp(), 0x7FFE);
    assert!(!cpu.regs.iff1);

    let memory = spectrum.machine().memory();
    assert_eq!(memory.read(0x7FFF), 0x12);
    assert_eq!(memory.read(0x7FFE), 0x34);

    assert_eq!(
        log.borrow().last().map(String::as_str),
        Some("decrement_instruction_offset")
    );
}

#[test]
fn interrupt_missed_after_pulse_ends() {
    let mut spectrum = make_spectrum(Settings::default());
    enable_im1(&mut spectrum);

    // The frame end runs late, once the 32 T-state pulse is over.
    spectrum.advance(FRAME_48K + 32);

    assert_eq!(spectrum.tstates(), 32);
    assert_eq!(spectrum.cpu().pc(), 0x1234);
    assert!(spectrum.cpu().regs.iff1);
}

// ---------------------------------------------------------------------------
// Rebasing
// ---------------------------------------------------------------------------

#[test]
fn pending_events_and_breakpoints_move_into_next_frame() {
    let mut spectrum = make_spectrum(Settings::default());
    spectrum.schedule_nmi(70_000);
    let bp = spectrum.add_time_breakpoint(70_100);

    spectrum.advance(FRAME_48K);

    let pending: Vec<(u32, Event)> = spectrum
        .machine()
        .scheduler()
        .iter()
        .map(|p| (p.at, p.event))
        .collect();
    assert_eq!(pending, [(112, Event::Nmi), (FRAME_48K, Event::FrameEnd)]);
    assert_eq!(spectrum.time_breakpoint(bp), Some(212));
    assert_eq!(spectrum.query("events.next"), Some(Value::U32(112)));

    // NMI: 5 T-states plus two stack writes.
    spectrum.advance(112);
    assert_eq!(spectrum.cpu().pc(), 0x0066);
    assert_eq!(spectrum.tstates(), 123);
    assert!(spectrum.take_breakpoint_hits().is_empty());

    spectrum.advance(100);
    assert_eq!(spectrum.take_breakpoint_hits(), [bp]);
    assert!(spectrum.take_breakpoint_hits().is_empty());
}

#[test]
fn removed_breakpoint_never_fires() {
    let mut spectrum = make_spectrum(Settings::default());
    let bp = spectrum.add_time_breakpoint(100);
    assert!(spectrum.remove_time_breakpoint(bp));
    spectrum.advance(200);
    assert!(spectrum.take_breakpoint_hits().is_empty());
}

#[test]
fn ei_stamp_follows_the_clock() {
    let mut spectrum = make_spectrum(Settings::default());
    spectrum.advance(FRAME_48K - 1);
    spectrum.enable_interrupts();
    assert_eq!(spectrum.cpu().interrupts_enabled_at(), Some(FRAME_48K - 1));

    spectrum.frame();
    // The stamp fell before the new frame began.
    assert_eq!(spectrum.cpu().interrupts_enabled_at(), None);
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

#[test]
fn playback_frame_length_is_the_clock() {
    let (mut spectrum, log) = make_logged(Settings::default(), true, false);
    assert!(spectrum.machine().scheduler().is_empty());

    spectrum.advance(50_000);
    assert_eq!(spectrum.frames_since_reset(), 0);

    assert_eq!(spectrum.end_frame(), FrameFlow::Continue);
    assert_eq!(spectrum.tstates(), 0);
    assert_eq!(spectrum.frames_since_reset(), 1);
    assert!(log.borrow().iter().any(|entry| entry == "loader_frame 50000"));
    // The recording, not the video timing, ends the next frame.
    assert!(spectrum.machine().scheduler().is_empty());
}

#[test]
fn playback_forces_pending_events() {
    let (mut spectrum, _log) = make_logged(Settings::default(), true, false);
    spectrum.schedule_nmi(60_000);
    spectrum.advance(50_000);

    spectrum.end_frame();

    assert_eq!(spectrum.cpu().pc(), 0x0066);
    assert!(spectrum.machine().scheduler().is_empty());
    // NMI took 11 T-states before the frame closed.
    assert_eq!(spectrum.tstates(), 0);
}

#[test]
fn playback_ignores_retriggered_interrupts() {
    let (mut spectrum, log) = make_logged(Settings::default(), true, false);
    enable_im1(&mut spectrum);
    spectrum.enable_interrupts();

    spectrum.advance(1);

    assert_eq!(spectrum.cpu().pc(), 0x1234);
    assert!(log.borrow().is_empty());
}

#[test]
fn leaving_playback_hands_frame_timing_back() {
    let (mut spectrum, _log) = make_logged(Settings::default(), true, false);
    spectrum.advance(1_000);
    spectrum.end_frame();
    assert!(spectrum.machine().scheduler().is_empty());

    spectrum.set_recorder(Box::new(NoRecorder));
    assert_eq!(spectrum.machine().scheduler().next_at(), Some(FRAME_48K));

    for _ in 0..3 {
        spectrum.advance(FRAME_48K);
    }
    assert_eq!(spectrum.frames_since_reset(), 4);
}

#[test]
fn swapping_recorders_keeps_one_frame_end() {
    let mut spectrum = make_spectrum(Settings::default());
    assert_eq!(spectrum.query("events.pending"), Some(Value::U32(1)));

    spectrum.set_recorder(Box::new(NoRecorder));
    spectrum.set_recorder(Box::new(NoRecorder));

    assert_eq!(spectrum.query("events.pending"), Some(Value::U32(1)));
    assert!(
        spectrum
            .machine()
            .scheduler()
            .iter()
            .all(|pending| pending.event == Event::FrameEnd)
    );
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_restarts_the_frame() {
    let mut spectrum = make_spectrum(Settings::default());
    spectrum.machine_mut().write(0x8000, 0x55);
    spectrum.schedule_nmi(1_000);
    spectrum.add_time_breakpoint(2_000);
    spectrum.advance(500);

    spectrum.reset(true);

    assert_eq!(spectrum.tstates(), 0);
    assert_eq!(spectrum.cpu().pc(), 0);
    assert_eq!(spectrum.query("events.pending"), Some(Value::U32(1)));
    assert_eq!(spectrum.machine().scheduler().next_at(), Some(FRAME_48K));
    assert_eq!(spectrum.machine().memory().read(0x8000), 0);
}

#[test]
fn soft_reset_keeps_ram() {
    let mut spectrum = make_spectrum(Settings::default());
    spectrum.machine_mut().memory_mut().write(0x8000, 0x55);
    spectrum.reset(false);
    assert_eq!(spectrum.machine().memory().read(0x8000), 0x55);
}

proptest! {
    #[test]
    fn every_time_breakpoint_fires_once(
        stamps in prop::collection::vec(0u32..2 * FRAME_48K, 1..16),
        steps in prop::collection::vec(1u32..5_000, 64),
    ) {
        let mut spectrum = make_spectrum(Settings::default());
        let mut ids: Vec<_> = stamps
            .iter()
            .map(|&at| spectrum.add_time_breakpoint(at))
            .collect();

        let mut hits = Vec::new();
        let mut elapsed = 0;
        for step in steps.iter().cycle() {
            if elapsed >= 2 * FRAME_48K {
                break;
            }
            spectrum.advance(*step);
            elapsed += step;
            hits.extend(spectrum.take_breakpoint_hits());
        }

        hits.sort();
        ids.sort();
        prop_assert_eq!(hits, ids);
        prop_assert_eq!(spectrum.frames_since_reset(), 2);
    }
}
