//! ZX Spectrum session: frame time-base, interrupt delivery and state.
//!
//! Covers the Sinclair, Amstrad, Timex, Pentagon and Scorpion families. A
//! [`Spectrum`] owns a Z80 and a [`Machine`]; the machine is the CPU's bus and
//! interrupt host, with ULA contention and the floating bus applied to every
//! access. Frame boundaries, deferred interrupts and NMIs run off a
//! frame-relative event queue.

mod breakpoints;
mod config;
mod error;
mod event;
mod frame;
mod machine;
mod memory;
mod peripheral;
mod recorder;
mod snapshot;
mod spectrum;

pub use breakpoints::{BreakpointId, TimeBreakpoints};
pub use config::{Capabilities, MachineInfo, Settings, SpectrumConfig, SpectrumModel};
pub use error::SpectrumError;
pub use event::Event;
pub use frame::{FrameFlow, FrameHooks, NoHooks};
pub use machine::Machine;
pub use memory::{Memory, PAGE_SIZE};
pub use peripheral::{NmiPager, Peripheral};
pub use recorder::{NoRecorder, Recorder};
pub use snapshot::Snapshot;
pub use spectrum::Spectrum;
