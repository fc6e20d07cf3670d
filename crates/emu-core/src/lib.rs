//! Core traits and types for cycle-accurate emulation.
//!
//! Time is counted in CPU T-states relative to the start of the current
//! video frame. Anything that fires later is a [`Scheduler`] entry, and every
//! component exposes its state through [`Observable`].

mod bus;
mod observable;
mod scheduler;

pub use bus::Bus;
pub use observable::{Observable, Value};
pub use scheduler::{Scheduled, Scheduler};
