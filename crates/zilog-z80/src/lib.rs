//! Zilog Z80 interrupt core.
//!
//! This crate owns the processor state and everything about it that is
//! sensitive to *when* things happen: maskable interrupt acceptance (with the
//! EI delay and the NMOS `LD A,I` quirk), NMI, reset, and transfer of the
//! complete register set to and from a snapshot record. The opcode loop that
//! drives it lives with the machine; it reaches memory and the clock through
//! [`Host`].

mod cpu;
mod error;
mod interrupt;
mod registers;
mod snapshot;
pub mod tables;

pub use cpu::{Variant, Z80};
pub use error::Z80Error;
pub use interrupt::{Host, IM1_VECTOR, NMI_VECTOR};
pub use registers::{InterruptMode, Registers};
pub use snapshot::Z80Snapshot;
pub use tables::{CF, HF, NF, PF, SF, XF, YF, ZF};
