//! Memory bus interface.

/// Byte-addressed memory bus.
///
/// The CPU reaches memory only through this trait. Implementations decide
/// what an access costs: a machine with contended RAM charges its own cycle
/// counter (including wait states) inside `read` and `write`, so callers
/// such as the interrupt acknowledge sequence never see timing directly.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}
