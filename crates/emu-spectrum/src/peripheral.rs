//! Expansion hardware that takes part in NMI handling and reset.

/// Interfaces that page their own ROM in on an NMI, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NmiPager {
    /// Beta 128 TR-DOS interface.
    BetaDisk,
    Spectranet,
}

/// An attached peripheral.
///
/// All methods default to doing nothing, so a peripheral only implements
/// the hooks it cares about.
pub trait Peripheral {
    fn name(&self) -> &'static str;

    /// Slot this peripheral fills in NMI paging. Only the attached pager
    /// with the highest priority is asked to page in, whatever the attach
    /// order.
    fn nmi_pager(&self) -> Option<NmiPager> {
        None
    }

    /// Swallow an NMI before the CPU sees it. A Spectranet with its NMI
    /// flip-flop set does this.
    fn intercepts_nmi(&mut self) -> bool {
        false
    }

    /// Page in this peripheral's ROM after an NMI has been taken. Returns
    /// true if it did.
    fn page_on_nmi(&mut self) -> bool {
        false
    }

    /// The CPU executed `RETN`.
    fn retn(&mut self) {}

    fn reset(&mut self, _hard: bool) {}
}
