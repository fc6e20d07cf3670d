//! Z80 register set.

use crate::error::Z80Error;

/// Interrupt mode selected by `IM 0`, `IM 1` or `IM 2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterruptMode {
    /// Execute the byte on the data bus. The Spectrum leaves the bus pulled
    /// high, so this is always `RST 38`.
    #[default]
    Im0,
    /// `RST 38`.
    Im1,
    /// Vector through the table at `I * 256 + data bus`.
    Im2,
}

impl InterruptMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Im0 => "IM 0",
            Self::Im1 => "IM 1",
            Self::Im2 => "IM 2",
        }
    }
}

impl TryFrom<u8> for InterruptMode {
    type Error = Z80Error;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Im0),
            1 => Ok(Self::Im1),
            2 => Ok(Self::Im2),
            other => Err(Z80Error::InvalidInterruptMode(other)),
        }
    }
}

impl From<InterruptMode> for u8 {
    fn from(mode: InterruptMode) -> Self {
        match mode {
            InterruptMode::Im0 => 0,
            InterruptMode::Im1 => 1,
            InterruptMode::Im2 => 2,
        }
    }
}

/// Architectural Z80 registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    // Main registers
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    // Alternate registers
    pub a_alt: u8,
    pub f_alt: u8,
    pub b_alt: u8,
    pub c_alt: u8,
    pub d_alt: u8,
    pub e_alt: u8,
    pub h_alt: u8,
    pub l_alt: u8,

    // Index registers
    pub ix: u16,
    pub iy: u16,

    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    /// Refresh counter. Only the low 7 bits are meaningful; it is
    /// incremented as a whole byte once per M1 cycle.
    pub r: u8,
    /// Bit 7 of R as last written by `LD R,A`. The refresh logic never
    /// changes it.
    pub r7: u8,

    /// WZ/MEMPTR - internal temporary register.
    /// Affects undocumented X/Y flags in BIT instructions and some jumps.
    pub wz: u16,

    // Interrupt state
    pub iff1: bool,
    pub iff2: bool,
    pub im: InterruptMode,

    pub halted: bool,
}

impl Registers {
    /// Get AF register pair.
    #[must_use]
    pub const fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f])
    }

    /// Get BC register pair.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    /// Get DE register pair.
    #[must_use]
    pub const fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    /// Get HL register pair.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[must_use]
    pub const fn af_alt(&self) -> u16 {
        u16::from_be_bytes([self.a_alt, self.f_alt])
    }

    #[must_use]
    pub const fn bc_alt(&self) -> u16 {
        u16::from_be_bytes([self.b_alt, self.c_alt])
    }

    #[must_use]
    pub const fn de_alt(&self) -> u16 {
        u16::from_be_bytes([self.d_alt, self.e_alt])
    }

    #[must_use]
    pub const fn hl_alt(&self) -> u16 {
        u16::from_be_bytes([self.h_alt, self.l_alt])
    }

    pub fn set_af(&mut self, value: u16) {
        [self.a, self.f] = value.to_be_bytes();
    }

    pub fn set_bc(&mut self, value: u16) {
        [self.b, self.c] = value.to_be_bytes();
    }

    pub fn set_de(&mut self, value: u16) {
        [self.d, self.e] = value.to_be_bytes();
    }

    pub fn set_hl(&mut self, value: u16) {
        [self.h, self.l] = value.to_be_bytes();
    }

    pub fn set_af_alt(&mut self, value: u16) {
        [self.a_alt, self.f_alt] = value.to_be_bytes();
    }

    pub fn set_bc_alt(&mut self, value: u16) {
        [self.b_alt, self.c_alt] = value.to_be_bytes();
    }

    pub fn set_de_alt(&mut self, value: u16) {
        [self.d_alt, self.e_alt] = value.to_be_bytes();
    }

    pub fn set_hl_alt(&mut self, value: u16) {
        [self.h_alt, self.l_alt] = value.to_be_bytes();
    }

    /// R as software sees it: the stored bit 7 over the rotating low 7 bits.
    #[must_use]
    pub const fn r_value(&self) -> u8 {
        (self.r7 & 0x80) | (self.r & 0x7F)
    }

    /// Load R and its preserved bit 7 from one byte (`LD R,A`, snapshots).
    pub fn set_r_value(&mut self, value: u8) {
        self.r = value;
        self.r7 = value;
    }
}
