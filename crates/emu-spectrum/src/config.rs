//! Spectrum model configuration.
//!
//! Each [`SpectrumModel`] maps to an immutable [`MachineInfo`] describing its
//! timing, paging hardware and ULA behaviour. The session reads everything
//! model-specific from there.

use bitflags::bitflags;
use sinclair_ula::{ContentionModel, FloatingBus, Geometry, VideoTiming};
use zilog_z80::Variant;

/// Supported Spectrum models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumModel {
    // Sinclair
    Spectrum16K,
    Spectrum48K,
    Spectrum128K,
    SpectrumPlus2,
    // Amstrad gate array
    SpectrumPlus2A,
    SpectrumPlus3,
    // Timex
    TimexTC2048,
    // Russian/Eastern European
    Pentagon128,
    ScorpionZS256,
}

impl SpectrumModel {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spectrum16K => "Spectrum 16K",
            Self::Spectrum48K => "Spectrum 48K",
            Self::Spectrum128K => "Spectrum 128K",
            Self::SpectrumPlus2 => "Spectrum +2",
            Self::SpectrumPlus2A => "Spectrum +2A",
            Self::SpectrumPlus3 => "Spectrum +3",
            Self::TimexTC2048 => "Timex TC2048",
            Self::Pentagon128 => "Pentagon 128K",
            Self::ScorpionZS256 => "Scorpion ZS 256",
        }
    }
}

bitflags! {
    /// Hardware present on a model beyond the 48K baseline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// $7FFD paging.
        const MEMORY_128 = 1 << 0;
        /// $1FFD paging with all-RAM configurations.
        const PLUS3_MEMORY = 1 << 1;
        /// Scorpion $1FFD paging; NMI pages in ROM 2.
        const SCORP_MEMORY = 1 << 2;
        /// Timex SCLD, including the interrupt disable bit.
        const TIMEX_SCLD = 1 << 3;
        /// Built-in TR-DOS interface, which takes NMI paging.
        const TRDOS_DISK = 1 << 4;
    }
}

/// Per-model constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    pub model: SpectrumModel,
    pub timing: VideoTiming,
    pub capabilities: Capabilities,
    pub contention: ContentionModel,
    pub floating_bus: FloatingBus,
    pub variant: Variant,
    /// 16K ROM pages the ROM image must supply.
    pub rom_pages: usize,
    /// 16K RAM pages fitted.
    pub ram_pages: usize,
}

impl MachineInfo {
    #[must_use]
    pub fn for_model(model: SpectrumModel) -> Self {
        use SpectrumModel as M;

        let geometry = match model {
            M::Spectrum16K | M::Spectrum48K | M::TimexTC2048 | M::ScorpionZS256 => {
                Geometry::SINCLAIR_48K
            }
            M::Spectrum128K | M::SpectrumPlus2 => Geometry::SINCLAIR_128K,
            M::SpectrumPlus2A | M::SpectrumPlus3 => Geometry::AMSTRAD_PLUS3,
            M::Pentagon128 => Geometry::PENTAGON,
        };

        let capabilities = match model {
            M::Spectrum16K | M::Spectrum48K => Capabilities::empty(),
            M::Spectrum128K | M::SpectrumPlus2 => Capabilities::MEMORY_128,
            M::SpectrumPlus2A | M::SpectrumPlus3 => {
                Capabilities::MEMORY_128 | Capabilities::PLUS3_MEMORY
            }
            M::TimexTC2048 => Capabilities::TIMEX_SCLD,
            M::Pentagon128 => Capabilities::MEMORY_128 | Capabilities::TRDOS_DISK,
            M::ScorpionZS256 => {
                Capabilities::MEMORY_128 | Capabilities::SCORP_MEMORY | Capabilities::TRDOS_DISK
            }
        };

        let contention = match model {
            M::Spectrum16K
            | M::Spectrum48K
            | M::Spectrum128K
            | M::SpectrumPlus2
            | M::TimexTC2048 => ContentionModel::Ula65432100,
            M::SpectrumPlus2A | M::SpectrumPlus3 => ContentionModel::Ula76543210,
            M::Pentagon128 | M::ScorpionZS256 => ContentionModel::None,
        };

        let floating_bus = match model {
            M::Spectrum16K | M::Spectrum48K | M::Spectrum128K | M::SpectrumPlus2 => {
                FloatingBus::Ula
            }
            _ => FloatingBus::None,
        };

        let rom_pages = match model {
            M::Spectrum16K | M::Spectrum48K | M::TimexTC2048 => 1,
            M::Spectrum128K | M::SpectrumPlus2 | M::Pentagon128 => 2,
            M::SpectrumPlus2A | M::SpectrumPlus3 | M::ScorpionZS256 => 4,
        };

        Self {
            model,
            timing: VideoTiming::new(geometry),
            capabilities,
            contention,
            floating_bus,
            variant: Variant::Nmos,
            rom_pages,
            ram_pages: if model == M::ScorpionZS256 { 16 } else { 8 },
        }
    }

    #[must_use]
    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Per-frame services the session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Call the sound hook at each frame end.
    pub sound: bool,
    /// Call the profiler hook at each frame end.
    pub profiling: bool,
    /// Fit a CMOS Z80 (no `LD A,I` parity bug).
    pub cmos_z80: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            profiling: false,
            cmos_z80: false,
        }
    }
}

/// Configuration for creating a Spectrum instance.
pub struct SpectrumConfig {
    pub model: SpectrumModel,
    /// ROM image, all pages concatenated. 16K per page in
    /// [`MachineInfo::rom_pages`].
    pub rom: Vec<u8>,
    pub settings: Settings,
}
