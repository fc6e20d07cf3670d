//! Paged ROM and RAM.
//!
//! The 64K address space is four 16K slots. Which ROM or RAM page sits in
//! each slot is decided by the model's paging hardware and the last values
//! written to its paging ports:
//!
//! - 16K: ROM, RAM 5, nothing, nothing
//! - 48K, TC2048: ROM, RAM 5, RAM 2, RAM 0
//! - 128K, +2, Pentagon: ROM 0/1, RAM 5, RAM 2, RAM 0-7 via $7FFD
//! - +2A, +3: as 128K with ROM 0-3, plus four all-RAM layouts via $1FFD
//! - Scorpion: as 128K, with $1FFD selecting ROM 2, RAM 0 at $0000 and RAM
//!   8-15 at $C000
//!
//! Writing $7FFD with bit 5 set locks paging until reset.

use crate::config::{Capabilities, MachineInfo, SpectrumModel};
use crate::error::SpectrumError;

/// Bytes per ROM or RAM page.
pub const PAGE_SIZE: usize = 0x4000;

type Page = Box<[u8; PAGE_SIZE]>;

/// +2A/+3 all-RAM layouts, selected by $1FFD bits 1-2.
const PLUS3_SPECIAL: [[usize; 4]; 4] = [[0, 1, 2, 3], [4, 5, 6, 7], [4, 5, 6, 3], [4, 7, 6, 3]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Rom(usize),
    Ram(usize),
    /// Reads float high, writes are lost.
    Unmapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paging {
    Fixed16,
    Fixed48,
    Spectrum128,
    Plus3,
    Scorpion,
}

/// Spectrum memory.
pub struct Memory {
    rom: Vec<Page>,
    ram: Vec<Page>,
    paging: Paging,
    slots: [Slot; 4],
    /// Last value written to $7FFD.
    last_byte: u8,
    /// Last value written to $1FFD.
    last_byte2: u8,
    locked: bool,
    screen_page: usize,
}

impl Memory {
    /// Build memory for `info` from a ROM image.
    pub fn new(info: &MachineInfo, rom: &[u8]) -> Result<Self, SpectrumError> {
        let expected = info.rom_pages * PAGE_SIZE;
        if rom.len() != expected {
            return Err(SpectrumError::RomSize {
                model: info.model,
                expected,
                actual: rom.len(),
            });
        }

        let paging = if info.has(Capabilities::SCORP_MEMORY) {
            Paging::Scorpion
        } else if info.has(Capabilities::PLUS3_MEMORY) {
            Paging::Plus3
        } else if info.has(Capabilities::MEMORY_128) {
            Paging::Spectrum128
        } else if info.model == SpectrumModel::Spectrum16K {
            Paging::Fixed16
        } else {
            Paging::Fixed48
        };

        let rom = rom
            .chunks_exact(PAGE_SIZE)
            .map(|chunk| {
                let mut page = Box::new([0u8; PAGE_SIZE]);
                page.copy_from_slice(chunk);
                page
            })
            .collect();

        let mut memory = Self {
            rom,
            ram: (0..info.ram_pages)
                .map(|_| Box::new([0u8; PAGE_SIZE]))
                .collect(),
            paging,
            slots: [Slot::Unmapped; 4],
            last_byte: 0,
            last_byte2: 0,
            locked: false,
            screen_page: 5,
        };
        memory.remap();
        Ok(memory)
    }

    /// Read a byte. No timing.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        let offset = usize::from(addr) % PAGE_SIZE;
        match self.slots[usize::from(addr >> 14)] {
            Slot::Rom(page) => self.rom[page][offset],
            Slot::Ram(page) => self.ram[page][offset],
            Slot::Unmapped => 0xFF,
        }
    }

    /// Write a byte. ROM and unmapped writes are ignored.
    pub fn write(&mut self, addr: u16, value: u8) {
        if let Slot::Ram(page) = self.slots[usize::from(addr >> 14)] {
            self.ram[page][usize::from(addr) % PAGE_SIZE] = value;
        }
    }

    /// Is `addr` in a page the ULA contends?
    #[must_use]
    pub fn contended(&self, addr: u16) -> bool {
        match self.slots[usize::from(addr >> 14)] {
            Slot::Ram(page) => match self.paging {
                Paging::Plus3 => page >= 4,
                _ => page & 1 != 0,
            },
            Slot::Rom(_) | Slot::Unmapped => false,
        }
    }

    /// Handle a write to a paging port. Returns whether the port was decoded.
    pub fn write_port(&mut self, port: u16, value: u8) -> bool {
        match self.paging {
            Paging::Fixed16 | Paging::Fixed48 => false,
            Paging::Spectrum128 => {
                if port & 0x8002 != 0 {
                    return false;
                }
                self.write_7ffd(value);
                true
            }
            Paging::Plus3 | Paging::Scorpion => {
                if port & 0xC002 == 0x4000 {
                    self.write_7ffd(value);
                    true
                } else if port & 0xF002 == 0x1000 {
                    self.write_1ffd(value);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn write_7ffd(&mut self, value: u8) {
        if self.locked {
            return;
        }
        self.last_byte = value;
        self.locked = value & 0x20 != 0;
        self.remap();
    }

    fn write_1ffd(&mut self, value: u8) {
        if self.locked && self.paging == Paging::Plus3 {
            return;
        }
        self.last_byte2 = value;
        self.remap();
    }

    fn remap(&mut self) {
        let lb = self.last_byte;
        let lb2 = self.last_byte2;
        let rom_128 = usize::from((lb >> 4) & 1);
        let high_page = usize::from(lb & 0x07);

        self.slots = match self.paging {
            Paging::Fixed16 => [Slot::Rom(0), Slot::Ram(5), Slot::Unmapped, Slot::Unmapped],
            Paging::Fixed48 => [Slot::Rom(0), Slot::Ram(5), Slot::Ram(2), Slot::Ram(0)],
            Paging::Spectrum128 => [
                Slot::Rom(rom_128),
                Slot::Ram(5),
                Slot::Ram(2),
                Slot::Ram(high_page),
            ],
            Paging::Plus3 if lb2 & 0x01 != 0 => {
                PLUS3_SPECIAL[usize::from((lb2 >> 1) & 0x03)].map(Slot::Ram)
            }
            Paging::Plus3 => {
                let rom = rom_128 | usize::from((lb2 >> 1) & 0x02);
                [Slot::Rom(rom), Slot::Ram(5), Slot::Ram(2), Slot::Ram(high_page)]
            }
            Paging::Scorpion => {
                let low = if lb2 & 0x01 != 0 {
                    Slot::Ram(0)
                } else if lb2 & 0x02 != 0 {
                    Slot::Rom(2)
                } else {
                    Slot::Rom(rom_128)
                };
                let high = high_page | usize::from((lb2 & 0x10) >> 1);
                [low, Slot::Ram(5), Slot::Ram(2), Slot::Ram(high)]
            }
        };

        let fixed = matches!(self.paging, Paging::Fixed16 | Paging::Fixed48);
        self.screen_page = if fixed || lb & 0x08 == 0 { 5 } else { 7 };
    }

    /// Last value written to $7FFD.
    #[must_use]
    pub fn last_byte(&self) -> u8 {
        self.last_byte
    }

    /// Last value written to $1FFD.
    #[must_use]
    pub fn last_byte2(&self) -> u8 {
        self.last_byte2
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// RAM page the ULA displays.
    #[must_use]
    pub fn screen_page(&self) -> usize {
        self.screen_page
    }

    /// Contents of the displayed screen page.
    #[must_use]
    pub fn screen(&self) -> &[u8] {
        &self.ram[self.screen_page][..]
    }

    #[must_use]
    pub fn ram_page_count(&self) -> usize {
        self.ram.len()
    }

    #[must_use]
    pub fn ram_page(&self, page: usize) -> &[u8] {
        &self.ram[page][..]
    }

    /// Copy every RAM page out, in page order.
    #[must_use]
    pub fn dump_ram(&self) -> Vec<Vec<u8>> {
        self.ram.iter().map(|page| page.to_vec()).collect()
    }

    /// Replace RAM and paging state. Pages must already be validated.
    pub(crate) fn load(&mut self, ram: &[Vec<u8>], last_byte: u8, last_byte2: u8) {
        for (page, data) in self.ram.iter_mut().zip(ram) {
            page.copy_from_slice(data);
        }
        self.last_byte = last_byte;
        self.last_byte2 = last_byte2;
        self.locked = last_byte & 0x20 != 0;
        self.remap();
    }

    /// Clear the paging latches. A hard reset also clears RAM.
    pub fn reset(&mut self, hard: bool) {
        self.last_byte = 0;
        self.last_byte2 = 0;
        self.locked = false;
        if hard {
            for page in &mut self.ram {
                page.fill(0);
            }
        }
        self.remap();
    }
}
