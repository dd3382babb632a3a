use crate::gb::header::MapperType;
use crate::gb::rtc::RealTimeClock;
use crate::mbc_log;
use crate::{ClockSource, GameError};

/// Per-cartridge mapper state plus its write decoder.
///
/// The decoder is an enum-and-match instead of the source's function-pointer
/// vtable: `write_decoder` is a single entry point that matches on `kind` and
/// mutates the shared fields below, rather than dispatching through an
/// indirect call per family.
#[derive(Debug, Clone)]
pub struct Mapper {
    kind: MapperType,
    /// Selected ROM bank (bank-1 window). Never 0 in practice; families
    /// apply their own zero-fixup on write.
    pub rom_bank: u32,
    /// MBC1-only: 2-bit latch normally feeding the upper ROM bank bits / the
    /// SRAM bank select, depending on the (stubbed) banking mode register.
    pub upper_bits: u8,
    pub sram_bank: u8,
    pub sram_access: bool,
    pub rtc_access: bool,
    pub rtc: RealTimeClock,
}

impl Mapper {
    pub fn new(kind: MapperType) -> Self {
        Mapper {
            kind,
            rom_bank: 1,
            upper_bits: 0,
            sram_bank: 0,
            sram_access: false,
            rtc_access: false,
            rtc: RealTimeClock::new(),
        }
    }

    pub fn kind(&self) -> MapperType {
        self.kind
    }

    /// Decode a write to cartridge space (`0x0000..0x8000`), dispatching by
    /// mapper family and `address >> 13` region.
    pub fn write(&mut self, address: u16, value: u8, clock: &mut dyn ClockSource) {
        let region = address >> 13;

        match self.kind {
            MapperType::None => {
                mbc_log!("ignored write {:#04x} to {:#06x} (no mapper)", value, address);
            }
            MapperType::Mbc1 => self.write_mbc1(region, value),
            MapperType::Mbc2 => {
                // Unimplemented in the source; documented as an open question.
                mbc_log!("MBC2 write {:#04x} to {:#06x} unimplemented", value, address);
            }
            MapperType::Mbc3 { .. } => self.write_mbc3(region, value, clock),
            MapperType::Mbc5 => self.write_mbc5(region, value),
            MapperType::Mbc6 => {
                mbc_log!("ignored write {:#04x} to {:#06x} (MBC6 stub)", value, address);
            }
            MapperType::Mbc7 => {
                mbc_log!("ignored write {:#04x} to {:#06x} (MBC7 stub)", value, address);
            }
        }
    }

    fn write_mbc1(&mut self, region: u16, value: u8) {
        match region {
            0 => self.sram_access = value == 0x0A,
            1 => {
                let bank = value & 0x1F;
                let bank = if bank == 0 { 1 } else { bank };
                self.rom_bank = (self.rom_bank & !0x1F) | bank as u32;
            }
            // Regions 2 (RAM bank / upper ROM bits) and 3 (banking mode) are
            // stubbed in the observed source.
            _ => {}
        }
    }

    fn write_mbc3(&mut self, region: u16, value: u8, clock: &mut dyn ClockSource) {
        match region {
            0 => {
                self.sram_access = value == 0x0A;
            }
            1 => {
                let bank = value & 0x7F;
                self.rom_bank = if bank == 0 { 1 } else { bank as u32 };
            }
            2 => {
                if value < 4 {
                    self.sram_bank = value;
                    self.rtc_access = false;
                } else if (0x08..=0x0C).contains(&value) {
                    self.rtc.active_register = value;
                    self.rtc_access = true;
                } else {
                    mbc_log!("invalid MBC3 region-2 write {:#04x}", value);
                }
            }
            3 => self.rtc.handle_latch_write(value, clock),
            _ => {}
        }
    }

    fn write_mbc5(&mut self, region: u16, value: u8) {
        match region {
            0 => self.sram_access = value == 0x0A,
            1 => {
                // Masked by 0x7F before the zero check, matching the source;
                // bit 8 of the bank number (address 0x3000..0x3FFF) is a
                // documented open question, not handled here.
                let bank = value & 0x7F;
                self.rom_bank = if bank == 0 { 1 } else { bank as u32 };
            }
            2 => {
                if value < 0x10 {
                    self.sram_bank = value;
                }
            }
            _ => {}
        }
    }

    /// Resolve `rom_bank` against the actual image size, reducing modulo the
    /// image size (and logging) if the requested bank would run off the end.
    pub fn resolve_rom_bank(&self, rom_len: usize) -> u32 {
        let bank_count = (rom_len / 0x4000).max(1) as u32;

        if self.rom_bank >= bank_count {
            log::warn!(
                "{}",
                GameError::BankOutOfRange {
                    requested: self.rom_bank,
                    available: bank_count
                }
            );
            self.rom_bank % bank_count
        } else {
            self.rom_bank
        }
    }
}
