//! Cartridge header parsing, restricted to the single byte this spec cares
//! about. A full header also carries title/logo/checksum bytes, but nothing
//! here consumes them.

pub const HEADER_START: usize = 0x0100;
pub const HEADER_LEN: usize = 16;
pub const MAPPER_TYPE_OFFSET: usize = 0x47;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperType {
    None,
    Mbc1,
    Mbc2,
    Mbc3 { has_rtc: bool },
    Mbc5,
    Mbc6,
    Mbc7,
}

impl MapperType {
    /// Decode the cartridge type byte at header offset `+0x47`.
    ///
    /// Unknown type bytes default to [`MapperType::Mbc5`] with a warning,
    /// matching the hardware's behavior of simply treating an unrecognized
    /// cartridge as "probably the newest, most common mapper".
    pub fn from_header_byte(byte: u8) -> Self {
        match byte {
            0x00 | 0x08 | 0x09 => MapperType::None,
            0x01..=0x03 => MapperType::Mbc1,
            0x05 | 0x06 => MapperType::Mbc2,
            0x0F | 0x10 => MapperType::Mbc3 { has_rtc: true },
            0x11..=0x13 => MapperType::Mbc3 { has_rtc: false },
            0x19..=0x1E => MapperType::Mbc5,
            0x20 => MapperType::Mbc6,
            0x22 => MapperType::Mbc7,
            other => {
                log::warn!("unrecognized cartridge type byte {other:#04x}, defaulting to MBC5");
                MapperType::Mbc5
            }
        }
    }

    /// Read the type byte straight out of a full ROM image.
    pub fn from_rom(rom: &[u8]) -> Self {
        rom.get(HEADER_START + MAPPER_TYPE_OFFSET).copied().map(Self::from_header_byte).unwrap_or_else(|| {
            log::warn!("ROM too small to contain a header, defaulting to MBC5");
            MapperType::Mbc5
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(MapperType::from_header_byte(0x00), MapperType::None);
        assert_eq!(MapperType::from_header_byte(0x01), MapperType::Mbc1);
        assert_eq!(MapperType::from_header_byte(0x05), MapperType::Mbc2);
        assert_eq!(MapperType::from_header_byte(0x0F), MapperType::Mbc3 { has_rtc: true });
        assert_eq!(MapperType::from_header_byte(0x11), MapperType::Mbc3 { has_rtc: false });
        assert_eq!(MapperType::from_header_byte(0x19), MapperType::Mbc5);
        assert_eq!(MapperType::from_header_byte(0x20), MapperType::Mbc6);
        assert_eq!(MapperType::from_header_byte(0x22), MapperType::Mbc7);
    }

    #[test]
    fn test_unknown_defaults_to_mbc5() {
        assert_eq!(MapperType::from_header_byte(0xFF), MapperType::Mbc5);
    }
}
