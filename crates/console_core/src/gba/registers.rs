//! Register bitfield layouts for the video register file (C1-C4's shared
//! data model). MSB-ordered fields (matching the hardware's big-endian bit
//! numbering within a 16/32-bit register) use `modular_bitfield_msb`; plain
//! little-endian-ish layouts elsewhere in this crate use `modular_bitfield`.

use modular_bitfield_msb::prelude::{B19, B2, B27, B3, B4, B5, B7, B9};
use modular_bitfield_msb::{bitfield, BitfieldSpecifier};

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct LcdControl {
    /// OBJ Window Display Flag (0=Off, 1=On) (Bit 15)
    pub obj_window_display: bool,
    /// Window 1 Display Flag   (0=Off, 1=On)
    pub window_1_display_flag: bool,
    /// Window 0 Display Flag   (0=Off, 1=On)
    pub window_0_display_flag: bool,
    /// Screen Display OBJ  (0=Off, 1=On)
    pub screen_display_obj: bool,
    /// Screen Display BG3  (0=Off, 1=On)
    pub screen_display_bg3: bool,
    /// Screen Display BG2  (0=Off, 1=On)
    pub screen_display_bg2: bool,
    /// Screen Display BG1  (0=Off, 1=On)
    pub screen_display_bg1: bool,
    /// Screen Display BG0  (0=Off, 1=On)
    pub screen_display_bg0: bool,
    /// Forced blank (1=Allow FAST access to VRAM,Palette,OAM)
    pub forced_blank: bool,
    /// OBJ Character VRAM Mapping (0=Two dimensional, 1=One dimensional)
    pub obj_character_vram_mapping: bool,
    /// H-Blank Interval Free  (1=Allow access to OAM during H-Blank)
    pub h_blank_interval_free: bool,
    /// Display Frame Select   (0-1=Frame 0-1) (for BG Modes 4,5 only)
    pub display_frame_select: bool,
    /// Reserved/CGB Mode    (0=GBA, 1=CGB; can be set only by BIOS opcodes)
    pub reserved_cgb_mode: bool,
    /// Bg mode, in range 0..=5 (Bits 0..=2)
    pub bg_mode: BgMode,
}

/// | Mode | Rot/Scal | Layers | Size                                           |
/// |------|----------|--------|------------------------------------------------|
/// | 0    | No       | 0123   | text, four backgrounds                        |
/// | 1    | Mixed    | 012-   | BG0/BG1 text, BG2 affine                      |
/// | 2    | Yes      | --23   | BG2/BG3 affine                                |
/// | 3    | Yes      | --2-   | 240x160, 15-bit direct bitmap                 |
/// | 4    | Yes      | --2-   | 240x160, 8-bit palettized bitmap              |
/// | 5    | Yes      | --2-   | 160x128, 15-bit direct bitmap                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[bits = 3]
pub enum BgMode {
    Mode0 = 0b000,
    Mode1 = 0b001,
    Mode2 = 0b010,
    Mode3 = 0b011,
    Mode4 = 0b100,
    Mode5 = 0b101,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct BgControl {
    /// 14..=15: screen size code, meaning depends on text vs affine mode.
    pub screen_size: B2,
    /// Bit 13: for BG2/BG3, 0=transparent-on-overflow, 1=wraparound.
    pub display_area_overflow: bool,
    /// 8..=12 (0-31, in units of 2 KBytes) (=BG Map Data)
    pub screen_base_block: B5,
    /// Bit 7 (0=16/16, 1=256/1)
    pub colors_palettes: bool,
    /// Bit 6
    pub mosaic: bool,
    #[skip]
    unused: B2,
    /// 2..=3 (0-3, in units of 16 KBytes) (=BG Tile Data)
    pub character_base_block: B2,
    /// 0..=1 (0-3, 0=Highest)
    pub bg_priority: B2,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct BgScrolling {
    #[skip]
    unused: B7,
    /// Offset 0..=511
    pub offset: B9,
}

/// 28-bit sign-extended 20.8 fixed-point reference point (`refx`/`refy`).
#[bitfield(bits = 32)]
#[repr(u32)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct BgRotationRef {
    #[skip]
    unused: B4,
    pub sign: bool,
    pub integer_portion: B19,
    pub fractional_portion: u8,
}

/// 8.8 fixed-point affine matrix parameter (`dx`/`dmx`/`dy`/`dmy`).
#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct BgRotationParam {
    pub sign: bool,
    pub integer_portion: B7,
    pub fractional_portion: u8,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct WindowDimensions {
    /// Leftmost / top-most coordinate of the window.
    pub left_top_most: u8,
    /// Rightmost / bottom-most coordinate of the window, plus 1.
    pub right_bottom_most: u8,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct WindowControl {
    #[skip]
    unused_1: B2,
    pub winobj_1_color_special: bool,
    pub winobj_1_obj_enable: bool,
    pub winobj_1_bg_enable: B4,

    #[skip]
    unused_0: B2,
    pub winout_0_color_special: bool,
    pub winout_0_obj_enable: bool,
    pub winout_0_bg_enable: B4,
}

#[bitfield(bits = 32)]
#[repr(u32)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct MosaicFunction {
    #[skip]
    unused: u16,
    pub obj_mosaic_v_size: B4,
    pub obj_mosaic_h_size: B4,
    pub bg_mosaic_v_size: B4,
    pub bg_mosaic_h_size: B4,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct ColorSpecialSelection {
    #[skip]
    unused: B2,
    pub bd_2: bool,
    pub obj_2: bool,
    pub bg3_2: bool,
    pub bg2_2: bool,
    pub bg1_2: bool,
    pub bg0_2: bool,
    pub color_special_effects: ColorSpecialEffect,
    pub bd_1: bool,
    pub obj_1: bool,
    pub bg3_1: bool,
    pub bg2_1: bool,
    pub bg1_1: bool,
    pub bg0_1: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[bits = 2]
pub enum ColorSpecialEffect {
    None = 0b00,
    AlphaBlending = 0b01,
    BrightnessIncrease = 0b10,
    BrightnessDecrease = 0b11,
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct AlphaBlendCoefficients {
    #[skip]
    unused: B3,
    pub evb: B5,
    #[skip]
    unused_1: B3,
    pub eva: B5,
}

#[bitfield(bits = 32)]
#[repr(u32)]
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub struct BrightnessCoefficients {
    #[skip]
    unused: B27,
    pub evy: B5,
}
