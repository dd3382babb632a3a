//! The renderer's top-level state: video registers, VRAM/OAM/palette
//! storage, and the single `draw_scanline` entry point the host calls once
//! per line.

use crate::gba::background::{self, BackgroundDescriptor};
use crate::gba::frame::{Rgba, RgbaFrame, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::gba::oam::{OamRam, SpriteCache};
use crate::gba::palette::{BlendVariant, PaletteBanks};
use crate::gba::pixel;
use crate::gba::registers::{BgMode, ColorSpecialEffect, LcdControl};
use crate::gba::sprite::{self, SpriteLayer};
use crate::gba::window::{LayerControl, WindowRange, WindowResolver};
use crate::logging::ppu_log;

pub const VRAM_SIZE: usize = 0x18000;
const OBJ_VRAM_OFFSET_TEXT: usize = 0x10000;
const OBJ_VRAM_OFFSET_BITMAP: usize = 0x14000;

/// Construction-time toggles for the renderer, following the embedder's
/// `EmuOptions` convention: explicit fields rather than free function
/// arguments, no file I/O or serde involved.
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    /// Skip the first blend-variant regeneration at construction time.
    pub skip_initial_variant_regen: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self { skip_initial_variant_regen: false }
    }
}

pub struct Renderer {
    options: RendererOptions,

    vram: Box<[u8; VRAM_SIZE]>,
    oam: OamRam,
    sprite_cache: SpriteCache,
    palette: PaletteBanks,
    frame: RgbaFrame,

    backgrounds: [BackgroundDescriptor; 4],

    dispcnt: LcdControl,
    win0: WindowRange,
    win1: WindowRange,
    win0_enabled: bool,
    win1_enabled: bool,
    winin: (LayerControl, LayerControl),
    winout: (LayerControl, LayerControl),

    bldcnt_mode: ColorSpecialEffect,
    bldcnt_target1: LayerControl,
    bldcnt_target2: LayerControl,
    eva: u8,
    evb: u8,
    evy: u8,

    mosaic_bg_h: u8,
    mosaic_bg_v: u8,
    mosaic_obj_h: u8,
    mosaic_obj_v: u8,

    frame_select: bool,
}

impl Renderer {
    pub fn new(options: RendererOptions) -> Self {
        let mut renderer = Self {
            options,
            vram: crate::box_array![0; VRAM_SIZE],
            oam: OamRam::new(),
            sprite_cache: SpriteCache::default(),
            palette: PaletteBanks::new(),
            frame: RgbaFrame::new(),
            backgrounds: [BackgroundDescriptor::new(0), BackgroundDescriptor::new(1), BackgroundDescriptor::new(2), BackgroundDescriptor::new(3)],
            dispcnt: LcdControl::new(),
            win0: WindowRange { h_start: 0, h_end: 0, v_start: 0, v_end: 0 },
            win1: WindowRange { h_start: 0, h_end: 0, v_start: 0, v_end: 0 },
            win0_enabled: false,
            win1_enabled: false,
            winin: (LayerControl(0x1F), LayerControl(0x1F)),
            winout: (LayerControl(0x1F), LayerControl(0x1F)),
            bldcnt_mode: ColorSpecialEffect::None,
            bldcnt_target1: LayerControl(0),
            bldcnt_target2: LayerControl(0),
            eva: 0,
            evb: 0,
            evy: 0,
            mosaic_bg_h: 0,
            mosaic_bg_v: 0,
            mosaic_obj_h: 0,
            mosaic_obj_v: 0,
            frame_select: false,
        };

        if !renderer.options.skip_initial_variant_regen {
            renderer.palette.regenerate_variants(BlendVariant::None);
        }

        renderer
    }

    pub fn write_vram(&mut self, offset: usize, value: u8) {
        if let Some(slot) = self.vram.get_mut(offset) {
            *slot = value;
        }
    }

    pub fn write_oam_16(&mut self, offset: u32, value: u16) {
        self.oam.write_16(offset, value);
    }

    pub fn write_bg_palette(&mut self, index: u8, color: u16) {
        self.palette.write_bg(index, color);
        self.regenerate_variants();
    }

    pub fn write_obj_palette(&mut self, index: u8, color: u16) {
        self.palette.write_obj(index, color);
        self.regenerate_variants();
    }

    fn current_blend_variant(&self) -> BlendVariant {
        match self.bldcnt_mode {
            ColorSpecialEffect::None | ColorSpecialEffect::AlphaBlending => BlendVariant::None,
            ColorSpecialEffect::BrightnessIncrease => BlendVariant::Brighten(self.evy),
            ColorSpecialEffect::BrightnessDecrease => BlendVariant::Darken(self.evy),
        }
    }

    fn regenerate_variants(&mut self) {
        let variant = self.current_blend_variant();
        self.palette.regenerate_variants(variant);
    }

    pub fn write_dispcnt(&mut self, value: u16) {
        self.dispcnt = LcdControl::from_bytes(value.to_le_bytes());
        self.backgrounds[0].enabled = self.dispcnt.screen_display_bg0();
        self.backgrounds[1].enabled = self.dispcnt.screen_display_bg1();
        self.backgrounds[2].enabled = self.dispcnt.screen_display_bg2();
        self.backgrounds[3].enabled = self.dispcnt.screen_display_bg3();
        self.win0_enabled = self.dispcnt.window_0_display_flag();
        self.win1_enabled = self.dispcnt.window_1_display_flag();
    }

    pub fn write_bg_control(&mut self, index: usize, priority: u8, character_base: u32, mosaic: bool, multipalette: bool, screen_base: u32, overflow: bool, size: u8) {
        let Some(bg) = self.backgrounds.get_mut(index) else { return };
        bg.priority = priority;
        bg.character_base = character_base;
        bg.mosaic = mosaic;
        bg.multipalette = multipalette;
        bg.screen_base = screen_base;
        bg.overflow = overflow;
        bg.size = size;
    }

    pub fn write_bg_scroll(&mut self, index: usize, x: u16, y: u16) {
        let Some(bg) = self.backgrounds.get_mut(index) else { return };
        bg.scroll_x = x;
        bg.scroll_y = y;
    }

    pub fn write_bg_affine_ref(&mut self, index: usize, ref_x: i32, ref_y: i32) {
        let Some(bg) = self.backgrounds.get_mut(index) else { return };
        bg.ref_x = ref_x;
        bg.ref_y = ref_y;
        // Reference-point write reloads the accumulator immediately.
        bg.reload_affine_accumulator();
    }

    pub fn write_bg_affine_matrix(&mut self, index: usize, dx: i16, dmx: i16, dy: i16, dmy: i16) {
        let Some(bg) = self.backgrounds.get_mut(index) else { return };
        bg.dx = dx;
        bg.dmx = dmx;
        bg.dy = dy;
        bg.dmy = dmy;
    }

    pub fn write_window_bounds(&mut self, window: u8, h_start: i32, h_end: i32, v_start: i32, v_end: i32) {
        let range = WindowRange { h_start, h_end, v_start, v_end };
        if window == 0 {
            self.win0 = range;
        } else {
            self.win1 = range;
        }
    }

    pub fn write_winin(&mut self, win0: LayerControl, win1: LayerControl) {
        self.winin = (win0, win1);
    }

    pub fn write_winout(&mut self, outside: LayerControl, objwin: LayerControl) {
        self.winout = (outside, objwin);
    }

    pub fn write_mosaic(&mut self, bg_h: u8, bg_v: u8, obj_h: u8, obj_v: u8) {
        self.mosaic_bg_h = bg_h;
        self.mosaic_bg_v = bg_v;
        self.mosaic_obj_h = obj_h;
        self.mosaic_obj_v = obj_v;
    }

    pub fn write_bldcnt(&mut self, mode: ColorSpecialEffect, target1: LayerControl, target2: LayerControl) {
        self.bldcnt_mode = mode;
        self.bldcnt_target1 = target1;
        self.bldcnt_target2 = target2;
        // BLDCNT changes which variant table applies; repaint immediately.
        self.regenerate_variants();
    }

    pub fn write_bldalpha(&mut self, eva: u8, evb: u8) {
        self.eva = eva;
        self.evb = evb;
    }

    /// `BLDY` must repaint the blend variant palette immediately so the
    /// effect is observable within the same scanline's remaining draw
    /// calls, not just from the next scanline onward.
    pub fn write_bldy(&mut self, evy: u8) {
        self.evy = evy;
        self.regenerate_variants();
    }

    pub fn write_frame_select(&mut self, select: bool) {
        self.frame_select = select;
    }

    fn obj_vram(&self) -> &[u8] {
        let bitmap_mode = matches!(self.dispcnt.bg_mode(), BgMode::Mode3 | BgMode::Mode4 | BgMode::Mode5);
        let start = if bitmap_mode { OBJ_VRAM_OFFSET_BITMAP } else { OBJ_VRAM_OFFSET_TEXT };
        &self.vram[start..]
    }

    fn draw_backgrounds(&self, y: i32, mode: BgMode, rows: &mut [[u32; SCREEN_WIDTH]; 4]) {
        match mode {
            BgMode::Mode0 => {
                for i in 0..4 {
                    self.backgrounds[i].draw_text_scanline(y, &self.vram, &self.palette, self.mosaic_bg_v as i32, self.mosaic_bg_h as i32, &mut rows[i]);
                }
            }
            BgMode::Mode1 => {
                for i in 0..2 {
                    self.backgrounds[i].draw_text_scanline(y, &self.vram, &self.palette, self.mosaic_bg_v as i32, self.mosaic_bg_h as i32, &mut rows[i]);
                }
                self.backgrounds[2].draw_affine_scanline(&self.vram, &self.palette, &mut rows[2]);
            }
            BgMode::Mode2 => {
                self.backgrounds[2].draw_affine_scanline(&self.vram, &self.palette, &mut rows[2]);
                self.backgrounds[3].draw_affine_scanline(&self.vram, &self.palette, &mut rows[3]);
            }
            BgMode::Mode3 => self.backgrounds[2].draw_bitmap_mode3_scanline(y, &self.vram, &mut rows[2]),
            BgMode::Mode4 => self.backgrounds[2].draw_bitmap_mode4_scanline(y, &self.vram, &self.palette, self.frame_select, &mut rows[2]),
            BgMode::Mode5 => self.backgrounds[2].draw_bitmap_mode5_scanline(y, &self.vram, self.frame_select, &mut rows[2]),
        }
    }

    /// Render one scanline of output into the frame buffer.
    pub fn draw_scanline(&mut self, y: usize) {
        if y >= SCREEN_HEIGHT {
            ppu_log!("out-of-bounds scanline draw y={}", y);
            return;
        }

        self.sprite_cache.rebuild_if_dirty(&mut self.oam);

        let row_base = y * SCREEN_WIDTH;

        if self.dispcnt.forced_blank() {
            for x in 0..SCREEN_WIDTH {
                self.frame[row_base + x] = Rgba::WHITE;
            }
            return;
        }

        let mode = self.dispcnt.bg_mode();
        let mut bg_rows = [[0u32; SCREEN_WIDTH]; 4];
        self.draw_backgrounds(y as i32, mode, &mut bg_rows);

        let mut sprite_layer = SpriteLayer::default();
        if self.dispcnt.screen_display_obj() {
            let obj_vram = self.obj_vram();
            for sprite in self.sprite_cache.entries() {
                if y as i32 >= sprite.y_start && (y as i32) < sprite.y_end {
                    let matrix = if sprite.is_affine() { self.oam.affine_matrix(sprite.affine_index()) } else { sprite::AffineMatrix::default() };
                    sprite::preprocess_sprite(sprite, y as i32, obj_vram, &self.palette, matrix, &mut sprite_layer);
                }
            }
        }

        let win0_active = self.win0_enabled.then_some((self.win0, self.winin.0));
        let win1_active = self.win1_enabled.then_some((self.win1, self.winin.1));
        let objwin_enabled = self.dispcnt.obj_window_display();
        let intervals = match WindowResolver::resolve(y as i32, win1_active, win0_active, objwin_enabled, self.winout.0) {
            Ok(intervals) => intervals,
            Err(err) => {
                ppu_log!("window resolve failed: {:?}", err);
                vec![crate::gba::window::Interval {
                    start: 0,
                    end: SCREEN_WIDTH as i32,
                    control: LayerControl(0xFF),
                    honors_objwin: false,
                }]
            }
        };

        let any_window_active = self.win0_enabled || self.win1_enabled || objwin_enabled;
        let blend_mode_active = !matches!(self.bldcnt_mode, ColorSpecialEffect::None);

        let mut row = [pixel::backdrop(self.palette.bg_variant(0)); SCREEN_WIDTH];

        // Per-column window control: which layers are visible and whether
        // color-special (blend) effects apply at this column, per the
        // interval that covers it.
        let mut obj_enabled = [true; SCREEN_WIDTH];
        let mut color_special_enabled = [true; SCREEN_WIDTH];

        for interval in &intervals {
            let control = if interval.honors_objwin { self.winout.1 } else { interval.control };
            let start = interval.start.max(0) as usize;
            let end = (interval.end.max(0) as usize).min(SCREEN_WIDTH);

            for x in start..end {
                obj_enabled[x] = control.obj_enabled();
                color_special_enabled[x] = control.color_special_enabled();

                for bg_index in 0..4 {
                    if !self.backgrounds[bg_index].enabled || !control.bg_enabled(bg_index as u8) {
                        continue;
                    }
                    let candidate = bg_rows[bg_index][x];
                    let blending = blend_mode_active && color_special_enabled[x];
                    row[x] = self.merge(row[x], candidate, blending);
                }
            }
        }

        if self.dispcnt.screen_display_obj() {
            sprite::postcompose_sprite_layer(&sprite_layer, &mut row, |x, current, new| {
                if !obj_enabled[x] {
                    return current;
                }
                let objwin_mask = current & pixel::FLAG_OBJWIN != 0;
                let blending = blend_mode_active && color_special_enabled[x];
                if blending {
                    background::composite_blend_objwin(current, new, self.eva, self.evb, objwin_mask && any_window_active, true)
                } else {
                    background::composite_no_blend_objwin(current, new)
                }
            });
        }

        for x in 0..SCREEN_WIDTH {
            self.frame[row_base + x] = Rgba::from_color15(pixel::color_of(row[x]));
        }

        for bg in &mut self.backgrounds {
            bg.step_affine_accumulator();
        }
    }

    fn merge(&self, current: u32, candidate: u32, blending: bool) -> u32 {
        if blending {
            background::composite_blend_no_objwin(current, candidate, self.eva, self.evb)
        } else {
            background::composite_no_blend_no_objwin(current, candidate)
        }
    }

    /// Reload every background's affine accumulator; call at frame end.
    pub fn on_frame_end(&mut self) {
        for bg in &mut self.backgrounds {
            bg.reload_affine_accumulator();
        }
    }

    /// Copy the framebuffer out as RGBA8 rows of `out_stride` pixels.
    pub fn get_pixels(&self, out_stride: usize, out: &mut [u8]) {
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let dst = (y * out_stride + x) * 4;
                if dst + 4 > out.len() {
                    return;
                }
                let pixel = self.frame[y * SCREEN_WIDTH + x];
                out[dst] = pixel.red;
                out[dst + 1] = pixel.green;
                out[dst + 2] = pixel.blue;
                out[dst + 3] = pixel.alpha;
            }
        }
    }

    pub fn put_pixels(&mut self, stride: usize, data: &[u8]) {
        self.frame.put_pixels(stride, data);
    }

    pub fn palette(&self) -> &PaletteBanks {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_blank_fills_white() {
        let mut renderer = Renderer::new(RendererOptions::default());
        renderer.write_dispcnt(1 << 7); // forced_blank bit
        renderer.draw_scanline(0);

        for x in 0..SCREEN_WIDTH {
            assert_eq!(renderer.frame[x], Rgba::WHITE);
        }
    }

    #[test]
    fn test_single_sprite_draws_expected_region() {
        let mut renderer = Renderer::new(RendererOptions::default());
        renderer.write_dispcnt(1 << 12); // screen_display_obj
        renderer.write_obj_palette(5, 0x1234);

        // sprite 0: attr0 y=50 (attr0 bits0..7), attr1 x=100 shape size=1
        renderer.write_oam_16(0, 50);
        renderer.write_oam_16(2, (1 << 14) | 100);
        renderer.write_oam_16(4, 0);

        for i in 0..64 {
            renderer.write_vram(OBJ_VRAM_OFFSET_TEXT + i, 0x55);
        }

        renderer.draw_scanline(50);

        let pixel_at = |x: usize| renderer.frame[50 * SCREEN_WIDTH + x];
        assert_eq!(pixel_at(100), Rgba::from_color15(0x1234));
        assert_eq!(pixel_at(99), Rgba::from_color15(renderer.palette.bg_variant(0)));
    }
}
