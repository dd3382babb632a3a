//! The 32-bit console's software video renderer: palette/blend math (C1),
//! the window resolver (C2), background rendering (C3), and the sprite
//! pipeline (C4), tied together by [`Renderer`].

mod background;
mod frame;
mod oam;
mod palette;
mod pixel;
mod registers;
mod renderer;
mod sprite;
mod window;

pub use background::BackgroundDescriptor;
pub use frame::{Rgba, RgbaFrame, FRAMEBUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use oam::{CachedSprite, OamRam, SpriteCache};
pub use palette::{BlendVariant, PaletteBanks};
pub use registers::{
    AlphaBlendCoefficients, BgControl, BgMode, BgRotationParam, BgRotationRef, BgScrolling, BrightnessCoefficients, ColorSpecialEffect, ColorSpecialSelection, LcdControl, MosaicFunction,
    WindowControl, WindowDimensions,
};
pub use renderer::{Renderer, RendererOptions};
pub use sprite::AffineMatrix;
pub use window::{Interval, LayerControl, WindowRange, WindowResolver};
