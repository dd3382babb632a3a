//! Feature-gated logging macros.
//!
//! Mirrors the regular `log` crate macros but compiles to nothing unless the
//! relevant cargo feature is enabled, so that default builds stay quiet on
//! the hottest paths (every mapper write, every DMA tick).

#[macro_export]
macro_rules! mbc_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "mbc-logging")]
        log::warn!($($arg)*);
    }
}

#[macro_export]
macro_rules! dma_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "dma-logging")]
        log::trace!($($arg)*);
    }
}

#[macro_export]
macro_rules! ppu_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "ppu-logging")]
        log::trace!($($arg)*);
    }
}

pub(crate) use {dma_log, mbc_log, ppu_log};
