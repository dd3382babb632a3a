//! Classification of the recoverable (and occasionally fatal-in-debug) faults
//! the two cores can hit. Nothing in this crate returns `GameError` to a
//! caller as a `Result` except `gb::dma::start_dma`'s re-arm case; every
//! other variant exists purely to give the `log` call sites a single
//! `Display` impl instead of scattering ad-hoc format strings.

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("mapper rejected write of {value:#04x} to {address:#06x}")]
    InvalidMbcWrite { address: u16, value: u8 },
    #[error("read from unusable region at {address:#06x}")]
    InvalidRead { address: u16 },
    #[error("write dropped for unusable region at {address:#06x}")]
    InvalidWrite { address: u16 },
    #[error("requested bank {requested} out of range, only {available} banks available")]
    BankOutOfRange { requested: u32, available: u32 },
    #[error("window resolver would have produced {count} intervals, clamped to 5")]
    WindowOverflow { count: usize },
    #[error("renderer attempted to draw at column {x}, past the 240-pixel visible width")]
    RendererOutOfBoundsDraw { x: u32 },
    #[error("DMA re-armed with {remaining} bytes still in flight, restarting from {new_source:#06x}")]
    DmaInFlight { remaining: u16, new_source: u16 },
}
