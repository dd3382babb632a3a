//! The 8-bit console's banked-memory / cartridge-controller layer (C5, C6).

mod dma;
mod header;
mod mapper;
mod memory;
mod rtc;

pub use dma::{DmaState, OAM_DESTINATION_SIZE};
pub use header::MapperType;
pub use mapper::Mapper;
pub use memory::MemoryController;
pub use rtc::RealTimeClock;
