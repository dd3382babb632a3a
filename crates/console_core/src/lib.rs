mod clock;
mod error;
pub mod gb;
pub mod gba;
mod logging;
mod utils;

pub use clock::{ClockSource, SystemClockSource};
pub use error::GameError;

pub(crate) use utils::box_array;
