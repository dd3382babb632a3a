use crate::dma_log;
use crate::GameError;

pub const OAM_DESTINATION_SIZE: u16 = 0xA0;
const DMA_SOURCE_LIMIT: u16 = 0xF100;
const DMA_START_DELAY: u32 = 8;
const DMA_STEP_DELAY: u32 = 4;

/// The single-channel, fixed-destination OAM DMA copy engine.
///
/// While a transfer is in flight the memory controller swaps its
/// `load8`/`store8` entry points for a restricted pair that only exposes
/// HRAM; [`DmaState::restricted`] is the flag that swap checks, avoiding an
/// indirect call on the hot path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DmaState {
    source: u16,
    dest: u16,
    remaining: u16,
    /// Cycles until the next transfer tick; `None` means no transfer armed.
    next_event: Option<u32>,
}

impl DmaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a transfer is in flight, i.e. the CPU's load/store
    /// handlers should be the HRAM-restricted variant.
    pub fn restricted(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Arm a transfer from `base`. A `base` above [`DMA_SOURCE_LIMIT`] is a
    /// no-op (the hardware forbids sourcing DMA from echo RAM and above).
    pub fn start(&mut self, base: u16) -> Result<(), GameError> {
        if base > DMA_SOURCE_LIMIT {
            return Ok(());
        }

        let result = if self.restricted() {
            Err(GameError::DmaInFlight {
                remaining: self.remaining,
                new_source: base,
            })
        } else {
            Ok(())
        };

        self.source = base;
        self.dest = 0;
        self.remaining = OAM_DESTINATION_SIZE;
        self.next_event = Some(DMA_START_DELAY);

        result
    }

    /// Consume cycles from `budget` until either the budget is exhausted or
    /// the next scheduled tick fires. Fires at most one byte per call; the
    /// caller loops while `budget` remains to drain everything the elapsed
    /// time covers, each fired byte consuming its own `DMA_STEP_DELAY` (or
    /// the initial `DMA_START_DELAY`) share of the budget rather than the
    /// whole elapsed amount firing every byte still due.
    pub fn step(&mut self, budget: &mut u32) -> Option<(u16, u16)> {
        let next = self.next_event?;

        if *budget < next {
            self.next_event = Some(next - *budget);
            *budget = 0;
            return None;
        }

        *budget -= next;

        let source = self.source;
        let dest = self.dest;

        self.source = self.source.wrapping_add(1);
        self.dest += 1;
        self.remaining -= 1;

        dma_log!("DMA copied byte {:#04x} -> OAM[{:#04x}], {} remaining", source, dest, self.remaining);

        self.next_event = if self.remaining == 0 { None } else { Some(DMA_STEP_DELAY) };

        Some((source, dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_above_limit_is_noop() {
        let mut dma = DmaState::new();
        dma.start(0xF200).unwrap();

        assert!(!dma.restricted());
        let mut budget = 100;
        assert_eq!(dma.step(&mut budget), None);
    }

    #[test]
    fn test_full_transfer_schedule() {
        let mut dma = DmaState::new();
        dma.start(0xC100).unwrap();

        assert!(dma.restricted());
        // Nothing happens before the 8-cycle startup delay.
        let mut budget = 7;
        assert_eq!(dma.step(&mut budget), None);

        let mut copies = Vec::new();
        // One more cycle fires the first transfer.
        let mut budget = 1;
        if let Some(pair) = dma.step(&mut budget) {
            copies.push(pair);
        }

        while dma.restricted() {
            let mut budget = DMA_STEP_DELAY;
            if let Some(pair) = dma.step(&mut budget) {
                copies.push(pair);
            }
        }

        assert_eq!(copies.len(), OAM_DESTINATION_SIZE as usize);
        assert_eq!(copies[0], (0xC100, 0));
        assert_eq!(copies.last(), Some(&(0xC100 + 0x9F, 0x9F)));
        assert!(!dma.restricted());
        assert_eq!(dma.remaining(), 0);
    }

    #[test]
    fn test_step_does_not_drain_whole_transfer_from_one_oversized_budget() {
        // A single call with a budget far larger than one event's delay
        // must still fire only as many bytes as that budget actually
        // covers, not the entire remaining transfer.
        let mut dma = DmaState::new();
        dma.start(0xC000).unwrap();

        let mut budget = DMA_START_DELAY + DMA_STEP_DELAY * 3;
        let mut copies = Vec::new();
        while let Some(pair) = dma.step(&mut budget) {
            copies.push(pair);
        }

        assert_eq!(copies.len(), 4);
        assert!(dma.restricted());
        assert_eq!(dma.remaining(), OAM_DESTINATION_SIZE - 4);
    }

    #[test]
    fn test_rearm_reports_in_flight() {
        let mut dma = DmaState::new();
        dma.start(0xC000).unwrap();

        let err = dma.start(0xD000).unwrap_err();
        assert!(matches!(err, GameError::DmaInFlight { .. }));
        // The restart still takes effect.
        assert_eq!(dma.remaining(), OAM_DESTINATION_SIZE);
    }
}
