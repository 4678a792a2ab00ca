// src/uart/state.rs

//! Endpoint lifecycle state
//!
//! Kept in atomics so the queries and the interrupt-context delivery path
//! can read it through `&self` while thread context owns the endpoint.

use super::baud::BaudRate;
use bitflags::bitflags;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

bitflags! {
    /// Enabled data directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        /// Receive path
        const RX = 1 << 0;
        /// Transmit path
        const TX = 1 << 1;
    }
}

/// Lifecycle flags of one endpoint
pub(crate) struct LinkState {
    initialized: AtomicBool,
    directions: AtomicU8,
    baud: AtomicU32,
}

impl LinkState {
    pub(crate) const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            directions: AtomicU8::new(0),
            baud: AtomicU32::new(0),
        }
    }

    #[inline]
    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Record a successful configuration; both directions start disabled
    pub(crate) fn mark_initialized(&self, rate: BaudRate) {
        self.directions.store(0, Ordering::Release);
        self.baud.store(rate.bps(), Ordering::Release);
        self.initialized.store(true, Ordering::Release);
    }

    pub(crate) fn baud_rate(&self) -> Option<BaudRate> {
        if !self.is_initialized() {
            return None;
        }
        BaudRate::from_bps(self.baud.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn directions(&self) -> Direction {
        Direction::from_bits_truncate(self.directions.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn is_enabled(&self, direction: Direction) -> bool {
        self.directions().contains(direction)
    }

    pub(crate) fn enable(&self, direction: Direction) {
        self.directions.fetch_or(direction.bits(), Ordering::AcqRel);
    }

    pub(crate) fn disable(&self, direction: Direction) {
        self.directions.fetch_and(!direction.bits(), Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = LinkState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.directions(), Direction::empty());
        assert_eq!(state.baud_rate(), None);
    }

    #[test]
    fn test_directions_are_independent() {
        let state = LinkState::new();
        state.mark_initialized(BaudRate::Baud9600);

        state.enable(Direction::RX);
        state.enable(Direction::TX);
        assert_eq!(state.directions(), Direction::RX | Direction::TX);

        state.disable(Direction::TX);
        assert!(state.is_enabled(Direction::RX));
        assert!(!state.is_enabled(Direction::TX));

        state.disable(Direction::all());
        state.disable(Direction::all());
        assert_eq!(state.directions(), Direction::empty());
    }

    #[test]
    fn test_baud_rate_recorded() {
        let state = LinkState::new();
        state.mark_initialized(BaudRate::Baud921600);
        assert!(state.is_initialized());
        assert_eq!(state.baud_rate(), Some(BaudRate::Baud921600));
    }
}
