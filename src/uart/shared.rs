// src/uart/shared.rs

//! One UART endpoint shared between contexts
//!
//! The capability leaves ordering between concurrent writers undefined.
//! [`SharedUart`] keeps the driver behind a spin lock, so every `write` from
//! every context lands as one contiguous run of bytes.
//!
//! # Locking
//!
//! Only operations that touch the hardware take the lock. The lifecycle
//! state and the receive sink live outside it:
//! - [`is_initialized`](SharedUart::is_initialized) and
//!   [`is_rx_enabled`](SharedUart::is_rx_enabled) never block
//! - [`deliver_received_byte`](SharedUart::deliver_received_byte) never
//!   blocks and may run from the receive interrupt
//!
//! Never call a locking operation from an interrupt handler that may
//! preempt a holder of the same lock. The handler would spin forever.

use super::baud::BaudRate;
use super::config::EndpointConfig;
use super::driver::UartDriver;
use super::endpoint::EndpointCore;
use super::error::UartResult;
use super::sink::RxSink;
use super::state::Direction;
use core::sync::atomic::{AtomicU32, Ordering};
use spin::{Mutex, MutexGuard};

/// UART endpoint whose driver sits behind a spin lock
///
/// Dropping an initialized `SharedUart` quiesces both directions.
pub struct SharedUart<D: UartDriver, S: RxSink> {
    driver: Mutex<D>,
    core: EndpointCore<S>,
    acquisitions: AtomicU32,
    contentions: AtomicU32,
}

impl<D: UartDriver, S: RxSink> SharedUart<D, S> {
    /// Create an uninitialized shared endpoint with bounded writes
    pub const fn new(driver: D, sink: S) -> Self {
        Self::with_config(driver, sink, EndpointConfig::bounded())
    }

    /// Create an uninitialized shared endpoint with explicit configuration
    pub const fn with_config(driver: D, sink: S, config: EndpointConfig) -> Self {
        Self {
            driver: Mutex::new(driver),
            core: EndpointCore::new(sink, config),
            acquisitions: AtomicU32::new(0),
            contentions: AtomicU32::new(0),
        }
    }

    fn acquire(&self) -> MutexGuard<'_, D> {
        let guard = match self.driver.try_lock() {
            Some(guard) => guard,
            None => {
                self.contentions.fetch_add(1, Ordering::Relaxed);
                self.driver.lock()
            }
        };
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        guard
    }

    /// Run `f` with exclusive access to the driver
    pub fn with_driver<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut D) -> R,
    {
        let mut guard = self.acquire();
        f(&mut guard)
    }

    /// The receive sink
    #[inline]
    pub fn sink(&self) -> &S {
        self.core.sink()
    }

    /// Configured line rate, `None` before initialization
    pub fn baud_rate(&self) -> Option<BaudRate> {
        self.core.state().baud_rate()
    }

    /// Currently enabled directions
    pub fn directions(&self) -> Direction {
        self.core.state().directions()
    }

    /// See [`UartInterface::init`](super::UartInterface::init)
    pub fn init(&self, baud_rate: u32) -> UartResult {
        let mut driver = self.acquire();
        self.core.init(&mut *driver, baud_rate)
    }

    /// See [`UartInterface::is_initialized`](super::UartInterface::is_initialized); lock-free
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.core.state().is_initialized()
    }

    /// See [`UartInterface::is_rx_enabled`](super::UartInterface::is_rx_enabled); lock-free
    #[inline]
    pub fn is_rx_enabled(&self) -> bool {
        self.core.state().is_enabled(Direction::RX)
    }

    /// Whether the transmit path is enabled; lock-free
    #[inline]
    pub fn is_tx_enabled(&self) -> bool {
        self.core.state().is_enabled(Direction::TX)
    }

    /// See [`UartInterface::enable_rx`](super::UartInterface::enable_rx)
    pub fn enable_rx(&self) -> UartResult {
        let mut driver = self.acquire();
        self.core
            .switch(&mut *driver, "enable_rx", Direction::RX, true, D::start_rx)
    }

    /// See [`UartInterface::enable_tx`](super::UartInterface::enable_tx)
    pub fn enable_tx(&self) -> UartResult {
        let mut driver = self.acquire();
        self.core
            .switch(&mut *driver, "enable_tx", Direction::TX, true, D::start_tx)
    }

    /// See [`UartInterface::disable_both_rx_tx`](super::UartInterface::disable_both_rx_tx)
    pub fn disable_both_rx_tx(&self) -> UartResult {
        let mut driver = self.acquire();
        self.core.disable_both(&mut *driver)
    }

    /// See [`UartInterface::disable_rx`](super::UartInterface::disable_rx)
    pub fn disable_rx(&self) -> UartResult {
        let mut driver = self.acquire();
        self.core
            .switch(&mut *driver, "disable_rx", Direction::RX, false, D::stop_rx)
    }

    /// See [`UartInterface::disable_tx`](super::UartInterface::disable_tx)
    pub fn disable_tx(&self) -> UartResult {
        let mut driver = self.acquire();
        self.core
            .switch(&mut *driver, "disable_tx", Direction::TX, false, D::stop_tx)
    }

    /// See [`UartInterface::write`](super::UartInterface::write); the whole
    /// slice goes out uninterrupted
    pub fn write(&self, bytes: &[u8]) -> UartResult {
        let mut driver = self.acquire();
        self.core.write(&mut *driver, bytes)
    }

    /// See [`UartInterface::deliver_received_byte`](super::UartInterface::deliver_received_byte); lock-free
    pub fn deliver_received_byte(&self, byte: u8) -> UartResult {
        self.core.deliver(byte)
    }

    /// Lock statistics
    ///
    /// Returns `(acquisitions, contentions)`.
    pub fn lock_stats(&self) -> (u32, u32) {
        (
            self.acquisitions.load(Ordering::Relaxed),
            self.contentions.load(Ordering::Relaxed),
        )
    }
}

impl<D: UartDriver, S: RxSink> Drop for SharedUart<D, S> {
    fn drop(&mut self) {
        self.core.quiesce(self.driver.get_mut());
    }
}
