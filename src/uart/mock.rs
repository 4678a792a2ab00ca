// src/uart/mock.rs

//! Scripted in-memory driver for tests
//!
//! [`MockDriver`] succeeds at everything unless told otherwise. It records
//! what the endpoint asked of it so tests can assert on hardware-side
//! effects: configured rate, transmitted bytes, running directions.

use super::baud::BaudRate;
use super::driver::{DriverFault, DriverResult, FaultCause, UartDriver};
use super::error::{Completion, PlatformStatus};
use alloc::vec::Vec;

/// Driver hook identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// [`UartDriver::configure`]
    Configure,
    /// [`UartDriver::start_rx`]
    StartRx,
    /// [`UartDriver::start_tx`]
    StartTx,
    /// [`UartDriver::stop_rx`]
    StopRx,
    /// [`UartDriver::stop_tx`]
    StopTx,
    /// [`UartDriver::transmit`]
    Transmit,
}

/// In-memory UART driver
#[derive(Debug, Default)]
pub struct MockDriver {
    absent: bool,
    configured: Option<BaudRate>,
    rx_running: bool,
    tx_running: bool,
    transmitted: Vec<u8>,
    calls: Vec<Hook>,
    pending_fault: Option<(Hook, DriverFault)>,
    transmit_fault: Option<(usize, DriverFault)>,
    transmit_status: Option<PlatformStatus>,
    tx_busy: bool,
    busy_polls: u32,
}

impl MockDriver {
    /// Driver for a present, always-succeeding peripheral
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver for a target without the peripheral
    pub fn absent() -> Self {
        Self {
            absent: true,
            ..Self::default()
        }
    }

    /// Fail the next call of `hook` with `fault`
    pub fn fail_next(&mut self, hook: Hook, fault: DriverFault) {
        self.pending_fault = Some((hook, fault));
    }

    /// Fail transmission once `count` further bytes went out
    pub fn fail_transmit_after(&mut self, count: usize, fault: DriverFault) {
        self.transmit_fault = Some((self.transmitted.len() + count, fault));
    }

    /// Diagnostic attached to every successful transmit
    pub fn set_transmit_status(&mut self, status: Option<PlatformStatus>) {
        self.transmit_status = status;
    }

    /// Keep the transmitter permanently not ready
    pub fn set_tx_busy(&mut self, busy: bool) {
        self.tx_busy = busy;
    }

    /// Report not ready for the next `polls` readiness checks
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    /// Rate passed to the successful configure, if any
    pub fn configured(&self) -> Option<BaudRate> {
        self.configured
    }

    /// Whether the receive path is running
    pub fn rx_running(&self) -> bool {
        self.rx_running
    }

    /// Whether the transmit path is running
    pub fn tx_running(&self) -> bool {
        self.tx_running
    }

    /// Every byte handed to the transmitter, in order
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    /// Every hook invocation, in order
    pub fn calls(&self) -> &[Hook] {
        &self.calls
    }

    fn enter(&mut self, hook: Hook) -> Result<(), DriverFault> {
        self.calls.push(hook);
        if self.absent {
            return Err(DriverFault::new(FaultCause::NotPresent));
        }
        match self.pending_fault {
            Some((pending, fault)) if pending == hook => {
                self.pending_fault = None;
                Err(fault)
            }
            _ => Ok(()),
        }
    }
}

impl UartDriver for MockDriver {
    fn configure(&mut self, rate: BaudRate) -> DriverResult {
        self.enter(Hook::Configure)?;
        self.configured = Some(rate);
        self.rx_running = false;
        self.tx_running = false;
        Ok(Completion::new())
    }

    fn start_rx(&mut self) -> DriverResult {
        self.enter(Hook::StartRx)?;
        self.rx_running = true;
        Ok(Completion::new())
    }

    fn start_tx(&mut self) -> DriverResult {
        self.enter(Hook::StartTx)?;
        self.tx_running = true;
        Ok(Completion::new())
    }

    fn stop_rx(&mut self) -> DriverResult {
        self.enter(Hook::StopRx)?;
        self.rx_running = false;
        Ok(Completion::new())
    }

    fn stop_tx(&mut self) -> DriverResult {
        self.enter(Hook::StopTx)?;
        self.tx_running = false;
        Ok(Completion::new())
    }

    fn tx_ready(&mut self) -> bool {
        if self.tx_busy {
            return false;
        }
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            return false;
        }
        true
    }

    fn transmit(&mut self, byte: u8) -> DriverResult {
        self.enter(Hook::Transmit)?;
        if let Some((limit, fault)) = self.transmit_fault {
            if self.transmitted.len() >= limit {
                self.transmit_fault = None;
                return Err(fault);
            }
        }
        self.transmitted.push(byte);
        Ok(self
            .transmit_status
            .map_or_else(Completion::new, Completion::with_platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_fault_fires_once() {
        let mut driver = MockDriver::new();
        driver.fail_next(Hook::StartRx, FaultCause::Hardware.into());
        assert!(driver.start_tx().is_ok());
        assert!(driver.start_rx().is_err());
        assert!(driver.start_rx().is_ok());
        assert_eq!(
            driver.calls(),
            &[Hook::StartTx, Hook::StartRx, Hook::StartRx]
        );
    }

    #[test]
    fn test_busy_polls_count_down() {
        let mut driver = MockDriver::new();
        driver.set_busy_polls(2);
        assert!(!driver.tx_ready());
        assert!(!driver.tx_ready());
        assert!(driver.tx_ready());
    }

    #[test]
    fn test_absent_fails_every_hook() {
        let mut driver = MockDriver::absent();
        assert_eq!(
            driver.configure(BaudRate::Baud9600).unwrap_err().cause(),
            FaultCause::NotPresent
        );
        assert_eq!(driver.transmit(0).unwrap_err().cause(), FaultCause::NotPresent);
        assert!(driver.transmitted().is_empty());
    }
}
