// src/uart/driver.rs

//! Hardware seam for concrete UART drivers.
//!
//! A driver owns one peripheral instance: its registers, its interrupt
//! handler and whatever buffering it needs. It implements these hooks and
//! leaves lifecycle rules, argument validation and status mapping to
//! [`UartEndpoint`](super::UartEndpoint).

use super::baud::BaudRate;
use super::config::FrameFormat;
use super::error::{Completion, ErrorKind, PlatformStatus, UartError};
use core::fmt;

/// Result of a driver hook
pub type DriverResult = Result<Completion, DriverFault>;

/// Why a driver hook failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCause {
    /// The peripheral refused or failed the request
    Hardware,
    /// The target has no such peripheral
    NotPresent,
    /// The hook cannot be realized on this target
    Unsupported,
    /// The peripheral did not respond in time
    Timeout,
}

/// Driver hook failure with optional diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverFault {
    cause: FaultCause,
    platform: Option<PlatformStatus>,
}

impl DriverFault {
    /// Fault without diagnostic
    pub const fn new(cause: FaultCause) -> Self {
        Self {
            cause,
            platform: None,
        }
    }

    /// Peripheral refused or failed the request
    pub const fn hardware(platform: PlatformStatus) -> Self {
        Self {
            cause: FaultCause::Hardware,
            platform: Some(platform),
        }
    }

    /// Attach a driver diagnostic
    pub const fn with_platform(mut self, platform: PlatformStatus) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Fault cause
    pub const fn cause(&self) -> FaultCause {
        self.cause
    }

    /// Driver diagnostic, if any
    pub const fn platform_status(&self) -> Option<PlatformStatus> {
        self.platform
    }

    /// Translate into the contract taxonomy
    ///
    /// `hardware_kind` is the operation-specific kind a plain hardware
    /// failure maps to (`Init`, `Enable`, `Disable` or `BlockingWrite`).
    pub(crate) const fn into_uart_error(self, hardware_kind: ErrorKind) -> UartError {
        let kind = match self.cause {
            FaultCause::Hardware => hardware_kind,
            FaultCause::NotPresent => ErrorKind::InterfaceDoesNotExist,
            FaultCause::Unsupported => ErrorKind::FunctionalityNotSupported,
            FaultCause::Timeout => ErrorKind::Timeout,
        };
        UartError::with_platform(kind, self.platform)
    }
}

impl From<FaultCause> for DriverFault {
    fn from(cause: FaultCause) -> Self {
        Self::new(cause)
    }
}

impl fmt::Display for DriverFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            FaultCause::Hardware => f.write_str("hardware fault")?,
            FaultCause::NotPresent => f.write_str("peripheral not present")?,
            FaultCause::Unsupported => f.write_str("unsupported on this target")?,
            FaultCause::Timeout => f.write_str("peripheral timeout")?,
        }
        if let Some(platform) = self.platform {
            write!(f, " ({})", platform)?;
        }
        Ok(())
    }
}

/// Register-level hooks for one UART peripheral instance
///
/// Hooks are only called by the endpoint after its own checks pass: rate
/// validated, lifecycle preconditions met. They run in thread/task context.
pub trait UartDriver {
    /// Program the peripheral for `rate`
    ///
    /// Called once. Receive and transmit must stay off afterwards.
    fn configure(&mut self, rate: BaudRate) -> DriverResult;

    /// Bring the receive path online and unmask the rx interrupt
    fn start_rx(&mut self) -> DriverResult;

    /// Bring the transmit path online
    fn start_tx(&mut self) -> DriverResult;

    /// Mask the rx interrupt and quiesce the receive path
    ///
    /// Must succeed when the path is already stopped.
    fn stop_rx(&mut self) -> DriverResult;

    /// Quiesce the transmit path
    ///
    /// Must succeed when the path is already stopped.
    fn stop_tx(&mut self) -> DriverResult;

    /// Whether the transmitter can accept another byte
    fn tx_ready(&mut self) -> bool;

    /// Hand one byte to the transmitter
    ///
    /// Only called after [`tx_ready`](Self::tx_ready) returned true.
    fn transmit(&mut self, byte: u8) -> DriverResult;

    /// Framing the peripheral runs with
    fn frame_format(&self) -> FrameFormat {
        FrameFormat::EIGHT_N_ONE
    }
}

impl<D: UartDriver + ?Sized> UartDriver for &mut D {
    fn configure(&mut self, rate: BaudRate) -> DriverResult {
        (**self).configure(rate)
    }

    fn start_rx(&mut self) -> DriverResult {
        (**self).start_rx()
    }

    fn start_tx(&mut self) -> DriverResult {
        (**self).start_tx()
    }

    fn stop_rx(&mut self) -> DriverResult {
        (**self).stop_rx()
    }

    fn stop_tx(&mut self) -> DriverResult {
        (**self).stop_tx()
    }

    fn tx_ready(&mut self) -> bool {
        (**self).tx_ready()
    }

    fn transmit(&mut self, byte: u8) -> DriverResult {
        (**self).transmit(byte)
    }

    fn frame_format(&self) -> FrameFormat {
        (**self).frame_format()
    }
}
