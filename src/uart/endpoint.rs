// src/uart/endpoint.rs

//! Lifecycle-enforcing UART endpoint
//!
//! [`UartEndpoint`] realizes [`UartInterface`] for any [`UartDriver`]. It
//! owns the checks every driver would otherwise repeat:
//! - rate validation against the supported set
//! - the initialized / rx / tx state machine
//! - null and zero-length handling on the write path
//! - the bounded wait for the transmitter
//! - translation of driver faults into the status taxonomy

use super::baud::BaudRate;
use super::config::{EndpointConfig, FrameFormat};
use super::driver::{DriverResult, UartDriver};
use super::error::{Completion, ErrorKind, UartError, UartResult};
use super::interface::UartInterface;
use super::sink::RxSink;
use super::state::{Direction, LinkState};
use super::timeout::{self, TxWait};
use log::{debug, trace, warn};

/// Driver-independent half of an endpoint
///
/// Holds the lifecycle state, the receive sink and the configuration. All
/// of it is usable through `&self`: the state is atomic and the sink is
/// lock-free. Operations that reach the hardware borrow the driver
/// separately, so the driver can live behind a lock while queries and
/// delivery stay outside it.
pub(crate) struct EndpointCore<S: RxSink> {
    state: LinkState,
    sink: S,
    config: EndpointConfig,
}

impl<S: RxSink> EndpointCore<S> {
    pub(crate) const fn new(sink: S, config: EndpointConfig) -> Self {
        Self {
            state: LinkState::new(),
            sink,
            config,
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> &LinkState {
        &self.state
    }

    #[inline]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub(crate) fn config(&self) -> &EndpointConfig {
        &self.config
    }

    fn require_initialized(&self, operation: &'static str) -> Result<BaudRate, UartError> {
        self.state.baud_rate().ok_or_else(|| {
            warn!("uart: {} rejected, interface not initialized", operation);
            UartError::new(ErrorKind::InterfaceNotInitialized)
        })
    }

    pub(crate) fn init<D: UartDriver>(&self, driver: &mut D, baud_rate: u32) -> UartResult {
        let rate = BaudRate::try_from(baud_rate).map_err(|err| {
            warn!("uart: init rejected, {}", err);
            UartError::new(ErrorKind::BaudRateNotSupported)
        })?;

        if self.state.is_initialized() {
            warn!(
                "uart: init rejected, already initialized at {:?}",
                self.state.baud_rate()
            );
            return Err(UartError::new(ErrorKind::Init));
        }

        let completion = driver.configure(rate).map_err(|fault| {
            warn!("uart: configure for {} failed: {}", rate, fault);
            fault.into_uart_error(ErrorKind::Init)
        })?;

        self.state.mark_initialized(rate);
        debug!("uart: initialized at {} ({})", rate, driver.frame_format());
        Ok(completion)
    }

    /// Run a driver hook and record the direction change on success
    pub(crate) fn switch<D: UartDriver>(
        &self,
        driver: &mut D,
        operation: &'static str,
        direction: Direction,
        enable: bool,
        hook: fn(&mut D) -> DriverResult,
    ) -> UartResult {
        self.require_initialized(operation)?;

        let failure_kind = if enable {
            ErrorKind::Enable
        } else {
            ErrorKind::Disable
        };

        let completion = hook(driver).map_err(|fault| {
            warn!("uart: {} failed: {}", operation, fault);
            fault.into_uart_error(failure_kind)
        })?;

        if enable {
            self.state.enable(direction);
        } else {
            self.state.disable(direction);
        }
        debug!("uart: {} ok, directions now {:?}", operation, self.state.directions());
        Ok(completion)
    }

    /// Stop receive, then transmit
    ///
    /// Both legs always run and each clears only its own flag, so after a
    /// partial failure the flags still match what the hardware is doing.
    /// The first fault is reported.
    pub(crate) fn disable_both<D: UartDriver>(&self, driver: &mut D) -> UartResult {
        self.require_initialized("disable_both_rx_tx")?;

        let rx = self.stop_leg(driver, Direction::RX, D::stop_rx);
        let tx = self.stop_leg(driver, Direction::TX, D::stop_tx);
        debug!(
            "uart: disable_both_rx_tx done, directions now {:?}",
            self.state.directions()
        );

        match (rx, tx) {
            (Ok(_), Ok(completion)) => Ok(completion),
            (Err(fault), _) | (Ok(_), Err(fault)) => Err(fault.into_uart_error(ErrorKind::Disable)),
        }
    }

    fn stop_leg<D: UartDriver>(
        &self,
        driver: &mut D,
        direction: Direction,
        hook: fn(&mut D) -> DriverResult,
    ) -> DriverResult {
        let result = hook(driver);
        match &result {
            Ok(_) => self.state.disable(direction),
            Err(fault) => warn!("uart: stopping {:?} failed: {}", direction, fault),
        }
        result
    }

    pub(crate) fn write<D: UartDriver>(&self, driver: &mut D, bytes: &[u8]) -> UartResult {
        let rate = self.require_initialized("write")?;

        if bytes.is_empty() {
            return Ok(Completion::new());
        }

        if !self.state.is_enabled(Direction::TX) {
            warn!("uart: write rejected, transmit path disabled");
            return Err(UartError::new(ErrorKind::BlockingWrite));
        }

        let wait = self
            .config
            .write_timeout
            .map(|bound| TxWait::new(&bound, rate, driver.frame_format()));
        trace!(
            "uart: writing {} bytes at {}, per-byte budget {:?}",
            bytes.len(),
            rate,
            wait.map(|wait| wait.budget())
        );

        let mut last = Completion::new();
        for &byte in bytes {
            last = Self::transmit_byte(driver, wait.as_ref(), byte)?;
        }
        Ok(last)
    }

    /// Wait for the transmitter, then hand it one byte
    fn transmit_byte<D: UartDriver>(driver: &mut D, wait: Option<&TxWait>, byte: u8) -> UartResult {
        match wait {
            Some(wait) => {
                if let Err(expired) = wait.run(|| driver.tx_ready()) {
                    warn!(
                        "uart: transmitter not ready after {} polls (budget {})",
                        expired.polls, expired.budget
                    );
                    return Err(UartError::new(ErrorKind::Timeout));
                }
            }
            None => timeout::wait_unbounded(|| driver.tx_ready()),
        }

        driver.transmit(byte).map_err(|fault| {
            warn!("uart: transmit failed: {}", fault);
            fault.into_uart_error(ErrorKind::BlockingWrite)
        })
    }

    pub(crate) fn deliver(&self, byte: u8) -> UartResult {
        if !self.state.is_initialized() {
            return Err(UartError::new(ErrorKind::InterfaceNotInitialized));
        }
        self.sink
            .push(byte)
            .map(|()| Completion::new())
            .map_err(|_| UartError::new(ErrorKind::PresentReadByteToApplication))
    }

    /// Stop both paths of an initialized endpoint that is going away
    pub(crate) fn quiesce<D: UartDriver>(&self, driver: &mut D) {
        if !self.state.is_initialized() {
            return;
        }
        if let Err(err) = self.disable_both(driver) {
            warn!("uart: quiesce on drop failed: {}", err);
        }
    }
}

/// UART endpoint over one driver and one receive sink
///
/// Dropping an initialized endpoint quiesces both directions.
pub struct UartEndpoint<D: UartDriver, S: RxSink> {
    driver: D,
    core: EndpointCore<S>,
}

impl<D: UartDriver, S: RxSink> UartEndpoint<D, S> {
    /// Create an uninitialized endpoint with bounded writes
    pub fn new(driver: D, sink: S) -> Self {
        Self::with_config(driver, sink, EndpointConfig::default())
    }

    /// Create an uninitialized endpoint with explicit configuration
    pub fn with_config(driver: D, sink: S, config: EndpointConfig) -> Self {
        Self {
            driver,
            core: EndpointCore::new(sink, config),
        }
    }

    /// The underlying driver
    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The receive sink
    #[inline]
    pub fn sink(&self) -> &S {
        self.core.sink()
    }

    /// Endpoint configuration
    #[inline]
    pub fn config(&self) -> &EndpointConfig {
        self.core.config()
    }

    /// Configured line rate, `None` before initialization
    pub fn baud_rate(&self) -> Option<BaudRate> {
        self.core.state().baud_rate()
    }

    /// Currently enabled directions
    pub fn directions(&self) -> Direction {
        self.core.state().directions()
    }

    /// Whether the transmit path is enabled
    pub fn is_tx_enabled(&self) -> bool {
        self.core.state().is_enabled(Direction::TX)
    }

    /// Framing reported by the driver
    pub fn frame_format(&self) -> FrameFormat {
        self.driver.frame_format()
    }
}

impl<D: UartDriver, S: RxSink> UartInterface for UartEndpoint<D, S> {
    fn init(&mut self, baud_rate: u32) -> UartResult {
        self.core.init(&mut self.driver, baud_rate)
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        self.core.state().is_initialized()
    }

    #[inline]
    fn is_rx_enabled(&self) -> bool {
        self.core.state().is_enabled(Direction::RX)
    }

    fn enable_rx(&mut self) -> UartResult {
        self.core
            .switch(&mut self.driver, "enable_rx", Direction::RX, true, D::start_rx)
    }

    fn enable_tx(&mut self) -> UartResult {
        self.core
            .switch(&mut self.driver, "enable_tx", Direction::TX, true, D::start_tx)
    }

    fn disable_both_rx_tx(&mut self) -> UartResult {
        self.core.disable_both(&mut self.driver)
    }

    fn disable_rx(&mut self) -> UartResult {
        self.core
            .switch(&mut self.driver, "disable_rx", Direction::RX, false, D::stop_rx)
    }

    fn disable_tx(&mut self) -> UartResult {
        self.core
            .switch(&mut self.driver, "disable_tx", Direction::TX, false, D::stop_tx)
    }

    fn write(&mut self, bytes: &[u8]) -> UartResult {
        self.core.write(&mut self.driver, bytes)
    }

    fn deliver_received_byte(&self, byte: u8) -> UartResult {
        self.core.deliver(byte)
    }
}

impl<D: UartDriver, S: RxSink> Drop for UartEndpoint<D, S> {
    fn drop(&mut self) {
        self.core.quiesce(&mut self.driver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uart::driver::{DriverFault, FaultCause};
    use crate::uart::error::PlatformStatus;
    use crate::uart::mock::{Hook, MockDriver};
    use crate::uart::sink::QueueSink;
    use crate::uart::status::UartStatus;
    use crate::uart::timeout::{BackoffStrategy, TimeoutConfig};

    fn endpoint() -> UartEndpoint<MockDriver, QueueSink> {
        UartEndpoint::new(MockDriver::new(), QueueSink::new(8))
    }

    fn ready_endpoint() -> UartEndpoint<MockDriver, QueueSink> {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        uart.enable_rx().unwrap();
        uart.enable_tx().unwrap();
        uart
    }

    #[test]
    fn test_every_mutating_operation_requires_init() {
        let mut uart = endpoint();
        let results = [
            uart.enable_rx(),
            uart.enable_tx(),
            uart.disable_both_rx_tx(),
            uart.disable_rx(),
            uart.disable_tx(),
            uart.write(b"AB"),
            uart.write(&[]),
            uart.deliver_received_byte(0x55),
        ];
        for result in results {
            assert_eq!(
                UartStatus::of(&result),
                UartStatus::InterfaceNotInitializedError
            );
        }
        assert!(!uart.is_initialized());
        assert!(uart.driver().calls().is_empty());
    }

    #[test]
    fn test_init_records_rate() {
        let mut uart = endpoint();
        assert_eq!(uart.baud_rate(), None);
        assert!(uart.init(230_400).is_ok());
        assert_eq!(uart.baud_rate(), Some(BaudRate::Baud230400));
        assert_eq!(uart.driver().configured(), Some(BaudRate::Baud230400));
        assert_eq!(uart.directions(), Direction::empty());
    }

    #[test]
    fn test_reinit_fails_without_changing_rate() {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        let again = uart.init(115_200);
        assert_eq!(UartStatus::of(&again), UartStatus::InitError);
        assert_eq!(uart.baud_rate(), Some(BaudRate::Baud9600));
        assert_eq!(uart.driver().configured(), Some(BaudRate::Baud9600));
    }

    #[test]
    fn test_configure_fault_leaves_uninitialized() {
        let mut uart = endpoint();
        uart.driver
            .fail_next(Hook::Configure, DriverFault::hardware(PlatformStatus(-3)));
        let err = uart.init(57_600).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Init);
        assert_eq!(err.platform_status(), Some(PlatformStatus(-3)));
        assert!(!uart.is_initialized());

        assert!(uart.init(57_600).is_ok());
    }

    #[test]
    fn test_missing_peripheral() {
        let mut uart = UartEndpoint::new(MockDriver::absent(), QueueSink::new(1));
        let result = uart.init(9600);
        assert_eq!(UartStatus::of(&result), UartStatus::InterfaceDoesNotExistError);
        assert!(!uart.is_initialized());
    }

    #[test]
    fn test_enable_fault_keeps_flag_clear() {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        uart.driver.fail_next(Hook::StartRx, FaultCause::Hardware.into());
        assert_eq!(UartStatus::of(&uart.enable_rx()), UartStatus::EnableError);
        assert!(!uart.is_rx_enabled());
    }

    #[test]
    fn test_disable_fault_keeps_flag_set() {
        let mut uart = ready_endpoint();
        uart.driver.fail_next(Hook::StopTx, FaultCause::Hardware.into());
        assert_eq!(UartStatus::of(&uart.disable_tx()), UartStatus::DisableError);
        assert!(uart.is_tx_enabled());
    }

    #[test]
    fn test_unsupported_hook() {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        uart.driver.fail_next(Hook::StartTx, FaultCause::Unsupported.into());
        assert_eq!(
            UartStatus::of(&uart.enable_tx()),
            UartStatus::FunctionalityNotSupportedError
        );
    }

    #[test]
    fn test_write_requires_tx() {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        assert_eq!(UartStatus::of(&uart.write(b"x")), UartStatus::BlockingWriteError);
        assert!(uart.driver().transmitted().is_empty());
    }

    #[test]
    fn test_empty_write_is_noop_even_with_tx_disabled() {
        let mut uart = endpoint();
        uart.init(9600).unwrap();
        assert!(uart.write(&[]).is_ok());
        assert!(uart.driver().transmitted().is_empty());
    }

    #[test]
    fn test_write_stops_at_first_transmit_fault() {
        let mut uart = ready_endpoint();
        uart.driver.fail_transmit_after(2, DriverFault::hardware(PlatformStatus(9)));
        let err = uart.write(b"abcd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlockingWrite);
        assert_eq!(err.platform_status(), Some(PlatformStatus(9)));
        assert_eq!(uart.driver().transmitted(), b"ab");
    }

    #[test]
    fn test_write_times_out_on_busy_transmitter() {
        let mut uart = UartEndpoint::with_config(
            MockDriver::new(),
            QueueSink::new(1),
            EndpointConfig::with_write_timeout(TimeoutConfig {
                polls_per_us: 1,
                slack_characters: 2,
                backoff: BackoffStrategy::None,
            }),
        );
        uart.init(921_600).unwrap();
        uart.enable_tx().unwrap();
        uart.driver.set_tx_busy(true);

        assert_eq!(UartStatus::of(&uart.write(b"z")), UartStatus::TimeoutError);
        assert!(uart.driver().transmitted().is_empty());
    }

    #[test]
    fn test_write_budget_scales_with_line_rate() {
        // Two character times at one poll per microsecond: 22 polls at
        // 921600 bps, 2084 at 9600 bps.
        let config = EndpointConfig::with_write_timeout(TimeoutConfig {
            polls_per_us: 1,
            slack_characters: 2,
            backoff: BackoffStrategy::None,
        });

        let mut fast = UartEndpoint::with_config(MockDriver::new(), QueueSink::new(1), config);
        fast.init(921_600).unwrap();
        fast.enable_tx().unwrap();
        fast.driver.set_busy_polls(100);
        assert_eq!(UartStatus::of(&fast.write(b"f")), UartStatus::TimeoutError);

        let mut slow = UartEndpoint::with_config(MockDriver::new(), QueueSink::new(1), config);
        slow.init(9600).unwrap();
        slow.enable_tx().unwrap();
        slow.driver.set_busy_polls(100);
        assert!(slow.write(b"s").is_ok());
        assert_eq!(slow.driver().transmitted(), b"s");
    }

    #[test]
    fn test_unbounded_write_waits_for_ready() {
        let mut uart =
            UartEndpoint::with_config(MockDriver::new(), QueueSink::new(1), EndpointConfig::unbounded());
        uart.init(9600).unwrap();
        uart.enable_tx().unwrap();
        uart.driver.set_busy_polls(25);

        assert!(uart.write(b"ok").is_ok());
        assert_eq!(uart.driver().transmitted(), b"ok");
    }

    #[test]
    fn test_write_reports_last_platform_status() {
        let mut uart = ready_endpoint();
        uart.driver.set_transmit_status(Some(PlatformStatus(17)));
        let completion = uart.write(b"q").unwrap();
        assert_eq!(completion.platform_status(), Some(PlatformStatus(17)));
    }

    #[test]
    fn test_delivery_overflow() {
        let mut uart = UartEndpoint::new(MockDriver::new(), QueueSink::new(1));
        uart.init(9600).unwrap();
        uart.enable_rx().unwrap();

        assert!(uart.deliver_received_byte(1).is_ok());
        assert_eq!(
            UartStatus::of(&uart.deliver_received_byte(2)),
            UartStatus::PresentReadByteToApplicationError
        );
        assert_eq!(uart.sink().dropped(), 1);
        assert_eq!(uart.sink().drain(), vec![1]);
    }

    #[test]
    fn test_disable_both_tx_fault_still_clears_rx() {
        let mut uart = ready_endpoint();
        uart.driver
            .fail_next(Hook::StopTx, DriverFault::hardware(PlatformStatus(-5)));

        let err = uart.disable_both_rx_tx().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Disable);
        assert_eq!(err.platform_status(), Some(PlatformStatus(-5)));
        assert!(!uart.is_rx_enabled());
        assert!(!uart.driver().rx_running());
        assert!(uart.is_tx_enabled());
        assert!(uart.driver().tx_running());

        assert!(uart.disable_both_rx_tx().is_ok());
        assert_eq!(uart.directions(), Direction::empty());
    }

    #[test]
    fn test_disable_both_rx_fault_still_stops_tx() {
        let mut uart = ready_endpoint();
        uart.driver.fail_next(Hook::StopRx, FaultCause::Hardware.into());

        assert_eq!(
            UartStatus::of(&uart.disable_both_rx_tx()),
            UartStatus::DisableError
        );
        assert!(uart.is_rx_enabled());
        assert!(uart.driver().rx_running());
        assert!(!uart.is_tx_enabled());
        assert!(!uart.driver().tx_running());
        assert_eq!(uart.driver().calls().last_chunk(), Some(&[Hook::StopRx, Hook::StopTx]));
    }

    #[test]
    fn test_disable_both_idempotent() {
        let mut uart = ready_endpoint();
        assert!(uart.disable_both_rx_tx().is_ok());
        assert!(uart.disable_both_rx_tx().is_ok());
        assert_eq!(uart.directions(), Direction::empty());
        assert!(!uart.driver().rx_running());
        assert!(!uart.driver().tx_running());
    }

    #[test]
    fn test_drop_quiesces_initialized_endpoint() {
        let mut driver = MockDriver::new();
        {
            let mut uart = UartEndpoint::new(&mut driver, QueueSink::new(1));
            uart.init(9600).unwrap();
            uart.enable_tx().unwrap();
        }
        assert!(!driver.tx_running());
        assert_eq!(driver.calls().last_chunk(), Some(&[Hook::StopRx, Hook::StopTx]));
    }

    #[test]
    fn test_drop_leaves_uninitialized_driver_alone() {
        let mut driver = MockDriver::new();
        drop(UartEndpoint::new(&mut driver, QueueSink::new(1)));
        assert!(driver.calls().is_empty());
    }
}
