// src/uart/interface.rs

//! The UART capability

use super::error::{ErrorKind, UartError, UartResult};

/// A UART endpoint as seen by application and middleware code
///
/// Each implementation targets exactly one peripheral instance. Every
/// operation must be realized; a target that cannot support one returns
/// [`ErrorKind::FunctionalityNotSupported`] rather than a stub success.
///
/// # Lifecycle
///
/// ```text
/// Uninitialized --init ok--> Initialized { rx: off, tx: off }
/// Initialized   --enable_rx / disable_rx--> toggles rx
/// Initialized   --enable_tx / disable_tx--> toggles tx
/// Initialized   --disable_both_rx_tx-->     { rx: off, tx: off }
/// ```
///
/// There is no transition back to uninitialized. Until [`init`](Self::init)
/// succeeds, every operation other than `init` and the two queries fails
/// with [`ErrorKind::InterfaceNotInitialized`].
///
/// # Platform status
///
/// Both arms of [`UartResult`] may carry a driver-defined
/// [`PlatformStatus`](super::PlatformStatus). Ignoring it never changes the
/// outcome.
pub trait UartInterface {
    /// Program the peripheral for `baud_rate` and mark the endpoint initialized
    ///
    /// # Errors
    ///
    /// - `BaudRateNotSupported` if `baud_rate` is not a [`BaudRate`](super::BaudRate)
    /// - `Init` if the hardware refused the configuration or the endpoint is
    ///   already initialized
    /// - `InterfaceDoesNotExist` if the target has no such peripheral
    fn init(&mut self, baud_rate: u32) -> UartResult;

    /// Whether [`init`](Self::init) has succeeded
    fn is_initialized(&self) -> bool;

    /// Whether the receive path is enabled
    fn is_rx_enabled(&self) -> bool;

    /// Bring the receive path online
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized` or `Enable`.
    fn enable_rx(&mut self) -> UartResult;

    /// Bring the transmit path online
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized` or `Enable`.
    fn enable_tx(&mut self) -> UartResult;

    /// Quiesce both paths
    ///
    /// Succeeds when only one direction was active and is idempotent on
    /// directions that are already disabled.
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized` or `Disable`.
    fn disable_both_rx_tx(&mut self) -> UartResult;

    /// Quiesce the receive path
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized` or `Disable`.
    fn disable_rx(&mut self) -> UartResult;

    /// Quiesce the transmit path
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized` or `Disable`.
    fn disable_tx(&mut self) -> UartResult;

    /// Blocking write
    ///
    /// Returns once every byte has been handed to the transmit path, in
    /// order, or a failure is detected. An empty slice is a no-op success on
    /// an initialized endpoint. Concurrent callers must serialize externally
    /// (see [`SharedUart`](super::SharedUart)).
    ///
    /// # Errors
    ///
    /// `InterfaceNotInitialized`, `BlockingWrite` or `Timeout`.
    fn write(&mut self, bytes: &[u8]) -> UartResult;

    /// Blocking write from a raw pointer and length
    ///
    /// Entry point for callers that hold a pointer/length pair instead of a
    /// slice. A null `bytes` with non-zero `count` fails with
    /// [`ErrorKind::NullPointer`] before any state check.
    ///
    /// # Safety
    ///
    /// When `bytes` is non-null and `count > 0`, `bytes` must be valid for
    /// reads of `count` bytes for the duration of the call.
    unsafe fn write_raw(&mut self, bytes: *const u8, count: usize) -> UartResult {
        if count == 0 {
            return self.write(&[]);
        }
        if bytes.is_null() {
            return Err(UartError::new(ErrorKind::NullPointer));
        }
        // SAFETY: non-null, and the caller guarantees `count` readable bytes.
        let slice = unsafe { core::slice::from_raw_parts(bytes, count) };
        self.write(slice)
    }

    /// Driver-to-application upcall for one received byte
    ///
    /// Invoked from the driver's interrupt handler. Implementations hand the
    /// byte to their sink and return without blocking or taking locks.
    ///
    /// # Errors
    ///
    /// `PresentReadByteToApplication` when the sink rejects or overflows.
    fn deliver_received_byte(&self, byte: u8) -> UartResult;
}
