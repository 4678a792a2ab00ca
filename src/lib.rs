// src/lib.rs
//! Hardware abstraction layer for UART peripherals
//!
//! Defines the platform-neutral contract that application and middleware
//! code depends on ([`UartInterface`]) and the hardware seam concrete drivers
//! implement ([`UartDriver`]). [`UartEndpoint`] joins the two and enforces
//! the endpoint lifecycle so drivers only deal with registers.
//!
//! - Supported line rates: 9600 to 921600 bps ([`BaudRate`])
//! - Framing: 8 data bits, no parity, 1 stop bit (8N1) unless the driver
//!   reports otherwise
//! - Reception is push-oriented: the driver delivers bytes upward from its
//!   interrupt handler into an application-arranged [`RxSink`]
//!
//! # Example
//!
//! ```
//! use hal_uart::mock::MockDriver;
//! use hal_uart::{QueueSink, UartEndpoint, UartInterface, UartStatus};
//!
//! let mut uart = UartEndpoint::new(MockDriver::new(), QueueSink::new(16));
//! assert!(uart.init(115_200).is_ok());
//! assert!(uart.enable_tx().is_ok());
//!
//! let result = uart.write(b"Hi");
//! assert_eq!(UartStatus::of(&result), UartStatus::Success);
//! assert_eq!(uart.driver().transmitted(), b"Hi");
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(missing_docs))]

extern crate alloc;

pub mod uart;

pub use uart::mock;
pub use uart::{
    BackoffStrategy, BaudRate, Completion, DataBits, Direction, DriverFault, DriverResult,
    EndpointConfig, ErrorKind, FaultCause, FrameFormat, Parity, PlatformStatus, QueueSink,
    ReceivedBytes, RxSink, SharedUart, SinkError, StopBits, TimeoutConfig, UartDriver,
    UartEndpoint, UartError, UartInterface, UartResult, UartStatus, UnsupportedBaudRate,
};
