// src/uart/mod.rs

//! UART capability, driver seam and lifecycle endpoint
//!
//! Layering, from the application down:
//! - [`UartInterface`]: the capability applications hold
//! - [`UartEndpoint`]: lifecycle enforcement, status mapping and the
//!   bounded transmit wait
//! - [`UartDriver`]: register-level hooks supplied per peripheral
//!
//! # Concurrency
//!
//! - Queries and [`UartInterface::deliver_received_byte`] take `&self` and
//!   only touch atomics and the lock-free sink, so they are safe from
//!   interrupt context
//! - Initialization, enable/disable and writes take `&mut self` and run in
//!   thread/task context
//! - Concurrent writers serialize through [`SharedUart`], which locks the
//!   driver only and keeps queries and delivery lock-free

mod baud;
mod config;
mod driver;
mod endpoint;
mod error;
mod interface;
pub mod mock;
mod shared;
mod sink;
mod state;
mod status;
mod timeout;

pub use baud::{BaudRate, UnsupportedBaudRate};
pub use config::{DataBits, EndpointConfig, FrameFormat, Parity, StopBits};
pub use driver::{DriverFault, DriverResult, FaultCause, UartDriver};
pub use endpoint::UartEndpoint;
pub use error::{Completion, ErrorKind, PlatformStatus, UartError, UartResult};
pub use interface::UartInterface;
pub use shared::SharedUart;
pub use sink::{DEFAULT_RX_CAPACITY, QueueSink, ReceivedBytes, RxSink, SinkError};
pub use state::Direction;
pub use status::UartStatus;
pub use timeout::{BackoffStrategy, TimeoutConfig, timeout_stats};
