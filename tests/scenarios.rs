// tests/scenarios.rs
//! End-to-end scenarios against the always-succeeding mock driver

use hal_uart::mock::MockDriver;
use hal_uart::{QueueSink, UartEndpoint, UartInterface, UartStatus};

fn fresh() -> UartEndpoint<MockDriver, QueueSink> {
    UartEndpoint::new(MockDriver::new(), QueueSink::new(16))
}

#[test]
fn init_at_115200_succeeds() {
    let mut uart = fresh();
    let result = uart.init(115_200);
    assert_eq!(UartStatus::of(&result), UartStatus::Success);
    assert!(uart.is_initialized());
}

#[test]
fn write_on_fresh_endpoint_is_rejected() {
    let mut uart = fresh();
    let result = uart.write(b"AB");
    assert_eq!(
        UartStatus::of(&result),
        UartStatus::InterfaceNotInitializedError
    );
    assert!(uart.driver().transmitted().is_empty());
}

#[test]
fn init_at_unsupported_rate_is_rejected() {
    let mut uart = fresh();
    let result = uart.init(100_000);
    assert_eq!(UartStatus::of(&result), UartStatus::BaudRateNotSupportedError);
    assert!(!uart.is_initialized());
}

#[test]
fn write_transmits_bytes_in_order() {
    let mut uart = fresh();
    uart.init(9600).unwrap();
    uart.enable_tx().unwrap();

    let result = uart.write(b"Hi");
    assert_eq!(UartStatus::of(&result), UartStatus::Success);
    assert_eq!(uart.driver().transmitted(), &[b'H', b'i']);
}

#[test]
fn delivered_byte_reaches_sink() {
    let mut uart = fresh();
    uart.init(9600).unwrap();
    uart.enable_rx().unwrap();

    let result = uart.deliver_received_byte(0x7E);
    assert_eq!(UartStatus::of(&result), UartStatus::Success);
    assert_eq!(uart.sink().drain(), vec![0x7E]);
}

#[test]
fn disable_both_clears_rx_and_tx() {
    let mut uart = fresh();
    uart.init(9600).unwrap();
    uart.enable_rx().unwrap();
    uart.enable_tx().unwrap();

    assert!(uart.disable_both_rx_tx().is_ok());
    assert!(!uart.is_rx_enabled());
    assert!(!uart.is_tx_enabled());
    assert!(!uart.driver().rx_running());
    assert!(!uart.driver().tx_running());
}
