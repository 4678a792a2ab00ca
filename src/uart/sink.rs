// src/uart/sink.rs

//! Receive sinks
//!
//! The driver pushes every received byte upward through
//! [`UartInterface::deliver_received_byte`](super::UartInterface::deliver_received_byte),
//! which hands it to the sink the application arranged. Sinks are pushed
//! from interrupt context: `push` takes `&self`, must not block and must
//! not take locks.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use core::task::{Context, Poll};
use crossbeam_queue::ArrayQueue;
use futures_util::Stream;
use futures_util::task::AtomicWaker;

/// Default capacity of a [`QueueSink`]
pub const DEFAULT_RX_CAPACITY: usize = 64;

/// Why a sink refused a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// No room for the byte; it was dropped
    Full,
    /// The consumer is gone
    Closed,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Full => f.write_str("receive sink full"),
            SinkError::Closed => f.write_str("receive sink closed"),
        }
    }
}

/// Destination of received bytes
pub trait RxSink {
    /// Accept one byte from interrupt context
    fn push(&self, byte: u8) -> Result<(), SinkError>;
}

impl<T: RxSink + ?Sized> RxSink for &T {
    fn push(&self, byte: u8) -> Result<(), SinkError> {
        (**self).push(byte)
    }
}

impl<T: RxSink + ?Sized> RxSink for Arc<T> {
    fn push(&self, byte: u8) -> Result<(), SinkError> {
        (**self).push(byte)
    }
}

/// Bounded lock-free byte queue
///
/// Overflowing bytes are rejected and counted, never overwrite queued data.
/// Consumers either poll with [`pop`](Self::pop) or await
/// [`bytes`](Self::bytes).
pub struct QueueSink {
    queue: ArrayQueue<u8>,
    waker: AtomicWaker,
    dropped: AtomicU32,
    closed: AtomicBool,
}

impl QueueSink {
    /// Create a queue holding up to `capacity` bytes (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            waker: AtomicWaker::new(),
            dropped: AtomicU32::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Take the oldest queued byte
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        self.queue.pop()
    }

    /// Take every queued byte, oldest first
    pub fn drain(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.queue.len());
        while let Some(byte) = self.queue.pop() {
            bytes.push(byte);
        }
        bytes
    }

    /// Number of queued bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no byte is queued
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of queued bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Bytes rejected because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Refuse further bytes and end the [`bytes`](Self::bytes) stream once
    /// the queue drains
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.waker.wake();
    }

    /// Whether [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Asynchronous stream of received bytes
    pub fn bytes(&self) -> ReceivedBytes<'_> {
        ReceivedBytes { sink: self }
    }
}

impl Default for QueueSink {
    fn default() -> Self {
        Self::new(DEFAULT_RX_CAPACITY)
    }
}

impl fmt::Debug for QueueSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSink")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("dropped", &self.dropped())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl RxSink for QueueSink {
    fn push(&self, byte: u8) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        if self.queue.push(byte).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(SinkError::Full);
        }
        self.waker.wake();
        Ok(())
    }
}

/// Stream of bytes arriving in a [`QueueSink`]
///
/// Ends after the sink is closed and drained.
#[derive(Debug)]
pub struct ReceivedBytes<'a> {
    sink: &'a QueueSink,
}

impl Stream for ReceivedBytes<'_> {
    type Item = u8;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<u8>> {
        if let Some(byte) = self.sink.pop() {
            return Poll::Ready(Some(byte));
        }

        self.sink.waker.register(cx.waker());

        // a push may have landed between the pop and the registration
        match self.sink.pop() {
            Some(byte) => Poll::Ready(Some(byte)),
            None if self.sink.is_closed() => Poll::Ready(None),
            None => Poll::Pending,
        }
    }
}
