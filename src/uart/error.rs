// src/uart/error.rs

//! Error types for UART operations
//!
//! Every mutating operation returns [`UartResult`]. Both arms carry an
//! optional [`PlatformStatus`], the driver-defined diagnostic that the
//! abstract taxonomy does not model. Dropping it never changes the outcome.

use core::fmt;

/// Result of every mutating UART operation
pub type UartResult = Result<Completion, UartError>;

/// Opaque driver-specific diagnostic code
///
/// The meaning of the value is defined by each concrete driver and
/// documented alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformStatus(pub i32);

impl PlatformStatus {
    /// Raw diagnostic value
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl From<i32> for PlatformStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform status {}", self.0)
    }
}

/// Successful completion of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    platform: Option<PlatformStatus>,
}

impl Completion {
    /// Completion without driver diagnostics
    #[inline]
    pub const fn new() -> Self {
        Self { platform: None }
    }

    /// Completion carrying a driver diagnostic
    #[inline]
    pub const fn with_platform(status: PlatformStatus) -> Self {
        Self {
            platform: Some(status),
        }
    }

    /// Driver diagnostic reported with the completion, if any
    #[inline]
    pub const fn platform_status(&self) -> Option<PlatformStatus> {
        self.platform
    }
}

/// Failure kinds of the UART contract
///
/// Success is not a kind; see [`UartStatus`](super::UartStatus) for the
/// full taxonomy including it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input reference was absent
    NullPointer,
    /// Hardware refused or failed configuration
    Init,
    /// Failed to bring a direction online
    Enable,
    /// Failed to quiesce a direction
    Disable,
    /// Hardware-reported transmit failure
    BlockingWrite,
    /// Receive-path sink rejected the byte
    PresentReadByteToApplication,
    /// Target has no such peripheral
    InterfaceDoesNotExist,
    /// Operation requires initialization and none has succeeded
    InterfaceNotInitialized,
    /// Requested rate outside the supported set
    BaudRateNotSupported,
    /// Bounded-wait policy elapsed
    Timeout,
    /// Operation cannot be realized on this target
    FunctionalityNotSupported,
}

impl ErrorKind {
    /// Short human readable description
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NullPointer => "null pointer",
            ErrorKind::Init => "initialization failed",
            ErrorKind::Enable => "enable failed",
            ErrorKind::Disable => "disable failed",
            ErrorKind::BlockingWrite => "blocking write failed",
            ErrorKind::PresentReadByteToApplication => {
                "could not present read byte to application"
            }
            ErrorKind::InterfaceDoesNotExist => "interface does not exist",
            ErrorKind::InterfaceNotInitialized => "interface not initialized",
            ErrorKind::BaudRateNotSupported => "baud rate not supported",
            ErrorKind::Timeout => "timeout",
            ErrorKind::FunctionalityNotSupported => "functionality not supported",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UART error with optional driver diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartError {
    kind: ErrorKind,
    platform: Option<PlatformStatus>,
}

impl UartError {
    /// Create an error without driver diagnostics
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            platform: None,
        }
    }

    /// Create an error carrying a driver diagnostic
    #[inline]
    pub const fn with_platform(kind: ErrorKind, platform: Option<PlatformStatus>) -> Self {
        Self { kind, platform }
    }

    /// Failure kind
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Driver diagnostic reported with the failure, if any
    #[inline]
    pub const fn platform_status(&self) -> Option<PlatformStatus> {
        self.platform
    }

    /// Whether the failure is a lifecycle precondition violation
    #[inline]
    pub const fn is_not_initialized(&self) -> bool {
        matches!(self.kind, ErrorKind::InterfaceNotInitialized)
    }
}

impl From<ErrorKind> for UartError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UART error: {}", self.kind)?;
        if let Some(platform) = self.platform {
            write!(f, " ({})", platform)?;
        }
        Ok(())
    }
}
