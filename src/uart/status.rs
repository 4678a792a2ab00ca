// src/uart/status.rs

//! Status taxonomy shared by every UART operation

use super::error::{ErrorKind, UartResult};
use core::fmt;

/// Outcome of a UART operation
///
/// The discriminants are stable: `Success` is zero and failures follow in
/// declaration order. Use [`UartStatus::code`] when the outcome has to cross
/// a logging or foreign-function boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum UartStatus {
    /// Operation completed as specified
    Success = 0,
    /// A required input reference was absent
    NullPointerError,
    /// Hardware refused or failed configuration
    InitError,
    /// Failed to bring a direction online
    EnableError,
    /// Failed to quiesce a direction
    DisableError,
    /// Hardware-reported transmit failure
    BlockingWriteError,
    /// Receive-path sink rejected the byte
    PresentReadByteToApplicationError,
    /// Target has no such peripheral
    InterfaceDoesNotExistError,
    /// Operation requires initialization and none has succeeded
    InterfaceNotInitializedError,
    /// Requested rate outside the supported set
    BaudRateNotSupportedError,
    /// Bounded-wait policy elapsed
    TimeoutError,
    /// Operation cannot be realized on this target
    FunctionalityNotSupportedError,
}

impl UartStatus {
    /// Every status value in code order
    pub const ALL: [UartStatus; 12] = [
        UartStatus::Success,
        UartStatus::NullPointerError,
        UartStatus::InitError,
        UartStatus::EnableError,
        UartStatus::DisableError,
        UartStatus::BlockingWriteError,
        UartStatus::PresentReadByteToApplicationError,
        UartStatus::InterfaceDoesNotExistError,
        UartStatus::InterfaceNotInitializedError,
        UartStatus::BaudRateNotSupportedError,
        UartStatus::TimeoutError,
        UartStatus::FunctionalityNotSupportedError,
    ];

    /// Status of an operation result, ignoring any platform diagnostic
    pub fn of(result: &UartResult) -> Self {
        match result {
            Ok(_) => UartStatus::Success,
            Err(err) => err.kind().into(),
        }
    }

    /// Stable integer code
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a status by its integer code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.code() == code)
    }

    /// Whether the status reports success
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, UartStatus::Success)
    }

    /// Failure kind, `None` for `Success`
    pub const fn error_kind(self) -> Option<ErrorKind> {
        match self {
            UartStatus::Success => None,
            UartStatus::NullPointerError => Some(ErrorKind::NullPointer),
            UartStatus::InitError => Some(ErrorKind::Init),
            UartStatus::EnableError => Some(ErrorKind::Enable),
            UartStatus::DisableError => Some(ErrorKind::Disable),
            UartStatus::BlockingWriteError => Some(ErrorKind::BlockingWrite),
            UartStatus::PresentReadByteToApplicationError => {
                Some(ErrorKind::PresentReadByteToApplication)
            }
            UartStatus::InterfaceDoesNotExistError => Some(ErrorKind::InterfaceDoesNotExist),
            UartStatus::InterfaceNotInitializedError => {
                Some(ErrorKind::InterfaceNotInitialized)
            }
            UartStatus::BaudRateNotSupportedError => Some(ErrorKind::BaudRateNotSupported),
            UartStatus::TimeoutError => Some(ErrorKind::Timeout),
            UartStatus::FunctionalityNotSupportedError => {
                Some(ErrorKind::FunctionalityNotSupported)
            }
        }
    }
}

impl From<ErrorKind> for UartStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NullPointer => UartStatus::NullPointerError,
            ErrorKind::Init => UartStatus::InitError,
            ErrorKind::Enable => UartStatus::EnableError,
            ErrorKind::Disable => UartStatus::DisableError,
            ErrorKind::BlockingWrite => UartStatus::BlockingWriteError,
            ErrorKind::PresentReadByteToApplication => {
                UartStatus::PresentReadByteToApplicationError
            }
            ErrorKind::InterfaceDoesNotExist => UartStatus::InterfaceDoesNotExistError,
            ErrorKind::InterfaceNotInitialized => UartStatus::InterfaceNotInitializedError,
            ErrorKind::BaudRateNotSupported => UartStatus::BaudRateNotSupportedError,
            ErrorKind::Timeout => UartStatus::TimeoutError,
            ErrorKind::FunctionalityNotSupported => UartStatus::FunctionalityNotSupportedError,
        }
    }
}

impl fmt::Display for UartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_kind() {
            None => f.write_str("success"),
            Some(kind) => f.write_str(kind.as_str()),
        }
    }
}
