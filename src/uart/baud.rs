// src/uart/baud.rs

//! Supported line rates
//!
//! The domain is closed: an endpoint accepts exactly these rates and rejects
//! everything else with `BaudRateNotSupportedError`.

use core::fmt;

/// UART line rate in bits per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum BaudRate {
    /// 9600 bps
    Baud9600 = 9_600,
    /// 19200 bps
    Baud19200 = 19_200,
    /// 28800 bps
    Baud28800 = 28_800,
    /// 38400 bps
    Baud38400 = 38_400,
    /// 57600 bps
    Baud57600 = 57_600,
    /// 76800 bps
    Baud76800 = 76_800,
    /// 115200 bps
    Baud115200 = 115_200,
    /// 230400 bps
    Baud230400 = 230_400,
    /// 460800 bps
    Baud460800 = 460_800,
    /// 576000 bps
    Baud576000 = 576_000,
    /// 921600 bps
    Baud921600 = 921_600,
}

impl BaudRate {
    /// Every supported rate, ascending
    pub const ALL: [BaudRate; 11] = [
        BaudRate::Baud9600,
        BaudRate::Baud19200,
        BaudRate::Baud28800,
        BaudRate::Baud38400,
        BaudRate::Baud57600,
        BaudRate::Baud76800,
        BaudRate::Baud115200,
        BaudRate::Baud230400,
        BaudRate::Baud460800,
        BaudRate::Baud576000,
        BaudRate::Baud921600,
    ];

    /// Rate in bits per second
    #[inline]
    pub const fn bps(self) -> u32 {
        self as u32
    }

    /// Whether `bps` is one of the supported rates
    pub fn is_supported(bps: u32) -> bool {
        Self::from_bps(bps).is_some()
    }

    /// Look up a supported rate
    pub fn from_bps(bps: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|rate| rate.bps() == bps)
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.bps()
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = UnsupportedBaudRate;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::from_bps(bps).ok_or(UnsupportedBaudRate(bps))
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.bps())
    }
}

/// Requested rate outside the supported set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedBaudRate(pub u32);

impl fmt::Display for UnsupportedBaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported baud rate {} bps", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_rates() {
        let expected = [
            9600, 19200, 28800, 38400, 57600, 76800, 115200, 230400, 460800, 576000, 921600,
        ];
        let actual: Vec<u32> = BaudRate::ALL.iter().map(|rate| rate.bps()).collect();
        assert_eq!(actual, expected);
        for bps in expected {
            assert_eq!(BaudRate::try_from(bps).map(u32::from), Ok(bps));
        }
    }

    #[test]
    fn test_unsupported_rates_rejected() {
        for bps in [0, 1200, 4800, 100_000, 115_201, 1_000_000, u32::MAX] {
            assert_eq!(BaudRate::try_from(bps), Err(UnsupportedBaudRate(bps)));
            assert!(!BaudRate::is_supported(bps));
        }
    }

    #[test]
    fn test_all_is_ascending() {
        assert!(BaudRate::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BaudRate::Baud115200), "115200 bps");
        assert_eq!(
            format!("{}", UnsupportedBaudRate(100_000)),
            "unsupported baud rate 100000 bps"
        );
    }
}
