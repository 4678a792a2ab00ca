// src/uart/config.rs

//! Line framing and endpoint configuration
//!
//! Framing is not selectable through the capability. Drivers that run
//! something other than 8N1 report it through [`UartDriver::frame_format`]
//! so applications can check it out of band.
//!
//! [`UartDriver::frame_format`]: super::UartDriver::frame_format

use super::timeout::TimeoutConfig;
use core::fmt;

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    /// 5 data bits
    Five,
    /// 6 data bits
    Six,
    /// 7 data bits
    Seven,
    /// 8 data bits
    Eight,
}

impl DataBits {
    /// Number of data bits
    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 2 stop bits
    Two,
}

/// Character framing on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    /// Data bits per character
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Stop bits per character
    pub stop_bits: StopBits,
}

impl FrameFormat {
    /// 8 data bits, no parity, 1 stop bit
    pub const EIGHT_N_ONE: FrameFormat = FrameFormat {
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };

    /// Bits on the wire per character, start bit included
    pub const fn bits_per_character(&self) -> u8 {
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + self.data_bits.bits() + parity + stop
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::EIGHT_N_ONE
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{}{}{}", self.data_bits.bits(), parity, stop)
    }
}

/// Endpoint behavior that the capability does not expose
#[derive(Debug, Clone, Copy)]
pub struct EndpointConfig {
    /// Bound on the per-byte wait for the transmitter, scaled to the line rate
    ///
    /// `None` waits until the driver reports ready, however long that takes.
    pub write_timeout: Option<TimeoutConfig>,
}

impl EndpointConfig {
    /// Bounded writes with the balanced timeout
    pub const fn bounded() -> Self {
        Self {
            write_timeout: Some(TimeoutConfig::default_timeout()),
        }
    }

    /// Writes wait for the transmitter without bound
    pub const fn unbounded() -> Self {
        Self {
            write_timeout: None,
        }
    }

    /// Bounded writes with a custom timeout
    pub const fn with_write_timeout(timeout: TimeoutConfig) -> Self {
        Self {
            write_timeout: Some(timeout),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::bounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_is_8n1() {
        let frame = FrameFormat::default();
        assert_eq!(frame, FrameFormat::EIGHT_N_ONE);
        assert_eq!(frame.bits_per_character(), 10);
        assert_eq!(format!("{}", frame), "8N1");
    }

    #[test]
    fn test_frame_bits_with_parity() {
        let frame = FrameFormat {
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
        };
        assert_eq!(frame.bits_per_character(), 11);
        assert_eq!(format!("{}", frame), "7E2");
    }

    #[test]
    fn test_endpoint_config_defaults() {
        let config = EndpointConfig::default();
        assert_eq!(config.write_timeout, Some(TimeoutConfig::default_timeout()));
        assert!(EndpointConfig::unbounded().write_timeout.is_none());
    }
}
