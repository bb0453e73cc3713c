//! SPI transfer parameters
//!
//! Raw values follow the BCM283x SPI0 controller numbering, so a value read
//! from a config file or the command line converts directly.

use crate::error::Error;
use core::fmt;

/// Core clock feeding the SPI0 divider on BCM283x
pub const CORE_CLOCK_HZ: u32 = 250_000_000;

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BitOrder {
    LsbFirst = 0,
    #[default]
    MsbFirst = 1,
}

impl TryFrom<u8> for BitOrder {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BitOrder::LsbFirst),
            1 => Ok(BitOrder::MsbFirst),
            _ => Err(Error::InvalidParameter(format!(
                "bit order {} (must be 0 for LSB first or 1 for MSB first)",
                value
            ))),
        }
    }
}

/// Clock polarity and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataMode {
    /// CPOL=0, CPHA=0
    #[default]
    Mode0 = 0,
    /// CPOL=0, CPHA=1
    Mode1 = 1,
    /// CPOL=1, CPHA=0
    Mode2 = 2,
    /// CPOL=1, CPHA=1
    Mode3 = 3,
}

impl DataMode {
    /// Clock idles high
    pub const fn cpol(self) -> bool {
        matches!(self, DataMode::Mode2 | DataMode::Mode3)
    }

    /// Data is sampled on the trailing clock edge
    pub const fn cpha(self) -> bool {
        matches!(self, DataMode::Mode1 | DataMode::Mode3)
    }
}

impl TryFrom<u8> for DataMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataMode::Mode0),
            1 => Ok(DataMode::Mode1),
            2 => Ok(DataMode::Mode2),
            3 => Ok(DataMode::Mode3),
            _ => Err(Error::InvalidParameter(format!(
                "SPI data mode {} (must be 0-3)",
                value
            ))),
        }
    }
}

/// Chip select line asserted during a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ChipSelect {
    Cs0 = 0,
    Cs1 = 1,
    /// CS0 and CS1 together
    Cs2 = 2,
    /// No chip select; the caller drives it
    #[default]
    None = 3,
}

impl TryFrom<u8> for ChipSelect {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChipSelect::Cs0),
            1 => Ok(ChipSelect::Cs1),
            2 => Ok(ChipSelect::Cs2),
            3 => Ok(ChipSelect::None),
            _ => Err(Error::InvalidParameter(format!(
                "chip select {} (must be 0-3)",
                value
            ))),
        }
    }
}

/// SPI clock divider
///
/// The controller divides [`CORE_CLOCK_HZ`] by a power of two. A raw value of
/// 0 stands for the largest divider, 65536.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockDivider(u16);

impl ClockDivider {
    pub const DIV_2: Self = Self(2);
    pub const DIV_4: Self = Self(4);
    pub const DIV_8: Self = Self(8);
    pub const DIV_16: Self = Self(16);
    pub const DIV_32: Self = Self(32);
    pub const DIV_64: Self = Self(64);
    pub const DIV_128: Self = Self(128);
    pub const DIV_256: Self = Self(256);
    pub const DIV_512: Self = Self(512);
    pub const DIV_1024: Self = Self(1024);
    pub const DIV_2048: Self = Self(2048);
    pub const DIV_4096: Self = Self(4096);
    pub const DIV_8192: Self = Self(8192);
    pub const DIV_16384: Self = Self(16384);
    pub const DIV_32768: Self = Self(32768);
    pub const DIV_65536: Self = Self(0);

    /// Raw register value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Effective divisor
    pub const fn divisor(self) -> u32 {
        if self.0 == 0 {
            65536
        } else {
            self.0 as u32
        }
    }

    /// Resulting SPI clock in Hz
    pub const fn speed_hz(self) -> u32 {
        CORE_CLOCK_HZ / self.divisor()
    }
}

impl Default for ClockDivider {
    fn default() -> Self {
        ClockDivider::DIV_65536
    }
}

impl TryFrom<u16> for ClockDivider {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 || (value >= 2 && value.is_power_of_two()) {
            Ok(ClockDivider(value))
        } else {
            Err(Error::InvalidParameter(format!(
                "clock divider {} (must be a power of two from 2 to 32768, or 0 for 65536)",
                value
            )))
        }
    }
}

impl fmt::Display for ClockDivider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{} ({} Hz)", self.divisor(), self.speed_hz())
    }
}
