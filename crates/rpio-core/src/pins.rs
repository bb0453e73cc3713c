//! Header pin to BCM GPIO numbering
//!
//! The 40-pin header numbers pins by physical position; the SoC and every
//! driver number them by BCM GPIO line. This module holds the fixed mapping
//! for the 40-pin (Model B+ and later) header.
//!
//! Pins that carry power, ground or the HAT ID EEPROM bus have no GPIO and
//! are rejected by [`translate`].

use crate::error::{Error, Result};
use core::fmt;

/// Number of pins on the header
pub const HEADER_PINS: u8 = 40;

/// What a header position is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinFunction {
    /// General purpose I/O, with its BCM line number
    Gpio(u8),
    /// 3.3 V supply
    Power3v3,
    /// 5 V supply
    Power5v,
    /// Ground
    Ground,
    /// HAT ID EEPROM bus (ID_SD / ID_SC), reserved
    IdEeprom,
}

impl PinFunction {
    /// BCM line number, if this position is a GPIO
    pub const fn bcm(self) -> Option<u8> {
        match self {
            PinFunction::Gpio(bcm) => Some(bcm),
            _ => None,
        }
    }
}

impl fmt::Display for PinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinFunction::Gpio(bcm) => write!(f, "GPIO{}", bcm),
            PinFunction::Power3v3 => f.write_str("3V3"),
            PinFunction::Power5v => f.write_str("5V"),
            PinFunction::Ground => f.write_str("GND"),
            PinFunction::IdEeprom => f.write_str("ID EEPROM"),
        }
    }
}

use self::PinFunction::{Gpio, Ground, IdEeprom, Power3v3, Power5v};

/// Header layout, indexed by `header pin - 1`
static HEADER: [PinFunction; HEADER_PINS as usize] = [
    Power3v3,  // 1
    Power5v,   // 2
    Gpio(0),   // 3
    Power5v,   // 4
    Gpio(1),   // 5
    Ground,    // 6
    Gpio(4),   // 7
    Gpio(14),  // 8
    Ground,    // 9
    Gpio(15),  // 10
    Gpio(17),  // 11
    Gpio(18),  // 12
    Gpio(27),  // 13
    Ground,    // 14
    Gpio(22),  // 15
    Gpio(23),  // 16
    Power3v3,  // 17
    Gpio(24),  // 18
    Gpio(10),  // 19
    Ground,    // 20
    Gpio(9),   // 21
    Gpio(25),  // 22
    Gpio(11),  // 23
    Gpio(8),   // 24
    Ground,    // 25
    Gpio(7),   // 26
    IdEeprom,  // 27 ID_SD
    IdEeprom,  // 28 ID_SC
    Gpio(5),   // 29
    Ground,    // 30
    Gpio(6),   // 31
    Gpio(12),  // 32
    Gpio(13),  // 33
    Ground,    // 34
    Gpio(19),  // 35
    Gpio(16),  // 36
    Gpio(26),  // 37
    Gpio(20),  // 38
    Ground,    // 39
    Gpio(21),  // 40
];

/// Look up what a header pin is wired to
///
/// Returns `None` outside `1..=40`.
pub fn header_pin_function(pin: impl Into<i64>) -> Option<PinFunction> {
    let pin = pin.into();
    if !(1..=HEADER_PINS as i64).contains(&pin) {
        return None;
    }
    Some(HEADER[(pin - 1) as usize])
}

/// Translate a header pin number to its BCM GPIO number
///
/// BCM 0 (header pin 3) is a valid result.
///
/// # Errors
///
/// [`Error::InvalidPin`] if the pin is outside the header or is not a GPIO.
pub fn translate(pin: impl Into<i64>) -> Result<u8> {
    let pin = pin.into();
    header_pin_function(pin)
        .and_then(PinFunction::bcm)
        .ok_or(Error::InvalidPin(pin))
}

/// Find the header pin carrying a BCM GPIO line
pub fn bcm_to_header(bcm: u8) -> Option<u8> {
    HEADER
        .iter()
        .position(|f| *f == Gpio(bcm))
        .map(|idx| idx as u8 + 1)
}

/// Iterate over the whole header as `(header pin, function)` pairs
pub fn header() -> impl Iterator<Item = (u8, PinFunction)> {
    HEADER.iter().enumerate().map(|(idx, f)| (idx as u8 + 1, *f))
}
