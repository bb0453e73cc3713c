//! Digital logic levels

use crate::error::Error;
use core::fmt;
use core::str::FromStr;

/// Raw value of a low pin
pub const LOW: u8 = 0x0;
/// Raw value of a high pin
pub const HIGH: u8 = 0x1;

/// Logic level of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Level {
    #[default]
    Low = LOW,
    High = HIGH,
}

impl Level {
    /// Raw value as passed to and from drivers
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Level for a raw integer; any non-zero value is high
    pub const fn from_int(value: i64) -> Self {
        if value != 0 {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Level::from_int(value.into())
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level::from_int(value.into())
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Parse the leading integer of a string
///
/// Leading whitespace and one sign are skipped, then decimal digits are read
/// up to the first non-digit. `"1.7"` yields 1, `" -3x"` yields -3.
/// A `0x` prefix switches to hex digits, so `"0x10"` yields 16.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Only zero vs non-zero matters, so saturate rather than fail on overflow
    let magnitude = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl FromStr for Level {
    type Err = Error;

    /// Coerce text to a level the way a loosely typed caller would:
    /// `"1"`, `"1.0"` and `"5"` are high, `"0"` and `"-0"` are low.
    /// `"high"` and `"low"` are accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => return Ok(Level::High),
            "low" => return Ok(Level::Low),
            _ => {}
        }

        parse_int_prefix(s)
            .map(Level::from_int)
            .ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}
