//! Error types for rpio-core

use crate::driver::Mode;
use thiserror::Error;

/// Boxed driver failure, as carried by [`Error::Driver`] and
/// [`Error::Configuration`]
pub type DriverFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Header pin is outside the table or is not a GPIO (power, ground, ID EEPROM)
    #[error("Invalid pin: {0}")]
    InvalidPin(i64),

    /// Driver refused a pin mode change
    #[error("Unable to configure pin {pin} (BCM {bcm}) for {mode}: {source}")]
    Configuration {
        pin: i64,
        bcm: u8,
        mode: Mode,
        #[source]
        source: DriverFailure,
    },

    /// Value cannot be coerced to a logic level
    #[error("Invalid level: '{0}'")]
    InvalidLevel(String),

    /// SPI parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Driver lacks a capability the request needs
    #[error("Not supported by this driver: {0}")]
    Unsupported(&'static str),

    /// Any other driver failure (read, write, SPI)
    #[error("Driver error: {0}")]
    Driver(#[source] DriverFailure),
}

impl Error {
    pub(crate) fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Driver(Box::new(err))
    }
}

/// Result type for rpio-core operations
pub type Result<T> = std::result::Result<T, Error>;
