//! Error types for the Linux driver

use thiserror::Error;

/// Linux GPIO/SPI driver errors
#[derive(Debug, Error)]
pub enum LinuxError {
    /// Failed to open GPIO chip
    #[error("Failed to open GPIO chip '{path}': {source}")]
    ChipOpenFailed {
        path: String,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to request a GPIO line
    #[error("Failed to request BCM {line}: {source}")]
    LineRequestFailed {
        line: u8,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to switch a requested line between input and output
    #[error("Failed to reconfigure BCM {line}: {source}")]
    ReconfigureFailed {
        line: u8,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to get GPIO line value
    #[error("Failed to read BCM {line}: {source}")]
    GetValueFailed {
        line: u8,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to set GPIO line value
    #[error("Failed to write BCM {line}: {source}")]
    SetValueFailed {
        line: u8,
        #[source]
        source: gpiocdev::Error,
    },

    /// Write to a line that was not configured as output
    #[error("BCM {0} is not configured as output")]
    NotAnOutput(u8),

    /// Failed to open a spidev device
    #[error("Failed to open {path}: {source}")]
    SpiOpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set SPI mode
    #[error("Failed to set SPI mode to {mode:#04x}: {source}")]
    SetModeFailed {
        mode: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set bit order
    #[error("Failed to set SPI bit order: {0}")]
    SetBitOrderFailed(#[source] std::io::Error),

    /// Failed to set bits per word
    #[error("Failed to set bits per word to {bits}: {source}")]
    SetBitsPerWordFailed {
        bits: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set clock speed
    #[error("Failed to set clock speed to {speed} Hz: {source}")]
    SetSpeedFailed {
        speed: u32,
        #[source]
        source: std::io::Error,
    },

    /// SPI transfer failed
    #[error("SPI transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// spidev has no device for this chip select
    #[error("Chip select {0:?} is not available through spidev")]
    UnsupportedChipSelect(rpio_core::ChipSelect),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for Linux driver operations
pub type Result<T> = std::result::Result<T, LinuxError>;
