//! Driver trait definitions
//!
//! A driver performs the actual hardware access. It is addressed purely in
//! BCM numbering; header pin translation happens in [`crate::Rpio`] before
//! any driver call.

use crate::level::Level;
use crate::spi::{BitOrder, ChipSelect, ClockDivider, DataMode};
use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Driver feature flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DriverFeatures: u32 {
        /// Can assert CS0 and CS1 together (`ChipSelect::Cs2`)
        const SPI_CS_BOTH   = 1 << 0;
        /// Can leave chip select alone (`ChipSelect::None`)
        const SPI_NO_CS     = 1 << 1;
        /// Can shift LSB first
        const SPI_LSB_FIRST = 1 << 2;
    }
}

impl Default for DriverFeatures {
    fn default() -> Self {
        DriverFeatures::empty()
    }
}

/// GPIO function select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Line is sampled, not driven
    Input,
    /// Line is driven from its output latch
    Output,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Input => f.write_str("input"),
            Mode::Output => f.write_str("output"),
        }
    }
}

/// Low-level GPIO and SPI access
///
/// Every call is blocking and returns once the hardware has been updated.
/// Implementations that need exclusive access across processes must arrange
/// it themselves.
pub trait GpioDriver {
    /// Driver specific failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Optional capabilities beyond plain GPIO and SPI on CS0/CS1
    fn features(&self) -> DriverFeatures {
        DriverFeatures::empty()
    }

    /// Set the function of a BCM line
    fn set_mode(&mut self, bcm: u8, mode: Mode) -> Result<(), Self::Error>;

    /// Sample a BCM line
    fn read(&mut self, bcm: u8) -> Result<Level, Self::Error>;

    /// Drive a BCM line
    fn write(&mut self, bcm: u8, level: Level) -> Result<(), Self::Error>;

    /// Full-duplex SPI transfer
    ///
    /// Shifts out the first `len` bytes of `data` and returns the `len` bytes
    /// clocked in meanwhile. With `cs_mux` set, chip select stays asserted
    /// after the transfer so the next one continues the same frame.
    fn spi_transfer(
        &mut self,
        data: &[u8],
        len: usize,
        cs: ChipSelect,
        cs_mux: bool,
    ) -> Result<Vec<u8>, Self::Error>;

    fn spi_set_bit_order(&mut self, order: BitOrder) -> Result<(), Self::Error>;

    fn spi_set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error>;

    fn spi_set_clock_divider(&mut self, divider: ClockDivider) -> Result<(), Self::Error>;
}

impl<D: GpioDriver + ?Sized> GpioDriver for &mut D {
    type Error = D::Error;

    fn features(&self) -> DriverFeatures {
        (**self).features()
    }

    fn set_mode(&mut self, bcm: u8, mode: Mode) -> Result<(), Self::Error> {
        (**self).set_mode(bcm, mode)
    }

    fn read(&mut self, bcm: u8) -> Result<Level, Self::Error> {
        (**self).read(bcm)
    }

    fn write(&mut self, bcm: u8, level: Level) -> Result<(), Self::Error> {
        (**self).write(bcm, level)
    }

    fn spi_transfer(
        &mut self,
        data: &[u8],
        len: usize,
        cs: ChipSelect,
        cs_mux: bool,
    ) -> Result<Vec<u8>, Self::Error> {
        (**self).spi_transfer(data, len, cs, cs_mux)
    }

    fn spi_set_bit_order(&mut self, order: BitOrder) -> Result<(), Self::Error> {
        (**self).spi_set_bit_order(order)
    }

    fn spi_set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error> {
        (**self).spi_set_data_mode(mode)
    }

    fn spi_set_clock_divider(&mut self, divider: ClockDivider) -> Result<(), Self::Error> {
        (**self).spi_set_clock_divider(divider)
    }
}
