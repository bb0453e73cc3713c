//! rpio-linux - Linux GPIO and SPI driver for rpio
//!
//! Implements [`rpio_core::GpioDriver`] on top of two kernel interfaces:
//!
//! - the GPIO character device (`/dev/gpiochipN`) through the gpiocdev crate
//! - spidev (`/dev/spidevB.C`) through its ioctls
//!
//! # Example
//!
//! ```no_run
//! use rpio_core::{Level, Rpio};
//! use rpio_linux::{LinuxConfig, LinuxDriver};
//!
//! let driver = LinuxDriver::open(&LinuxConfig::default())?;
//! let mut rpio = Rpio::new(driver);
//! rpio.set_output(11)?;
//! rpio.write(11, Level::High)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel 5.10+ with GPIO character device support
//! - `CONFIG_SPI_SPIDEV` and the SPI0 overlay enabled for SPI
//! - Access to `/dev/gpiochipN` and `/dev/spidevB.C` (root, or the `gpio` and
//!   `spi` groups on Raspberry Pi OS)

pub mod device;
pub mod error;
pub mod spidev;

// Re-exports
pub use device::{parse_options, LinuxConfig, LinuxDriver};
pub use error::{LinuxError, Result};

/// Open the Linux driver from driver string options
///
/// # Example Options
///
/// - `gpiochip=0` or `dev=/dev/gpiochip0` - GPIO chip
/// - `spibus=0` - spidev bus
/// - `spispeed=1000` - initial SPI clock in kHz
pub fn open_linux(
    options: &[(&str, &str)],
) -> std::result::Result<LinuxDriver, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    Ok(LinuxDriver::open(&config)?)
}
