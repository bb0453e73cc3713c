//! rpio-core - Raspberry Pi header pin mapping and driver front end
//!
//! Callers address GPIOs by their position on the 40-pin header. Drivers
//! address them by BCM line number. This crate sits in between:
//!
//! - [`pins`] - the fixed header to BCM table and its lookups
//! - [`GpioDriver`] - what a driver must provide (mode, read, write, SPI)
//! - [`Rpio`] - header-numbered front end that validates pins and forwards
//!   each call to a driver
//!
//! # Example
//!
//! ```ignore
//! use rpio_core::{Rpio, Level};
//!
//! let mut rpio = Rpio::new(driver);
//! rpio.set_output(11)?;            // BCM 17
//! rpio.write(11, Level::High)?;
//! assert!(rpio.set_output(6).is_err()); // ground
//! ```

pub mod driver;
pub mod error;
pub mod level;
pub mod pins;
pub mod rpio;
pub mod spi;

// Re-exports
pub use driver::{DriverFeatures, GpioDriver, Mode};
pub use error::{Error, Result};
pub use level::{Level, HIGH, LOW};
pub use pins::{bcm_to_header, header_pin_function, translate, PinFunction};
pub use rpio::Rpio;
pub use spi::{BitOrder, ChipSelect, ClockDivider, DataMode};
