//! CLI command implementations
//!
//! Header-only commands (`pins`, `translate`, `list-drivers`) live in `list`
//! and never open a driver. Everything else runs against an
//! [`rpio_core::Rpio`] front end, whatever driver backs it.

mod gpio;
mod list;
mod spi;

pub use list::{list_drivers, print_header, translate};

use crate::cli::GpioCommands;
use rpio_core::{GpioDriver, Rpio};

/// Run a driver command
pub fn run<D: GpioDriver>(
    rpio: &mut Rpio<D>,
    command: GpioCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        GpioCommands::Mode { pin, mode } => gpio::cmd_mode(rpio, pin, mode),
        GpioCommands::Read { pin } => gpio::cmd_read(rpio, pin),
        GpioCommands::Write {
            pin,
            value,
            keep_mode,
        } => gpio::cmd_write(rpio, pin, &value, keep_mode),
        GpioCommands::Spi(cmd) => spi::run(rpio, cmd),
    }
}
