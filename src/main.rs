//! rpio - Raspberry Pi GPIO and SPI by header pin number
//!
//! Pins are given by their position on the 40-pin header and translated to
//! BCM numbering before anything reaches a driver. Power, ground and ID
//! EEPROM pins are rejected up front.
//!
//! # Architecture
//!
//! - `rpio-core` holds the pin table and the `Rpio` front end
//! - drivers (`rpio-dummy`, `rpio-linux`) implement `GpioDriver`
//! - this binary picks a driver from a driver string and runs one command

mod cli;
mod commands;
mod drivers;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Pins => {
            commands::print_header();
            Ok(())
        }
        Commands::Translate { pin } => commands::translate(pin),
        Commands::ListDrivers => {
            commands::list_drivers();
            Ok(())
        }
        Commands::Gpio(command) => drivers::run_with_driver(&cli.driver, command),
    }
}
