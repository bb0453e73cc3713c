//! Driver registration and dispatch
//!
//! This module provides a centralized registry for all drivers, with support
//! for feature-gated inclusion and dynamic help text generation.

use crate::cli::GpioCommands;
use crate::commands;

#[allow(unused_imports)] // Used in feature-gated code
use rpio_core::Rpio;

/// Information about a driver
pub struct DriverInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available drivers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_drivers() -> Vec<DriverInfo> {
    let mut drivers = Vec::new();

    #[cfg(feature = "dummy")]
    drivers.push(DriverInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory GPIO/SPI emulator for testing",
    });

    #[cfg(feature = "linux")]
    drivers.push(DriverInfo {
        name: "linux",
        aliases: &["gpiocdev"],
        description: "Linux GPIO chardev + spidev (gpiochip=<N>|dev=<path>,spibus=<N>,spispeed=<kHz>)",
    });

    drivers
}

/// Generate help text listing all available drivers
pub fn driver_help() -> String {
    let drivers = available_drivers();

    if drivers.is_empty() {
        return "No drivers available (recompile with driver features enabled)".to_string();
    }

    let mut help = String::from("Available drivers:\n");
    for d in &drivers {
        help.push_str(&format!("  {:8} - {}\n", d.name, d.description));
        if !d.aliases.is_empty() {
            help.push_str(&format!("  {:8}   aliases: {}\n", "", d.aliases.join(", ")));
        }
    }

    help
}

/// Resolve a driver name or alias to its primary name
pub fn find_driver(name: &str) -> Option<&'static str> {
    available_drivers()
        .into_iter()
        .find(|d| d.name == name || d.aliases.contains(&name))
        .map(|d| d.name)
}

/// Parse a driver string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_driver_string(s: &str) -> Result<(&str, Vec<(&str, &str)>), String> {
    let Some((name, opts)) = s.split_once(':') else {
        return Ok((s, Vec::new()));
    };

    let mut options = Vec::new();
    for opt in opts.split(',').filter(|o| !o.is_empty()) {
        match opt.split_once('=') {
            Some(kv) => options.push(kv),
            None => {
                return Err(format!(
                    "Invalid parameter format: '{}' (expected key=value)",
                    opt
                ))
            }
        }
    }
    Ok((name, options))
}

/// Open the driver named by `spec` and run a command against it
pub fn run_with_driver(spec: &str, command: GpioCommands) -> Result<(), Box<dyn std::error::Error>> {
    let (name, options) = parse_driver_string(spec)?;

    match find_driver(name) {
        #[cfg(feature = "dummy")]
        Some("dummy") => {
            if !options.is_empty() {
                log::warn!("dummy: ignoring {} option(s)", options.len());
            }
            let mut rpio = Rpio::new(rpio_dummy::DummyDriver::new());
            commands::run(&mut rpio, command)
        }

        #[cfg(feature = "linux")]
        Some("linux") => {
            log::info!("Opening Linux GPIO/SPI driver...");
            let driver = rpio_linux::open_linux(&options).map_err(|e| {
                format!(
                    "Failed to open Linux driver: {}\nCheck that the GPIO chip exists and you have permissions.",
                    e
                )
            })?;
            let mut rpio = Rpio::new(driver);
            commands::run(&mut rpio, command)
        }

        _ => Err(unknown_driver_error(name)),
    }
}

fn unknown_driver_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown driver: {}\n\n", name);
    msg.push_str(&driver_help());
    msg.push_str("\nUse 'rpio list-drivers' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_driver_string() {
        assert_eq!(parse_driver_string("dummy").unwrap(), ("dummy", vec![]));
        assert_eq!(
            parse_driver_string("linux:gpiochip=0,spibus=1").unwrap(),
            ("linux", vec![("gpiochip", "0"), ("spibus", "1")])
        );
        assert_eq!(parse_driver_string("linux:").unwrap(), ("linux", vec![]));
        assert!(parse_driver_string("linux:gpiochip").is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_find_driver_alias() {
        assert_eq!(find_driver("dummy"), Some("dummy"));
        assert_eq!(find_driver("emulator"), Some("dummy"));
        assert_eq!(find_driver("ch341a"), None);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_run_with_dummy() {
        let command = GpioCommands::Write {
            pin: 11,
            value: "1".to_string(),
            keep_mode: false,
        };
        run_with_driver("dummy", command).unwrap();

        let command = GpioCommands::Read { pin: 6 };
        assert!(run_with_driver("dummy", command).is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_write_configures_output_on_fresh_driver() {
        use rpio_core::{Level, Mode};
        use rpio_dummy::DummyDriver;

        // A freshly opened driver has no modes set, as on every CLI run
        let mut rpio = Rpio::new(DummyDriver::new());
        let command = GpioCommands::Write {
            pin: 11,
            value: "0x1".to_string(),
            keep_mode: false,
        };
        commands::run(&mut rpio, command).unwrap();
        assert_eq!(rpio.driver().mode(17), Some(Mode::Output));
        assert_eq!(rpio.driver().latch(17), Some(Level::High));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_write_keep_mode_leaves_pin_alone() {
        use rpio_core::Level;
        use rpio_dummy::DummyDriver;

        let mut rpio = Rpio::new(DummyDriver::new());
        let command = GpioCommands::Write {
            pin: 11,
            value: "1".to_string(),
            keep_mode: true,
        };
        commands::run(&mut rpio, command).unwrap();
        assert_eq!(rpio.driver().mode(17), None);
        assert_eq!(rpio.driver().latch(17), Some(Level::High));
    }

    #[test]
    fn test_unknown_driver() {
        let err = run_with_driver("nonexistent", GpioCommands::Read { pin: 11 }).unwrap_err();
        assert!(err.to_string().starts_with("Unknown driver: nonexistent"));
    }
}
