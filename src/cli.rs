//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string as a hex or decimal u16
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u16>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse transmit data given as hex bytes
///
/// Accepts `9f000000`, `9f 00 00 00`, `0x9f,0x00` and mixtures of these.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for token in s.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if token.is_empty() {
            continue;
        }
        if token.len() % 2 != 0 {
            return Err(format!("Odd number of hex digits in '{}'", token));
        }
        for pair in token.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| format!("Invalid hex byte '{}'", pair))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

#[derive(Parser)]
#[command(name = "rpio")]
#[command(author, version, about = "Raspberry Pi GPIO and SPI by header pin number", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Driver to use, e.g. "dummy" or "linux:gpiochip=0,spibus=0" (see list-drivers)
    #[arg(short, long, global = true, env = "RPIO_DRIVER", default_value = "dummy")]
    pub driver: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the 40-pin header layout
    Pins,

    /// Translate a header pin number to its BCM GPIO number
    Translate {
        /// Header pin number
        #[arg(allow_negative_numbers = true)]
        pin: i64,
    },

    /// List available drivers
    ListDrivers,

    #[command(flatten)]
    Gpio(GpioCommands),
}

/// Commands that need a driver
#[derive(Subcommand)]
pub enum GpioCommands {
    /// Configure a pin as input or output
    Mode {
        /// Header pin number
        #[arg(allow_negative_numbers = true)]
        pin: i64,

        /// Pin function
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Read the level of a pin
    Read {
        /// Header pin number
        #[arg(allow_negative_numbers = true)]
        pin: i64,
    },

    /// Drive a pin, configuring it as output first
    Write {
        /// Header pin number
        #[arg(allow_negative_numbers = true)]
        pin: i64,

        /// Level: 0, 1, 0x1, low or high
        value: String,

        /// Leave the pin mode alone and write to the output latch as-is
        #[arg(long)]
        keep_mode: bool,
    },

    /// SPI operations
    #[command(subcommand)]
    Spi(SpiCommands),
}

#[derive(Subcommand)]
pub enum SpiCommands {
    /// Full-duplex transfer; prints the bytes clocked in
    Transfer {
        /// Bytes to send, in hex (e.g. "9f000000")
        #[arg(value_parser = parse_hex_bytes)]
        data: ::std::vec::Vec<u8>,

        /// Number of bytes to transfer (default: all of DATA)
        #[arg(short, long)]
        len: Option<usize>,

        /// Chip select: 0, 1, 2 (both) or 3 (none)
        #[arg(long, default_value_t = 0)]
        cs: u8,

        /// Keep chip select asserted after the transfer
        #[arg(long)]
        mux: bool,
    },

    /// Change SPI bit order, data mode or clock divider
    Config {
        /// Bit order
        #[arg(long, value_enum)]
        bit_order: Option<BitOrderArg>,

        /// SPI data mode (0-3)
        #[arg(long)]
        data_mode: Option<u8>,

        /// Clock divider of the 250 MHz core clock (power of two, 0 = 65536)
        #[arg(long, value_parser = parse_hex_u16)]
        divider: Option<u16>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Input,
    Output,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BitOrderArg {
    Lsb,
    Msb,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(
            parse_hex_bytes("9f000000").unwrap(),
            vec![0x9F, 0x00, 0x00, 0x00]
        );
        assert_eq!(parse_hex_bytes("9f 0A,0xff").unwrap(), vec![0x9F, 0x0A, 0xFF]);
        assert_eq!(parse_hex_bytes("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex_bytes("9f0").is_err());
        assert!(parse_hex_bytes("zz").is_err());
    }

    #[test]
    fn test_parse_hex_u16() {
        assert_eq!(parse_hex_u16("256").unwrap(), 256);
        assert_eq!(parse_hex_u16("0x100").unwrap(), 256);
        assert!(parse_hex_u16("65536").is_err());
    }

    #[test]
    fn test_negative_pin_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["rpio", "translate", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Translate { pin: -1 }));
    }

    #[test]
    fn test_write_subcommand() {
        let cli = Cli::try_parse_from(["rpio", "-d", "dummy", "write", "11", "1"]).unwrap();
        assert_eq!(cli.driver, "dummy");
        match cli.command {
            Commands::Gpio(GpioCommands::Write {
                pin,
                value,
                keep_mode,
            }) => {
                assert_eq!(pin, 11);
                assert_eq!(value, "1");
                assert!(!keep_mode);
            }
            _ => panic!("expected write"),
        }

        let cli = Cli::try_parse_from(["rpio", "write", "11", "0", "--keep-mode"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Gpio(GpioCommands::Write { keep_mode: true, .. })
        ));
    }

    #[test]
    fn test_spi_transfer_subcommand() {
        let cli = Cli::try_parse_from(["rpio", "spi", "transfer", "9f00", "--cs", "1", "--mux"])
            .unwrap();
        match cli.command {
            Commands::Gpio(GpioCommands::Spi(SpiCommands::Transfer { data, len, cs, mux })) => {
                assert_eq!(data, vec![0x9F, 0x00]);
                assert_eq!(len, None);
                assert_eq!(cs, 1);
                assert!(mux);
            }
            _ => panic!("expected spi transfer"),
        }
    }
}
