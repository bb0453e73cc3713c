//! Linux GPIO/SPI driver implementation
//!
//! GPIO lines are requested one at a time from the GPIO character device
//! (gpiocdev) the first time they are configured or sampled, and kept for the
//! lifetime of the driver. SPI goes through spidev, one node per chip select.

use crate::error::{LinuxError, Result};
use crate::spidev::{SpiDev, SpiSettings};

use gpiocdev::chip::Chip;
use gpiocdev::line::Value;
use gpiocdev::request::{Config, Request};

use rpio_core::spi::{BitOrder, ChipSelect, ClockDivider, DataMode};
use rpio_core::{DriverFeatures, GpioDriver, Level, Mode};

use std::collections::HashMap;

/// Consumer label shown by `gpioinfo`
const CONSUMER: &str = "rpio";

/// Default GPIO chip on the Raspberry Pi
const DEFAULT_CHIP: &str = "/dev/gpiochip0";

/// Configuration for opening the Linux driver
#[derive(Debug, Clone)]
pub struct LinuxConfig {
    /// GPIO chip device path (e.g., "/dev/gpiochip0")
    pub chip: String,
    /// spidev bus number, nodes are `/dev/spidev<bus>.<cs>`
    pub spi_bus: u8,
    /// Initial SPI clock in Hz, `None` for the slowest divider
    pub speed_hz: Option<u32>,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            chip: DEFAULT_CHIP.to_string(),
            spi_bus: 0,
            speed_hz: None,
        }
    }
}

impl LinuxConfig {
    /// Create a new configuration for the given GPIO chip
    pub fn new(chip: impl Into<String>) -> Self {
        Self {
            chip: chip.into(),
            ..Default::default()
        }
    }

    /// Set the spidev bus
    pub fn with_spi_bus(mut self, bus: u8) -> Self {
        self.spi_bus = bus;
        self
    }

    /// Set the initial SPI clock in Hz
    pub fn with_speed_hz(mut self, hz: u32) -> Self {
        self.speed_hz = Some(hz);
        self
    }

    /// spidev node for a chip select line
    pub fn spidev_path(&self, cs: u8) -> String {
        format!("/dev/spidev{}.{}", self.spi_bus, cs)
    }
}

/// A requested GPIO line
struct Line {
    request: Request,
    mode: Option<Mode>,
}

/// Linux GPIO and SPI driver
pub struct LinuxDriver {
    config: LinuxConfig,
    lines: HashMap<u8, Line>,
    spi: SpiSettings,
    spi_devs: HashMap<u8, SpiDev>,
}

impl LinuxDriver {
    /// Open the GPIO chip and prepare SPI settings
    ///
    /// No line is requested and no spidev node is opened until first use, so
    /// every chip select stays deselected until a transfer names it.
    pub fn open(config: &LinuxConfig) -> Result<Self> {
        if !nix::unistd::geteuid().is_root() {
            log::warn!(
                "linux: not running as root, access to {} and spidev may be denied",
                config.chip
            );
        }

        let chip = Chip::from_path(&config.chip).map_err(|e| LinuxError::ChipOpenFailed {
            path: config.chip.clone(),
            source: e,
        })?;
        let info = chip.info().map_err(|e| LinuxError::ChipOpenFailed {
            path: config.chip.clone(),
            source: e,
        })?;

        let speed_hz = config
            .speed_hz
            .unwrap_or_else(|| ClockDivider::default().speed_hz());

        log::info!(
            "linux: Opened {} ({}, {} lines), SPI bus {} at {} kHz",
            config.chip,
            info.label,
            info.num_lines,
            config.spi_bus,
            speed_hz / 1000
        );

        Ok(Self {
            config: config.clone(),
            lines: HashMap::new(),
            spi: SpiSettings {
                bit_order: BitOrder::MsbFirst,
                data_mode: DataMode::Mode0,
                speed_hz,
            },
            spi_devs: HashMap::new(),
        })
    }

    /// Request a line with the given direction, or as-is when `mode` is `None`
    fn request_line(&self, bcm: u8, mode: Option<Mode>) -> Result<Request> {
        let mut cfg = Config::default();
        let line = cfg.with_line(bcm.into());
        match mode {
            Some(Mode::Input) => {
                line.as_input();
            }
            Some(Mode::Output) => {
                line.as_output(Value::Inactive);
            }
            None => {}
        }

        Request::from_config(cfg)
            .on_chip(&self.config.chip)
            .with_consumer(CONSUMER)
            .request()
            .map_err(|source| LinuxError::LineRequestFailed { line: bcm, source })
    }

    fn line(&mut self, bcm: u8) -> Result<&mut Line> {
        if !self.lines.contains_key(&bcm) {
            let request = self.request_line(bcm, None)?;
            log::debug!("linux: Requested BCM {} as-is", bcm);
            self.lines.insert(bcm, Line {
                request,
                mode: None,
            });
        }
        self.lines
            .get_mut(&bcm)
            .ok_or_else(|| LinuxError::InvalidParameter(format!("BCM {}", bcm)))
    }

    /// spidev node for a chip select, opened on first use
    fn spi_dev(&mut self, cs: ChipSelect) -> Result<&mut SpiDev> {
        // SPI_NO_CS transfers go through the CS0 node
        let (index, no_cs) = match cs {
            ChipSelect::Cs0 => (0, false),
            ChipSelect::Cs1 => (1, false),
            ChipSelect::None => (0, true),
            ChipSelect::Cs2 => return Err(LinuxError::UnsupportedChipSelect(cs)),
        };
        let key = cs as u8;

        if !self.spi_devs.contains_key(&key) {
            let dev = SpiDev::open(&self.config.spidev_path(index), no_cs, &self.spi)?;
            log::info!("linux: Opened {} for {:?}", dev.path(), cs);
            self.spi_devs.insert(key, dev);
        }
        self.spi_devs
            .get_mut(&key)
            .ok_or(LinuxError::UnsupportedChipSelect(cs))
    }

    /// Push changed settings to every open spidev node
    fn apply_spi(&mut self) -> Result<()> {
        for dev in self.spi_devs.values_mut() {
            dev.apply(&self.spi)?;
        }
        Ok(())
    }
}

fn to_value(level: Level) -> Value {
    match level {
        Level::High => Value::Active,
        Level::Low => Value::Inactive,
    }
}

impl GpioDriver for LinuxDriver {
    type Error = LinuxError;

    fn features(&self) -> DriverFeatures {
        DriverFeatures::SPI_NO_CS | DriverFeatures::SPI_LSB_FIRST
    }

    fn set_mode(&mut self, bcm: u8, mode: Mode) -> Result<()> {
        if let Some(line) = self.lines.get_mut(&bcm) {
            if line.mode == Some(mode) {
                return Ok(());
            }
            let mut cfg = Config::default();
            let entry = cfg.with_line(bcm.into());
            match mode {
                Mode::Input => {
                    entry.as_input();
                }
                Mode::Output => {
                    entry.as_output(Value::Inactive);
                }
            }
            line.request
                .reconfigure(&cfg)
                .map_err(|source| LinuxError::ReconfigureFailed { line: bcm, source })?;
            line.mode = Some(mode);
        } else {
            let request = self.request_line(bcm, Some(mode))?;
            self.lines.insert(bcm, Line {
                request,
                mode: Some(mode),
            });
        }

        log::debug!("linux: BCM {} -> {}", bcm, mode);
        Ok(())
    }

    fn read(&mut self, bcm: u8) -> Result<Level> {
        let line = self.line(bcm)?;
        match line.request.value(bcm.into()) {
            Ok(Value::Active) => Ok(Level::High),
            Ok(Value::Inactive) => Ok(Level::Low),
            Err(source) => Err(LinuxError::GetValueFailed { line: bcm, source }),
        }
    }

    fn write(&mut self, bcm: u8, level: Level) -> Result<()> {
        let line = match self.lines.get_mut(&bcm) {
            Some(line) if line.mode == Some(Mode::Output) => line,
            _ => return Err(LinuxError::NotAnOutput(bcm)),
        };
        line.request
            .set_value(bcm.into(), to_value(level))
            .map_err(|source| LinuxError::SetValueFailed { line: bcm, source })?;
        Ok(())
    }

    fn spi_transfer(
        &mut self,
        data: &[u8],
        len: usize,
        cs: ChipSelect,
        cs_mux: bool,
    ) -> Result<Vec<u8>> {
        let tx = data.get(..len).ok_or_else(|| {
            LinuxError::InvalidParameter(format!(
                "transfer length {} exceeds buffer of {} bytes",
                len,
                data.len()
            ))
        })?;
        let speed_hz = self.spi.speed_hz;
        self.spi_dev(cs)?.transfer(tx, speed_hz, cs_mux)
    }

    fn spi_set_bit_order(&mut self, order: BitOrder) -> Result<()> {
        self.spi.bit_order = order;
        self.apply_spi()
    }

    fn spi_set_data_mode(&mut self, mode: DataMode) -> Result<()> {
        self.spi.data_mode = mode;
        self.apply_spi()
    }

    fn spi_set_clock_divider(&mut self, divider: ClockDivider) -> Result<()> {
        self.spi.speed_hz = divider.speed_hz();
        self.apply_spi()
    }
}

/// Parse driver options from a list of key-value pairs
///
/// - `dev=/dev/gpiochipN` or `gpiochip=N` - GPIO chip (default /dev/gpiochip0)
/// - `spibus=N` - spidev bus (default 0)
/// - `spispeed=<kHz>` - initial SPI clock
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxConfig, String> {
    let mut config = LinuxConfig::default();
    let mut device: Option<String> = None;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                device = Some(value.to_string());
            }
            "gpiochip" => {
                gpiochip = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid gpiochip value: {}", value))?,
                );
            }
            "spibus" => {
                config.spi_bus = value
                    .parse()
                    .map_err(|_| format!("Invalid spibus value: {}", value))?;
            }
            "spispeed" => {
                let speed_khz: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid spispeed value: {}", value))?;
                if speed_khz == 0 {
                    return Err("spispeed must be greater than 0".to_string());
                }
                config.speed_hz = Some(speed_khz.saturating_mul(1000));
            }
            _ => {
                log::warn!("linux: Unknown option: {}={}", key, value);
            }
        }
    }

    match (device, gpiochip) {
        (Some(_), Some(_)) => {
            return Err("Only one of 'dev' or 'gpiochip' can be specified".to_string());
        }
        (Some(dev), None) => config.chip = dev,
        (None, Some(n)) => config.chip = format!("/dev/gpiochip{}", n),
        (None, None) => {}
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = parse_options(&[]).unwrap();
        assert_eq!(config.chip, "/dev/gpiochip0");
        assert_eq!(config.spi_bus, 0);
        assert_eq!(config.speed_hz, None);
        assert_eq!(config.spidev_path(1), "/dev/spidev0.1");
    }

    #[test]
    fn test_parse_gpiochip_and_spi() {
        let config =
            parse_options(&[("gpiochip", "4"), ("spibus", "1"), ("spispeed", "500")]).unwrap();
        assert_eq!(config.chip, "/dev/gpiochip4");
        assert_eq!(config.speed_hz, Some(500_000));
        assert_eq!(config.spidev_path(0), "/dev/spidev1.0");
    }

    #[test]
    fn test_parse_dev_path_and_unknown_key() {
        let config = parse_options(&[("dev", "/dev/gpiochip1"), ("colour", "blue")]).unwrap();
        assert_eq!(config.chip, "/dev/gpiochip1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_options(&[("dev", "/dev/gpiochip0"), ("gpiochip", "0")]).is_err());
        assert!(parse_options(&[("gpiochip", "zero")]).is_err());
        assert!(parse_options(&[("spispeed", "0")]).is_err());
        assert!(parse_options(&[("spibus", "-1")]).is_err());
    }

    #[test]
    fn test_builder() {
        let config = LinuxConfig::new("/dev/gpiochip2")
            .with_spi_bus(1)
            .with_speed_hz(2_000_000);
        assert_eq!(config.chip, "/dev/gpiochip2");
        assert_eq!(config.spi_bus, 1);
        assert_eq!(config.speed_hz, Some(2_000_000));
    }
}
