//! rpio-dummy - In-memory GPIO/SPI emulator for testing
//!
//! This crate provides a driver that emulates the BCM283x GPIO block and SPI0
//! controller in memory. It's useful for testing and development without real
//! hardware.
//!
//! - Lines start unconfigured and low.
//! - An output line reads back what was written to it; any other line reads
//!   the level set with [`DummyDriver::set_external_level`].
//! - SPI is wired in loopback (MISO tied to MOSI) unless responses are queued
//!   with [`DummyDriver::queue_response`].

use std::collections::VecDeque;

use rpio_core::spi::{BitOrder, ChipSelect, ClockDivider, DataMode};
use rpio_core::{DriverFeatures, GpioDriver, Level, Mode};
use thiserror::Error;

/// Number of GPIO lines on the BCM283x
pub const BCM_LINES: usize = 54;

/// Emulator errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DummyError {
    /// Line number beyond the GPIO block
    #[error("No such GPIO line: BCM {0}")]
    NoSuchLine(u8),

    /// Injected mode change failure
    #[error("Mode change on BCM {bcm} failed with status {status}")]
    Status { bcm: u8, status: i32 },
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, DummyError>;

/// SPI controller state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DummySpi {
    pub bit_order: BitOrder,
    pub data_mode: DataMode,
    pub divider: ClockDivider,
    /// Chip select used by the last transfer
    pub last_cs: Option<ChipSelect>,
    /// Whether chip select was left asserted after the last transfer
    pub cs_held: bool,
    /// Every byte shifted out, in order
    pub sent: Vec<u8>,
}

/// Emulated GPIO/SPI driver
#[derive(Debug, Clone)]
pub struct DummyDriver {
    modes: [Option<Mode>; BCM_LINES],
    latches: [Level; BCM_LINES],
    external: [Level; BCM_LINES],
    failing: Vec<(u8, i32)>,
    responses: VecDeque<Vec<u8>>,
    spi: DummySpi,
}

impl Default for DummyDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyDriver {
    pub fn new() -> Self {
        log::info!("dummy: GPIO/SPI emulator ready ({} lines)", BCM_LINES);
        Self {
            modes: [None; BCM_LINES],
            latches: [Level::Low; BCM_LINES],
            external: [Level::Low; BCM_LINES],
            failing: Vec::new(),
            responses: VecDeque::new(),
            spi: DummySpi::default(),
        }
    }

    fn line(bcm: u8) -> Result<usize> {
        let idx = bcm as usize;
        if idx < BCM_LINES {
            Ok(idx)
        } else {
            Err(DummyError::NoSuchLine(bcm))
        }
    }

    /// Current function of a line, `None` if never configured
    pub fn mode(&self, bcm: u8) -> Option<Mode> {
        Self::line(bcm).ok().and_then(|idx| self.modes[idx])
    }

    /// Level last written to a line's output latch
    pub fn latch(&self, bcm: u8) -> Option<Level> {
        Self::line(bcm).ok().map(|idx| self.latches[idx])
    }

    /// Set the level an external circuit applies to a line
    pub fn set_external_level(&mut self, bcm: u8, level: Level) -> Result<()> {
        let idx = Self::line(bcm)?;
        self.external[idx] = level;
        Ok(())
    }

    /// Make mode changes on a line fail with the given status
    pub fn fail_mode_changes(&mut self, bcm: u8, status: i32) {
        self.failing.push((bcm, status));
    }

    /// Queue the bytes clocked in by the next transfer
    ///
    /// Short responses are padded with 0xFF, as an idle MISO line reads.
    pub fn queue_response(&mut self, response: impl Into<Vec<u8>>) {
        self.responses.push_back(response.into());
    }

    pub fn spi(&self) -> &DummySpi {
        &self.spi
    }
}

impl GpioDriver for DummyDriver {
    type Error = DummyError;

    fn features(&self) -> DriverFeatures {
        DriverFeatures::all()
    }

    fn set_mode(&mut self, bcm: u8, mode: Mode) -> Result<()> {
        let idx = Self::line(bcm)?;
        if let Some(&(_, status)) = self.failing.iter().find(|(line, _)| *line == bcm) {
            log::debug!("dummy: refusing {} on BCM {} (status {})", mode, bcm, status);
            return Err(DummyError::Status { bcm, status });
        }
        self.modes[idx] = Some(mode);
        Ok(())
    }

    fn read(&mut self, bcm: u8) -> Result<Level> {
        let idx = Self::line(bcm)?;
        Ok(match self.modes[idx] {
            Some(Mode::Output) => self.latches[idx],
            _ => self.external[idx],
        })
    }

    fn write(&mut self, bcm: u8, level: Level) -> Result<()> {
        let idx = Self::line(bcm)?;
        if self.modes[idx] != Some(Mode::Output) {
            log::debug!("dummy: write to BCM {} which is not an output", bcm);
        }
        self.latches[idx] = level;
        Ok(())
    }

    fn spi_transfer(
        &mut self,
        data: &[u8],
        len: usize,
        cs: ChipSelect,
        cs_mux: bool,
    ) -> Result<Vec<u8>> {
        let tx = &data[..len.min(data.len())];
        self.spi.sent.extend_from_slice(tx);
        self.spi.last_cs = Some(cs);
        self.spi.cs_held = cs_mux;

        let rx = match self.responses.pop_front() {
            Some(mut response) => {
                response.resize(tx.len(), 0xFF);
                response
            }
            None => tx.to_vec(),
        };
        Ok(rx)
    }

    fn spi_set_bit_order(&mut self, order: BitOrder) -> Result<()> {
        self.spi.bit_order = order;
        Ok(())
    }

    fn spi_set_data_mode(&mut self, mode: DataMode) -> Result<()> {
        self.spi.data_mode = mode;
        Ok(())
    }

    fn spi_set_clock_divider(&mut self, divider: ClockDivider) -> Result<()> {
        self.spi.divider = divider;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpio_core::{Error, Rpio};

    #[test]
    fn test_output_reads_back() {
        let mut rpio = Rpio::new(DummyDriver::new());
        rpio.set_output(11).unwrap();
        rpio.write(11, Level::High).unwrap();
        assert_eq!(rpio.read(11).unwrap(), Level::High);
        assert_eq!(rpio.driver().mode(17), Some(Mode::Output));
        assert_eq!(rpio.driver().latch(17), Some(Level::High));
    }

    #[test]
    fn test_input_reads_external_level() {
        let mut driver = DummyDriver::new();
        driver.set_external_level(21, Level::High).unwrap();

        let mut rpio = Rpio::new(driver);
        let mut done = 0;
        rpio.set_input_then(40, || done += 1).unwrap();
        assert_eq!(done, 1);
        assert_eq!(rpio.read(40).unwrap(), Level::High);

        // Writing an input only touches the latch
        rpio.write(40, Level::Low).unwrap();
        assert_eq!(rpio.read(40).unwrap(), Level::High);
    }

    #[test]
    fn test_bcm_zero_pin_is_usable() {
        let mut rpio = Rpio::new(DummyDriver::new());
        rpio.set_output(3).unwrap();
        rpio.write_str(3, "1").unwrap();
        assert_eq!(rpio.driver().latch(0), Some(Level::High));
    }

    #[test]
    fn test_injected_mode_failure() {
        let mut driver = DummyDriver::new();
        driver.fail_mode_changes(18, 1);

        let mut rpio = Rpio::new(driver);
        let mut done = false;
        let err = rpio.set_output_then(12, || done = true).unwrap_err();
        assert!(!done);
        match err {
            Error::Configuration { pin, bcm, source, .. } => {
                assert_eq!((pin, bcm), (12, 18));
                assert_eq!(source.to_string(), "Mode change on BCM 18 failed with status 1");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(rpio.driver().mode(18), None);
    }

    #[test]
    fn test_spi_loopback() {
        let mut rpio = Rpio::new(DummyDriver::new());
        let rx = rpio
            .spi_transfer(&[0x9F, 0x00, 0x00, 0x00], 4, ChipSelect::Cs0, false)
            .unwrap();
        assert_eq!(rx, vec![0x9F, 0x00, 0x00, 0x00]);
        assert_eq!(rpio.driver().spi().last_cs, Some(ChipSelect::Cs0));
        assert!(!rpio.driver().spi().cs_held);
    }

    #[test]
    fn test_spi_queued_response() {
        let mut driver = DummyDriver::new();
        driver.queue_response(vec![0x00, 0xEF, 0x40]);

        let mut rpio = Rpio::new(driver);
        let rx = rpio
            .spi_transfer(&[0x9F, 0, 0, 0], 4, ChipSelect::Cs1, true)
            .unwrap();
        assert_eq!(rx, vec![0x00, 0xEF, 0x40, 0xFF]);
        assert!(rpio.driver().spi().cs_held);
        assert_eq!(rpio.driver().spi().sent, vec![0x9F, 0, 0, 0]);
    }

    #[test]
    fn test_spi_configuration() {
        let mut rpio = Rpio::new(DummyDriver::new());
        rpio.spi_set_bit_order(BitOrder::LsbFirst).unwrap();
        rpio.spi_set_data_mode(DataMode::Mode2).unwrap();
        rpio.spi_set_clock_divider(ClockDivider::DIV_128).unwrap();

        let spi = rpio.driver().spi();
        assert_eq!(spi.bit_order, BitOrder::LsbFirst);
        assert_eq!(spi.data_mode, DataMode::Mode2);
        assert_eq!(spi.divider, ClockDivider::DIV_128);
    }

    #[test]
    fn test_out_of_range_line() {
        let mut driver = DummyDriver::new();
        assert_eq!(driver.read(54), Err(DummyError::NoSuchLine(54)));
        assert_eq!(driver.mode(200), None);
    }
}
