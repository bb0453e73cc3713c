//! Header-numbered front end over a [`GpioDriver`]
//!
//! `Rpio` owns (or borrows) a driver and exposes every operation in header
//! pin numbering. Each call translates its pin argument, forwards exactly one
//! request to the driver, and relays the result.

use crate::driver::{DriverFeatures, GpioDriver, Mode};
use crate::error::{Error, Result};
use crate::level::Level;
use crate::pins;
use crate::spi::{BitOrder, ChipSelect, ClockDivider, DataMode};

/// GPIO and SPI access by header pin number
#[derive(Debug)]
pub struct Rpio<D> {
    driver: D,
}

impl<D: GpioDriver> Rpio<D> {
    /// Wrap an already initialised driver
    pub fn new(driver: D) -> Self {
        log::debug!("rpio: features {:?}", driver.features());
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Translate a header pin to its BCM line, see [`pins::translate`]
    pub fn translate(&self, pin: impl Into<i64>) -> Result<u8> {
        pins::translate(pin)
    }

    fn configure(&mut self, pin: i64, mode: Mode) -> Result<()> {
        let bcm = pins::translate(pin)?;
        log::debug!("rpio: pin {} (BCM {}) -> {}", pin, bcm, mode);
        self.driver
            .set_mode(bcm, mode)
            .map_err(|e| Error::Configuration {
                pin,
                bcm,
                mode,
                source: Box::new(e),
            })
    }

    /// Configure a pin as input
    pub fn set_input(&mut self, pin: impl Into<i64>) -> Result<()> {
        self.configure(pin.into(), Mode::Input)
    }

    /// Configure a pin as output
    pub fn set_output(&mut self, pin: impl Into<i64>) -> Result<()> {
        self.configure(pin.into(), Mode::Output)
    }

    /// Configure a pin as input, then run `then` once and return its result
    ///
    /// `then` is not called when configuration fails.
    pub fn set_input_then<F, R>(&mut self, pin: impl Into<i64>, then: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        self.set_input(pin)?;
        Ok(then())
    }

    /// Configure a pin as output, then run `then` once and return its result
    ///
    /// `then` is not called when configuration fails.
    pub fn set_output_then<F, R>(&mut self, pin: impl Into<i64>, then: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        self.set_output(pin)?;
        Ok(then())
    }

    /// Sample a pin
    pub fn read(&mut self, pin: impl Into<i64>) -> Result<Level> {
        let bcm = pins::translate(pin)?;
        let level = self.driver.read(bcm).map_err(Error::driver)?;
        log::trace!("rpio: read BCM {} = {}", bcm, level);
        Ok(level)
    }

    /// Drive a pin
    pub fn write(&mut self, pin: impl Into<i64>, level: impl Into<Level>) -> Result<()> {
        let bcm = pins::translate(pin)?;
        let level = level.into();
        log::trace!("rpio: write BCM {} = {}", bcm, level);
        self.driver.write(bcm, level).map_err(Error::driver)
    }

    /// Drive a pin from loosely typed text such as `"1"` or `"0"`
    ///
    /// The pin is validated before the value, see [`Level`]'s `FromStr`.
    pub fn write_str(&mut self, pin: impl Into<i64>, value: &str) -> Result<()> {
        let pin = pin.into();
        pins::translate(pin)?;
        let level: Level = value.parse()?;
        self.write(pin, level)
    }

    /// Full-duplex SPI transfer of the first `len` bytes of `data`
    pub fn spi_transfer(
        &mut self,
        data: &[u8],
        len: usize,
        cs: ChipSelect,
        cs_mux: bool,
    ) -> Result<Vec<u8>> {
        if len > data.len() {
            return Err(Error::InvalidParameter(format!(
                "transfer length {} exceeds buffer of {} bytes",
                len,
                data.len()
            )));
        }

        let features = self.driver.features();
        match cs {
            ChipSelect::Cs2 if !features.contains(DriverFeatures::SPI_CS_BOTH) => {
                return Err(Error::Unsupported("asserting CS0 and CS1 together"));
            }
            ChipSelect::None if !features.contains(DriverFeatures::SPI_NO_CS) => {
                return Err(Error::Unsupported("transfers without chip select"));
            }
            _ => {}
        }

        log::debug!(
            "rpio: SPI transfer {} bytes on {:?}{}",
            len,
            cs,
            if cs_mux { " (hold CS)" } else { "" }
        );
        self.driver
            .spi_transfer(data, len, cs, cs_mux)
            .map_err(Error::driver)
    }

    pub fn spi_set_bit_order(&mut self, order: BitOrder) -> Result<()> {
        if order == BitOrder::LsbFirst
            && !self.driver.features().contains(DriverFeatures::SPI_LSB_FIRST)
        {
            return Err(Error::Unsupported("LSB first bit order"));
        }
        log::debug!("rpio: SPI bit order {:?}", order);
        self.driver.spi_set_bit_order(order).map_err(Error::driver)
    }

    pub fn spi_set_data_mode(&mut self, mode: DataMode) -> Result<()> {
        log::debug!("rpio: SPI data mode {:?}", mode);
        self.driver.spi_set_data_mode(mode).map_err(Error::driver)
    }

    pub fn spi_set_clock_divider(&mut self, divider: ClockDivider) -> Result<()> {
        log::debug!("rpio: SPI clock divider {}", divider);
        self.driver
            .spi_set_clock_divider(divider)
            .map_err(Error::driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetMode(u8, Mode),
        Read(u8),
        Write(u8, Level),
        Transfer(Vec<u8>, usize, ChipSelect, bool),
        BitOrder(BitOrder),
        DataMode(DataMode),
        Divider(ClockDivider),
    }

    #[derive(Debug)]
    struct FakeStatus(i32);

    impl fmt::Display for FakeStatus {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "status {}", self.0)
        }
    }

    impl std::error::Error for FakeStatus {}

    /// Records every call; mode changes return `mode_status` as the driver status
    #[derive(Default)]
    struct FakeDriver {
        calls: Vec<Call>,
        mode_status: i32,
        level: Level,
        features: DriverFeatures,
    }

    impl GpioDriver for FakeDriver {
        type Error = FakeStatus;

        fn features(&self) -> DriverFeatures {
            self.features
        }

        fn set_mode(&mut self, bcm: u8, mode: Mode) -> std::result::Result<(), FakeStatus> {
            self.calls.push(Call::SetMode(bcm, mode));
            match self.mode_status {
                0 => Ok(()),
                status => Err(FakeStatus(status)),
            }
        }

        fn read(&mut self, bcm: u8) -> std::result::Result<Level, FakeStatus> {
            self.calls.push(Call::Read(bcm));
            Ok(self.level)
        }

        fn write(&mut self, bcm: u8, level: Level) -> std::result::Result<(), FakeStatus> {
            self.calls.push(Call::Write(bcm, level));
            Ok(())
        }

        fn spi_transfer(
            &mut self,
            data: &[u8],
            len: usize,
            cs: ChipSelect,
            cs_mux: bool,
        ) -> std::result::Result<Vec<u8>, FakeStatus> {
            self.calls
                .push(Call::Transfer(data.to_vec(), len, cs, cs_mux));
            Ok(data[..len].iter().map(|b| !b).collect())
        }

        fn spi_set_bit_order(&mut self, order: BitOrder) -> std::result::Result<(), FakeStatus> {
            self.calls.push(Call::BitOrder(order));
            Ok(())
        }

        fn spi_set_data_mode(&mut self, mode: DataMode) -> std::result::Result<(), FakeStatus> {
            self.calls.push(Call::DataMode(mode));
            Ok(())
        }

        fn spi_set_clock_divider(
            &mut self,
            divider: ClockDivider,
        ) -> std::result::Result<(), FakeStatus> {
            self.calls.push(Call::Divider(divider));
            Ok(())
        }
    }

    #[test]
    fn test_set_output_translates_pin() {
        let mut rpio = Rpio::new(FakeDriver::default());
        rpio.set_output(11).unwrap();
        rpio.set_input(3).unwrap();
        assert_eq!(
            rpio.driver().calls,
            vec![Call::SetMode(17, Mode::Output), Call::SetMode(0, Mode::Input)]
        );
    }

    #[test]
    fn test_invalid_pin_never_reaches_driver() {
        let mut rpio = Rpio::new(FakeDriver::default());
        assert!(matches!(rpio.set_input(6), Err(Error::InvalidPin(6))));
        assert!(matches!(rpio.read(41), Err(Error::InvalidPin(41))));
        assert!(matches!(rpio.write(-1, true), Err(Error::InvalidPin(-1))));
        assert!(rpio.driver().calls.is_empty());
    }

    #[test]
    fn test_configuration_error_on_driver_status() {
        let mut rpio = Rpio::new(FakeDriver {
            mode_status: -1,
            ..Default::default()
        });

        let mut called = 0;
        let err = rpio.set_output_then(12, || called += 1).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration {
                pin: 12,
                bcm: 18,
                mode: Mode::Output,
                ..
            }
        ));
        assert_eq!(called, 0);

        assert!(matches!(
            rpio.set_input(12),
            Err(Error::Configuration { mode: Mode::Input, .. })
        ));
    }

    #[test]
    fn test_completion_runs_exactly_once() {
        let mut rpio = Rpio::new(FakeDriver::default());

        let mut called = 0;
        rpio.set_input_then(7, || called += 1).unwrap();
        assert_eq!(called, 1);

        let value = rpio.set_output_then(7, || "done").unwrap();
        assert_eq!(value, "done");
    }

    #[test]
    fn test_read_relays_driver_level() {
        let mut rpio = Rpio::new(FakeDriver {
            level: Level::High,
            ..Default::default()
        });
        assert_eq!(rpio.read(40).unwrap(), Level::High);
        assert_eq!(rpio.driver().calls, vec![Call::Read(21)]);
    }

    #[test]
    fn test_write_str_coerces_to_integer() {
        let mut rpio = Rpio::new(FakeDriver::default());
        rpio.write_str(11, "1").unwrap();
        rpio.write_str(11, "0").unwrap();
        rpio.write(11, 1u8).unwrap();
        assert_eq!(
            rpio.driver().calls,
            vec![
                Call::Write(17, Level::High),
                Call::Write(17, Level::Low),
                Call::Write(17, Level::High),
            ]
        );

        assert!(matches!(
            rpio.write_str(11, "on"),
            Err(Error::InvalidLevel(_))
        ));
        assert!(matches!(
            rpio.write_str(1, "on"),
            Err(Error::InvalidPin(1))
        ));
        assert_eq!(rpio.driver().calls.len(), 3);
    }

    #[test]
    fn test_spi_transfer_forwards_verbatim() {
        let mut rpio = Rpio::new(FakeDriver::default());
        let rx = rpio
            .spi_transfer(&[0x00, 0xF0, 0xAA], 2, ChipSelect::Cs1, true)
            .unwrap();
        assert_eq!(rx, vec![0xFF, 0x0F]);
        assert_eq!(
            rpio.driver().calls,
            vec![Call::Transfer(
                vec![0x00, 0xF0, 0xAA],
                2,
                ChipSelect::Cs1,
                true
            )]
        );
    }

    #[test]
    fn test_spi_transfer_checks_length_and_features() {
        let mut rpio = Rpio::new(FakeDriver::default());
        assert!(matches!(
            rpio.spi_transfer(&[1, 2], 3, ChipSelect::Cs0, false),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            rpio.spi_transfer(&[1], 1, ChipSelect::Cs2, false),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            rpio.spi_transfer(&[1], 1, ChipSelect::None, false),
            Err(Error::Unsupported(_))
        ));
        assert!(rpio.driver().calls.is_empty());

        rpio.driver_mut().features = DriverFeatures::SPI_CS_BOTH | DriverFeatures::SPI_NO_CS;
        rpio.spi_transfer(&[1], 1, ChipSelect::Cs2, false).unwrap();
        rpio.spi_transfer(&[1], 1, ChipSelect::None, false).unwrap();
        assert_eq!(rpio.driver().calls.len(), 2);
    }

    #[test]
    fn test_spi_configuration_forwards() {
        let mut rpio = Rpio::new(FakeDriver::default());
        rpio.spi_set_bit_order(BitOrder::MsbFirst).unwrap();
        rpio.spi_set_data_mode(DataMode::Mode3).unwrap();
        rpio.spi_set_clock_divider(ClockDivider::DIV_64).unwrap();
        assert!(matches!(
            rpio.spi_set_bit_order(BitOrder::LsbFirst),
            Err(Error::Unsupported(_))
        ));

        assert_eq!(
            rpio.into_inner().calls,
            vec![
                Call::BitOrder(BitOrder::MsbFirst),
                Call::DataMode(DataMode::Mode3),
                Call::Divider(ClockDivider::DIV_64),
            ]
        );
    }

    #[test]
    fn test_borrowed_driver() {
        let mut driver = FakeDriver::default();
        {
            let mut rpio = Rpio::new(&mut driver);
            rpio.write(13, Level::High).unwrap();
        }
        assert_eq!(driver.calls, vec![Call::Write(27, Level::High)]);
    }
}
