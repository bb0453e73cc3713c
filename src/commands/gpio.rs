//! GPIO commands

use crate::cli::ModeArg;
use rpio_core::{GpioDriver, Rpio};

pub fn cmd_mode<D: GpioDriver>(
    rpio: &mut Rpio<D>,
    pin: i64,
    mode: ModeArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let bcm = rpio.translate(pin)?;
    match mode {
        ModeArg::Input => rpio.set_input(pin)?,
        ModeArg::Output => rpio.set_output(pin)?,
    }
    println!("Pin {} (GPIO{}) configured as {:?}", pin, bcm, mode);
    Ok(())
}

pub fn cmd_read<D: GpioDriver>(
    rpio: &mut Rpio<D>,
    pin: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = rpio.read(pin)?;
    println!("{}", level);
    Ok(())
}

/// Write a level; each CLI run opens a fresh driver, so the pin is made an
/// output first unless `keep_mode` is set
pub fn cmd_write<D: GpioDriver>(
    rpio: &mut Rpio<D>,
    pin: i64,
    value: &str,
    keep_mode: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !keep_mode {
        rpio.set_output(pin)?;
    }
    rpio.write_str(pin, value)?;
    log::info!("Wrote {} to pin {}", value, pin);
    Ok(())
}
