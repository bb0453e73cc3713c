//! SPI commands

use crate::cli::{BitOrderArg, SpiCommands};
use rpio_core::spi::{BitOrder, ChipSelect, ClockDivider, DataMode};
use rpio_core::{GpioDriver, Rpio};

pub fn run<D: GpioDriver>(
    rpio: &mut Rpio<D>,
    command: SpiCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        SpiCommands::Transfer { data, len, cs, mux } => {
            let len = len.unwrap_or(data.len());
            let cs = ChipSelect::try_from(cs)?;
            let rx = rpio.spi_transfer(&data, len, cs, mux)?;
            println!("{}", format_hex(&rx));
            Ok(())
        }
        SpiCommands::Config {
            bit_order,
            data_mode,
            divider,
        } => {
            if bit_order.is_none() && data_mode.is_none() && divider.is_none() {
                return Err("Nothing to configure (use --bit-order, --data-mode or --divider)".into());
            }

            if let Some(order) = bit_order {
                let order = match order {
                    BitOrderArg::Lsb => BitOrder::LsbFirst,
                    BitOrderArg::Msb => BitOrder::MsbFirst,
                };
                rpio.spi_set_bit_order(order)?;
                println!("Bit order: {:?}", order);
            }
            if let Some(mode) = data_mode {
                let mode = DataMode::try_from(mode)?;
                rpio.spi_set_data_mode(mode)?;
                println!("Data mode: {:?}", mode);
            }
            if let Some(divider) = divider {
                let divider = ClockDivider::try_from(divider)?;
                rpio.spi_set_clock_divider(divider)?;
                println!("Clock divider: {}", divider);
            }
            Ok(())
        }
    }
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x9F, 0x00, 0xEF]), "9f 00 ef");
        assert_eq!(format_hex(&[]), "");
    }
}
