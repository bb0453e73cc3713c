//! Header and driver listings

use crate::drivers;
use rpio_core::pins::{self, PinFunction};

/// List all available drivers
pub fn list_drivers() {
    print!("{}", drivers::driver_help());
    println!();
    println!("Select one with --driver <name[:key=value,...]> or RPIO_DRIVER.");
}

/// Print the 40-pin header as two columns, odd pins on the left
pub fn print_header() {
    println!("{:>10}  {:>3} {:<3}  {:<10}", "Function", "Pin", "Pin", "Function");
    println!("{}", "-".repeat(34));

    let header: Vec<(u8, PinFunction)> = pins::header().collect();
    for pair in header.chunks(2) {
        if let [(odd, odd_fn), (even, even_fn)] = pair {
            println!(
                "{:>10}  {:>3} {:<3}  {:<10}",
                odd_fn.to_string(),
                odd,
                even,
                even_fn.to_string()
            );
        }
    }
}

/// Print the BCM number for a header pin
pub fn translate(pin: i64) -> Result<(), Box<dyn std::error::Error>> {
    let bcm = pins::translate(pin)?;
    println!("{}", bcm);
    Ok(())
}
