//! Linux spidev access
//!
//! One `/dev/spidevB.C` node per chip select. Settings are written with the
//! spidev ioctls and every transfer is a single full-duplex
//! `SPI_IOC_MESSAGE(1)`.

use crate::error::{LinuxError, Result};

use rpio_core::spi::{BitOrder, DataMode};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// spidev mode bits (`include/uapi/linux/spi/spi.h`)
pub mod mode {
    pub const SPI_CPHA: u8 = 0x01;
    pub const SPI_CPOL: u8 = 0x02;
    pub const SPI_CS_HIGH: u8 = 0x04;
    pub const SPI_LSB_FIRST: u8 = 0x08;
    pub const SPI_NO_CS: u8 = 0x40;
}

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_write_ptr;

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_LSB_FIRST: u8 = 2;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_lsb_first,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_LSB_FIRST,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    /// Size of struct spi_ioc_transfer
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[n * sizeof(spi_ioc_transfer)])
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// Must match the kernel's struct spi_ioc_transfer layout
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    _pad: u8,
}

/// Settings applied to every spidev node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiSettings {
    pub bit_order: BitOrder,
    pub data_mode: DataMode,
    pub speed_hz: u32,
}

impl SpiSettings {
    /// Value for SPI_IOC_WR_MODE
    pub fn mode_bits(&self, no_cs: bool) -> u8 {
        let mut bits = 0;
        if self.data_mode.cpha() {
            bits |= mode::SPI_CPHA;
        }
        if self.data_mode.cpol() {
            bits |= mode::SPI_CPOL;
        }
        if no_cs {
            bits |= mode::SPI_NO_CS;
        }
        bits
    }
}

/// An open spidev node
pub struct SpiDev {
    file: File,
    path: String,
    no_cs: bool,
}

impl SpiDev {
    /// Open a spidev node and apply `settings`
    pub fn open(path: &str, no_cs: bool, settings: &SpiSettings) -> Result<Self> {
        log::debug!("linux: Opening {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxError::SpiOpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(file.as_raw_fd(), &bits).map_err(|e| {
                LinuxError::SetBitsPerWordFailed {
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let mut dev = Self {
            file,
            path: path.to_string(),
            no_cs,
        };
        dev.apply(settings)?;
        Ok(dev)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Write mode, bit order and speed
    pub fn apply(&mut self, settings: &SpiSettings) -> Result<()> {
        let fd = self.file.as_raw_fd();

        let mode = settings.mode_bits(self.no_cs);
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let lsb_first = u8::from(settings.bit_order == BitOrder::LsbFirst);
        unsafe {
            ioctl::spi_ioc_wr_lsb_first(fd, &lsb_first).map_err(|e| {
                LinuxError::SetBitOrderFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }

        let speed = settings.speed_hz;
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxError::SetSpeedFailed {
                    speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::debug!(
            "linux: {} mode={:#04x} lsb_first={} speed={} Hz",
            self.path,
            mode,
            lsb_first,
            speed
        );
        Ok(())
    }

    /// Full-duplex transfer of `tx`, returning as many bytes as were sent
    pub fn transfer(&mut self, tx: &[u8], speed_hz: u32, cs_change: bool) -> Result<Vec<u8>> {
        let mut rx = vec![0u8; tx.len()];
        if tx.is_empty() {
            return Ok(rx);
        }

        let transfer = SpiIocTransfer {
            tx_buf: tx.as_ptr() as u64,
            rx_buf: rx.as_mut_ptr() as u64,
            len: tx.len() as u32,
            speed_hz,
            bits_per_word: 8,
            cs_change: u8::from(cs_change),
            ..Default::default()
        };

        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                ioctl::spi_ioc_message(1),
                &transfer as *const SpiIocTransfer,
            )
        };
        if ret < 0 {
            return Err(LinuxError::TransferFailed(std::io::Error::last_os_error()));
        }

        Ok(rx)
    }
}
