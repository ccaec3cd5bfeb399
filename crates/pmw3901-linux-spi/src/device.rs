//! Linux SPI device implementation
//!
//! This module provides the `LinuxSpi` struct that implements the
//! `SensorBus` trait using Linux's spidev interface.

use crate::error::{LinuxSpiError, Result};

use pmw3901_core::error::{Error as CoreError, Result as CoreResult};
use pmw3901_core::SensorBus;

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// Default SPI clock speed in Hz (2 MHz, the sensor's maximum)
const DEFAULT_SPEED_HZ: u32 = 2_000_000;

/// Default pause between the address byte and read data, in microseconds
const DEFAULT_READ_DELAY_US: u16 = 35;

/// Longest register write, address byte included
const MAX_WRITE_LEN: usize = 64;

/// SPI mode constants
pub mod mode {
    /// SPI mode 0: CPOL=0, CPHA=0
    pub const MODE_0: u8 = 0;
    /// SPI mode 1: CPOL=0, CPHA=1
    pub const MODE_1: u8 = 1;
    /// SPI mode 2: CPOL=1, CPHA=0
    pub const MODE_2: u8 = 2;
    /// SPI mode 3: CPOL=1, CPHA=1
    pub const MODE_3: u8 = 3;
}

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_write_ptr;

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
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

    /// Calculate ioctl number for SPI_IOC_MESSAGE(n)
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        // _IOW(SPI_IOC_MAGIC, 0, char[size])
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// SPI transfer structure for ioctl
/// This must match the kernel's struct spi_ioc_transfer layout
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,          // __u64 tx_buf
    rx_buf: u64,          // __u64 rx_buf
    len: u32,             // __u32 len
    speed_hz: u32,        // __u32 speed_hz
    delay_usecs: u16,     // __u16 delay_usecs
    bits_per_word: u8,    // __u8 bits_per_word
    cs_change: u8,        // __u8 cs_change
    tx_nbits: u8,         // __u8 tx_nbits
    rx_nbits: u8,         // __u8 rx_nbits
    word_delay_usecs: u8, // __u8 word_delay_usecs
    _pad: u8,             // padding
}

/// Configuration for opening a Linux SPI device
#[derive(Debug, Clone)]
pub struct LinuxSpiConfig {
    /// Device path (e.g., "/dev/spidev0.0")
    pub device: String,
    /// SPI clock speed in Hz (default: 2 MHz)
    pub speed_hz: u32,
    /// SPI mode (0-3, default: 3)
    pub mode: u8,
    /// Delay between address byte and read data in microseconds
    pub read_delay_us: u16,
}

impl Default for LinuxSpiConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            speed_hz: DEFAULT_SPEED_HZ,
            mode: mode::MODE_3,
            read_delay_us: DEFAULT_READ_DELAY_US,
        }
    }
}

impl LinuxSpiConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the SPI clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    /// Set the SPI mode (0-3)
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }

    /// Set the address-to-data delay for reads
    pub fn with_read_delay_us(mut self, us: u16) -> Self {
        self.read_delay_us = us;
        self
    }
}

/// PMW3901MB bus over Linux spidev
///
/// Reads send the register number and then clock in the data within one
/// chip select; writes send the flagged address followed by the data.
pub struct LinuxSpi {
    /// File handle for spidev device
    file: File,
    /// Current speed in Hz
    speed_hz: u32,
    /// Address-to-data delay for reads
    read_delay_us: u16,
}

impl LinuxSpi {
    /// Open a Linux SPI device with the given configuration
    pub fn open(config: &LinuxSpiConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        let mode = config.mode;
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LinuxSpiError::SetBitsPerWordFailed {
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let speed = config.speed_hz;
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxSpiError::SetSpeedFailed {
                    speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::info!(
            "linux_spi: Opened {} (mode={}, speed={} kHz)",
            config.device,
            mode,
            speed / 1000
        );

        Ok(Self {
            file,
            speed_hz: speed,
            read_delay_us: config.read_delay_us,
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxSpiConfig::new(device))
    }

    fn transfer(&self, tx: &[u8], tx_delay_us: u16, rx: &mut [u8]) -> std::io::Result<()> {
        let fd = self.file.as_raw_fd();

        let mut transfers = vec![SpiIocTransfer {
            tx_buf: tx.as_ptr() as u64,
            len: tx.len() as u32,
            speed_hz: self.speed_hz,
            delay_usecs: tx_delay_us,
            bits_per_word: 8,
            ..Default::default()
        }];
        if !rx.is_empty() {
            transfers.push(SpiIocTransfer {
                rx_buf: rx.as_mut_ptr() as u64,
                len: rx.len() as u32,
                speed_hz: self.speed_hz,
                bits_per_word: 8,
                ..Default::default()
            });
        }

        let ioctl_num = ioctl::spi_ioc_message(transfers.len() as u8);
        let ret = unsafe { libc::ioctl(fd, ioctl_num, transfers.as_ptr()) };
        if ret < 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(())
    }

    /// Read `buf.len()` bytes starting at `reg`
    pub fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        self.transfer(&[reg], self.read_delay_us, buf)
            .map_err(|source| LinuxSpiError::TransferFailed { reg, source })
    }

    /// Write `data` to the register addressed by `addr`
    pub fn write_register(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        let len = data.len() + 1;
        if len > MAX_WRITE_LEN {
            return Err(LinuxSpiError::TransferTooLong { len });
        }
        let mut tx = [0u8; MAX_WRITE_LEN];
        tx[0] = addr;
        tx[1..len].copy_from_slice(data);
        self.transfer(&tx[..len], 0, &mut [])
            .map_err(|source| LinuxSpiError::TransferFailed { reg: addr, source })
    }

    /// Get current speed setting
    pub fn speed_hz(&self) -> u32 {
        self.speed_hz
    }
}

impl SensorBus for LinuxSpi {
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> CoreResult<()> {
        self.read_register(reg, buf).map_err(|e| {
            log::error!("linux_spi: {}", e);
            CoreError::Transport
        })
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> CoreResult<()> {
        self.write_register(addr, data).map_err(|e| {
            log::error!("linux_spi: {}", e);
            CoreError::Transport
        })
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Parse transport options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxSpiConfig, String> {
    let mut config = LinuxSpiConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "spispeed" => {
                // Parse speed in kHz
                let speed_khz: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid spispeed value: {}", value))?;
                config.speed_hz = speed_khz * 1000;
            }
            "mode" => {
                let mode: u8 = value
                    .parse()
                    .map_err(|_| format!("Invalid mode value: {}", value))?;
                if mode > 3 {
                    return Err(format!("Invalid SPI mode: {} (must be 0-3)", mode));
                }
                config.mode = mode;
            }
            "read_delay" => {
                config.read_delay_us = value
                    .parse()
                    .map_err(|_| format!("Invalid read_delay value: {}", value))?;
            }
            // Reset line options are consumed by the GPIO transport
            "gpiochip" | "reset" => {}
            _ => {
                log::warn!("linux_spi: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err("No device specified. Use dev=/dev/spidevX.Y".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = parse_options(&[("dev", "/dev/spidev0.0")]).unwrap();
        assert_eq!(config.device, "/dev/spidev0.0");
        assert_eq!(config.speed_hz, 2_000_000);
        assert_eq!(config.mode, mode::MODE_3);
        assert_eq!(config.read_delay_us, 35);
    }

    #[test]
    fn test_parse_all() {
        let config = parse_options(&[
            ("dev", "/dev/spidev1.1"),
            ("spispeed", "1000"),
            ("mode", "0"),
            ("read_delay", "50"),
            ("reset", "25"),
        ])
        .unwrap();
        assert_eq!(config.speed_hz, 1_000_000);
        assert_eq!(config.mode, 0);
        assert_eq!(config.read_delay_us, 50);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_options(&[]).is_err());
        assert!(parse_options(&[("dev", "/dev/spidev0.0"), ("mode", "4")]).is_err());
        assert!(parse_options(&[("dev", "/dev/spidev0.0"), ("spispeed", "fast")]).is_err());
    }

    #[test]
    fn test_message_ioctl_number() {
        // SPI_IOC_MESSAGE(1) and (2) as computed by the kernel headers
        assert_eq!(ioctl::spi_ioc_message(1), 0x4020_6B00);
        assert_eq!(ioctl::spi_ioc_message(2), 0x4040_6B00);
    }

    #[test]
    fn test_open_requires_device() {
        assert!(matches!(
            LinuxSpi::open(&LinuxSpiConfig::default()),
            Err(LinuxSpiError::NoDevice)
        ));
    }
}
