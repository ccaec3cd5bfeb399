//! pmw3901-linux-spi - Linux spidev transport
//!
//! This crate provides a [`SensorBus`](pmw3901_core::SensorBus) backed by a
//! Linux spidev device (`/dev/spidevX.Y`).
//!
//! # Example
//!
//! ```no_run
//! use pmw3901_linux_spi::{LinuxSpi, LinuxSpiConfig};
//! use pmw3901_core::{protocol, SensorBus};
//!
//! // Open with default settings (2 MHz, mode 3)
//! let mut spi = LinuxSpi::open_device("/dev/spidev0.0")?;
//!
//! // Or with custom settings
//! let config = LinuxSpiConfig::new("/dev/spidev0.0")
//!     .with_speed(1_000_000)
//!     .with_read_delay_us(50);
//! let mut spi = LinuxSpi::open(&config)?;
//!
//! let id = protocol::read_product_id(&mut spi)?;
//! println!("Product ID: 0x{:02X}", id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the pmw3901 CLI
//!
//! ```bash
//! # Read motion with the default bus settings
//! pmw3901 read -t linux:dev=/dev/spidev0.0,gpiochip=0,reset=25
//!
//! # Slow the bus down to 1 MHz
//! pmw3901 read -t linux:dev=/dev/spidev0.0,spispeed=1000,gpiochip=0,reset=25
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device
//! - May require adding user to `spi` group or using udev rules

pub mod device;
pub mod error;

// Re-exports
pub use device::{mode, parse_options, LinuxSpi, LinuxSpiConfig};
pub use error::{LinuxSpiError, Result};

/// Open a Linux SPI device and return a boxed SensorBus
///
/// This is a convenience function for use in the CLI transport dispatch.
///
/// # Example Options
///
/// - `dev=/dev/spidev0.0` - Required: device path
/// - `spispeed=2000` - Optional: speed in kHz (default: 2000)
/// - `mode=3` - Optional: SPI mode 0-3 (default: 3)
/// - `read_delay=35` - Optional: address-to-data delay in us (default: 35)
pub fn open_linux_spi(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn pmw3901_core::SensorBus>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let spi = LinuxSpi::open(&config)?;
    Ok(Box::new(spi))
}
