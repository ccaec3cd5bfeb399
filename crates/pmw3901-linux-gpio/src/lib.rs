//! pmw3901-linux-gpio - Linux GPIO reset line
//!
//! This crate provides a [`ResetPin`](pmw3901_core::ResetPin) that drives the
//! sensor's NRESET pin through the Linux character device GPIO interface
//! (gpiocdev).
//!
//! # Example
//!
//! ```no_run
//! use pmw3901_linux_gpio::{LinuxGpioReset, LinuxGpioResetConfig};
//! use pmw3901_core::ResetPin;
//!
//! let config = LinuxGpioResetConfig::new("/dev/gpiochip0", 25);
//! let mut reset = LinuxGpioReset::open(&config)?;
//!
//! reset.set_level(false)?;
//! reset.set_level(true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Wiring
//!
//! | Sensor Pin | Connection |
//! |------------|------------|
//! | NCS, SCLK, MOSI, MISO | SPI controller exposed as `/dev/spidevX.Y` |
//! | NRESET     | Any free GPIO line (`reset=N`) |
//! | VDD/VDDIO  | 3.3V |

pub mod device;
pub mod error;

pub use device::{parse_options, LinuxGpioReset, LinuxGpioResetConfig};
pub use error::{LinuxGpioError, Result};

/// Open the reset line and return a boxed ResetPin
///
/// # Example Options
///
/// - `gpiochip=0` - Required: chip number or `/dev/gpiochipN` path
/// - `reset=25` - Required: line offset wired to NRESET
pub fn open_linux_gpio_reset(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn pmw3901_core::ResetPin>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let reset = LinuxGpioReset::open(&config)?;
    Ok(Box::new(reset))
}
