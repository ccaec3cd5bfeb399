//! Reset line driven through the Linux GPIO character device
//!
//! The PMW3901MB NRESET pin is active low. The line is requested as an
//! output that starts high, so opening it never resets the sensor by itself.

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use pmw3901_core::error::{Error as CoreError, Result as CoreResult};
use pmw3901_core::ResetPin;

/// Configuration for the reset line
#[derive(Debug, Clone, Default)]
pub struct LinuxGpioResetConfig {
    /// GPIO chip device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Line offset wired to NRESET
    pub line: Offset,
}

impl LinuxGpioResetConfig {
    /// Create a new configuration for a line on a chip
    pub fn new(device: impl Into<String>, line: Offset) -> Self {
        Self {
            device: device.into(),
            line,
        }
    }
}

/// Reset line backed by gpiocdev
pub struct LinuxGpioReset {
    request: Request,
    line: Offset,
}

impl LinuxGpioReset {
    /// Request the reset line described by `config`
    pub fn open(config: &LinuxGpioResetConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        log::debug!(
            "linux_gpio: Requesting line {} on {}",
            config.line,
            config.device
        );

        let mut req_config = Config::default();
        req_config.with_line(config.line).as_output(Value::Active);

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("pmw3901")
            .request()
            .map_err(|source| LinuxGpioError::LineRequestFailed {
                path: config.device.clone(),
                line: config.line,
                source,
            })?;

        log::info!(
            "linux_gpio: Opened {} (reset={})",
            config.device,
            config.line
        );

        Ok(Self {
            request,
            line: config.line,
        })
    }

    /// Drive the line high (`true`) or low (`false`)
    pub fn set_value(&self, high: bool) -> Result<()> {
        let value = if high { Value::Active } else { Value::Inactive };
        self.request
            .set_value(self.line, value)
            .map_err(LinuxGpioError::SetValueFailed)?;
        Ok(())
    }

    /// Line offset in use
    pub fn line(&self) -> Offset {
        self.line
    }
}

impl ResetPin for LinuxGpioReset {
    fn set_level(&mut self, high: bool) -> CoreResult<()> {
        log::trace!("linux_gpio: reset line {}", if high { "high" } else { "low" });
        self.set_value(high).map_err(|e| {
            log::error!("linux_gpio: {}", e);
            CoreError::ResetLine
        })
    }

    fn deinit(&mut self) -> CoreResult<()> {
        // Leave the sensor out of reset; the line is released on drop
        self.set_level(true)
    }
}

/// Parse reset line options from the transport string
///
/// Supported options:
/// - `gpiochip=N` or `gpiochip=/dev/gpiochipN` - GPIO chip (required)
/// - `reset=N` - line offset wired to NRESET (required)
///
/// Bus options (`dev`, `spispeed`, `mode`, `read_delay`) are skipped.
pub fn parse_options(
    options: &[(&str, &str)],
) -> std::result::Result<LinuxGpioResetConfig, String> {
    let mut config = LinuxGpioResetConfig::default();
    let mut have_reset = false;

    for (key, value) in options {
        match *key {
            "gpiochip" => {
                config.device = if value.starts_with('/') {
                    value.to_string()
                } else {
                    let n: u32 = value
                        .parse()
                        .map_err(|_| format!("Invalid gpiochip value: {}", value))?;
                    format!("/dev/gpiochip{}", n)
                };
            }
            "reset" => {
                config.line = value
                    .parse()
                    .map_err(|_| format!("Invalid reset value: {}", value))?;
                have_reset = true;
            }
            // Bus options are consumed by the spidev transport
            "dev" | "spispeed" | "mode" | "read_delay" => {}
            _ => {
                log::warn!("linux_gpio: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err("Missing required parameter: gpiochip.\n\
             e.g. linux:dev=/dev/spidev0.0,gpiochip=0,reset=25"
            .to_string());
    }
    if !have_reset {
        return Err("Missing required parameter: reset".to_string());
    }

    Ok(config)
}
