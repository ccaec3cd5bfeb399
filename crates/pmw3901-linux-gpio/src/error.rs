//! Error types for the Linux GPIO reset line

use thiserror::Error;

/// Linux GPIO reset line errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request the reset line
    #[error("Failed to request line {line} on '{path}': {source}")]
    LineRequestFailed {
        path: String,
        line: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to drive the reset line
    #[error("Failed to set reset line value: {0}")]
    SetValueFailed(#[source] gpiocdev::Error),

    /// GPIO chip not specified
    #[error("No GPIO chip specified. Use gpiochip=N or gpiochip=/dev/gpiochipN")]
    NoDevice,
}

/// Result type for Linux GPIO operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;
