//! Error types for pmw3901-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate. Every variant maps onto a small stable integer
//! through [`Error::code`], which front ends use as an exit status.

use core::fmt;

/// A transport capability the driver needs before it can talk to the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// SPI register access and delay
    Bus,
    /// Reset GPIO line
    ResetLine,
}

/// Stage of the frame grab protocol that ran out of polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Waiting for the grab status register to report a frame
    Arm,
    /// Waiting for the upper six bits of a pixel
    UpperBits,
    /// Waiting for the lower two bits of a pixel
    LowerBits,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// SPI read or write failed, or a transport hook could not be brought up
    Transport,
    /// A required transport capability was not supplied at init
    MissingCapability(Capability),
    /// Product ID register did not hold the PMW3901MB identifier
    InvalidProductId {
        /// Value read from the product ID register
        found: u8,
    },
    /// Driving the reset line failed
    ResetLine,
    /// Frame grab polling ran out of retries
    Timeout(FramePhase),
    /// Tuning readback never reached the expected value
    Calibration {
        /// Last value read back from the chip
        readback: u8,
    },
}

impl Error {
    /// Stable numeric code for this error
    pub const fn code(&self) -> u8 {
        match self {
            Self::Transport => 1,
            Self::MissingCapability(_) => 2,
            Self::InvalidProductId { .. } => 3,
            Self::ResetLine => 4,
            Self::Timeout(_) => 5,
            Self::Calibration { .. } => 6,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI bus"),
            Self::ResetLine => write!(f, "reset line"),
        }
    }
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arm => write!(f, "grab status"),
            Self::UpperBits => write!(f, "pixel upper bits"),
            Self::LowerBits => write!(f, "pixel lower bits"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "SPI transport failed"),
            Self::MissingCapability(cap) => write!(f, "no {} supplied", cap),
            Self::InvalidProductId { found } => {
                write!(f, "product ID is invalid: expected 0x49, found 0x{:02X}", found)
            }
            Self::ResetLine => write!(f, "reset line write failed"),
            Self::Timeout(phase) => write!(f, "frame grab timed out waiting for {}", phase),
            Self::Calibration { readback } => write!(
                f,
                "optimum performance setup failed: readback 0x{:02X}, expected 0x08",
                readback
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
