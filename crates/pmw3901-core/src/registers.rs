//! PMW3901MB register map
//!
//! Register addresses as documented in the PMW3901MB datasheet, plus the
//! magic values and status bits used by the driver.

use bitflags::bitflags;

/// Bit set in the address byte of every register write
pub const WRITE_FLAG: u8 = 0x80;

// ============================================================================
// Identification
// ============================================================================

/// Product ID
pub const PRODUCT_ID: u8 = 0x00;
/// Revision ID
pub const REVISION_ID: u8 = 0x01;
/// Inverse product ID
pub const INVERSE_PRODUCT_ID: u8 = 0x5F;

/// Expected content of [`PRODUCT_ID`]
pub const PRODUCT_ID_VALUE: u8 = 0x49;

// ============================================================================
// Motion
// ============================================================================

/// Motion status; writing any value clears the motion interrupt
pub const MOTION: u8 = 0x02;
/// Delta X low byte
pub const DELTA_X_L: u8 = 0x03;
/// Delta X high byte
pub const DELTA_X_H: u8 = 0x04;
/// Delta Y low byte
pub const DELTA_Y_L: u8 = 0x05;
/// Delta Y high byte
pub const DELTA_Y_H: u8 = 0x06;
/// Surface quality
pub const SQUAL: u8 = 0x07;
/// Sum of raw data
pub const RAW_DATA_SUM: u8 = 0x08;
/// Maximum raw data
pub const MAXIMUM_RAW_DATA: u8 = 0x09;
/// Minimum raw data
pub const MINIMUM_RAW_DATA: u8 = 0x0A;
/// Shutter low byte
pub const SHUTTER_LOWER: u8 = 0x0B;
/// Shutter high byte (5 bits)
pub const SHUTTER_UPPER: u8 = 0x0C;
/// Observation
pub const OBSERVATION: u8 = 0x15;
/// Motion burst read port
pub const MOTION_BURST: u8 = 0x16;

/// Length of a full motion burst
pub const MOTION_BURST_LEN: usize = 12;

// ============================================================================
// Power control
// ============================================================================

/// Power-up reset
pub const POWER_UP_RESET: u8 = 0x3A;
/// Shutdown
pub const SHUTDOWN: u8 = 0x3B;

/// Value written to [`POWER_UP_RESET`] to reset the chip
pub const POWER_UP_RESET_VALUE: u8 = 0x5A;
/// Value written to [`SHUTDOWN`] to power the chip down
pub const SHUTDOWN_VALUE: u8 = 0xB6;

// ============================================================================
// Raw frame grab
// ============================================================================

/// Raw data grab port
pub const RAW_DATA_GRAB: u8 = 0x58;
/// Raw data grab status
pub const RAW_DATA_GRAB_STATUS: u8 = 0x59;

/// Value written to [`RAW_DATA_GRAB`] to start streaming a frame
pub const RAW_DATA_GRAB_START: u8 = 0xFF;

// ============================================================================
// Tuning
// ============================================================================

/// Register bank select used by the vendor tuning sequences
pub const BANK_SELECT: u8 = 0x7F;

bitflags! {
    /// Bits of the [`MOTION`] register and of the first burst byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MotionStatus: u8 {
        /// Motion occurred since the last read
        const MOTION = 1 << 7;
    }
}

bitflags! {
    /// Bits of the [`RAW_DATA_GRAB_STATUS`] register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GrabStatus: u8 {
        /// A frame is available
        const FRAME_VALID = 1 << 7;
        /// Frame data is ready to be read
        const DATA_READY = 1 << 6;
    }
}

bitflags! {
    /// Flags carried by every byte read from [`RAW_DATA_GRAB`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GrabData: u8 {
        /// The low six bits hold the upper six bits of the pixel
        const UPPER = 1 << 6;
        /// Bits 3:2 hold the lower two bits of the pixel
        const LOWER = 1 << 7;
    }
}
