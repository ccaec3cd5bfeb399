//! Vendor register sequences
//!
//! Each table is replayed verbatim by [`replay`](super::replay). Register
//! 0x7F selects the register bank for the writes that follow it.

use super::sequence::{w, Step};

/// Switch the chip into raw frame capture mode
pub const FRAME_CAPTURE_START: &[Step] = &[
    w(0x7F, 0x07),
    w(0x41, 0x1D),
    w(0x4C, 0x00),
    w(0x7F, 0x08),
    w(0x6A, 0x38),
    w(0x7F, 0x00),
    w(0x55, 0x04),
    w(0x40, 0x80),
    w(0x4D, 0x11),
];

/// Return the chip from frame capture mode to motion tracking
pub const FRAME_CAPTURE_STOP: &[Step] = &[
    w(0x7F, 0x00),
    w(0x4D, 0x11),
    w(0x40, 0x80),
    w(0x55, 0x80),
    w(0x7F, 0x08),
    w(0x6A, 0x18),
    w(0x7F, 0x07),
    w(0x41, 0x0D),
    w(0x4C, 0x80),
    w(0x7F, 0x00),
];

/// Arm the grab port for one frame
pub const FRAME_GRAB_ARM: &[Step] = &[w(0x70, 0x00), w(0x58, 0xFF)];

/// Opening of the tuning sequence, before the readback check
pub const PERFORMANCE_PROLOGUE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x55, 0x01),
    w(0x50, 0x07),
    w(0x7F, 0x0E),
];

/// Tuning writes between the readback check and the adaptive branch
pub const PERFORMANCE_MIDDLE: &[Step] = &[
    w(0x7F, 0x00),
    w(0x51, 0x7B),
    w(0x50, 0x00),
    w(0x55, 0x00),
    w(0x7F, 0x0E),
];

/// Fixed bank writes preceding the adaptive coefficient writes
pub const PERFORMANCE_ADAPTIVE_PREFIX: &[Step] = &[
    w(0x7F, 0x00),
    w(0x61, 0xAD),
    w(0x51, 0x70),
    w(0x7F, 0x0E),
];

/// Final, fixed part of the tuning sequence
pub const PERFORMANCE_TUNING: &[Step] = &[
    w(0x7F, 0x00),
    w(0x61, 0xAD),
    w(0x7F, 0x03),
    w(0x40, 0x00),
    w(0x7F, 0x05),
    w(0x41, 0xB3),
    w(0x43, 0xF1),
    w(0x45, 0x14),
    w(0x5B, 0x32),
    w(0x5F, 0x34),
    w(0x7B, 0x08),
    w(0x7F, 0x06),
    w(0x44, 0x1B),
    w(0x40, 0xBF),
    w(0x4E, 0x3F),
    w(0x7F, 0x08),
    w(0x65, 0x20),
    w(0x6A, 0x18),
    w(0x7F, 0x09),
    w(0x4F, 0xAF),
    w(0x5F, 0x40),
    w(0x48, 0x80),
    w(0x49, 0x80),
    w(0x57, 0x77),
    w(0x60, 0x78),
    w(0x61, 0x78),
    w(0x62, 0x08),
    w(0x63, 0x50),
    w(0x7F, 0x0A),
    w(0x45, 0x60),
    w(0x7F, 0x00),
    w(0x4D, 0x11),
    w(0x55, 0x80),
    w(0x74, 0x1F),
    w(0x75, 0x1F),
    w(0x4A, 0x78),
    w(0x4B, 0x78),
    w(0x44, 0x08),
    w(0x45, 0x50),
    w(0x64, 0xFF),
    w(0x65, 0x1F),
    w(0x7F, 0x14),
    w(0x65, 0x67),
    w(0x66, 0x08),
    w(0x63, 0x70),
    w(0x7F, 0x15),
    w(0x48, 0x48),
    w(0x7F, 0x07),
    w(0x41, 0x0D),
    w(0x43, 0x14),
    w(0x4B, 0x0E),
    w(0x45, 0x0F),
    w(0x44, 0x42),
    w(0x4C, 0x80),
    w(0x7F, 0x10),
    w(0x5B, 0x02),
    w(0x7F, 0x07),
    w(0x40, 0x41),
    w(0x70, 0x00),
    Step::DelayMs(10),
    w(0x32, 0x44),
    w(0x7F, 0x07),
    w(0x40, 0x40),
    w(0x7F, 0x06),
    w(0x62, 0xF0),
    w(0x63, 0x00),
    w(0x7F, 0x0D),
    w(0x48, 0xC0),
    w(0x6F, 0xD5),
    w(0x7F, 0x00),
    w(0x5B, 0xA0),
    w(0x4E, 0xA8),
    w(0x5A, 0x50),
    w(0x40, 0x80),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn writes(steps: &[Step]) -> usize {
        steps
            .iter()
            .filter(|s| matches!(s, Step::Write(..)))
            .count()
    }

    #[test]
    fn test_table_lengths() {
        assert_eq!(FRAME_CAPTURE_START.len(), 9);
        assert_eq!(FRAME_CAPTURE_STOP.len(), 10);
        assert_eq!(writes(PERFORMANCE_TUNING), 73);
        assert_eq!(PERFORMANCE_TUNING.len(), 74);
    }

    #[test]
    fn test_tuning_delay_follows_grab_reset() {
        let pos = PERFORMANCE_TUNING
            .iter()
            .position(|s| *s == Step::DelayMs(10))
            .unwrap();
        assert_eq!(PERFORMANCE_TUNING[pos - 1], Step::Write(0x70, 0x00));
        assert_eq!(PERFORMANCE_TUNING[pos + 1], Step::Write(0x32, 0x44));
    }

    #[test]
    fn test_stop_leaves_bank_zero() {
        assert_eq!(FRAME_CAPTURE_STOP.last(), Some(&Step::Write(0x7F, 0x00)));
    }
}
