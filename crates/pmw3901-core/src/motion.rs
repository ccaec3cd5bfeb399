//! Motion burst decoding
//!
//! A motion burst is a single 12-byte read of the
//! [`MOTION_BURST`](crate::registers::MOTION_BURST) port. Its layout is:
//!
//! | Byte | Content                          |
//! |------|----------------------------------|
//! | 0    | motion status (bit 7 = motion)   |
//! | 1    | observation (bits 5:0)           |
//! | 2-3  | delta X, little endian           |
//! | 4-5  | delta Y, little endian           |
//! | 6    | surface quality / 4              |
//! | 7    | raw data average                 |
//! | 8    | raw data maximum                 |
//! | 9    | raw data minimum                 |
//! | 10   | shutter upper (bits 4:0)         |
//! | 11   | shutter lower                    |

use crate::registers::{MotionStatus, MOTION_BURST_LEN};
use crate::units::delta_raw_to_delta_cm;

/// Surface quality byte below which a burst is rejected
pub const MIN_SQUAL: u8 = 0x19;

/// Shutter upper byte that marks a saturated, unusable frame
pub const SHUTTER_UPPER_SATURATED: u8 = 0x1F;

/// Outcome of a motion burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// No motion was reported
    #[default]
    Invalid,
    /// Motion was reported and the decoded fields are meaningful
    Valid,
    /// Motion was reported but the frame quality checks failed
    InnerError,
}

/// Decoded motion burst
///
/// Decoded fields are zero unless `validity` is [`Validity::Valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    /// Raw burst bytes as read from the chip
    pub raw: [u8; MOTION_BURST_LEN],
    /// Delta X in raw counts
    pub delta_x: i16,
    /// Delta Y in raw counts
    pub delta_y: i16,
    /// Surface quality, scaled to the full register range
    pub surface_quality: u16,
    /// Maximum raw pixel value
    pub raw_max: u8,
    /// Average raw pixel value
    pub raw_average: u8,
    /// Minimum raw pixel value
    pub raw_min: u8,
    /// Observation bits
    pub observation: u8,
    /// Shutter, 13 bits
    pub shutter: u16,
    /// Decode outcome
    pub validity: Validity,
}

/// Displacement over the tracked surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    /// X displacement in centimetres
    pub x_cm: f32,
    /// Y displacement in centimetres
    pub y_cm: f32,
}

impl Motion {
    /// Decode a raw motion burst
    ///
    /// ```
    /// use pmw3901_core::{Motion, Validity};
    ///
    /// let motion = Motion::from_burst([0; 12]);
    /// assert_eq!(motion.validity, Validity::Invalid);
    /// ```
    pub fn from_burst(raw: [u8; MOTION_BURST_LEN]) -> Self {
        let mut motion = Self {
            raw,
            ..Default::default()
        };

        if !MotionStatus::from_bits_truncate(raw[0]).contains(MotionStatus::MOTION) {
            return motion;
        }

        if raw[6] < MIN_SQUAL || raw[10] == SHUTTER_UPPER_SATURATED {
            motion.validity = Validity::InnerError;
            return motion;
        }

        motion.delta_x = i16::from_le_bytes([raw[2], raw[3]]);
        motion.delta_y = i16::from_le_bytes([raw[4], raw[5]]);
        motion.observation = raw[1] & 0x3F;
        motion.raw_average = raw[7];
        motion.raw_max = raw[8];
        motion.raw_min = raw[9];
        motion.shutter = (((raw[10] & 0x1F) as u16) << 8) | raw[11] as u16;
        motion.surface_quality = raw[6] as u16 * 4;
        motion.validity = Validity::Valid;
        motion
    }

    /// Whether the burst carried usable motion
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Displacement at the given sensor height, if the burst is valid
    pub fn displacement(&self, height_m: f32) -> Option<Displacement> {
        self.is_valid().then(|| Displacement {
            x_cm: delta_raw_to_delta_cm(self.delta_x, height_m),
            y_cm: delta_raw_to_delta_cm(self.delta_y, height_m),
        })
    }
}
