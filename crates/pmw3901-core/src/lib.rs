//! pmw3901-core - Core driver for the PixArt PMW3901MB optical flow sensor
//!
//! This crate implements the chip-level protocol of the PMW3901MB: the
//! power-up and tuning register sequences, the motion burst decoder, the
//! raw frame capture pipeline and the conversion of motion deltas into
//! physical displacement. It is `no_std` compatible and never allocates.
//!
//! The hardware is reached through two small traits, [`SensorBus`] (SPI
//! register access plus a millisecond delay) and [`ResetPin`] (the reset
//! GPIO). Backends live in their own crates.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable `Box<dyn ...>` implementations of the transport traits
//!
//! # Example
//!
//! ```ignore
//! use pmw3901_core::{Pmw3901, Validity};
//!
//! let mut sensor = Pmw3901::new(bus, reset)?;
//! sensor.power_up()?;
//! sensor.set_optimum_performance()?;
//!
//! let motion = sensor.burst_read()?;
//! if motion.validity == Validity::Valid {
//!     let dx = sensor.delta_raw_to_delta_cm(motion.delta_x, 0.1);
//!     println!("moved {:.2} cm along x", dx);
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bus;
pub mod driver;
pub mod error;
pub mod frame;
pub mod info;
pub mod motion;
pub mod protocol;
pub mod registers;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{ResetPin, SensorBus};
pub use driver::{DeinitError, FrameCapture, MotionEvent, Pmw3901, Pmw3901Builder};
pub use error::{Capability, Error, FramePhase, Result};
pub use frame::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
pub use info::{info, ChipInfo};
pub use motion::{Displacement, Motion, Validity};
