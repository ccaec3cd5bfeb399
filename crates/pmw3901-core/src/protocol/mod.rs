//! PMW3901MB register protocol
//!
//! Free functions implementing the chip's command sequences on top of the
//! transport traits. The [`Pmw3901`](crate::Pmw3901) driver wraps these;
//! they are public so that tools can drive a bus directly.

mod access;
mod frame;
mod power;
mod retry;
mod sequence;
pub mod tables;
mod tuning;

pub use access::*;
pub use frame::{grab_frame, start_frame_capture, stop_frame_capture};
pub use power::{power_up, pulse_reset, reset, shutdown, RESET_PULSE_MS};
pub use retry::{poll, RetryPolicy};
pub use sequence::{replay, Step};
pub use tuning::{set_optimum_performance, CALIBRATION_READY};
