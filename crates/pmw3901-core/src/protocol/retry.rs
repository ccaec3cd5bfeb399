//! Bounded polling
//!
//! The chip signals readiness through status bits that have to be polled.
//! [`poll`] runs one attempt, waits the policy's interval and tries again
//! until the attempt reports a value or the attempts are used up. There is
//! no delay after the final attempt.

use crate::bus::SensorBus;
use crate::error::Result;

/// How often and how fast to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub attempts: u32,
    /// Delay between attempts in milliseconds
    pub interval_ms: u32,
}

impl RetryPolicy {
    /// Create a new policy
    pub const fn new(attempts: u32, interval_ms: u32) -> Self {
        Self {
            attempts,
            interval_ms,
        }
    }

    /// Tuning readback check: the first try plus three retries, 100 ms apart
    pub const CALIBRATION: Self = Self::new(4, 100);

    /// Frame grab handshakes: ten reads, 10 ms apart
    pub const FRAME_GRAB: Self = Self::new(10, 10);
}

/// Run `attempt` until it yields `Some`, at most `policy.attempts` times
///
/// Returns `Ok(None)` when the attempts are exhausted. An error from
/// `attempt` aborts polling immediately.
pub fn poll<B, T, F>(bus: &mut B, policy: RetryPolicy, mut attempt: F) -> Result<Option<T>>
where
    B: SensorBus + ?Sized,
    F: FnMut(&mut B) -> Result<Option<T>>,
{
    for n in 0..policy.attempts {
        if let Some(value) = attempt(bus)? {
            return Ok(Some(value));
        }
        if n + 1 < policy.attempts {
            bus.delay_ms(policy.interval_ms);
        }
    }
    Ok(None)
}
