//! Frame capture guard

use super::Pmw3901;
use crate::bus::{ResetPin, SensorBus};
use crate::error::Result;
use crate::frame::Frame;
use crate::protocol;

/// Sensor in frame capture mode
///
/// Holds the driver borrowed for as long as capture mode lasts, so motion
/// reads cannot be mixed with frame reads. Call [`FrameCapture::stop`] to
/// leave capture mode and see whether that worked; if the guard is simply
/// dropped, the stop sequence still runs and a failure is only logged.
pub struct FrameCapture<'a, B: SensorBus, R: ResetPin> {
    driver: &'a mut Pmw3901<B, R>,
    stopped: bool,
}

impl<'a, B: SensorBus, R: ResetPin> FrameCapture<'a, B, R> {
    pub(super) fn new(driver: &'a mut Pmw3901<B, R>) -> Self {
        Self {
            driver,
            stopped: false,
        }
    }

    /// Read one 35x35 frame into `frame`
    ///
    /// `frame` is zeroed first. On a timeout the pixels read so far are
    /// kept and the rest stay zero.
    pub fn get_frame(&mut self, frame: &mut Frame) -> Result<()> {
        protocol::grab_frame(&mut self.driver.bus, frame)
    }

    /// Leave capture mode
    pub fn stop(mut self) -> Result<()> {
        self.stopped = true;
        protocol::stop_frame_capture(&mut self.driver.bus)
    }
}

impl<B: SensorBus, R: ResetPin> Drop for FrameCapture<'_, B, R> {
    fn drop(&mut self) {
        if !self.stopped {
            if let Err(e) = protocol::stop_frame_capture(&mut self.driver.bus) {
                log::warn!("pmw3901: failed to stop frame capture on drop: {}", e);
            }
        }
    }
}
