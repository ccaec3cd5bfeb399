//! Raw frame capture
//!
//! In capture mode the chip streams its pixel array through the
//! [`RAW_DATA_GRAB`](registers::RAW_DATA_GRAB) port. Every pixel takes two
//! reads: the first one carries the upper six bits and has bit 6 set, the
//! second carries the lower two bits in bits 3:2 and has bit 7 set. Each
//! read is retried under [`RetryPolicy::FRAME_GRAB`] until its flag shows.

use super::access::read_register;
use super::retry::{poll, RetryPolicy};
use super::sequence::replay;
use super::tables;
use crate::bus::SensorBus;
use crate::error::{Error, FramePhase, Result};
use crate::frame::Frame;
use crate::registers::{self, GrabData, GrabStatus};

/// Switch the chip into frame capture mode
pub fn start_frame_capture<B: SensorBus + ?Sized>(bus: &mut B) -> Result<()> {
    replay(bus, tables::FRAME_CAPTURE_START)?;
    log::debug!("pmw3901: frame capture started");
    Ok(())
}

/// Leave frame capture mode
pub fn stop_frame_capture<B: SensorBus + ?Sized>(bus: &mut B) -> Result<()> {
    replay(bus, tables::FRAME_CAPTURE_STOP)?;
    log::debug!("pmw3901: frame capture stopped");
    Ok(())
}

/// Grab one frame into `frame`
///
/// The chip must already be in capture mode. `frame` is cleared first; on a
/// timeout it keeps the pixels received so far.
pub fn grab_frame<B: SensorBus + ?Sized>(bus: &mut B, frame: &mut Frame) -> Result<()> {
    frame.clear();
    replay(bus, tables::FRAME_GRAB_ARM)?;

    let armed = poll(bus, RetryPolicy::FRAME_GRAB, |bus| {
        let status = GrabStatus::from_bits_truncate(read_register(
            bus,
            registers::RAW_DATA_GRAB_STATUS,
        )?);
        Ok(status.contains(GrabStatus::FRAME_VALID | GrabStatus::DATA_READY).then_some(()))
    })?;
    if armed.is_none() {
        log::error!("pmw3901: read timeout waiting for grab status");
        return Err(Error::Timeout(FramePhase::Arm));
    }

    for row in frame.pixels.iter_mut() {
        for pixel in row.iter_mut() {
            let upper = read_grab(bus, GrabData::UPPER, FramePhase::UpperBits)?;
            *pixel = (upper & 0x3F) << 2;
            let lower = read_grab(bus, GrabData::LOWER, FramePhase::LowerBits)?;
            *pixel |= (lower >> 2) & 0x03;
        }
    }

    Ok(())
}

fn read_grab<B: SensorBus + ?Sized>(bus: &mut B, flag: GrabData, phase: FramePhase) -> Result<u8> {
    let value = poll(bus, RetryPolicy::FRAME_GRAB, |bus| {
        let v = read_register(bus, registers::RAW_DATA_GRAB)?;
        Ok(GrabData::from_bits_truncate(v).contains(flag).then_some(v))
    })?;
    value.ok_or_else(|| {
        log::error!("pmw3901: read timeout waiting for {}", phase);
        Error::Timeout(phase)
    })
}
