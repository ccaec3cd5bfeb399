//! Single register access
//!
//! Reads put the register number on the wire unchanged; writes set
//! [`WRITE_FLAG`] in the address byte.

use crate::bus::SensorBus;
use crate::error::Result;
use crate::motion::Motion;
use crate::registers::{self, MOTION_BURST_LEN, WRITE_FLAG};

/// Read one register
pub fn read_register<B: SensorBus + ?Sized>(bus: &mut B, reg: u8) -> Result<u8> {
    let mut buf = [0u8; 1];
    bus.read(reg, &mut buf).map_err(|e| {
        log::error!("pmw3901: read of register 0x{:02X} failed", reg);
        e
    })?;
    Ok(buf[0])
}

/// Write one register
pub fn write_register<B: SensorBus + ?Sized>(bus: &mut B, reg: u8, value: u8) -> Result<()> {
    bus.write(reg | WRITE_FLAG, &[value]).map_err(|e| {
        log::error!("pmw3901: write of 0x{:02X} to register 0x{:02X} failed", value, reg);
        e
    })
}

/// Read a run of bytes starting at `reg` in a single transfer
pub fn read_registers<B: SensorBus + ?Sized>(bus: &mut B, reg: u8, buf: &mut [u8]) -> Result<()> {
    bus.read(reg, buf).map_err(|e| {
        log::error!("pmw3901: read of {} bytes at 0x{:02X} failed", buf.len(), reg);
        e
    })
}

/// Write a run of bytes to `reg` in a single transfer
pub fn write_registers<B: SensorBus + ?Sized>(bus: &mut B, reg: u8, data: &[u8]) -> Result<()> {
    bus.write(reg | WRITE_FLAG, data).map_err(|e| {
        log::error!("pmw3901: write of {} bytes at 0x{:02X} failed", data.len(), reg);
        e
    })
}

/// Read the product ID
pub fn read_product_id<B: SensorBus + ?Sized>(bus: &mut B) -> Result<u8> {
    read_register(bus, registers::PRODUCT_ID)
}

/// Read a 16-bit delta from its low and high registers, low first
pub fn read_delta<B: SensorBus + ?Sized>(bus: &mut B, low: u8, high: u8) -> Result<i16> {
    let lsb = read_register(bus, low)?;
    let msb = read_register(bus, high)?;
    Ok(i16::from_le_bytes([lsb, msb]))
}

/// Read the 13-bit shutter value, upper register first
pub fn read_shutter<B: SensorBus + ?Sized>(bus: &mut B) -> Result<u16> {
    let msb = read_register(bus, registers::SHUTTER_UPPER)?;
    let lsb = read_register(bus, registers::SHUTTER_LOWER)?;
    Ok((((msb & 0x1F) as u16) << 8) | lsb as u16)
}

/// Read and decode a full motion burst
pub fn burst_read<B: SensorBus + ?Sized>(bus: &mut B) -> Result<Motion> {
    let mut raw = [0u8; MOTION_BURST_LEN];
    read_registers(bus, registers::MOTION_BURST, &mut raw)?;
    let motion = Motion::from_burst(raw);
    log::trace!("pmw3901: burst {:02X?} -> {:?}", raw, motion.validity);
    Ok(motion)
}
