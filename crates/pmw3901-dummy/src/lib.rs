//! pmw3901-dummy - In-memory PMW3901MB emulator for testing
//!
//! This crate provides a dummy sensor that emulates the PMW3901MB register
//! file in memory. It's useful for testing and development without real
//! hardware.
//!
//! The emulator is split in two halves that share state: [`DummySensor`]
//! implements [`SensorBus`] and [`DummyResetPin`] implements [`ResetPin`].
//! Every bus and reset line operation is appended to a shared event log so
//! tests can check exact ordering.
//!
//! Emulated behavior:
//!
//! - a banked register file, with register 0x7F selecting the bank
//! - product, inverse product and revision IDs
//! - a configurable 12-byte motion burst, whose first byte is also what the
//!   motion register reads back
//! - the tuning readbacks at bank 0x0E
//! - the raw frame grab handshake, streaming a configurable frame
//! - failure injection for reads, writes and the transport hooks

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
#[cfg(feature = "alloc")]
use alloc::rc::Rc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use core::cell::RefCell;

use pmw3901_core::error::{Error, Result};
use pmw3901_core::frame::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
use pmw3901_core::registers::{self, MOTION_BURST_LEN, WRITE_FLAG};
use pmw3901_core::{ResetPin, SensorBus};

/// Number of emulated register banks
const BANKS: usize = 32;

/// Bank holding the tuning readback registers
pub const TUNING_BANK: u8 = 0x0E;

/// Configuration for the dummy sensor
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Content of the product ID register
    pub product_id: u8,
    /// Content of the inverse product ID register
    pub inverse_product_id: u8,
    /// Content of the revision ID register
    pub revision_id: u8,
    /// Motion burst returned by the burst port
    pub burst: [u8; MOTION_BURST_LEN],
    /// Tuning handshake readback (bank 0x0E, register 0x47)
    pub handshake: u8,
    /// Tuning mode flags (bank 0x0E, register 0x67)
    pub mode_flags: u8,
    /// Adaptive tuning gate (bank 0x0E, register 0x73)
    pub adaptive_gate: u8,
    /// First adaptive coefficient (bank 0x0E, register 0x70)
    pub coefficient1: u8,
    /// Second adaptive coefficient (bank 0x0E, register 0x71)
    pub coefficient2: u8,
    /// Grab status polls before a frame reports ready, `None` for never
    pub grab_ready_after: Option<u32>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            product_id: registers::PRODUCT_ID_VALUE,
            inverse_product_id: !registers::PRODUCT_ID_VALUE,
            revision_id: 0x00,
            burst: [
                0x80, 0x00, 0x03, 0x00, 0xFD, 0xFF, 0x40, 0x20, 0x80, 0x08, 0x01, 0x00,
            ],
            handshake: 0x08,
            mode_flags: 0x00,
            adaptive_gate: 0x00,
            coefficient1: 0x10,
            coefficient2: 0x40,
            grab_ready_after: Some(0),
        }
    }
}

/// One recorded transport operation
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `SensorBus::init`
    BusInit,
    /// `SensorBus::deinit`
    BusDeinit,
    /// `ResetPin::init`
    ResetInit,
    /// `ResetPin::deinit`
    ResetDeinit,
    /// Reset line driven high (`true`) or low
    ResetLevel(bool),
    /// Register read
    Read {
        /// Register address as sent on the wire
        reg: u8,
        /// Number of bytes read
        len: usize,
    },
    /// Register write, address with the write flag stripped
    Write {
        /// Register address
        reg: u8,
        /// Bytes written
        data: Vec<u8>,
    },
    /// Delay in milliseconds
    Delay(u32),
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrabPhase {
    Upper,
    Lower,
}

#[cfg(feature = "alloc")]
#[derive(Debug)]
struct Grab {
    status_polls: u32,
    pixel: usize,
    phase: GrabPhase,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Default)]
struct Faults {
    reads: BTreeSet<u8>,
    writes: BTreeSet<u8>,
    reset_line: bool,
    bus_init: bool,
    bus_deinit: bool,
    reset_init: bool,
    reset_deinit: bool,
}

#[cfg(feature = "alloc")]
struct State {
    config: DummyConfig,
    banks: [[u8; 128]; BANKS],
    bank: usize,
    frame: Frame,
    grab: Option<Grab>,
    queued: BTreeMap<u8, VecDeque<u8>>,
    faults: Faults,
    shut_down: bool,
    events: Vec<Event>,
}

#[cfg(feature = "alloc")]
impl State {
    fn new(config: DummyConfig) -> Self {
        let mut banks = [[0u8; 128]; BANKS];
        banks[0][registers::PRODUCT_ID as usize] = config.product_id;
        banks[0][registers::REVISION_ID as usize] = config.revision_id;
        banks[0][registers::INVERSE_PRODUCT_ID as usize] = config.inverse_product_id;

        let tuning = &mut banks[TUNING_BANK as usize];
        tuning[0x47] = config.handshake;
        tuning[0x67] = config.mode_flags;
        tuning[0x73] = config.adaptive_gate;
        tuning[0x70] = config.coefficient1;
        tuning[0x71] = config.coefficient2;

        Self {
            config,
            banks,
            bank: 0,
            frame: Frame::new(),
            grab: None,
            queued: BTreeMap::new(),
            faults: Faults::default(),
            shut_down: false,
            events: Vec::new(),
        }
    }

    fn read_byte(&mut self, reg: u8, offset: usize) -> u8 {
        if let Some(v) = self.queued.get_mut(&reg).and_then(|q| q.pop_front()) {
            return v;
        }

        match reg {
            registers::MOTION_BURST => self.config.burst.get(offset).copied().unwrap_or(0),
            registers::MOTION if offset == 0 && self.bank == 0 => self.config.burst[0],
            registers::RAW_DATA_GRAB_STATUS if self.grab.is_some() => self.grab_status(),
            registers::RAW_DATA_GRAB if self.grab.is_some() => self.grab_data(),
            _ => {
                let addr = (reg as usize + offset) & 0x7F;
                self.banks[self.bank][addr]
            }
        }
    }

    fn grab_status(&mut self) -> u8 {
        let Some(grab) = self.grab.as_mut() else {
            return 0;
        };
        let polls = grab.status_polls;
        grab.status_polls += 1;
        match self.config.grab_ready_after {
            Some(after) if polls >= after => 0xC0,
            _ => 0x00,
        }
    }

    fn grab_data(&mut self) -> u8 {
        let Some(grab) = self.grab.as_mut() else {
            return 0;
        };
        let row = grab.pixel / FRAME_WIDTH;
        let col = grab.pixel % FRAME_WIDTH;
        let pixel = self.frame.pixels[row][col];

        match grab.phase {
            GrabPhase::Upper => {
                grab.phase = GrabPhase::Lower;
                0x40 | (pixel >> 2)
            }
            GrabPhase::Lower => {
                grab.phase = GrabPhase::Upper;
                grab.pixel += 1;
                if grab.pixel == FRAME_WIDTH * FRAME_HEIGHT {
                    log::trace!("dummy: frame fully streamed");
                    self.grab = None;
                }
                0x80 | ((pixel & 0x03) << 2)
            }
        }
    }

    fn write_byte(&mut self, reg: u8, offset: usize, value: u8) {
        match (reg, value) {
            (registers::BANK_SELECT, v) => {
                self.bank = (v as usize) % BANKS;
            }
            (registers::POWER_UP_RESET, registers::POWER_UP_RESET_VALUE) => {
                log::trace!("dummy: soft reset");
                self.bank = 0;
                self.grab = None;
                self.shut_down = false;
            }
            (registers::SHUTDOWN, registers::SHUTDOWN_VALUE) => {
                log::trace!("dummy: shutdown");
                self.shut_down = true;
            }
            (registers::RAW_DATA_GRAB, registers::RAW_DATA_GRAB_START) => {
                log::trace!("dummy: frame grab armed");
                self.grab = Some(Grab {
                    status_polls: 0,
                    pixel: 0,
                    phase: GrabPhase::Upper,
                });
            }
            _ => {
                let addr = (reg as usize + offset) & 0x7F;
                self.banks[self.bank][addr] = value;
            }
        }
    }
}

/// Dummy sensor bus
///
/// Cloning yields another handle to the same emulated chip, which is how
/// tests keep access to the event log after moving a handle into a driver.
#[cfg(feature = "alloc")]
#[derive(Clone)]
pub struct DummySensor {
    state: Rc<RefCell<State>>,
}

/// Reset line of a [`DummySensor`]
#[cfg(feature = "alloc")]
pub struct DummyResetPin {
    state: Rc<RefCell<State>>,
}

#[cfg(feature = "alloc")]
impl DummySensor {
    /// Create a new dummy sensor with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::new(config))),
        }
    }

    /// Create a new dummy sensor with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the reset line wired to this sensor
    pub fn reset_pin(&self) -> DummyResetPin {
        DummyResetPin {
            state: Rc::clone(&self.state),
        }
    }

    /// All events recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Forget the recorded events
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// All written bytes as `(register, value)` pairs, in order
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Write { reg, data } => Some(data.iter().map(move |&v| (*reg, v))),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Number of reads of `reg`
    pub fn reads_of(&self, reg: u8) -> usize {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Read { reg: r, .. } if *r == reg))
            .count()
    }

    /// Content of a register in the given bank
    pub fn register(&self, bank: u8, reg: u8) -> u8 {
        self.state.borrow().banks[bank as usize % BANKS][reg as usize & 0x7F]
    }

    /// Set a register in the given bank
    pub fn set_register(&self, bank: u8, reg: u8, value: u8) {
        self.state.borrow_mut().banks[bank as usize % BANKS][reg as usize & 0x7F] = value;
    }

    /// Replace the motion burst
    pub fn set_burst(&self, burst: [u8; MOTION_BURST_LEN]) {
        self.state.borrow_mut().config.burst = burst;
    }

    /// Replace the frame streamed through the grab port
    pub fn set_frame(&self, frame: &Frame) {
        self.state.borrow_mut().frame = frame.clone();
    }

    /// Set how many grab status polls it takes for a frame to be ready
    pub fn set_grab_ready_after(&self, polls: Option<u32>) {
        self.state.borrow_mut().config.grab_ready_after = polls;
    }

    /// Answer the next reads of `reg` with `values`, before any emulation
    pub fn queue_reads(&self, reg: u8, values: &[u8]) {
        self.state
            .borrow_mut()
            .queued
            .entry(reg)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Make reads of `reg` fail
    pub fn fail_reads_of(&self, reg: u8, fail: bool) {
        let mut state = self.state.borrow_mut();
        let faults = &mut state.faults;
        if fail {
            faults.reads.insert(reg);
        } else {
            faults.reads.remove(&reg);
        }
    }

    /// Make writes to `reg` fail
    pub fn fail_writes_to(&self, reg: u8, fail: bool) {
        let mut state = self.state.borrow_mut();
        let faults = &mut state.faults;
        if fail {
            faults.writes.insert(reg);
        } else {
            faults.writes.remove(&reg);
        }
    }

    /// Make driving the reset line fail
    pub fn fail_reset_line(&self, fail: bool) {
        self.state.borrow_mut().faults.reset_line = fail;
    }

    /// Make `SensorBus::init` fail
    pub fn fail_bus_init(&self, fail: bool) {
        self.state.borrow_mut().faults.bus_init = fail;
    }

    /// Make `SensorBus::deinit` fail
    pub fn fail_bus_deinit(&self, fail: bool) {
        self.state.borrow_mut().faults.bus_deinit = fail;
    }

    /// Make `ResetPin::init` fail
    pub fn fail_reset_init(&self, fail: bool) {
        self.state.borrow_mut().faults.reset_init = fail;
    }

    /// Make `ResetPin::deinit` fail
    pub fn fail_reset_deinit(&self, fail: bool) {
        self.state.borrow_mut().faults.reset_deinit = fail;
    }

    /// Whether the chip received the shutdown command
    pub fn is_shut_down(&self) -> bool {
        self.state.borrow().shut_down
    }

    /// Whether a frame grab is in progress
    pub fn is_grabbing(&self) -> bool {
        self.state.borrow().grab.is_some()
    }

    /// Currently selected register bank
    pub fn bank(&self) -> u8 {
        self.state.borrow().bank as u8
    }
}

#[cfg(feature = "alloc")]
impl SensorBus for DummySensor {
    fn init(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::BusInit);
        if state.faults.bus_init {
            return Err(Error::Transport);
        }
        Ok(())
    }

    fn deinit(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::BusDeinit);
        if state.faults.bus_deinit {
            return Err(Error::Transport);
        }
        Ok(())
    }

    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Read {
            reg,
            len: buf.len(),
        });
        if state.faults.reads.contains(&reg) {
            log::trace!("dummy: injected read failure at 0x{:02X}", reg);
            return Err(Error::Transport);
        }
        for (offset, b) in buf.iter_mut().enumerate() {
            *b = state.read_byte(reg, offset);
        }
        Ok(())
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        let reg = addr & !WRITE_FLAG;
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Write {
            reg,
            data: data.to_vec(),
        });
        if addr & WRITE_FLAG == 0 {
            log::warn!("dummy: write to 0x{:02X} without write flag ignored", reg);
            return Ok(());
        }
        if state.faults.writes.contains(&reg) {
            log::trace!("dummy: injected write failure at 0x{:02X}", reg);
            return Err(Error::Transport);
        }
        for (offset, &v) in data.iter().enumerate() {
            state.write_byte(reg, offset, v);
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        // No delay needed for the emulated chip
        self.state.borrow_mut().events.push(Event::Delay(ms));
    }
}

#[cfg(feature = "alloc")]
impl ResetPin for DummyResetPin {
    fn init(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::ResetInit);
        if state.faults.reset_init {
            return Err(Error::Transport);
        }
        Ok(())
    }

    fn deinit(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::ResetDeinit);
        if state.faults.reset_deinit {
            return Err(Error::Transport);
        }
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::ResetLevel(high));
        if state.faults.reset_line {
            return Err(Error::ResetLine);
        }
        if !high {
            state.bank = 0;
            state.grab = None;
            state.shut_down = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmw3901_core::error::{Capability, FramePhase};
    use pmw3901_core::{DeinitError, Pmw3901, Pmw3901Builder, Validity};

    fn sensor() -> (DummySensor, Pmw3901<DummySensor, DummyResetPin>) {
        let chip = DummySensor::new_default();
        let driver = Pmw3901::new(chip.clone(), chip.reset_pin()).unwrap();
        (chip, driver)
    }

    fn gradient() -> Frame {
        let mut frame = Frame::new();
        for (r, row) in frame.pixels.iter_mut().enumerate() {
            for (c, px) in row.iter_mut().enumerate() {
                *px = (r * 7 + c * 3) as u8;
            }
        }
        frame
    }

    #[test]
    fn test_init_and_deinit() {
        let (chip, driver) = sensor();
        driver.deinit().unwrap();

        assert_eq!(
            chip.events(),
            vec![
                Event::BusInit,
                Event::ResetInit,
                Event::ResetLevel(false),
                Event::Delay(10),
                Event::ResetLevel(true),
                Event::Delay(10),
                Event::Read { reg: 0x00, len: 1 },
                Event::Write {
                    reg: 0x3B,
                    data: vec![0xB6]
                },
                Event::BusDeinit,
                Event::ResetDeinit,
            ]
        );
        assert!(chip.is_shut_down());
    }

    #[test]
    fn test_init_wrong_id_unwinds() {
        let chip = DummySensor::new(DummyConfig {
            product_id: 0x00,
            ..Default::default()
        });
        let result = Pmw3901::new(chip.clone(), chip.reset_pin());
        assert_eq!(result.err(), Some(Error::InvalidProductId { found: 0x00 }));

        let events = chip.events();
        assert_eq!(
            &events[events.len() - 2..],
            &[Event::BusDeinit, Event::ResetDeinit]
        );
    }

    #[test]
    fn test_init_bus_failure() {
        let chip = DummySensor::new_default();
        chip.fail_bus_init(true);
        let result = Pmw3901::new(chip.clone(), chip.reset_pin());
        assert_eq!(result.err(), Some(Error::Transport));
        assert_eq!(chip.events(), vec![Event::BusInit]);
    }

    #[test]
    fn test_init_reset_pin_failure_releases_bus() {
        let chip = DummySensor::new_default();
        chip.fail_reset_init(true);
        let result = Pmw3901::new(chip.clone(), chip.reset_pin());
        assert_eq!(result.err(), Some(Error::Transport));
        assert_eq!(
            chip.events(),
            vec![Event::BusInit, Event::ResetInit, Event::BusDeinit]
        );
    }

    #[test]
    fn test_init_reset_line_failure() {
        let chip = DummySensor::new_default();
        chip.fail_reset_line(true);
        let result = Pmw3901::new(chip.clone(), chip.reset_pin());
        assert_eq!(result.err(), Some(Error::ResetLine));
        assert_eq!(chip.reads_of(registers::PRODUCT_ID), 0);
        assert!(chip.events().contains(&Event::ResetDeinit));
    }

    #[test]
    fn test_init_id_read_failure() {
        let chip = DummySensor::new_default();
        chip.fail_reads_of(registers::PRODUCT_ID, true);
        let result = Pmw3901::new(chip.clone(), chip.reset_pin());
        assert_eq!(result.err(), Some(Error::Transport));
    }

    #[test]
    fn test_builder_missing_bus() {
        let chip = DummySensor::new_default();
        let result = Pmw3901Builder::<DummySensor, DummyResetPin>::new()
            .reset(chip.reset_pin())
            .init();
        assert_eq!(
            result.err(),
            Some(Error::MissingCapability(Capability::Bus))
        );
        assert!(chip.events().is_empty());
    }

    #[test]
    fn test_power_up() {
        let (chip, mut driver) = sensor();
        chip.clear_events();
        driver.power_up().unwrap();

        assert_eq!(
            chip.events(),
            vec![
                Event::ResetLevel(false),
                Event::Delay(10),
                Event::ResetLevel(true),
                Event::Delay(10),
                Event::Write {
                    reg: 0x3A,
                    data: vec![0x5A]
                },
                Event::Delay(10),
                Event::Read { reg: 0x02, len: 1 },
                Event::Read { reg: 0x03, len: 1 },
                Event::Read { reg: 0x04, len: 1 },
                Event::Read { reg: 0x05, len: 1 },
                Event::Read { reg: 0x06, len: 1 },
            ]
        );
    }

    #[test]
    fn test_optimum_performance_adaptive() {
        let (chip, mut driver) = sensor();
        driver.power_up().unwrap();
        driver.set_optimum_performance().unwrap();

        // c1 = 0x10 + 14, c2 = 0x40 * 45 / 100
        assert_eq!(chip.register(TUNING_BANK, 0x70), 0x1E);
        assert_eq!(chip.register(TUNING_BANK, 0x71), 0x1C);
        assert_eq!(chip.reads_of(0x47), 1);
        assert_eq!(chip.bank(), 0);
        assert_eq!(chip.writes().last(), Some(&(0x40, 0x80)));
    }

    #[test]
    fn test_optimum_performance_skips_adaptive() {
        let chip = DummySensor::new(DummyConfig {
            adaptive_gate: 0x01,
            mode_flags: 0x80,
            ..Default::default()
        });
        let mut driver = Pmw3901::new(chip.clone(), chip.reset_pin()).unwrap();
        driver.set_optimum_performance().unwrap();

        assert_eq!(chip.reads_of(0x70), 0);
        assert_eq!(chip.register(TUNING_BANK, 0x70), 0x10);
        assert_eq!(chip.register(TUNING_BANK, 0x48), 0x04);
    }

    #[test]
    fn test_optimum_performance_handshake_fails() {
        let chip = DummySensor::new(DummyConfig {
            handshake: 0x00,
            ..Default::default()
        });
        let mut driver = Pmw3901::new(chip.clone(), chip.reset_pin()).unwrap();
        chip.clear_events();

        assert_eq!(
            driver.set_optimum_performance(),
            Err(Error::Calibration { readback: 0x00 })
        );
        assert_eq!(chip.reads_of(0x47), 4);
        let delays: Vec<_> = chip
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::Delay(_)))
            .collect();
        assert_eq!(delays, vec![Event::Delay(100); 3]);
    }

    #[test]
    fn test_optimum_performance_handshake_retry() {
        let (chip, mut driver) = sensor();
        chip.queue_reads(0x47, &[0x00, 0x00]);
        driver.set_optimum_performance().unwrap();
        assert_eq!(chip.reads_of(0x47), 3);
    }

    #[test]
    fn test_burst_read() {
        let (chip, mut driver) = sensor();
        let motion = driver.burst_read().unwrap();
        assert_eq!(motion.validity, Validity::Valid);
        assert_eq!(motion.delta_x, 3);
        assert_eq!(motion.delta_y, -3);
        assert_eq!(motion.surface_quality, 0x100);
        assert_eq!(motion.shutter, 0x100);

        chip.set_burst([0; 12]);
        assert_eq!(driver.burst_read().unwrap().validity, Validity::Invalid);

        let mut raw = [0u8; 12];
        raw[0] = 0x80;
        raw[6] = 0x18;
        chip.set_burst(raw);
        assert_eq!(driver.burst_read().unwrap().validity, Validity::InnerError);
    }

    #[test]
    fn test_motion_register_follows_burst() {
        let (chip, mut driver) = sensor();
        assert_eq!(driver.motion().unwrap(), 0x80);
        chip.set_burst([0; 12]);
        assert_eq!(driver.motion().unwrap(), 0x00);
    }

    #[test]
    fn test_motion_interrupt() {
        let (chip, mut driver) = sensor();
        chip.clear_events();
        let event = driver.handle_motion_interrupt(1.0).unwrap();
        assert!(event.displacement.is_some());
        assert_eq!(chip.writes(), vec![(registers::MOTION, 0x00)]);

        chip.set_burst([0; 12]);
        let event = driver.handle_motion_interrupt(1.0).unwrap();
        assert!(event.displacement.is_none());
        assert_eq!(chip.writes().len(), 2);
    }

    #[test]
    fn test_frame_capture() {
        let (chip, mut driver) = sensor();
        let expected = gradient();
        chip.set_frame(&expected);
        chip.set_grab_ready_after(Some(2));

        let mut frame = Frame::new();
        let mut capture = driver.start_frame_capture().unwrap();
        capture.get_frame(&mut frame).unwrap();
        capture.get_frame(&mut frame).unwrap();
        capture.stop().unwrap();

        assert_eq!(frame, expected);
        assert!(!chip.is_grabbing());
        assert_eq!(chip.reads_of(registers::RAW_DATA_GRAB_STATUS), 6);
        assert_eq!(chip.writes().last(), Some(&(0x7F, 0x00)));
    }

    #[test]
    fn test_frame_timeout() {
        let (chip, mut driver) = sensor();
        chip.set_grab_ready_after(None);
        chip.clear_events();

        let mut frame = Frame::new();
        {
            let mut capture = driver.start_frame_capture().unwrap();
            assert_eq!(
                capture.get_frame(&mut frame),
                Err(Error::Timeout(FramePhase::Arm))
            );
        }

        assert_eq!(chip.reads_of(registers::RAW_DATA_GRAB_STATUS), 10);
        assert_eq!(chip.reads_of(registers::RAW_DATA_GRAB), 0);
        // dropping the guard ran the stop sequence
        assert_eq!(chip.writes().last(), Some(&(0x7F, 0x00)));
        assert!(driver.burst_read().is_ok());
    }

    #[test]
    fn test_frame_read_failure() {
        let (chip, mut driver) = sensor();
        let mut capture = driver.start_frame_capture().unwrap();
        chip.fail_reads_of(registers::RAW_DATA_GRAB, true);
        let mut frame = Frame::new();
        assert_eq!(capture.get_frame(&mut frame), Err(Error::Transport));
    }

    #[test]
    fn test_deinit_power_down_failure() {
        let (chip, driver) = sensor();
        chip.fail_writes_to(registers::SHUTDOWN, true);

        let driver = match driver.deinit() {
            Err(DeinitError::PowerDown { driver, error }) => {
                assert_eq!(error, Error::Transport);
                driver
            }
            other => panic!("unexpected result: {:?}", other.err()),
        };
        assert!(!chip.events().contains(&Event::BusDeinit));

        chip.fail_writes_to(registers::SHUTDOWN, false);
        driver.deinit().unwrap();
        assert!(chip.is_shut_down());
    }

    #[test]
    fn test_deinit_teardown_failure() {
        let (chip, driver) = sensor();
        chip.fail_bus_deinit(true);
        let err = driver.deinit().err().unwrap();
        assert!(matches!(err, DeinitError::Teardown { .. }));
        assert_eq!(err.error(), Error::Transport);
        assert!(chip.events().contains(&Event::ResetDeinit));
    }

    #[test]
    fn test_register_accessors() {
        let (chip, mut driver) = sensor();
        assert_eq!(driver.product_id().unwrap(), 0x49);
        assert_eq!(driver.inverse_product_id().unwrap(), 0xB6);
        assert_eq!(driver.revision_id().unwrap(), 0x00);

        chip.set_register(0, registers::DELTA_X_L, 0xFE);
        chip.set_register(0, registers::DELTA_X_H, 0xFF);
        assert_eq!(driver.delta_x().unwrap(), -2);

        chip.set_register(0, registers::SHUTTER_UPPER, 0xFF);
        chip.set_register(0, registers::SHUTTER_LOWER, 0x12);
        assert_eq!(driver.shutter().unwrap(), 0x1F12);

        driver.set_observation(0x2A).unwrap();
        assert_eq!(driver.observation().unwrap(), 0x2A);

        let mut buf = [0u8; 3];
        driver.write_reg(0x20, &[1, 2, 3]).unwrap();
        driver.read_reg(0x20, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);

        let mut burst = [0u8; 12];
        driver.motion_burst(&mut burst).unwrap();
        assert_eq!(burst, DummyConfig::default().burst);
    }

    #[test]
    fn test_raw_data_grab_is_per_byte() {
        let (chip, mut driver) = sensor();
        chip.clear_events();
        driver.set_raw_data_grab(&[0x01, 0x02]).unwrap();
        let mut buf = [0u8; 2];
        driver.raw_data_grab(&mut buf).unwrap();
        assert_eq!(buf, [0x02, 0x02]);
        assert_eq!(chip.reads_of(registers::RAW_DATA_GRAB), 2);
        assert_eq!(
            chip.writes(),
            vec![(registers::RAW_DATA_GRAB, 0x01), (registers::RAW_DATA_GRAB, 0x02)]
        );
    }

    #[test]
    fn test_boxed_transports() {
        use alloc::boxed::Box;

        let chip = DummySensor::new_default();
        let bus: Box<dyn SensorBus> = Box::new(chip.clone());
        let pin: Box<dyn ResetPin> = Box::new(chip.reset_pin());
        let mut driver = Pmw3901::new(bus, pin).unwrap();
        assert!(driver.burst_read().unwrap().is_valid());
    }
}
