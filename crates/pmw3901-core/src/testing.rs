//! Scripted transport used by the in-crate unit tests

use crate::bus::{ResetPin, SensorBus};
use crate::error::{Error, Result};
use crate::registers::WRITE_FLAG;
use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Read(u8),
    Write(u8, u8),
    Delay(u32),
}

/// Bus that answers reads from per-register queues, falling back to a fixed
/// value once a queue runs dry
#[derive(Default)]
pub struct ScriptBus {
    pub ops: Vec<Op>,
    queued: BTreeMap<u8, VecDeque<u8>>,
    fallback: BTreeMap<u8, u8>,
    pub fail_read: Option<u8>,
}

impl ScriptBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, reg: u8, values: &[u8]) -> &mut Self {
        self.queued.entry(reg).or_default().extend(values);
        self
    }

    pub fn answer(&mut self, reg: u8, value: u8) -> &mut Self {
        self.fallback.insert(reg, value);
        self
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Write(r, v) => Some((r, v)),
                _ => None,
            })
            .collect()
    }

    pub fn reads_of(&self, reg: u8) -> usize {
        self.ops.iter().filter(|op| **op == Op::Read(reg)).count()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }
}

impl SensorBus for ScriptBus {
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        self.ops.push(Op::Read(reg));
        if self.fail_read == Some(reg) {
            return Err(Error::Transport);
        }
        for b in buf.iter_mut() {
            *b = match self.queued.get_mut(&reg).and_then(|q| q.pop_front()) {
                Some(v) => v,
                None => self.fallback.get(&reg).copied().unwrap_or(0),
            };
        }
        Ok(())
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        assert_eq!(addr & WRITE_FLAG, WRITE_FLAG, "write without address flag");
        for &v in data {
            self.ops.push(Op::Write(addr & !WRITE_FLAG, v));
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ops.push(Op::Delay(ms));
    }
}

/// Reset line that records every level it is driven to
#[derive(Default)]
pub struct ScriptPin {
    pub levels: Vec<bool>,
}

impl ResetPin for ScriptPin {
    fn set_level(&mut self, high: bool) -> Result<()> {
        self.levels.push(high);
        Ok(())
    }
}
