// src/clock.rs

//! Wall-clock access.
//!
//! Timestamps carry the local offset so that "today" is the local calendar
//! day, while stored timestamps are normalised to UTC by the callers.

use std::fmt::Debug;

use chrono::{DateTime, FixedOffset, Local};

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
