//! Reference temperatures shared between the cycle and the override gateway.
//!
//! Each field is an `f64` stored as raw bits in an `AtomicU64`, so a
//! setter is a single atomic replacement and a reader sees either the old
//! or the new value of that field.  The two fields are independent: a
//! cycle may combine a fresh middle with a bottom that is one update old.

use core::sync::atomic::{AtomicU64, Ordering};

/// A copy of both references taken by one reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoints {
    pub middle: f64,
    pub bottom: f64,
}

pub struct ControlState {
    middle: AtomicU64,
    bottom: AtomicU64,
}

impl ControlState {
    pub fn new(middle: f64, bottom: f64) -> Self {
        Self {
            middle: AtomicU64::new(middle.to_bits()),
            bottom: AtomicU64::new(bottom.to_bits()),
        }
    }

    pub fn get(&self) -> Setpoints {
        Setpoints {
            middle: f64::from_bits(self.middle.load(Ordering::Acquire)),
            bottom: f64::from_bits(self.bottom.load(Ordering::Acquire)),
        }
    }

    pub fn set_middle(&self, value: f64) {
        self.middle.store(value.to_bits(), Ordering::Release);
    }

    pub fn set_bottom(&self, value: f64) {
        self.bottom.store(value.to_bits(), Ordering::Release);
    }
}

impl core::fmt::Debug for ControlState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = self.get();
        f.debug_struct("ControlState")
            .field("middle", &s.middle)
            .field("bottom", &s.bottom)
            .finish()
    }
}
