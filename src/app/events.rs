//! Outcome records produced by the control cycle.
//!
//! [`CycleDriver::run_cycle`](super::service::CycleDriver::run_cycle)
//! returns one of these per cycle.  The periodic task only logs them;
//! tests assert on them directly.

use crate::control::Decision;
use crate::error::Error;

/// Phases of one cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Sampling,
    Computing,
    Actuating,
    Reporting,
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// All phases ran; the servo was commanded and telemetry published.
    Completed {
        decision: Decision,
        sensor_count: usize,
    },

    /// The cycle stopped early in `phase`.
    Failed { phase: CyclePhase, error: Error },
}

impl CycleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Completed { decision, .. } => Some(decision),
            Self::Failed { .. } => None,
        }
    }
}
