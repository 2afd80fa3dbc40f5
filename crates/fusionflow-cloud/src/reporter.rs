//! Diagnostics sink
//!
//! The engine announces every step before attempting it so that, after a fatal
//! abort, the last line printed shows exactly how far the run got.

use crate::action::{ActionType, ApplyReport};
use crate::applier::ApplyOutcome;
use crate::error::ProvisionError;
use crate::scope::ResourceKey;
use std::fmt;

/// A single unit of work performed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Create(ResourceKey),
    SetMaintenanceMode { array: ResourceKey, enabled: bool },
    Rebind { interface: ResourceKey, group: String },
}

impl Step {
    pub fn key(&self) -> &ResourceKey {
        match self {
            Step::Create(key) => key,
            Step::SetMaintenanceMode { array, .. } => array,
            Step::Rebind { interface, .. } => interface,
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Step::Create(_) => ActionType::Create,
            Step::SetMaintenanceMode { .. } => ActionType::Update,
            Step::Rebind { .. } => ActionType::Rebind,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Create(key) => write!(f, "Creating {}", key),
            Step::SetMaintenanceMode { array, enabled } => write!(
                f,
                "Turning {} maintenance mode on {}",
                if *enabled { "on" } else { "off" },
                array
            ),
            Step::Rebind { interface, group } => write!(
                f,
                "Connecting {} to network interface group {}",
                interface, group
            ),
        }
    }
}

/// Receives progress from the engine; purely observational
pub trait Reporter: Send + Sync {
    /// Called before a step is submitted
    fn attempt(&self, step: &Step);

    /// Called once a step reached a terminal successful state
    fn applied(&self, _step: &Step, _outcome: ApplyOutcome) {}

    /// Called when a step failed; the run aborts right after
    fn failed(&self, _step: &Step, _error: &ProvisionError) {}

    /// Called after the whole topology has been walked
    fn complete(&self, _report: &ApplyReport) {}
}

/// Reporter that writes progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn attempt(&self, step: &Step) {
        tracing::info!("{}", step);
    }

    fn applied(&self, step: &Step, outcome: ApplyOutcome) {
        tracing::debug!(%outcome, "{} done", step.key());
    }

    fn failed(&self, step: &Step, error: &ProvisionError) {
        tracing::error!("{} failed: {}", step.key(), error);
    }

    fn complete(&self, report: &ApplyReport) {
        tracing::info!(
            duration_ms = report.duration_ms,
            "Done setting up infrastructure ({})",
            report.summary()
        );
    }
}
