//! # Plan Reporting
//!
//! Hooks called by the sync engine so callers can surface progress.
//! [`TracingReporter`] is the default; [`NoOpReporter`] keeps quiet.

use tracing::info;
use venuesync_core::{PlanCounts, ResourceKind};

/// The three mutating phases of a sync, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Delete,
    Update,
    Create,
}

impl Phase {
    /// Phases in the order the engine runs them.
    pub const ORDER: [Phase; 3] = [Phase::Delete, Phase::Update, Phase::Create];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Delete => write!(f, "delete"),
            Phase::Update => write!(f, "update"),
            Phase::Create => write!(f, "create"),
        }
    }
}

/// Receives sync progress.
///
/// `plan_computed` fires once per sync, before any mutation and also on dry
/// runs. `phase_completed` fires after each phase that ran to completion.
pub trait PlanReporter: Send + Sync {
    fn plan_computed(&self, kind: ResourceKind, venue_id: &str, counts: &PlanCounts, dry_run: bool);

    fn phase_completed(&self, _kind: ResourceKind, _phase: Phase, _count: usize) {}
}

/// Logs progress at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl PlanReporter for TracingReporter {
    fn plan_computed(&self, kind: ResourceKind, venue_id: &str, counts: &PlanCounts, dry_run: bool) {
        info!(
            %kind,
            venue_id,
            server = counts.server,
            to_create = counts.to_create,
            to_update = counts.to_update,
            to_delete = counts.to_delete,
            unchanged = counts.unchanged,
            dry_run,
            "Sync plan: {}",
            counts
        );
    }

    fn phase_completed(&self, kind: ResourceKind, phase: Phase, count: usize) {
        if count > 0 {
            info!(%kind, %phase, count, "Sync phase completed");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl PlanReporter for NoOpReporter {
    fn plan_computed(&self, _: ResourceKind, _: &str, _: &PlanCounts, _: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::ORDER, [Phase::Delete, Phase::Update, Phase::Create]);
        assert_eq!(Phase::Update.to_string(), "update");
    }
}
