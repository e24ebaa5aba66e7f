//! # Sync Planning
//!
//! Computes the create/update/delete plan that makes a server collection
//! match a desired list. Pure: the caller fetches the server records and
//! executes the plan.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Name-Keyed Three-Way Diff                            │
//! │                                                                         │
//! │     desired names            server names (after filter)                │
//! │   ┌───────────────┐        ┌───────────────┐                            │
//! │   │  only here    │        │   only here   │                            │
//! │   │  → CREATE     │  both  │   → DELETE    │                            │
//! │   │               │ ┌────┐ │               │                            │
//! │   └───────────────┘ │    │ └───────────────┘                            │
//! │                     └─┬──┘                                              │
//! │                       │ desired copy gets the server `_id`              │
//! │                       ▼                                                 │
//! │            is_equal? ── yes → UNCHANGED (no request)                    │
//! │                 │                                                       │
//! │                 no → UPDATE                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sharp Edges
//! - Two desired records sharing a name are indistinguishable: the last one
//!   wins. The same holds for the server side.
//! - Server records removed by a filter are out of scope: they are never
//!   compared and never deleted.
//! - Caller records are never mutated; matched records are annotated copies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::comparable::is_equal;
use crate::kind::ResourceKind;
use crate::record::Record;

/// Predicate selecting which server records a sync may touch.
pub type RecordFilter = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

// =============================================================================
// Plan Types
// =============================================================================

/// Counts reported before any mutation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlanCounts {
    /// Server records in scope.
    pub server: usize,
    pub to_create: usize,
    pub to_update: usize,
    pub to_delete: usize,
    /// Matched records that need no request.
    pub unchanged: usize,
}

impl PlanCounts {
    /// Number of mutating requests the plan will issue.
    pub fn mutations(&self) -> usize {
        self.to_create + self.to_update + self.to_delete
    }
}

impl std::fmt::Display for PlanCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "server objects: {}, to create: {}, to update: {}, to delete: {}, unchanged: {}",
            self.server, self.to_create, self.to_update, self.to_delete, self.unchanged
        )
    }
}

/// The outcome of diffing a desired list against the server.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// Kind the plan was computed for.
    pub kind: ResourceKind,

    /// Server records in scope, in server order.
    pub server: Vec<Record>,

    /// Desired records with no server counterpart.
    pub to_create: Vec<Record>,

    /// Desired records (carrying the server `_id`) whose content differs.
    pub to_update: Vec<Record>,

    /// Server records with no desired counterpart.
    pub to_delete: Vec<Record>,

    /// Desired records (carrying the server `_id`) already up to date.
    pub unchanged: Vec<Record>,
}

impl SyncPlan {
    /// Returns the plan counts.
    pub fn counts(&self) -> PlanCounts {
        PlanCounts {
            server: self.server.len(),
            to_create: self.to_create.len(),
            to_update: self.to_update.len(),
            to_delete: self.to_delete.len(),
            unchanged: self.unchanged.len(),
        }
    }

    /// Returns true if executing the plan would not send any request.
    pub fn is_noop(&self) -> bool {
        self.counts().mutations() == 0
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Keeps only the server records accepted by the filter.
pub fn apply_filter(records: Vec<Record>, filter: Option<&RecordFilter>) -> Vec<Record> {
    match filter {
        Some(filter) => records.into_iter().filter(|record| filter(record)).collect(),
        None => records,
    }
}

/// Diffs `desired` against the already-scoped `server` records.
///
/// Plan lists follow the order names first appear in their source list.
pub fn compute_plan(kind: ResourceKind, desired: &[Record], server: Vec<Record>) -> SyncPlan {
    let (desired_names, desired_by_name) = index_by_name(desired);
    let (server_names, server_by_name) = index_by_name(&server);

    let mut to_create = Vec::new();
    let mut to_update = Vec::new();
    let mut unchanged = Vec::new();

    for name in &desired_names {
        let wanted = desired_by_name[name];
        match server_by_name.get(name) {
            Some(existing) => {
                let annotated = match existing.id() {
                    Some(id) => wanted.with_id(id),
                    None => wanted.clone(),
                };
                if is_equal(kind, &annotated, existing) {
                    unchanged.push(annotated);
                } else {
                    to_update.push(annotated);
                }
            }
            None => to_create.push(wanted.clone()),
        }
    }

    let to_delete = server_names
        .iter()
        .filter(|name| !desired_by_name.contains_key(*name))
        .map(|name| server_by_name[name].clone())
        .collect();

    SyncPlan {
        kind,
        server,
        to_create,
        to_update,
        to_delete,
        unchanged,
    }
}

/// Returns unique names in first-seen order plus the last record per name.
fn index_by_name(records: &[Record]) -> (Vec<String>, HashMap<String, &Record>) {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut by_name = HashMap::new();

    for record in records {
        let name = record.name_key();
        if seen.insert(name.clone()) {
            order.push(name.clone());
        }
        by_name.insert(name, record);
    }

    (order, by_name)
}

// =============================================================================
// Unit Tests
// =============================================================================
