//! # venuesync-core: Pure Reconciliation Logic
//!
//! This crate holds everything about venue synchronization that can be
//! decided without talking to the server: what a resource record is, how two
//! records are compared, and which records must be created, updated or
//! deleted to make a server collection match a desired list.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        venuesync Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (venuesync)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           venuesync-client (REST session + SyncEngine)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ venuesync-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │  record   │  │ comparable │  │   plan    │  │ validation│ │   │
//! │  │   │  Record   │  │ views and  │  │ SyncPlan  │  │   rules   │ │   │
//! │  │   │  Kind     │  │ is_equal   │  │ counts    │  │  checks   │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`record`] - `Record` (a JSON object) and its well-known fields
//! - [`kind`] - `ResourceKind`, the closed set of API collections
//! - [`comparable`] - per-kind comparable views and the equality predicate
//! - [`plan`] - name-keyed create/update/delete planning
//! - [`validation`] - credential and record checks
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use venuesync_core::{compute_plan, Record, ResourceKind};
//!
//! let desired = vec![Record::from_value(json!({
//!     "name": "A", "venueId": "v1", "owner": "o1"
//! })).unwrap()];
//! let server = vec![
//!     Record::from_value(json!({"_id": "1", "name": "A", "venueId": "v1", "owner": "o1"})).unwrap(),
//!     Record::from_value(json!({"_id": "2", "name": "B", "venueId": "v1", "owner": "o1"})).unwrap(),
//! ];
//!
//! let plan = compute_plan(ResourceKind::Layer, &desired, server);
//! assert_eq!(plan.to_delete.len(), 1);
//! assert_eq!(plan.unchanged[0].id(), Some("1"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod comparable;
pub mod error;
pub mod kind;
pub mod plan;
pub mod record;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use comparable::{comparable, default_alias, is_equal};
pub use error::{CoreError, CoreResult, ValidationError};
pub use kind::ResourceKind;
pub use plan::{apply_filter, compute_plan, PlanCounts, RecordFilter, SyncPlan};
pub use record::Record;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Field holding the server-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Field used to match desired and server records across sync runs.
pub const NAME_FIELD: &str = "name";

/// Production API host.
pub const DEFAULT_SERVER_URL: &str = "https://www.mapwize.io";

/// Default number of mutations in flight during one sync phase.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound accepted for the sync concurrency setting.
pub const MAX_CONCURRENCY: usize = 100;
