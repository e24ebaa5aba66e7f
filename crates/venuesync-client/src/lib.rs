//! # venuesync-client: REST Client and Sync Engine
//!
//! This crate talks to the venue-mapping API and executes the plans computed
//! by `venuesync-core`.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                SyncEngine<S: RemoteStore>                        │  │
//! │  │                                                                  │  │
//! │  │  fetch → filter → compute_plan → report → delete/update/create  │  │
//! │  │  Bounded JoinSet per phase, fail-fast                            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  RemoteStore   │  │ VenueApiClient │  │  PlanReporter          │    │
//! │  │                │  │                │  │                        │    │
//! │  │ list/create/   │  │ reqwest + the  │  │ Tracing (default)      │    │
//! │  │ update/delete  │◄─│ session cookie │  │ NoOp                   │    │
//! │  │ per kind       │  │ api_key query  │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                               ▲                                         │
//! │                      ┌────────┴────────┐                                │
//! │                      │  ClientConfig   │  TOML + VENUESYNC_* env        │
//! │                      └─────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `VenueApiClient`, the authenticated REST session
//! - [`config`] - connection and sync settings
//! - [`engine`] - `SyncEngine`, the reconciliation runner
//! - [`error`] - client error types
//! - [`report`] - progress hooks
//! - [`store`] - the `RemoteStore` trait the engine runs against
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use venuesync_client::{ClientConfig, SyncEngine, SyncOptions, VenueApiClient};
//! use venuesync_core::ResourceKind;
//!
//! let config = ClientConfig::load(None)?;
//! let client = Arc::new(VenueApiClient::new(&config)?);
//! let engine = SyncEngine::from_config(client, &config);
//!
//! let outcome = engine
//!     .sync(ResourceKind::Place, &venue_id, &desired, SyncOptions::new())
//!     .await?;
//! println!("{}", outcome.counts);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{ImageCorners, LatLng, VenueApiClient};
pub use config::{ApiSettings, ClientConfig, SyncSettings};
pub use engine::{SyncEngine, SyncOptions, SyncOutcome};
pub use error::{ApiError, ApiResult};
pub use report::{NoOpReporter, Phase, PlanReporter, TracingReporter};
pub use store::RemoteStore;
