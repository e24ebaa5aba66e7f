//! # Remote Store
//!
//! The four collection operations the sync engine needs, abstracted so the
//! engine can run against the live API or an in-memory double.

use async_trait::async_trait;
use venuesync_core::{Record, ResourceKind};

use crate::client::VenueApiClient;
use crate::error::ApiResult;

/// Per-kind CRUD over a remote collection.
///
/// Implementations must be shareable across the tasks of one sync phase.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lists every record of `kind` belonging to a venue.
    async fn list_for_venue(&self, kind: ResourceKind, venue_id: &str) -> ApiResult<Vec<Record>>;

    /// Creates a record, returning the stored copy with its new `_id`.
    async fn create(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record>;

    /// Replaces the record identified by its `_id`.
    async fn update(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record>;

    /// Deletes a record by id.
    async fn delete(&self, kind: ResourceKind, id: &str) -> ApiResult<()>;
}

#[async_trait]
impl RemoteStore for VenueApiClient {
    async fn list_for_venue(&self, kind: ResourceKind, venue_id: &str) -> ApiResult<Vec<Record>> {
        VenueApiClient::list_for_venue(self, kind, venue_id).await
    }

    async fn create(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
        VenueApiClient::create(self, kind, record).await
    }

    async fn update(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
        VenueApiClient::update(self, kind, record).await
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> ApiResult<()> {
        VenueApiClient::delete(self, kind, id).await
    }
}

// =============================================================================
// In-Memory Store (tests)
// =============================================================================

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Mutex;

    use super::*;
    use crate::error::ApiError;

    /// A recorded store call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        List,
        Create(String),
        Update(String),
        Delete(String),
    }

    /// Records every call and keeps collections in memory.
    #[derive(Default)]
    pub struct MemoryStore {
        records: Mutex<HashMap<ResourceKind, Vec<Record>>>,
        calls: Mutex<Vec<Call>>,
        fail_on: Option<Call>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MemoryStore {
        pub fn with_records(kind: ResourceKind, records: Vec<Record>) -> Self {
            MemoryStore {
                records: Mutex::new(HashMap::from([(kind, records)])),
                ..MemoryStore::default()
            }
        }

        /// Makes the matching call fail with a 500.
        pub fn failing_on(mut self, call: Call) -> Self {
            self.fail_on = Some(call);
            self
        }

        pub async fn calls(&self) -> Vec<Call> {
            self.calls.lock().await.clone()
        }

        pub async fn records(&self, kind: ResourceKind) -> Vec<Record> {
            self.records.lock().await.get(&kind).cloned().unwrap_or_default()
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        async fn enter(&self, call: Call) -> ApiResult<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            // Let sibling tasks start before this one finishes.
            tokio::task::yield_now().await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.lock().await.push(call.clone());

            if self.fail_on.as_ref() == Some(&call) {
                return Err(ApiError::Remote {
                    status: 500,
                    body: format!("injected failure on {call:?}"),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteStore for MemoryStore {
        async fn list_for_venue(
            &self,
            kind: ResourceKind,
            venue_id: &str,
        ) -> ApiResult<Vec<Record>> {
            self.enter(Call::List).await?;
            Ok(self
                .records(kind)
                .await
                .into_iter()
                .filter(|r| r.venue_id().map_or(true, |v| v == venue_id))
                .collect())
        }

        async fn create(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
            self.enter(Call::Create(record.name_key())).await?;
            let stored = record.with_id(uuid::Uuid::new_v4().to_string());
            self.records
                .lock()
                .await
                .entry(kind)
                .or_default()
                .push(stored.clone());
            Ok(stored)
        }

        async fn update(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
            let id = record.id().ok_or(ApiError::MissingId { kind })?.to_string();
            self.enter(Call::Update(record.name_key())).await?;

            let mut records = self.records.lock().await;
            let slot = records
                .entry(kind)
                .or_default()
                .iter_mut()
                .find(|r| r.id() == Some(id.as_str()))
                .ok_or_else(|| ApiError::NotFound {
                    resource: kind.singular().into(),
                    id: id.clone(),
                })?;
            *slot = record.clone();
            Ok(record.clone())
        }

        async fn delete(&self, kind: ResourceKind, id: &str) -> ApiResult<()> {
            self.enter(Call::Delete(id.to_string())).await?;
            self.records
                .lock()
                .await
                .entry(kind)
                .or_default()
                .retain(|r| r.id() != Some(id));
            Ok(())
        }
    }
}
