//! # Sync Engine
//!
//! Makes one venue-scoped collection match a desired list.
//!
//! ## Sync Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. FETCH      store.list_for_venue(kind, venue)                       │
//! │  2. SCOPE      drop server records rejected by the filter              │
//! │  3. PLAN       compute_plan (name-keyed, is_equal skips no-ops)        │
//! │  4. REPORT     reporter.plan_computed(counts)     ◄── dry run stops    │
//! │  5. DELETE  ─┐                                                          │
//! │  6. UPDATE   ├─ each phase: at most `concurrency` requests in flight   │
//! │  7. CREATE  ─┘  first error aborts the phase and the run               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A run is not atomic. After a failure some mutations may have landed and
//! requests already in flight are left to finish in the background. Running
//! the same sync again picks up where it stopped: whatever already matches is
//! skipped.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};
use venuesync_core::{
    apply_filter, compute_plan, PlanCounts, Record, RecordFilter, ResourceKind, SyncPlan,
    DEFAULT_CONCURRENCY,
};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::report::{Phase, PlanReporter, TracingReporter};
use crate::store::RemoteStore;

// =============================================================================
// Options and Outcome
// =============================================================================

/// Per-run sync options.
#[derive(Clone, Default)]
pub struct SyncOptions {
    /// Restricts which server records are compared and may be deleted.
    pub filter: Option<RecordFilter>,

    /// Compute and report the plan without sending any mutation.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only server records accepted by `filter` are in scope.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl std::fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// What a sync run decided and did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The computed plan.
    pub plan: SyncPlan,

    /// Counts as reported before mutation.
    pub counts: PlanCounts,

    /// True if no mutation was sent.
    pub dry_run: bool,

    /// Created records: the desired copies annotated with their new `_id`.
    pub created: Vec<Record>,
}

// =============================================================================
// Engine
// =============================================================================

/// Runs sync plans against a [`RemoteStore`].
pub struct SyncEngine<S> {
    store: Arc<S>,
    concurrency: usize,
    reporter: Arc<dyn PlanReporter>,
}

impl<S: RemoteStore + 'static> SyncEngine<S> {
    /// Creates an engine with default concurrency and tracing reports.
    pub fn new(store: Arc<S>) -> Self {
        SyncEngine {
            store,
            concurrency: DEFAULT_CONCURRENCY,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Creates an engine using the `[sync]` settings of a config.
    pub fn from_config(store: Arc<S>, config: &ClientConfig) -> Self {
        Self::new(store).with_concurrency(config.sync.concurrency)
    }

    /// Sets the maximum in-flight requests per phase (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Replaces the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn PlanReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetches the server side and computes the plan without reporting it.
    pub async fn plan(
        &self,
        kind: ResourceKind,
        venue_id: &str,
        desired: &[Record],
        filter: Option<&RecordFilter>,
    ) -> ApiResult<SyncPlan> {
        if !kind.is_venue_syncable() {
            return Err(ApiError::UnsupportedKind {
                kind,
                reason: "only venue-scoped collections can be synced by name".into(),
            });
        }

        let server = self.store.list_for_venue(kind, venue_id).await?;
        let scoped = apply_filter(server, filter);
        debug!(%kind, venue_id, in_scope = scoped.len(), "Fetched server records");

        Ok(compute_plan(kind, desired, scoped))
    }

    /// Makes the server collection of `kind` in `venue_id` match `desired`.
    ///
    /// `desired` is never modified.
    pub async fn sync(
        &self,
        kind: ResourceKind,
        venue_id: &str,
        desired: &[Record],
        options: SyncOptions,
    ) -> ApiResult<SyncOutcome> {
        let plan = self.plan(kind, venue_id, desired, options.filter.as_ref()).await?;
        let counts = plan.counts();
        self.reporter.plan_computed(kind, venue_id, &counts, options.dry_run);

        if options.dry_run {
            return Ok(SyncOutcome {
                plan,
                counts,
                dry_run: true,
                created: Vec::new(),
            });
        }

        self.run_phase(kind, Phase::Delete, plan.to_delete.clone(), move |store, record| {
            delete_one(store, kind, record)
        })
        .await?;

        self.run_phase(kind, Phase::Update, plan.to_update.clone(), move |store, record| {
            update_one(store, kind, record)
        })
        .await?;

        let created = self
            .run_phase(kind, Phase::Create, plan.to_create.clone(), move |store, record| {
                create_one(store, kind, record)
            })
            .await?;

        Ok(SyncOutcome {
            plan,
            counts,
            dry_run: false,
            created,
        })
    }

    /// Runs `op` over `items` with at most `concurrency` tasks in flight.
    ///
    /// On the first error the remaining tasks are detached, not awaited.
    async fn run_phase<F, Fut>(
        &self,
        kind: ResourceKind,
        phase: Phase,
        items: Vec<Record>,
        op: F,
    ) -> ApiResult<Vec<Record>>
    where
        F: Fn(Arc<S>, Record) -> Fut,
        Fut: Future<Output = ApiResult<Option<Record>>> + Send + 'static,
    {
        let total = items.len();
        let mut pending = items.into_iter();
        let mut tasks = JoinSet::new();
        let mut results = Vec::new();

        loop {
            while tasks.len() < self.concurrency {
                match pending.next() {
                    Some(record) => {
                        tasks.spawn(op(Arc::clone(&self.store), record));
                    }
                    None => break,
                }
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined.map_err(ApiError::from).and_then(|result| result) {
                Ok(Some(record)) => results.push(record),
                Ok(None) => {}
                Err(e) => {
                    error!(%kind, %phase, error = %e, in_flight = tasks.len(), "Sync phase aborted");
                    tasks.detach_all();
                    return Err(e);
                }
            }
        }

        self.reporter.phase_completed(kind, phase, total);
        Ok(results)
    }
}

// =============================================================================
// Phase Operations
// =============================================================================

async fn delete_one<S: RemoteStore>(
    store: Arc<S>,
    kind: ResourceKind,
    record: Record,
) -> ApiResult<Option<Record>> {
    let id = record.id().ok_or(ApiError::MissingId { kind })?;
    store.delete(kind, id).await?;
    Ok(None)
}

async fn update_one<S: RemoteStore>(
    store: Arc<S>,
    kind: ResourceKind,
    record: Record,
) -> ApiResult<Option<Record>> {
    store.update(kind, &record).await?;
    Ok(None)
}

/// Returns the desired record annotated with the id the server assigned.
async fn create_one<S: RemoteStore>(
    store: Arc<S>,
    kind: ResourceKind,
    record: Record,
) -> ApiResult<Option<Record>> {
    let stored = store.create(kind, &record).await?;
    Ok(Some(match stored.id() {
        Some(id) => record.with_id(id),
        None => record,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================
