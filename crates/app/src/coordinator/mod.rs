//! Mutation Coordinator
//!
//! Owns the client's copy of the part tree. Every change is sent to the
//! store first and the whole tree is fetched again afterwards; the local copy
//! is only ever replaced by a fresh fetch, never patched.
//!
//! Mutations and their follow-up fetch run one at a time. From the moment a
//! mutation is issued, including while it waits for its turn, until its
//! follow-up fetch lands, the held snapshot is marked stale.

use std::{
    future::Future,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{sync::Mutex, time::timeout};
use tracing::{debug, info, warn};

use partlist::{
    costs::{TotalBasis, TotalMismatch, aggregate, verify},
    parts::{Part, PartDraft, PartId, validate},
    tree::{Assembly, AssemblyIssue, PartTree, assemble},
};

use crate::store::{ExportFormat, PartsStore, StoreError};

pub mod errors;

pub use errors::CoordinatorError;

/// Default upper bound for a single store call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coordinator tuning.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    /// Upper bound for every store call
    pub timeout: Duration,

    /// What store-reported totals are checked against
    pub basis: TotalBasis,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            basis: TotalBasis::default(),
        }
    }
}

/// The tree as of one successful fetch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Assembled and aggregated parts
    pub tree: PartTree,

    /// Records left out during assembly
    pub issues: Vec<AssemblyIssue>,

    /// Store totals that disagree with the local rollup
    pub mismatches: Vec<TotalMismatch>,

    /// Number of successful fetches so far; `0` before the first one
    pub generation: u64,
}

/// A downloaded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Format of the document
    pub format: ExportFormat,

    /// Document bytes, as received
    pub bytes: Vec<u8>,
}

impl Export {
    /// Suggested file name.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }
}

/// Sends part changes to the store and keeps the local tree in step with it.
pub struct MutationCoordinator {
    store: Arc<dyn PartsStore>,
    settings: CoordinatorSettings,
    current: RwLock<Arc<Snapshot>>,
    synced: AtomicBool,
    pending: AtomicUsize,
    queue: Mutex<()>,
}

/// Counts one issued mutation until dropped.
struct Pending<'a>(&'a AtomicUsize);

impl<'a> Pending<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);

        Self(count)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for MutationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationCoordinator")
            .field("settings", &self.settings)
            .field("generation", &self.snapshot().generation)
            .field("stale", &self.is_stale())
            .finish_non_exhaustive()
    }
}

impl MutationCoordinator {
    /// Create a coordinator over the given store. The held tree starts empty
    /// and stale until the first [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(store: Arc<dyn PartsStore>, settings: CoordinatorSettings) -> Self {
        Self {
            store,
            settings,
            current: RwLock::new(Arc::new(Snapshot::default())),
            synced: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            queue: Mutex::new(()),
        }
    }

    /// The most recently fetched tree.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(&current)
    }

    /// Whether the held tree may lag behind the store: nothing has been
    /// fetched yet, a mutation is queued or in flight, or the fetch after an
    /// accepted mutation failed.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0 || !self.synced.load(Ordering::SeqCst)
    }

    /// Fetch the tree from the store and replace the held snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached, times out, or sends
    /// amounts whose costs overflow. The held snapshot is left as it was.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoordinatorError> {
        let _turn = self.queue.lock().await;

        self.reconcile().await
    }

    /// Validate and create a part, then reload the tree.
    ///
    /// The returned part is the one the store created. It is not spliced into
    /// the held tree; the reload brings it in.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Validation`] without contacting the store if
    /// the draft is invalid, or the store's failure otherwise.
    pub async fn create(&self, draft: PartDraft) -> Result<Part, CoordinatorError> {
        let part = validate(draft)?;

        let created = self
            .mutate(self.store.create_part(part.payload()))
            .await?
            .into_parts()
            .0;

        info!(id = ?created.id, name = %created.name, "part created");

        Ok(created)
    }

    /// Validate and replace a part's attributes, then reload the tree.
    ///
    /// Re-parenting is allowed; the store decides whether the new parent is
    /// acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Validation`] without contacting the store if
    /// the draft is invalid, or the store's failure otherwise.
    pub async fn update(&self, id: PartId, draft: PartDraft) -> Result<(), CoordinatorError> {
        let part = validate(draft)?;

        self.mutate(self.store.update_part(id, part.payload()))
            .await?;

        info!(%id, "part updated");

        Ok(())
    }

    /// Delete a part, then reload the tree.
    ///
    /// # Errors
    ///
    /// Returns the store's failure, e.g. a rejection for an unknown id or a
    /// part that still has children.
    pub async fn delete(&self, id: PartId) -> Result<(), CoordinatorError> {
        self.mutate(self.store.delete_part(id)).await?;

        info!(%id, "part deleted");

        Ok(())
    }

    /// Download the tree in the given format. The held tree is not touched.
    ///
    /// # Errors
    ///
    /// Returns the store's failure.
    pub async fn export(&self, format: ExportFormat) -> Result<Export, CoordinatorError> {
        let bytes = self.call(self.store.export(format)).await?;

        debug!(%format, size = bytes.len(), "export downloaded");

        Ok(Export { format, bytes })
    }

    /// Send one mutation, then reload. Holds the queue for both steps.
    async fn mutate<T>(
        &self,
        request: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, CoordinatorError> {
        let _pending = Pending::enter(&self.pending);
        let _turn = self.queue.lock().await;

        let outcome = self.call(request).await?;

        self.synced.store(false, Ordering::SeqCst);

        self.reconcile()
            .await
            .map_err(|source| CoordinatorError::Reconcile(Box::new(source)))?;

        Ok(outcome)
    }

    /// Fetch, assemble, aggregate and verify, then swap the snapshot in.
    /// Callers must hold the queue.
    async fn reconcile(&self) -> Result<Arc<Snapshot>, CoordinatorError> {
        let records = self.call(self.store.fetch_parts()).await?;

        let Assembly { mut tree, issues } = assemble(records);

        aggregate(&mut tree)?;

        let mismatches = verify(&tree, self.settings.basis);

        for issue in &issues {
            warn!(%issue, "part left out of the tree");
        }

        for mismatch in &mismatches {
            warn!(
                id = %mismatch.id,
                reported = mismatch.reported,
                computed = mismatch.computed,
                "store total disagrees with local computation"
            );
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let snapshot = Arc::new(Snapshot {
            tree,
            issues,
            mismatches,
            generation: current.generation + 1,
        });

        *current = Arc::clone(&snapshot);
        self.synced.store(true, Ordering::SeqCst);

        debug!(
            generation = snapshot.generation,
            parts = snapshot.tree.len(),
            "tree reloaded"
        );

        Ok(snapshot)
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, CoordinatorError> {
        timeout(self.settings.timeout, request)
            .await
            .map_err(|_elapsed| CoordinatorError::Timeout(self.settings.timeout))?
            .map_err(CoordinatorError::from)
    }
}
