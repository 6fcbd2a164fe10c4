//! Optimistic synchronization between the local event cache and the store.
//!
//! Mutations go through two phases. Staging applies the optimistic effect
//! (creates only) and allocates a sequence number; resolving either confirms
//! the mutation against a canonical re-fetch of the store or rolls the
//! optimistic effect back. The async methods drive both phases around the
//! matching HTTP call; the phases are plain methods so tests can exercise
//! interleavings directly.

use std::collections::HashMap;

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Event, EventDraft, is_temp_id};
use crate::ids::{TempIds, UuidTempIds};
use crate::store::{DeleteOutcome, EventStore};

/// What a staged mutation is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// A staged mutation awaiting its network outcome.
///
/// Resolving consumes the value, so a mutation cannot be confirmed or rolled
/// back twice.
#[derive(Debug)]
#[must_use = "a staged mutation must be confirmed or rolled back"]
pub struct Pending {
    seq: u64,
    target: String,
    kind: MutationKind,
}

impl Pending {
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// The event the mutation targets: the temporary id for creates, the
    /// store id otherwise.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Local cache of events plus the machinery to mutate it optimistically.
pub struct SyncController {
    store: EventStore,
    ids: Box<dyn TempIds>,
    events: Vec<Event>,
    next_seq: u64,
    /// Newest resolved sequence number per event id. Responses older than
    /// this are stale and must not touch state.
    resolved: HashMap<String, u64>,
}

impl SyncController {
    pub fn new(store: EventStore) -> Self {
        Self::with_ids(store, Box::new(UuidTempIds))
    }

    /// Injectable id source, for deterministic tests.
    pub fn with_ids(store: EventStore, ids: Box<dyn TempIds>) -> Self {
        SyncController {
            store,
            ids,
            events: Vec::new(),
            next_seq: 0,
            resolved: HashMap::new(),
        }
    }

    /// The local cache, optimistic records included.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // ========================================================================
    // Staging and resolution
    // ========================================================================

    /// Stage a create: the draft is validated, given a fresh temporary id,
    /// and shown in the cache immediately.
    pub fn stage_create(&mut self, draft: EventDraft) -> FamCalResult<Pending> {
        draft.validate()?;
        let temp_id = self.ids.next();
        self.events.push(Event::from_draft(temp_id.clone(), draft));
        Ok(self.pending(temp_id, MutationKind::Create))
    }

    /// Stage an update. Updates are not applied optimistically; the cache
    /// keeps the prior copy until the store confirms.
    pub fn stage_update(&mut self, id: &str, draft: &EventDraft) -> FamCalResult<Pending> {
        draft.validate()?;
        Self::require_real_id(id)?;
        Ok(self.pending(id.to_string(), MutationKind::Update))
    }

    /// Stage a delete. Like updates, deletes leave the cache untouched until
    /// the store confirms.
    pub fn stage_delete(&mut self, id: &str) -> FamCalResult<Pending> {
        Self::require_real_id(id)?;
        Ok(self.pending(id.to_string(), MutationKind::Delete))
    }

    /// A temporary id has never been seen by the store, so it cannot address
    /// anything there.
    fn require_real_id(id: &str) -> FamCalResult<()> {
        if is_temp_id(id) {
            return Err(FamCalError::Validation(format!(
                "{id} has not been confirmed by the event store yet"
            )));
        }
        Ok(())
    }

    fn pending(&mut self, target: String, kind: MutationKind) -> Pending {
        self.next_seq += 1;
        log::debug!("staged {kind:?} for {target} (seq {})", self.next_seq);
        Pending {
            seq: self.next_seq,
            target,
            kind,
        }
    }

    /// Resolve a mutation that succeeded: the canonical list replaces the
    /// cache wholesale. Stale resolutions are discarded.
    pub fn confirm(&mut self, pending: Pending, canonical: Vec<Event>) {
        if self.is_stale(&pending) {
            return;
        }
        log::debug!("confirmed {:?} for {} (seq {})", pending.kind, pending.target, pending.seq);
        self.resolved.insert(pending.target, pending.seq);
        self.events = canonical;
    }

    /// Resolve a mutation that failed. Creates lose their optimistic record;
    /// updates and deletes never touched the cache. Stale resolutions are
    /// discarded.
    pub fn roll_back(&mut self, pending: Pending) {
        if self.is_stale(&pending) {
            return;
        }
        log::debug!("rolled back {:?} for {} (seq {})", pending.kind, pending.target, pending.seq);
        if pending.kind == MutationKind::Create {
            self.events.retain(|e| e.id != pending.target);
        }
        self.resolved.insert(pending.target, pending.seq);
    }

    fn is_stale(&self, pending: &Pending) -> bool {
        let stale = self
            .resolved
            .get(&pending.target)
            .is_some_and(|&latest| latest > pending.seq);
        if stale {
            log::debug!(
                "discarding stale {:?} resolution for {} (seq {})",
                pending.kind,
                pending.target,
                pending.seq
            );
        }
        stale
    }

    // ========================================================================
    // Store round-trips
    // ========================================================================

    /// Create an event. The cache shows it immediately under a temporary id;
    /// on success the canonical re-fetch replaces the cache, on failure the
    /// optimistic record is removed and the error surfaces. Nothing is
    /// retried.
    pub async fn create(&mut self, draft: EventDraft) -> FamCalResult<Event> {
        let pending = self.stage_create(draft.clone())?;
        match self.store.create(&draft).await {
            Ok(created) => {
                self.reconcile(pending).await;
                Ok(created)
            }
            Err(err) => {
                self.roll_back(pending);
                Err(err)
            }
        }
    }

    /// Update an event on the store, then reconcile.
    pub async fn update(&mut self, id: &str, draft: EventDraft) -> FamCalResult<Event> {
        let pending = self.stage_update(id, &draft)?;
        match self.store.update(id, &draft).await {
            Ok(updated) => {
                self.reconcile(pending).await;
                Ok(updated)
            }
            Err(err) => {
                self.roll_back(pending);
                Err(err)
            }
        }
    }

    /// Delete an event. Deleting something already gone is reported, not
    /// failed.
    pub async fn delete(&mut self, id: &str) -> FamCalResult<DeleteOutcome> {
        let pending = self.stage_delete(id)?;
        match self.store.delete(id).await {
            Ok(outcome) => {
                self.reconcile(pending).await;
                Ok(outcome)
            }
            Err(err) => {
                self.roll_back(pending);
                Err(err)
            }
        }
    }

    /// Persist a whole import batch in one request. Imports are not applied
    /// optimistically; the batch reaches the cache through the re-fetch.
    pub async fn import_batch(&mut self, events: &[Event]) -> FamCalResult<usize> {
        if events.is_empty() {
            return Err(FamCalError::EmptyImport);
        }
        let drafts: Vec<EventDraft> = events.iter().map(Event::to_draft).collect();
        let created = self.store.create_batch(&drafts).await?;
        if let Err(err) = self.refresh().await {
            log::warn!("import persisted but refresh failed: {err}");
        }
        Ok(created.len())
    }

    /// Re-fetch the canonical list. This is the only way server truth enters
    /// the cache.
    pub async fn refresh(&mut self) -> FamCalResult<&[Event]> {
        self.events = self.store.list().await?;
        Ok(&self.events)
    }

    /// Confirm against a canonical re-fetch. If the re-fetch itself fails the
    /// optimistic state stays put; the next successful refresh replaces the
    /// whole cache anyway.
    async fn reconcile(&mut self, pending: Pending) {
        match self.store.list().await {
            Ok(canonical) => self.confirm(pending, canonical),
            Err(err) => {
                log::warn!("{:?} persisted but refresh failed: {err}", pending.kind());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
