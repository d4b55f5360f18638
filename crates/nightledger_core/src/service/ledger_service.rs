//! Ledger use-case service.
//!
//! # Responsibility
//! - Run every user-triggered mutation as store-transform first, then a
//!   CAS-guarded full-document persist.
//! - Drain received snapshots into the store (merge-on-receive).
//!
//! # Invariants
//! - A rejected validation never triggers a persist call.
//! - Errors are returned as values; this layer never renders anything.
//! - No automatic retry: a conflicting save surfaces to the caller and
//!   local state stays diverged until the newer snapshot is pumped.

use crate::config::ledger_document_path;
use crate::model::definition::{DefinitionId, NewHabit, NewPunishment, NewReward};
use crate::model::entry::EntryId;
use crate::model::ledger::{LedgerSnapshot, LedgerState};
use crate::model::role::Role;
use crate::store::{LedgerStore, StoreError};
use crate::sync::{DocumentHub, Subscription, SyncError};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure classes surfaced to callers: validation, not-found,
/// insufficient points, storage/sync, decode.
#[derive(Debug)]
pub enum LedgerServiceError {
    Store(StoreError),
    Sync(SyncError),
    /// A stored document body failed to decode.
    Codec(serde_json::Error),
}

impl Display for LedgerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Sync(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid ledger document body: {err}"),
        }
    }
}

impl Error for LedgerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<StoreError> for LedgerServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SyncError> for LedgerServiceError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

impl From<serde_json::Error> for LedgerServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

impl LedgerServiceError {
    /// Whether this failure is a rejected stale write.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Sync(err) if err.is_version_conflict())
    }
}

pub type ServiceResult<T> = Result<T, LedgerServiceError>;

/// One client session over the shared ledger document.
pub struct LedgerService {
    hub: Arc<DocumentHub>,
    subscription: Subscription,
    path: String,
    store: LedgerStore,
}

impl LedgerService {
    /// Subscribes to the deployment's ledger document and performs the
    /// first-write seeding when no document exists yet.
    pub fn connect(hub: Arc<DocumentHub>, app_id: &str) -> ServiceResult<Self> {
        let path = ledger_document_path(app_id);
        let subscription = hub.subscribe(&path)?;

        let mut service = Self {
            hub,
            subscription,
            path,
            store: LedgerStore::seeded(),
        };

        if service.pump()? == 0 {
            let version = service
                .hub
                .save(&service.path, &service.store.state().body_with_version(1)?, None)?;
            service.store.mark_saved(version);
            info!(
                "event=first_write module=service status=ok path={} version={version}",
                service.path
            );
            // Absorb our own first-write echo.
            service.pump()?;
        }

        Ok(service)
    }

    /// Current aggregate, for renderers.
    pub fn state(&self) -> &LedgerState {
        self.store.state()
    }

    /// Drains pending snapshots into the store. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> ServiceResult<usize> {
        let mut applied = 0;
        while let Some(snapshot) = self.subscription.try_next() {
            let mut decoded = LedgerSnapshot::from_body(&snapshot.body)?;
            // The storage version column is authoritative over whatever
            // version the writer serialized into the body.
            decoded.version = snapshot.version;
            self.store.apply_snapshot(decoded);
            applied += 1;
        }
        if applied > 0 {
            info!(
                "event=snapshot_apply module=service status=ok path={} count={applied} version={}",
                self.path,
                self.store.state().version
            );
        }
        Ok(applied)
    }

    pub fn add_habit(&mut self, request: NewHabit) -> ServiceResult<DefinitionId> {
        let id = self.store.add_habit(request).map_err(log_rejection)?;
        self.persist()?;
        Ok(id)
    }

    pub fn add_reward(&mut self, request: NewReward) -> ServiceResult<DefinitionId> {
        let id = self.store.add_reward(request).map_err(log_rejection)?;
        self.persist()?;
        Ok(id)
    }

    pub fn add_punishment(&mut self, request: NewPunishment) -> ServiceResult<DefinitionId> {
        let id = self.store.add_punishment(request).map_err(log_rejection)?;
        self.persist()?;
        Ok(id)
    }

    /// Removes one habit by id; an unknown id is a no-op and does not
    /// persist.
    pub fn remove_habit(&mut self, id: DefinitionId) -> ServiceResult<bool> {
        self.remove(|store| store.remove_habit(id))
    }

    pub fn remove_reward(&mut self, id: DefinitionId) -> ServiceResult<bool> {
        self.remove(|store| store.remove_reward(id))
    }

    pub fn remove_punishment(&mut self, id: DefinitionId) -> ServiceResult<bool> {
        self.remove(|store| store.remove_punishment(id))
    }

    pub fn log_habit(&mut self, id: DefinitionId) -> ServiceResult<EntryId> {
        let entry_id = self
            .store
            .log_habit(id, Utc::now().timestamp_millis())
            .map_err(log_rejection)?;
        self.persist()?;
        Ok(entry_id)
    }

    pub fn redeem_reward(&mut self, id: DefinitionId) -> ServiceResult<EntryId> {
        let entry_id = self
            .store
            .redeem_reward(id, Utc::now().timestamp_millis())
            .map_err(log_rejection)?;
        self.persist()?;
        Ok(entry_id)
    }

    pub fn apply_punishment(&mut self, id: DefinitionId) -> ServiceResult<EntryId> {
        let entry_id = self
            .store
            .apply_punishment(id, Utc::now().timestamp_millis())
            .map_err(log_rejection)?;
        self.persist()?;
        Ok(entry_id)
    }

    pub fn complete_punishment(&mut self, entry_id: EntryId) -> ServiceResult<()> {
        self.store
            .complete_punishment(entry_id)
            .map_err(log_rejection)?;
        self.persist()
    }

    /// Renames one player; empty or unchanged names are a no-op and do
    /// not persist.
    pub fn rename_player(&mut self, role: Role, name: &str) -> ServiceResult<bool> {
        if !self.store.rename_player(role, name) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn remove(
        &mut self,
        op: impl FnOnce(&mut LedgerStore) -> bool,
    ) -> ServiceResult<bool> {
        if !op(&mut self.store) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Full-document save guarded by the current version.
    fn persist(&mut self) -> ServiceResult<()> {
        let current = self.store.state().version;
        let body = self.store.state().body_with_version(current + 1)?;
        match self.hub.save(&self.path, &body, Some(current)) {
            Ok(version) => {
                self.store.mark_saved(version);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=document_save module=service status=error path={} expected_version={} error={err}",
                    self.path,
                    current + 1
                );
                Err(err.into())
            }
        }
    }
}

fn log_rejection(err: StoreError) -> StoreError {
    warn!("event=mutation module=service status=rejected reason={err}");
    err
}
