//! Core domain logic for the Nightledger household ledger.
//! This crate is the single source of truth for business invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod sync;
pub mod view;

pub use config::{ledger_document_path, AuthMode, BackendConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::definition::{
    DefinitionId, HabitDefinition, NewHabit, NewPunishment, NewReward, PunishmentDefinition,
    RewardDefinition, ValidationError,
};
pub use model::entry::{EntryId, HabitEntry, PunishmentEntry, PunishmentStatus, RewardEntry};
pub use model::ledger::{LedgerSnapshot, LedgerState};
pub use model::role::{PlayerNames, Role, Scores};
pub use model::schedule::{ParseRepeatError, RepeatRule};
pub use repo::document_repo::{
    DocumentRepository, MemoryDocumentRepository, RepoError, RepoResult,
    SqliteDocumentRepository, VersionedDocument,
};
pub use service::ledger_service::{LedgerService, LedgerServiceError, ServiceResult};
pub use store::{LedgerStore, StoreError, StoreResult};
pub use sync::{DocumentHub, DocumentSnapshot, Subscription, SyncError, SyncResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
