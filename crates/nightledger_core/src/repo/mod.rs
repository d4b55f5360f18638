//! Persistence boundary for the ledger document.
//!
//! # Responsibility
//! - Keep storage details (SQL, in-memory maps) behind repository traits.
//!
//! # Invariants
//! - Every save is guarded by an optimistic version check.

pub mod document_repo;
