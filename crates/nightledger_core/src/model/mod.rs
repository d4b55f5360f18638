//! Domain model for the two-player household ledger.
//!
//! # Responsibility
//! - Define the canonical aggregate and every record persisted inside it.
//! - Keep domain shapes storage-agnostic and presentation-agnostic.
//!
//! # Invariants
//! - The role set is exactly `{keeper, nightingale}`.
//! - Definitions and log entries are identified by stable `Uuid`s.
//! - Log entries carry denormalized copies of definition fields, never
//!   references; history does not change when definitions do.

pub mod definition;
pub mod entry;
pub mod ledger;
pub mod role;
pub mod schedule;
