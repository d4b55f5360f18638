//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations and document persistence into use-case
//!   level APIs.
//! - Keep UI/FFI layers decoupled from storage and sync details.

pub mod ledger_service;
