//! UI-facing bridge crate for the Nightledger core.

pub mod api;
