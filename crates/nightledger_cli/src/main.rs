//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `nightledger_core` linkage.
//! - Exercise seed -> mutate -> render on an in-memory backend with
//!   deterministic output for quick local sanity checks.

use nightledger_core::view::render_dashboard;
use nightledger_core::{catalog, DocumentHub, LedgerService, MemoryDocumentRepository, Role};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("nightledger_core version={}", nightledger_core::core_version());

    let hub = Arc::new(DocumentHub::new(MemoryDocumentRepository::new()));
    let mut service = match LedgerService::connect(hub, "smoke") {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to connect ledger session: {err}");
            return ExitCode::FAILURE;
        }
    };

    for request in catalog::example_habits() {
        if let Err(err) = service.add_habit(request) {
            eprintln!("failed to seed example habit: {err}");
            return ExitCode::FAILURE;
        }
    }

    let first_habit = service.state().habits[0].id;
    if let Err(err) = service.log_habit(first_habit) {
        eprintln!("failed to log habit: {err}");
        return ExitCode::FAILURE;
    }

    println!(
        "keeper={} nightingale={} version={}",
        service.state().scores.get(Role::Keeper),
        service.state().scores.get(Role::Nightingale),
        service.state().version
    );
    println!("{}", render_dashboard(service.state()));
    ExitCode::SUCCESS
}
