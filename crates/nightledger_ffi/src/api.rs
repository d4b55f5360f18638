//! UI-facing use-case API.
//!
//! # Responsibility
//! - Expose the app's mutation handlers (add/remove definitions, log,
//!   redeem, apply, complete, rename, seed examples) and section
//!   renderers to the UI layer.
//! - Keep error semantics simple: plain response envelopes, no thrown
//!   errors.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation result is reported through `ActionResponse`.

use nightledger_core::db::open_db;
use nightledger_core::view;
use nightledger_core::{
    catalog, core_version as core_version_inner, init_logging as init_logging_inner,
    BackendConfig, DocumentHub, LedgerService, NewHabit, NewPunishment, NewReward, RepeatRule,
    Role, SqliteDocumentRepository,
};
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

static SESSION: OnceLock<Mutex<LedgerService>> = OnceLock::new();

/// Outcome envelope for every UI-triggered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created definition/entry id, when one was minted.
    pub id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking; never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; reconfiguration returns
///   an error message.
/// - Never panics; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the local document database and connects the ledger session.
///
/// # FFI contract
/// - Must be called once before any mutation or render function.
/// - A repeat call is rejected with a failure envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app(db_path: String, app_id: String) -> ActionResponse {
    if SESSION.get().is_some() {
        return ActionResponse::failure("ledger session already initialized");
    }

    let conn = match open_db(db_path.as_str()) {
        Ok(conn) => conn,
        Err(err) => return ActionResponse::failure(format!("failed to open database: {err}")),
    };
    let hub = Arc::new(DocumentHub::new(SqliteDocumentRepository::new(conn)));
    let service = match LedgerService::connect(hub, app_id.as_str()) {
        Ok(service) => service,
        Err(err) => return ActionResponse::failure(format!("failed to connect ledger: {err}")),
    };

    match SESSION.set(Mutex::new(service)) {
        Ok(()) => ActionResponse::success("ledger session ready", None),
        Err(_) => ActionResponse::failure("ledger session already initialized"),
    }
}

/// Connects using the `NIGHTLEDGER_CONFIG` environment blob instead of
/// an explicit app id.
///
/// # FFI contract
/// - Missing or invalid configuration is fatal to initialization and
///   reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app_from_env(db_path: String) -> ActionResponse {
    let config = match BackendConfig::from_env() {
        Ok(config) => config,
        Err(err) => return ActionResponse::failure(format!("configuration error: {err}")),
    };
    init_app(db_path, config.app_id)
}

fn with_session<T>(f: impl FnOnce(&mut LedgerService) -> T, fallback: impl FnOnce() -> T) -> T {
    match SESSION.get() {
        Some(session) => match session.lock() {
            Ok(mut service) => f(&mut service),
            Err(_) => fallback(),
        },
        None => fallback(),
    }
}

fn mutate(f: impl FnOnce(&mut LedgerService) -> Result<Option<String>, String>) -> ActionResponse {
    with_session(
        |service| match f(service) {
            Ok(id) => ActionResponse::success("ok", id),
            Err(message) => ActionResponse::failure(message),
        },
        || ActionResponse::failure("ledger session not initialized"),
    )
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid id `{value}`"))
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::from_keyword(value).ok_or_else(|| format!("unknown role `{value}`"))
}

fn parse_repeat(value: &str) -> Result<RepeatRule, String> {
    RepeatRule::parse(value).map_err(|err| err.to_string())
}

/// Adds a habit definition.
///
/// `repeat` accepts `none`, `daily`, `weekly:<weekday>`, `monthly:<n>`,
/// a single weekday keyword, or a comma-separated weekday set;
/// unparseable input is rejected with a failure envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn add_habit(
    description: String,
    points: i64,
    times_per_week: u32,
    assignee: String,
    repeat: String,
) -> ActionResponse {
    mutate(|service| {
        let assignee = parse_role(&assignee)?;
        let repeat = parse_repeat(&repeat)?;
        let id = service
            .add_habit(NewHabit {
                description,
                points,
                times_per_week,
                assignee,
                repeat,
            })
            .map_err(|err| err.to_string())?;
        Ok(Some(id.to_string()))
    })
}

/// Adds a reward definition.
#[flutter_rust_bridge::frb(sync)]
pub fn add_reward(title: String, cost: i64, description: String) -> ActionResponse {
    mutate(|service| {
        let id = service
            .add_reward(NewReward {
                title,
                cost,
                description,
            })
            .map_err(|err| err.to_string())?;
        Ok(Some(id.to_string()))
    })
}

/// Adds a punishment definition.
#[flutter_rust_bridge::frb(sync)]
pub fn add_punishment(title: String, description: String) -> ActionResponse {
    mutate(|service| {
        let id = service
            .add_punishment(NewPunishment { title, description })
            .map_err(|err| err.to_string())?;
        Ok(Some(id.to_string()))
    })
}

/// Removes one definition by id. Unknown ids report a failure envelope
/// without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_habit(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        if service.remove_habit(id).map_err(|err| err.to_string())? {
            Ok(None)
        } else {
            Err(format!("habit not found: {id}"))
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn remove_reward(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        if service.remove_reward(id).map_err(|err| err.to_string())? {
            Ok(None)
        } else {
            Err(format!("reward not found: {id}"))
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn remove_punishment(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        let removed = service
            .remove_punishment(id)
            .map_err(|err| err.to_string())?;
        if removed {
            Ok(None)
        } else {
            Err(format!("punishment not found: {id}"))
        }
    })
}

/// Logs a completion of the identified habit.
#[flutter_rust_bridge::frb(sync)]
pub fn log_habit(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        let entry_id = service.log_habit(id).map_err(|err| err.to_string())?;
        Ok(Some(entry_id.to_string()))
    })
}

/// Redeems the identified reward against the keeper's balance.
#[flutter_rust_bridge::frb(sync)]
pub fn redeem_reward(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        let entry_id = service.redeem_reward(id).map_err(|err| err.to_string())?;
        Ok(Some(entry_id.to_string()))
    })
}

/// Applies the identified punishment (entry starts pending).
#[flutter_rust_bridge::frb(sync)]
pub fn apply_punishment(id: String) -> ActionResponse {
    mutate(|service| {
        let id = parse_id(&id)?;
        let entry_id = service
            .apply_punishment(id)
            .map_err(|err| err.to_string())?;
        Ok(Some(entry_id.to_string()))
    })
}

/// Marks a pending punishment entry completed.
#[flutter_rust_bridge::frb(sync)]
pub fn complete_punishment(entry_id: String) -> ActionResponse {
    mutate(|service| {
        let entry_id = parse_id(&entry_id)?;
        service
            .complete_punishment(entry_id)
            .map_err(|err| err.to_string())?;
        Ok(None)
    })
}

/// Renames one player.
#[flutter_rust_bridge::frb(sync)]
pub fn rename_player(role: String, name: String) -> ActionResponse {
    mutate(|service| {
        let role = parse_role(&role)?;
        let renamed = service
            .rename_player(role, &name)
            .map_err(|err| err.to_string())?;
        if renamed {
            Ok(None)
        } else {
            Err("name unchanged or empty".to_string())
        }
    })
}

/// Seeds the example definitions used to pre-fill an empty ledger.
#[flutter_rust_bridge::frb(sync)]
pub fn seed_examples() -> ActionResponse {
    mutate(|service| {
        for request in catalog::example_habits() {
            service.add_habit(request).map_err(|err| err.to_string())?;
        }
        for request in catalog::example_rewards() {
            service.add_reward(request).map_err(|err| err.to_string())?;
        }
        for request in catalog::example_punishments() {
            service
                .add_punishment(request)
                .map_err(|err| err.to_string())?;
        }
        Ok(None)
    })
}

/// Drains pending remote snapshots into local state.
///
/// Returns the number of snapshots applied, or `-1` before init.
#[flutter_rust_bridge::frb(sync)]
pub fn refresh() -> i64 {
    with_session(
        |service| match service.pump() {
            Ok(applied) => applied as i64,
            Err(err) => {
                log::warn!("event=refresh module=ffi status=error error={err}");
                -1
            }
        },
        || -1,
    )
}

/// Renders the full dashboard markup from current state.
#[flutter_rust_bridge::frb(sync)]
pub fn render_dashboard() -> String {
    with_session(
        |service| view::render_dashboard(service.state()),
        String::new,
    )
}

/// Renders only the scoreboard fragment.
#[flutter_rust_bridge::frb(sync)]
pub fn render_scoreboard() -> String {
    with_session(
        |service| view::render_scoreboard(service.state()),
        String::new,
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_id, parse_repeat, parse_role, ActionResponse};
    use nightledger_core::{RepeatRule, Role};

    #[test]
    fn parse_helpers_normalize_input() {
        assert_eq!(parse_role(" keeper ").unwrap(), Role::Keeper);
        assert!(parse_role("butler").is_err());
        assert!(parse_id("not-a-uuid").is_err());
    }

    #[test]
    fn parse_repeat_covers_every_schedule_mode() {
        use chrono::Weekday;

        assert_eq!(parse_repeat("").unwrap(), RepeatRule::Once);
        assert_eq!(parse_repeat("Daily").unwrap(), RepeatRule::Daily);
        assert_eq!(
            parse_repeat("weekly:wed").unwrap(),
            RepeatRule::Weekly(Weekday::Wed)
        );
        assert_eq!(parse_repeat("monthly:1").unwrap(), RepeatRule::Monthly(1));
        assert_eq!(
            parse_repeat("sat,sun").unwrap(),
            RepeatRule::Days(vec![Weekday::Sat, Weekday::Sun])
        );
    }

    #[test]
    fn unparseable_schedule_input_is_rejected_not_degraded() {
        let err = parse_repeat("fortnightly").unwrap_err();
        assert!(err.contains("fortnightly"));
        assert!(parse_repeat("monthly:32").is_err());
    }

    #[test]
    fn envelopes_carry_outcome() {
        let ok = ActionResponse::success("done", Some("id-1".to_string()));
        assert!(ok.ok);
        assert_eq!(ok.id.as_deref(), Some("id-1"));

        let failed = ActionResponse::failure("nope");
        assert!(!failed.ok);
        assert!(failed.id.is_none());
    }
}
