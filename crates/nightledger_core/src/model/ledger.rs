//! The persisted aggregate and its snapshot merge rules.
//!
//! # Responsibility
//! - Define `LedgerState`, the single document holding all application
//!   state, and `LedgerSnapshot`, the wire shape received from storage.
//! - Implement merge-on-receive: remote wins per top-level key, absent
//!   list keys become empty lists.
//!
//! # Invariants
//! - `version` is a monotonic document version used for optimistic
//!   concurrency; it only moves forward via acknowledged saves or
//!   received snapshots.
//! - The aggregate is always persisted in full; there are no partial
//!   per-field writes.

use crate::model::definition::{HabitDefinition, PunishmentDefinition, RewardDefinition};
use crate::model::entry::{HabitEntry, PunishmentEntry, RewardEntry};
use crate::model::role::{PlayerNames, Scores};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The entire application state, persisted as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub players: PlayerNames,
    pub scores: Scores,
    #[serde(default)]
    pub habits: Vec<HabitDefinition>,
    #[serde(default)]
    pub rewards: Vec<RewardDefinition>,
    #[serde(default)]
    pub punishments: Vec<PunishmentDefinition>,
    #[serde(default)]
    pub habit_log: Vec<HabitEntry>,
    #[serde(default)]
    pub reward_log: Vec<RewardEntry>,
    #[serde(default)]
    pub punishment_log: Vec<PunishmentEntry>,
    /// Monotonic document version; 0 means never saved.
    #[serde(default)]
    pub version: u64,
}

impl LedgerState {
    /// Default aggregate written by the first client that finds no
    /// document at the well-known path.
    pub fn seed() -> Self {
        Self {
            players: PlayerNames::default(),
            scores: Scores::default(),
            habits: Vec::new(),
            rewards: Vec::new(),
            punishments: Vec::new(),
            habit_log: Vec::new(),
            reward_log: Vec::new(),
            punishment_log: Vec::new(),
            version: 0,
        }
    }

    /// Serializes the full aggregate with `version` replaced by the
    /// version the caller is about to claim.
    pub fn body_with_version(&self, version: u64) -> Result<String, serde_json::Error> {
        let mut claimed = self.clone();
        claimed.version = version;
        serde_json::to_string(&claimed)
    }

    /// Merges a received snapshot over this state. Remote wins per
    /// present top-level key; the six list keys are always replaced
    /// (absent keys were already defaulted to empty by deserialization).
    pub fn apply_snapshot(&mut self, snapshot: LedgerSnapshot) {
        if let Some(players) = snapshot.players {
            self.players = players;
        }
        if let Some(scores) = snapshot.scores {
            self.scores = scores;
        }
        self.habits = snapshot.habits;
        self.rewards = snapshot.rewards;
        self.punishments = snapshot.punishments;
        self.habit_log = snapshot.habit_log;
        self.reward_log = snapshot.reward_log;
        self.punishment_log = snapshot.punishment_log;
        self.version = snapshot.version;
    }

    /// Habits actionable on `date`. A `Once` habit counts as completed
    /// when any log entry references it.
    pub fn due_habits_on(&self, date: NaiveDate) -> Vec<&HabitDefinition> {
        self.habits
            .iter()
            .filter(|habit| {
                let completed = self
                    .habit_log
                    .iter()
                    .any(|entry| entry.habit_id == habit.id);
                habit.repeat.is_due_on(date, completed)
            })
            .collect()
    }
}

/// Wire shape of a received document. `players`/`scores` may be absent
/// (keep local value); list keys default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub players: Option<PlayerNames>,
    #[serde(default)]
    pub scores: Option<Scores>,
    #[serde(default)]
    pub habits: Vec<HabitDefinition>,
    #[serde(default)]
    pub rewards: Vec<RewardDefinition>,
    #[serde(default)]
    pub punishments: Vec<PunishmentDefinition>,
    #[serde(default)]
    pub habit_log: Vec<HabitEntry>,
    #[serde(default)]
    pub reward_log: Vec<RewardEntry>,
    #[serde(default)]
    pub punishment_log: Vec<PunishmentEntry>,
    #[serde(default)]
    pub version: u64,
}

impl LedgerSnapshot {
    /// Decodes a stored document body.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
