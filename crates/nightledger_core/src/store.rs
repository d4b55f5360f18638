//! Owned in-memory ledger store.
//!
//! # Responsibility
//! - Hold the aggregate behind explicit read/write entry points instead
//!   of ambient globals.
//! - Implement every user-triggered mutation as a pure in-memory
//!   transform returning a `Result`, with no storage or rendering
//!   concerns.
//!
//! # Invariants
//! - A rejected mutation leaves the aggregate untouched.
//! - Removal is addressed by stable id; an unknown id is a no-op.
//! - Score changes happen in the same transform as the log entry they
//!   belong to.

use crate::model::definition::{
    DefinitionId, HabitDefinition, NewHabit, NewPunishment, NewReward, PunishmentDefinition,
    RewardDefinition, ValidationError,
};
use crate::model::entry::{EntryId, HabitEntry, PunishmentEntry, PunishmentStatus, RewardEntry};
use crate::model::ledger::{LedgerSnapshot, LedgerState};
use crate::model::role::Role;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected or impossible store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    HabitNotFound(DefinitionId),
    RewardNotFound(DefinitionId),
    PunishmentNotFound(DefinitionId),
    EntryNotFound(EntryId),
    AlreadyCompleted(EntryId),
    /// The keeper's balance does not cover the reward cost.
    InsufficientPoints { balance: i64, cost: i64 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::RewardNotFound(id) => write!(f, "reward not found: {id}"),
            Self::PunishmentNotFound(id) => write!(f, "punishment not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "log entry not found: {id}"),
            Self::AlreadyCompleted(id) => write!(f, "punishment entry already completed: {id}"),
            Self::InsufficientPoints { balance, cost } => {
                write!(f, "insufficient points: balance {balance} < cost {cost}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Explicitly owned application state with defined mutation entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStore {
    state: LedgerState,
}

impl LedgerStore {
    pub fn new(state: LedgerState) -> Self {
        Self { state }
    }

    /// Store holding the first-write default aggregate.
    pub fn seeded() -> Self {
        Self::new(LedgerState::seed())
    }

    /// Read access for renderers and persistence.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Merges a received snapshot (remote wins per top-level key).
    pub fn apply_snapshot(&mut self, snapshot: LedgerSnapshot) {
        self.state.apply_snapshot(snapshot);
    }

    /// Records an acknowledged save of the given document version.
    pub fn mark_saved(&mut self, version: u64) {
        self.state.version = version;
    }

    pub fn add_habit(&mut self, request: NewHabit) -> StoreResult<DefinitionId> {
        let habit = HabitDefinition::create(request)?;
        let id = habit.id;
        self.state.habits.push(habit);
        Ok(id)
    }

    pub fn add_reward(&mut self, request: NewReward) -> StoreResult<DefinitionId> {
        let reward = RewardDefinition::create(request)?;
        let id = reward.id;
        self.state.rewards.push(reward);
        Ok(id)
    }

    pub fn add_punishment(&mut self, request: NewPunishment) -> StoreResult<DefinitionId> {
        let punishment = PunishmentDefinition::create(request)?;
        let id = punishment.id;
        self.state.punishments.push(punishment);
        Ok(id)
    }

    /// Removes one habit by id. Returns `false` (list unchanged) for an
    /// unknown id.
    pub fn remove_habit(&mut self, id: DefinitionId) -> bool {
        remove_by_id(&mut self.state.habits, |habit| habit.id == id)
    }

    pub fn remove_reward(&mut self, id: DefinitionId) -> bool {
        remove_by_id(&mut self.state.rewards, |reward| reward.id == id)
    }

    pub fn remove_punishment(&mut self, id: DefinitionId) -> bool {
        remove_by_id(&mut self.state.punishments, |punishment| {
            punishment.id == id
        })
    }

    /// Logs a completion of the identified habit: appends one entry and
    /// credits the assignee by the habit's points, in one transform.
    pub fn log_habit(&mut self, id: DefinitionId, now_ms: i64) -> StoreResult<EntryId> {
        let habit = self
            .state
            .habits
            .iter()
            .find(|habit| habit.id == id)
            .ok_or(StoreError::HabitNotFound(id))?;
        let entry = HabitEntry::record(habit, now_ms);
        let entry_id = entry.id;
        self.state.scores.credit(habit.assignee, habit.points);
        self.state.habit_log.push(entry);
        Ok(entry_id)
    }

    /// Redeems the identified reward against the keeper's balance.
    ///
    /// Rejects with `InsufficientPoints` (no state change) when the
    /// balance is below the cost; otherwise debits exactly `cost` and
    /// appends one entry.
    pub fn redeem_reward(&mut self, id: DefinitionId, now_ms: i64) -> StoreResult<EntryId> {
        let reward = self
            .state
            .rewards
            .iter()
            .find(|reward| reward.id == id)
            .ok_or(StoreError::RewardNotFound(id))?;
        let balance = self.state.scores.get(Role::Keeper);
        if balance < reward.cost {
            return Err(StoreError::InsufficientPoints {
                balance,
                cost: reward.cost,
            });
        }
        let entry = RewardEntry::record(reward, now_ms);
        let entry_id = entry.id;
        let cost = reward.cost;
        self.state.scores.credit(Role::Keeper, -cost);
        self.state.reward_log.push(entry);
        Ok(entry_id)
    }

    /// Applies the identified punishment: appends a `Pending` entry,
    /// no score effect.
    pub fn apply_punishment(&mut self, id: DefinitionId, now_ms: i64) -> StoreResult<EntryId> {
        let punishment = self
            .state
            .punishments
            .iter()
            .find(|punishment| punishment.id == id)
            .ok_or(StoreError::PunishmentNotFound(id))?;
        let entry = PunishmentEntry::record(punishment, now_ms);
        let entry_id = entry.id;
        self.state.punishment_log.push(entry);
        Ok(entry_id)
    }

    /// Marks a pending punishment entry completed.
    pub fn complete_punishment(&mut self, entry_id: EntryId) -> StoreResult<()> {
        let entry = self
            .state
            .punishment_log
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or(StoreError::EntryNotFound(entry_id))?;
        if entry.status == PunishmentStatus::Completed {
            return Err(StoreError::AlreadyCompleted(entry_id));
        }
        entry.status = PunishmentStatus::Completed;
        Ok(())
    }

    /// Renames one player. Returns `false` (no-op) when the trimmed new
    /// name is empty or equals the current name.
    pub fn rename_player(&mut self, role: Role, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == self.state.players.get(role) {
            return false;
        }
        self.state.players.set(role, trimmed);
        true
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(matches) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}
