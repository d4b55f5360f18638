//! Immutable log entries.
//!
//! # Responsibility
//! - Record one occurrence of a habit completion, reward redemption or
//!   punishment application.
//!
//! # Invariants
//! - Entries copy the descriptive fields of their definition at creation
//!   time; later definition edits never rewrite them.
//! - `logged_at_ms` is epoch milliseconds at creation.

use crate::model::definition::{
    DefinitionId, HabitDefinition, PunishmentDefinition, RewardDefinition,
};
use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a log entry.
pub type EntryId = Uuid;

/// One completed habit occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: EntryId,
    pub habit_id: DefinitionId,
    pub description: String,
    pub points: i64,
    pub assignee: Role,
    pub logged_at_ms: i64,
}

impl HabitEntry {
    /// Snapshots the habit's descriptive fields into a new entry.
    pub fn record(habit: &HabitDefinition, logged_at_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id: habit.id,
            description: habit.description.clone(),
            points: habit.points,
            assignee: habit.assignee,
            logged_at_ms,
        }
    }
}

/// One reward redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub id: EntryId,
    pub reward_id: DefinitionId,
    pub reward_title: String,
    pub cost: i64,
    pub logged_at_ms: i64,
}

impl RewardEntry {
    pub fn record(reward: &RewardDefinition, logged_at_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            reward_id: reward.id,
            reward_title: reward.title.clone(),
            cost: reward.cost,
            logged_at_ms,
        }
    }
}

/// Lifecycle state of an applied punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunishmentStatus {
    Pending,
    Completed,
}

/// One applied punishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishmentEntry {
    pub id: EntryId,
    pub punishment_id: DefinitionId,
    pub title: String,
    pub description: String,
    pub status: PunishmentStatus,
    pub logged_at_ms: i64,
}

impl PunishmentEntry {
    /// New entries always start out `Pending`.
    pub fn record(punishment: &PunishmentDefinition, logged_at_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            punishment_id: punishment.id,
            title: punishment.title.clone(),
            description: punishment.description.clone(),
            status: PunishmentStatus::Pending,
            logged_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HabitEntry, PunishmentEntry, PunishmentStatus, RewardEntry};
    use crate::model::definition::{HabitDefinition, PunishmentDefinition, RewardDefinition};
    use crate::model::role::Role;
    use crate::model::schedule::RepeatRule;
    use uuid::Uuid;

    #[test]
    fn habit_entry_copies_definition_fields() {
        let habit = HabitDefinition {
            id: Uuid::new_v4(),
            description: "sweep the porch".to_string(),
            points: 7,
            times_per_week: 2,
            assignee: Role::Keeper,
            repeat: RepeatRule::Daily,
        };
        let entry = HabitEntry::record(&habit, 1_700_000_000_000);
        assert_eq!(entry.habit_id, habit.id);
        assert_eq!(entry.description, "sweep the porch");
        assert_eq!(entry.points, 7);
        assert_eq!(entry.assignee, Role::Keeper);
        assert_eq!(entry.logged_at_ms, 1_700_000_000_000);
        assert_ne!(entry.id, habit.id);
    }

    #[test]
    fn reward_entry_uses_wire_field_names() {
        let reward = RewardDefinition {
            id: Uuid::new_v4(),
            title: "X".to_string(),
            cost: 50,
            description: String::new(),
        };
        let entry = RewardEntry::record(&reward, 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["reward_title"], "X");
        assert_eq!(json["cost"], 50);
    }

    #[test]
    fn punishment_entry_starts_pending() {
        let punishment = PunishmentDefinition {
            id: Uuid::new_v4(),
            title: "dish duty".to_string(),
            description: String::new(),
        };
        let entry = PunishmentEntry::record(&punishment, 1);
        assert_eq!(entry.status, PunishmentStatus::Pending);
    }
}
