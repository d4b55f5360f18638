//! The two fixed player roles and their per-role records.
//!
//! # Invariants
//! - `Role` has exactly two variants and no other role is ever introduced.
//! - Scores are plain signed integers; balances may go negative.

use serde::{Deserialize, Serialize};

/// One of the two fixed household roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Keeper,
    Nightingale,
}

impl Role {
    /// Both roles, in canonical order.
    pub const ALL: [Role; 2] = [Role::Keeper, Role::Nightingale];

    /// Stable lowercase keyword used in wire payloads and UI wiring.
    pub fn keyword(self) -> &'static str {
        match self {
            Role::Keeper => "keeper",
            Role::Nightingale => "nightingale",
        }
    }

    /// Parses the stable keyword back into a role.
    pub fn from_keyword(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keeper" => Some(Role::Keeper),
            "nightingale" => Some(Role::Nightingale),
            _ => None,
        }
    }
}

/// Display names for both roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    pub keeper: String,
    pub nightingale: String,
}

impl PlayerNames {
    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Keeper => &self.keeper,
            Role::Nightingale => &self.nightingale,
        }
    }

    pub fn set(&mut self, role: Role, name: impl Into<String>) {
        match role {
            Role::Keeper => self.keeper = name.into(),
            Role::Nightingale => self.nightingale = name.into(),
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            keeper: "Keeper".to_string(),
            nightingale: "Nightingale".to_string(),
        }
    }
}

/// Point balances for both roles. No floor is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub keeper: i64,
    pub nightingale: i64,
}

impl Scores {
    pub fn get(&self, role: Role) -> i64 {
        match role {
            Role::Keeper => self.keeper,
            Role::Nightingale => self.nightingale,
        }
    }

    /// Adds `points` to one role's balance. Negative deltas are debits.
    pub fn credit(&mut self, role: Role, points: i64) {
        match role {
            Role::Keeper => self.keeper += points,
            Role::Nightingale => self.nightingale += points,
        }
    }
}
