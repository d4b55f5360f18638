//! Habit, reward and punishment definitions.
//!
//! # Responsibility
//! - Define the reusable templates log entries are instantiated from.
//! - Validate user input before a definition enters the aggregate.
//!
//! # Invariants
//! - Every definition carries a client-generated stable `Uuid`.
//! - Required strings are non-empty after trimming; numeric fields are
//!   strictly positive.

use crate::model::role::Role;
use crate::model::schedule::RepeatRule;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit, reward or punishment definition.
pub type DefinitionId = Uuid;

/// Rejected user input for a new definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string field was empty after trimming.
    EmptyField(&'static str),
    /// A numeric field that must be strictly positive was not.
    NonPositive { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn require_positive(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value)
}

/// A recurring chore one player is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: DefinitionId,
    pub description: String,
    pub points: i64,
    pub times_per_week: u32,
    pub assignee: Role,
    pub repeat: RepeatRule,
}

/// User input for a new habit definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub description: String,
    pub points: i64,
    pub times_per_week: u32,
    pub assignee: Role,
    pub repeat: RepeatRule,
}

impl HabitDefinition {
    /// Validates the request and mints a definition with a fresh id.
    pub fn create(request: NewHabit) -> Result<Self, ValidationError> {
        let description = require_text("description", &request.description)?;
        let points = require_positive("points", request.points)?;
        require_positive("times_per_week", i64::from(request.times_per_week))?;
        Ok(Self {
            id: Uuid::new_v4(),
            description,
            points,
            times_per_week: request.times_per_week,
            assignee: request.assignee,
            repeat: request.repeat,
        })
    }
}

/// Something the keeper can spend points on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub id: DefinitionId,
    pub title: String,
    pub cost: i64,
    pub description: String,
}

/// User input for a new reward definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub title: String,
    pub cost: i64,
    pub description: String,
}

impl RewardDefinition {
    pub fn create(request: NewReward) -> Result<Self, ValidationError> {
        let title = require_text("title", &request.title)?;
        let cost = require_positive("cost", request.cost)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            cost,
            description: request.description.trim().to_string(),
        })
    }
}

/// A consequence that can be applied and later marked completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishmentDefinition {
    pub id: DefinitionId,
    pub title: String,
    pub description: String,
}

/// User input for a new punishment definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPunishment {
    pub title: String,
    pub description: String,
}

impl PunishmentDefinition {
    pub fn create(request: NewPunishment) -> Result<Self, ValidationError> {
        let title = require_text("title", &request.title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: request.description.trim().to_string(),
        })
    }
}
