//! Static example content used to pre-fill the definition forms.
//!
//! No behavior beyond conversion into the `New*` request types.

use crate::model::definition::{NewHabit, NewPunishment, NewReward};
use crate::model::role::Role;
use crate::model::schedule::RepeatRule;
use chrono::Weekday;

struct HabitTemplate {
    description: &'static str,
    points: i64,
    times_per_week: u32,
    assignee: Role,
    repeat: RepeatRule,
}

struct RewardTemplate {
    title: &'static str,
    cost: i64,
    description: &'static str,
}

struct PunishmentTemplate {
    title: &'static str,
    description: &'static str,
}

const HABIT_TEMPLATES: &[HabitTemplate] = &[
    HabitTemplate {
        description: "Make the bed before leaving",
        points: 5,
        times_per_week: 7,
        assignee: Role::Keeper,
        repeat: RepeatRule::Daily,
    },
    HabitTemplate {
        description: "Water the balcony plants",
        points: 10,
        times_per_week: 2,
        assignee: Role::Nightingale,
        repeat: RepeatRule::Weekly(Weekday::Wed),
    },
    HabitTemplate {
        description: "Deep-clean the kitchen",
        points: 25,
        times_per_week: 1,
        assignee: Role::Keeper,
        repeat: RepeatRule::Monthly(1),
    },
];

const REWARD_TEMPLATES: &[RewardTemplate] = &[
    RewardTemplate {
        title: "Movie night pick",
        cost: 50,
        description: "Choose the film, no veto allowed",
    },
    RewardTemplate {
        title: "Breakfast in bed",
        cost: 80,
        description: "Served before 9am on a weekend",
    },
];

const PUNISHMENT_TEMPLATES: &[PunishmentTemplate] = &[
    PunishmentTemplate {
        title: "Dish duty",
        description: "All dishes for three days",
    },
    PunishmentTemplate {
        title: "Laundry run",
        description: "Wash, dry and fold one full load",
    },
];

/// Example habit requests for form pre-fill.
pub fn example_habits() -> Vec<NewHabit> {
    HABIT_TEMPLATES
        .iter()
        .map(|template| NewHabit {
            description: template.description.to_string(),
            points: template.points,
            times_per_week: template.times_per_week,
            assignee: template.assignee,
            repeat: template.repeat.clone(),
        })
        .collect()
}

/// Example reward requests for form pre-fill.
pub fn example_rewards() -> Vec<NewReward> {
    REWARD_TEMPLATES
        .iter()
        .map(|template| NewReward {
            title: template.title.to_string(),
            cost: template.cost,
            description: template.description.to_string(),
        })
        .collect()
}

/// Example punishment requests for form pre-fill.
pub fn example_punishments() -> Vec<NewPunishment> {
    PUNISHMENT_TEMPLATES
        .iter()
        .map(|template| NewPunishment {
            title: template.title.to_string(),
            description: template.description.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{example_habits, example_punishments, example_rewards};
    use crate::model::definition::{HabitDefinition, PunishmentDefinition, RewardDefinition};

    #[test]
    fn every_template_passes_validation() {
        for request in example_habits() {
            HabitDefinition::create(request).unwrap();
        }
        for request in example_rewards() {
            RewardDefinition::create(request).unwrap();
        }
        for request in example_punishments() {
            PunishmentDefinition::create(request).unwrap();
        }
    }
}
