//! Pure presentation helpers.
//!
//! # Responsibility
//! - Turn the aggregate into markup fragments, one per dashboard
//!   section, with no side effects and no diffing.

mod render;

pub use render::{
    render_dashboard, render_habit_list, render_habit_log, render_punishment_list,
    render_punishment_log, render_reward_list, render_reward_log, render_scoreboard,
    HABIT_LOG_TAIL, PUNISHMENT_LOG_TAIL, REWARD_LOG_TAIL,
};
