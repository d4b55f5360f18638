//! Markup fragment renderers.
//!
//! Each function is a pure map from `&LedgerState` to one HTML fragment.
//! Sections are fully regenerated on every call; logs render a fixed
//! tail sorted by timestamp descending.

use crate::model::entry::PunishmentStatus;
use crate::model::ledger::LedgerState;
use crate::model::role::Role;
use std::fmt::Write as _;

/// Rendered habit log tail length.
pub const HABIT_LOG_TAIL: usize = 10;
/// Rendered reward log tail length.
pub const REWARD_LOG_TAIL: usize = 5;
/// Rendered punishment log tail length.
pub const PUNISHMENT_LOG_TAIL: usize = 5;

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Newest-first tail of `items` ordered by the extracted timestamp.
fn log_tail<'a, T>(items: &'a [T], timestamp: impl Fn(&T) -> i64, cap: usize) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(timestamp(item)));
    sorted.truncate(cap);
    sorted
}

/// Scoreboard: both display names and balances.
pub fn render_scoreboard(state: &LedgerState) -> String {
    let mut out = String::from("<section class=\"scoreboard\">");
    for role in Role::ALL {
        let _ = write!(
            out,
            "<div class=\"score\" data-role=\"{}\"><span class=\"name\">{}</span><span class=\"points\">{}</span></div>",
            role.keyword(),
            escape_html(state.players.get(role)),
            state.scores.get(role)
        );
    }
    out.push_str("</section>");
    out
}

pub fn render_habit_list(state: &LedgerState) -> String {
    let mut out = String::from("<ul class=\"habits\">");
    for habit in &state.habits {
        let _ = write!(
            out,
            "<li data-id=\"{}\">{} ({} pts, {}x/week, {})</li>",
            habit.id,
            escape_html(&habit.description),
            habit.points,
            habit.times_per_week,
            habit.assignee.keyword()
        );
    }
    out.push_str("</ul>");
    out
}

pub fn render_reward_list(state: &LedgerState) -> String {
    let mut out = String::from("<ul class=\"rewards\">");
    for reward in &state.rewards {
        let _ = write!(
            out,
            "<li data-id=\"{}\">{} ({} pts)</li>",
            reward.id,
            escape_html(&reward.title),
            reward.cost
        );
    }
    out.push_str("</ul>");
    out
}

pub fn render_punishment_list(state: &LedgerState) -> String {
    let mut out = String::from("<ul class=\"punishments\">");
    for punishment in &state.punishments {
        let _ = write!(
            out,
            "<li data-id=\"{}\">{}</li>",
            punishment.id,
            escape_html(&punishment.title)
        );
    }
    out.push_str("</ul>");
    out
}

pub fn render_habit_log(state: &LedgerState) -> String {
    let mut out = String::from("<ol class=\"habit-log\">");
    for entry in log_tail(&state.habit_log, |entry| entry.logged_at_ms, HABIT_LOG_TAIL) {
        let _ = write!(
            out,
            "<li data-ts=\"{}\">{} (+{} to {})</li>",
            entry.logged_at_ms,
            escape_html(&entry.description),
            entry.points,
            entry.assignee.keyword()
        );
    }
    out.push_str("</ol>");
    out
}

pub fn render_reward_log(state: &LedgerState) -> String {
    let mut out = String::from("<ol class=\"reward-log\">");
    for entry in log_tail(&state.reward_log, |entry| entry.logged_at_ms, REWARD_LOG_TAIL) {
        let _ = write!(
            out,
            "<li data-ts=\"{}\">{} (-{})</li>",
            entry.logged_at_ms,
            escape_html(&entry.reward_title),
            entry.cost
        );
    }
    out.push_str("</ol>");
    out
}

pub fn render_punishment_log(state: &LedgerState) -> String {
    let mut out = String::from("<ol class=\"punishment-log\">");
    for entry in log_tail(
        &state.punishment_log,
        |entry| entry.logged_at_ms,
        PUNISHMENT_LOG_TAIL,
    ) {
        let status = match entry.status {
            PunishmentStatus::Pending => "pending",
            PunishmentStatus::Completed => "completed",
        };
        let _ = write!(
            out,
            "<li data-ts=\"{}\" data-status=\"{status}\">{}</li>",
            entry.logged_at_ms,
            escape_html(&entry.title)
        );
    }
    out.push_str("</ol>");
    out
}

/// Every section concatenated, the way the page re-renders after any
/// mutation or snapshot.
pub fn render_dashboard(state: &LedgerState) -> String {
    [
        render_scoreboard(state),
        render_habit_list(state),
        render_reward_list(state),
        render_punishment_list(state),
        render_habit_log(state),
        render_reward_log(state),
        render_punishment_log(state),
    ]
    .concat()
}
