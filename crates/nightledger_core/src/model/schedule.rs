//! Habit repeat rules and the due-date predicate.
//!
//! # Responsibility
//! - Decide whether a habit is actionable on a given calendar date.
//! - Tolerate unrecognized repeat values from older documents.
//!
//! # Invariants
//! - `is_due_on` is a pure function of (rule, date, completion flag).
//! - Unrecognized repeat modes are never due.
//! - Deserialization never fails: any unrecognized shape becomes `Other`.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// When a habit should be presented as actionable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatRule {
    /// One-shot: due until completed once.
    Once,
    /// Due every day.
    Daily,
    /// Due on one fixed weekday.
    Weekly(Weekday),
    /// Due on one fixed day of the month (1..=31).
    Monthly(u8),
    /// Due on any weekday in the set.
    Days(Vec<Weekday>),
    /// Unrecognized repeat value carried through untouched. Never due.
    Other(String),
}

impl RepeatRule {
    /// Returns whether a habit with this rule is due on `date`.
    ///
    /// `already_completed` only matters for `Once`, which stops being due
    /// after its first completion.
    pub fn is_due_on(&self, date: NaiveDate, already_completed: bool) -> bool {
        match self {
            RepeatRule::Once => !already_completed,
            RepeatRule::Daily => true,
            RepeatRule::Weekly(weekday) => date.weekday() == *weekday,
            RepeatRule::Monthly(day) => date.day() == u32::from(*day),
            RepeatRule::Days(weekdays) => weekdays.contains(&date.weekday()),
            RepeatRule::Other(_) => false,
        }
    }
}

/// Stable lowercase keyword for one weekday (`mon`..`sun`).
pub fn weekday_keyword(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Failed parse of the compact text form used by UI wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRepeatError {
    UnknownWeekday(String),
    DayOutOfRange(String),
    Unrecognized(String),
}

impl Display for ParseRepeatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWeekday(value) => write!(f, "unknown weekday `{value}`"),
            Self::DayOutOfRange(value) => {
                write!(f, "day of month `{value}` must be within 1..=31")
            }
            Self::Unrecognized(value) => write!(f, "unrecognized repeat `{value}`"),
        }
    }
}

impl Error for ParseRepeatError {}

impl RepeatRule {
    /// Parses the compact text form accepted from UI input: `none`,
    /// `daily`, `weekly:<weekday>`, `monthly:<1..=31>`, a single weekday
    /// keyword, or a comma-separated weekday set. Unlike wire
    /// deserialization this rejects unrecognized input instead of
    /// degrading to `Other`.
    pub fn parse(input: &str) -> Result<Self, ParseRepeatError> {
        let normalized = input.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "none" => return Ok(RepeatRule::Once),
            "daily" => return Ok(RepeatRule::Daily),
            _ => {}
        }

        if let Some(day) = normalized.strip_prefix("weekly:") {
            let weekday = day
                .trim()
                .parse::<Weekday>()
                .map_err(|_| ParseRepeatError::UnknownWeekday(day.trim().to_string()))?;
            return Ok(RepeatRule::Weekly(weekday));
        }

        if let Some(day) = normalized.strip_prefix("monthly:") {
            let day = day.trim();
            let parsed = day
                .parse::<u8>()
                .map_err(|_| ParseRepeatError::DayOutOfRange(day.to_string()))?;
            if !(1..=31).contains(&parsed) {
                return Err(ParseRepeatError::DayOutOfRange(day.to_string()));
            }
            return Ok(RepeatRule::Monthly(parsed));
        }

        let mut weekdays = Vec::new();
        for part in normalized.split(',') {
            let part = part.trim();
            let weekday = part
                .parse::<Weekday>()
                .map_err(|_| ParseRepeatError::Unrecognized(input.trim().to_string()))?;
            weekdays.push(weekday);
        }
        if weekdays.len() == 1 {
            Ok(RepeatRule::Weekly(weekdays[0]))
        } else {
            Ok(RepeatRule::Days(weekdays))
        }
    }

    // Wire shape: `"none"` / `"daily"`, `{"weekly": "<weekday>"}`,
    // `{"monthly": <1..=31>}`, or a bare array of weekday keywords.
    // Anything else collapses to `Other` so one odd repeat value can
    // never fail a whole document decode.
    fn from_wire(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "none" => RepeatRule::Once,
                "daily" => RepeatRule::Daily,
                _ => RepeatRule::Other(text),
            },
            // Entries that are not parseable weekday strings are dropped;
            // an emptied set simply never matches.
            Value::Array(entries) => RepeatRule::Days(
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|entry| entry.parse::<Weekday>().ok())
                    .collect(),
            ),
            Value::Object(ref fields) if fields.len() == 1 => {
                if let Some(weekday) = fields
                    .get("weekly")
                    .and_then(Value::as_str)
                    .and_then(|day| day.parse::<Weekday>().ok())
                {
                    return RepeatRule::Weekly(weekday);
                }
                if let Some(day) = fields
                    .get("monthly")
                    .and_then(Value::as_u64)
                    .filter(|day| (1..=31).contains(day))
                {
                    return RepeatRule::Monthly(day as u8);
                }
                RepeatRule::Other(value.to_string())
            }
            other => RepeatRule::Other(other.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum RepeatRepr {
    Scheduled(ScheduledRepr),
    Days(Vec<String>),
    Keyword(String),
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ScheduledRepr {
    Weekly(String),
    Monthly(u8),
}

impl Serialize for RepeatRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            RepeatRule::Once => RepeatRepr::Keyword("none".to_string()),
            RepeatRule::Daily => RepeatRepr::Keyword("daily".to_string()),
            RepeatRule::Weekly(weekday) => {
                RepeatRepr::Scheduled(ScheduledRepr::Weekly(weekday_keyword(*weekday).to_string()))
            }
            RepeatRule::Monthly(day) => RepeatRepr::Scheduled(ScheduledRepr::Monthly(*day)),
            RepeatRule::Days(weekdays) => RepeatRepr::Days(
                weekdays
                    .iter()
                    .map(|weekday| weekday_keyword(*weekday).to_string())
                    .collect(),
            ),
            RepeatRule::Other(value) => RepeatRepr::Keyword(value.clone()),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RepeatRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(RepeatRule::from_wire(value))
    }
}

#[cfg(test)]
mod tests {
    use super::RepeatRule;
    use chrono::{NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn once_is_due_until_completed() {
        let rule = RepeatRule::Once;
        assert!(rule.is_due_on(date(2026, 8, 25), false));
        assert!(!rule.is_due_on(date(2026, 8, 25), true));
    }

    #[test]
    fn daily_is_always_due() {
        let rule = RepeatRule::Daily;
        assert!(rule.is_due_on(date(2026, 8, 25), false));
        assert!(rule.is_due_on(date(2026, 8, 26), true));
    }

    #[test]
    fn weekly_matches_only_its_weekday() {
        // 2026-08-25 is a Tuesday.
        let rule = RepeatRule::Weekly(Weekday::Tue);
        assert!(rule.is_due_on(date(2026, 8, 25), false));
        assert!(!rule.is_due_on(date(2026, 8, 26), false));
    }

    #[test]
    fn monthly_matches_only_its_day() {
        let rule = RepeatRule::Monthly(25);
        assert!(rule.is_due_on(date(2026, 8, 25), false));
        assert!(!rule.is_due_on(date(2026, 8, 24), false));
    }

    #[test]
    fn weekday_set_matches_members_only() {
        let rule = RepeatRule::Days(vec![Weekday::Mon, Weekday::Wed]);
        assert!(rule.is_due_on(date(2026, 8, 24), false)); // Monday
        assert!(!rule.is_due_on(date(2026, 8, 25), false)); // Tuesday
    }

    #[test]
    fn unrecognized_mode_is_never_due() {
        let rule = RepeatRule::Other("fortnightly".to_string());
        assert!(!rule.is_due_on(date(2026, 8, 25), false));
        assert!(!rule.is_due_on(date(2026, 8, 26), true));
    }

    #[test]
    fn wire_roundtrip_covers_every_shape() {
        let rules = [
            RepeatRule::Once,
            RepeatRule::Daily,
            RepeatRule::Weekly(Weekday::Fri),
            RepeatRule::Monthly(14),
            RepeatRule::Days(vec![Weekday::Sat, Weekday::Sun]),
            RepeatRule::Other("fortnightly".to_string()),
        ];
        for rule in rules {
            let json = serde_json::to_string(&rule).unwrap();
            let decoded: RepeatRule = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, rule, "mismatch for {json}");
        }
    }

    #[test]
    fn unknown_keyword_deserializes_as_other() {
        let decoded: RepeatRule = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(decoded, RepeatRule::Other("yearly".to_string()));
    }

    #[test]
    fn weekday_array_drops_unparseable_entries() {
        let decoded: RepeatRule = serde_json::from_str(r#"["mon", "smarch", "fri"]"#).unwrap();
        assert_eq!(decoded, RepeatRule::Days(vec![Weekday::Mon, Weekday::Fri]));
    }

    #[test]
    fn out_of_range_or_unknown_scheduled_values_fall_back_to_other() {
        let decoded: RepeatRule = serde_json::from_str(r#"{"monthly": 32}"#).unwrap();
        assert_eq!(decoded, RepeatRule::Other(r#"{"monthly":32}"#.to_string()));

        let decoded: RepeatRule = serde_json::from_str(r#"{"weekly": "notaday"}"#).unwrap();
        assert_eq!(decoded, RepeatRule::Other(r#"{"weekly":"notaday"}"#.to_string()));
        assert!(!decoded.is_due_on(date(2026, 8, 25), false));
    }

    #[test]
    fn unknown_shapes_fall_back_to_other_instead_of_failing() {
        let decoded: RepeatRule = serde_json::from_str(r#"{"every_n_days": 3}"#).unwrap();
        assert_eq!(decoded, RepeatRule::Other(r#"{"every_n_days":3}"#.to_string()));

        let decoded: RepeatRule = serde_json::from_str("7").unwrap();
        assert_eq!(decoded, RepeatRule::Other("7".to_string()));
        assert!(!decoded.is_due_on(date(2026, 8, 25), false));
    }

    #[test]
    fn parse_accepts_the_documented_text_forms() {
        assert_eq!(RepeatRule::parse(""), Ok(RepeatRule::Once));
        assert_eq!(RepeatRule::parse(" none "), Ok(RepeatRule::Once));
        assert_eq!(RepeatRule::parse("Daily"), Ok(RepeatRule::Daily));
        assert_eq!(
            RepeatRule::parse("weekly:fri"),
            Ok(RepeatRule::Weekly(Weekday::Fri))
        );
        assert_eq!(
            RepeatRule::parse("monthly:14"),
            Ok(RepeatRule::Monthly(14))
        );
        assert_eq!(
            RepeatRule::parse("sat"),
            Ok(RepeatRule::Weekly(Weekday::Sat))
        );
        assert_eq!(
            RepeatRule::parse("mon, wed"),
            Ok(RepeatRule::Days(vec![Weekday::Mon, Weekday::Wed]))
        );
    }

    #[test]
    fn parse_rejects_unrecognized_input() {
        use super::ParseRepeatError;

        assert_eq!(
            RepeatRule::parse("weekly:notaday"),
            Err(ParseRepeatError::UnknownWeekday("notaday".to_string()))
        );
        assert_eq!(
            RepeatRule::parse("monthly:32"),
            Err(ParseRepeatError::DayOutOfRange("32".to_string()))
        );
        assert_eq!(
            RepeatRule::parse("fortnightly"),
            Err(ParseRepeatError::Unrecognized("fortnightly".to_string()))
        );
    }
}
