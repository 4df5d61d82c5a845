//! Weekday/month vocabulary and the travel-date parser.

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use std::sync::OnceLock;

/// Output layout: midnight UTC with milliseconds and a literal `Z`.
pub const TRAVEL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Read-only name tables, Monday and January first. Names are stored in
/// their lowercase dictionary form; the capitalised form used at the start of
/// a date line is accepted too. Accents must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLocale {
    weekdays: [&'static str; 7],
    months: [&'static str; 12],
}

impl DateLocale {
    pub const fn french() -> Self {
        Self {
            weekdays: [
                "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
            ],
            months: [
                "janvier",
                "février",
                "mars",
                "avril",
                "mai",
                "juin",
                "juillet",
                "août",
                "septembre",
                "octobre",
                "novembre",
                "décembre",
            ],
        }
    }

    pub fn weekday(&self, token: &str) -> Option<Weekday> {
        self.weekdays
            .iter()
            .position(|name| matches_name(token, name))
            .map(|index| WEEKDAYS[index])
    }

    /// Month number, 1-based.
    pub fn month(&self, token: &str) -> Option<u32> {
        self.months
            .iter()
            .position(|name| matches_name(token, name))
            .and_then(|index| u32::try_from(index + 1).ok())
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        Self::french()
    }
}

fn matches_name(token: &str, name: &str) -> bool {
    if token == name {
        return true;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let capitalised: String = first.to_uppercase().chain(chars).collect();
            token == capitalised
        }
        None => false,
    }
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+) (\d{1,2}) (\S+) (\d{4})$").unwrap())
}

/// Parse `<weekday> <day> <month> <year>` and render it as
/// `YYYY-MM-DD 00:00:00.000Z`. Anything else, including a weekday that
/// disagrees with the calendar, yields an empty string.
pub fn parse_travel_date(value: &str, locale: &DateLocale) -> String {
    to_utc_midnight(value, locale)
        .map(|date| date.format(TRAVEL_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn to_utc_midnight(value: &str, locale: &DateLocale) -> Option<chrono::DateTime<chrono::Utc>> {
    let caps = date_pattern().captures(value)?;
    let weekday = locale.weekday(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let month = locale.month(&caps[3])?;
    let year: i32 = caps[4].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if date.weekday() != weekday {
        tracing::debug!("Weekday mismatch in travel date '{}'", value);
        return None;
    }
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
