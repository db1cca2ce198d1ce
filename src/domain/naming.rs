use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::errors::{LedgerError, LedgerResult};

/// `DD.MM.YYYY` with any single non-digit separator.
static DATE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\D(\d{1,2})\D(\d{4})$").expect("date name pattern is valid")
});

pub const NAME_FORMAT: &str = "%d-%m-%Y";

/// Canonical game name plus the date it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub date: NaiveDateTime,
}

pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let caps = DATE_NAME.captures(text.trim())?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The stored form of a name that reads as a day.
pub fn canonical_name(text: &str) -> Option<String> {
    parse_day(text).map(|day| day.format(NAME_FORMAT).to_string())
}

/// Resolve the name and date of a game.
///
/// A supplied name wins over a supplied date; both must read as a day. With
/// neither, the game is named after `now`.
pub fn resolve_name(
    name: Option<&str>,
    date: Option<&str>,
    now: NaiveDateTime,
) -> LedgerResult<ResolvedName> {
    let supplied = name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| date.map(str::trim).filter(|s| !s.is_empty()));

    let Some(text) = supplied else {
        return Ok(ResolvedName {
            name: now.format(NAME_FORMAT).to_string(),
            date: now,
        });
    };

    let day = parse_day(text).ok_or_else(|| {
        LedgerError::validation(format!("game name '{text}' is not a DD.MM.YYYY date"))
    })?;

    Ok(ResolvedName {
        name: day.format(NAME_FORMAT).to_string(),
        date: day.and_time(chrono::NaiveTime::MIN),
    })
}
