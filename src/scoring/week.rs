use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// ISO-8601 week identifier, rendered as `YYYY-Www` (e.g. `2026-W06`).
///
/// Formulas are activated per ISO week, so the key orders by ISO year
/// first and week number second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Option<Self> {
        if (1..=53).contains(&week) {
            Some(Self { year, week })
        } else {
            None
        }
    }

    /// Week containing `date`, per the ISO week-date calendar.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid week key '{0}': expected YYYY-Www")]
pub struct WeekKeyParseError(String);

impl FromStr for WeekKey {
    type Err = WeekKeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (year_part, week_part) = trimmed
            .split_once("-W")
            .ok_or_else(|| WeekKeyParseError(raw.to_owned()))?;
        let year = year_part
            .parse::<i32>()
            .map_err(|_| WeekKeyParseError(raw.to_owned()))?;
        let week = week_part
            .parse::<u32>()
            .map_err(|_| WeekKeyParseError(raw.to_owned()))?;
        Self::new(year, week).ok_or_else(|| WeekKeyParseError(raw.to_owned()))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_iso_week_from_date() {
        // 2026-01-01 falls in ISO week 1 of 2026.
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
        assert_eq!(WeekKey::from_date(date).to_string(), "2026-W01");

        // 2023-01-01 is a Sunday and belongs to ISO week 52 of 2022.
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
        assert_eq!(WeekKey::from_date(date).to_string(), "2022-W52");
    }

    #[test]
    fn parses_and_round_trips() {
        let key: WeekKey = "2026-W06".parse().expect("parses");
        assert_eq!(key.year(), 2026);
        assert_eq!(key.week(), 6);
        assert_eq!(key.to_string(), "2026-W06");

        assert!("2026-06".parse::<WeekKey>().is_err());
        assert!("2026-W54".parse::<WeekKey>().is_err());
    }

    #[test]
    fn orders_by_year_then_week() {
        let earlier: WeekKey = "2025-W52".parse().expect("parses");
        let later: WeekKey = "2026-W01".parse().expect("parses");
        assert!(earlier < later);
    }
}
