use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate};
use serde_json::Value;
use tracing::debug;

use crate::domain::DecodeError;
use crate::domain::json_path::{FieldError, array_at, number_at, text_at};

const WORKLOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Time spent on a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLog {
    pub key: String,
    pub seconds: i64,
}

impl TimeLog {
    pub fn new(key: impl Into<String>, seconds: i64) -> Self {
        Self {
            key: key.into(),
            seconds,
        }
    }
}

impl fmt::Display for TimeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.key, format_duration(self.seconds))
    }
}

/// Renders seconds as `1h30m0s`, `2m5s` or `45s`.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogEntry {
    pub author: String,
    pub started: DateTime<FixedOffset>,
    pub seconds: i64,
}

impl WorklogEntry {
    pub fn from_json(entry: &Value) -> Result<Self, FieldError> {
        let author = text_at(entry, "author/name")?;
        let started = text_at(entry, "started")?;
        let started = parse_started(started).ok_or_else(|| FieldError::WrongType {
            path: "started".to_string(),
            expected: "a timestamp",
        })?;
        let seconds = number_at(entry, "timeSpentSeconds")? as i64;
        Ok(Self {
            author: author.to_string(),
            started,
            seconds,
        })
    }
}

fn parse_started(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text, WORKLOG_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
}

/// Decodes the `worklogs` array of a worklog document, skipping bad entries.
pub fn worklogs_from_json(doc: &Value) -> Result<Vec<WorklogEntry>, DecodeError> {
    let entries = array_at(doc, "worklogs").map_err(|source| DecodeError::BadDocument {
        what: "worklog",
        source,
    })?;

    Ok(entries
        .iter()
        .filter_map(|entry| match WorklogEntry::from_json(entry) {
            Ok(worklog) => Some(worklog),
            Err(err) => {
                debug!("skipping worklog entry: {err}");
                None
            }
        })
        .collect())
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    /// The Sunday to Saturday week that contains `day`.
    pub fn week_containing(day: NaiveDate) -> Self {
        let from_sunday = u64::from(day.weekday().num_days_from_sunday());
        let begin = day - Days::new(from_sunday);
        Self {
            begin,
            end: begin + Days::new(6),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.begin <= day && day <= self.end
    }
}

/// Seconds logged per calendar day and issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTimeLog {
    days: BTreeMap<NaiveDate, BTreeMap<String, i64>>,
}

impl DailyTimeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every entry of `issue_key` by `author` (or by anyone when
    /// `author` is `None`) that started inside `period`.
    ///
    /// The calendar day is taken in the entry's own offset.
    pub fn record(
        &mut self,
        issue_key: &str,
        entries: &[WorklogEntry],
        author: Option<&str>,
        period: &Period,
    ) {
        for entry in entries {
            if author.is_some_and(|author| author != entry.author) {
                continue;
            }
            let day = entry.started.date_naive();
            if !period.contains(day) {
                continue;
            }
            *self
                .days
                .entry(day)
                .or_default()
                .entry(issue_key.to_string())
                .or_default() += entry.seconds;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in chronological order, each with its per-issue logs.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, Vec<TimeLog>)> + '_ {
        self.days.iter().map(|(day, logs)| {
            let logs = logs
                .iter()
                .map(|(key, seconds)| TimeLog::new(key.as_str(), *seconds))
                .collect();
            (*day, logs)
        })
    }

    pub fn day_total(&self, day: NaiveDate) -> i64 {
        self.days
            .get(&day)
            .map(|logs| logs.values().sum())
            .unwrap_or_default()
    }

    pub fn total(&self) -> i64 {
        self.days.values().flat_map(BTreeMap::values).sum()
    }
}

impl fmt::Display for DailyTimeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (day, logs) in self.days() {
            writeln!(f, "{day}")?;
            for log in logs {
                writeln!(f, "  {log}")?;
            }
            writeln!(f, "  total : {}", format_duration(self.day_total(day)))?;
        }
        Ok(())
    }
}
