use tracing::warn;

use crate::domain::search::SearchOptions;
use crate::domain::timelog::{DailyTimeLog, Period};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

/// What to report time for: every issue of `project` updated inside
/// `period`, or only `issue` when set.
#[derive(Debug, Clone)]
pub struct TimeLogQuery {
    pub author: Option<String>,
    pub period: Period,
    pub project: Option<String>,
    pub issue: Option<String>,
}

impl TimeLogQuery {
    pub fn jql(&self) -> String {
        let mut jql = format!(
            "timespent > 0 AND updated >= '{}' AND updated <= '{}'",
            self.period.begin.format("%Y-%m-%d"),
            self.period.end.format("%Y-%m-%d"),
        );
        if let Some(project) = &self.project {
            jql.push_str(&format!(" AND project = '{project}'"));
        }
        if let Some(issue) = &self.issue {
            jql.push_str(&format!(" AND key = '{issue}'"));
        }
        jql
    }
}

/// Sums the worklogs of every matching issue per calendar day.
///
/// An issue whose worklog cannot be fetched is reported and left out.
pub async fn collect_time_log(
    tracker: &dyn IssueTrackerService,
    query: &TimeLogQuery,
) -> AppResult<DailyTimeLog> {
    let issues = tracker.search(&SearchOptions::raw(query.jql())).await?;

    let mut log = DailyTimeLog::new();
    for issue in &issues {
        match tracker.get_worklogs(&issue.key).await {
            Ok(entries) => log.record(&issue.key, &entries, query.author.as_deref(), &query.period),
            Err(err) => warn!("skipping worklog of {}: {err}", issue.key),
        }
    }
    Ok(log)
}

pub async fn log_work(
    tracker: &dyn IssueTrackerService,
    key: &str,
    time_spent: &str,
) -> AppResult<()> {
    let time_spent = time_spent.trim();
    if time_spent.is_empty() {
        return Err(AppError::IssueTracker(
            "time spent must not be empty".to_string(),
        ));
    }
    tracker.add_worklog(key, time_spent).await
}
