use chrono::{Local, NaiveDate};
use clap::Args;

use crate::context::AppContext;
use crate::domain::timelog::{Period, format_duration};
use crate::error::{AppError, AppResult};
use crate::workflow::timelog::{TimeLogQuery, collect_time_log, log_work};

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Show my log for the reported period.
    #[arg(short = 'm', long = "mine")]
    pub mine: bool,
    /// Show the log of the given author.
    #[arg(short, long)]
    pub author: Option<String>,
    /// First day of the reported period (defaults to this week's Sunday).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the reported period (defaults to this week's Saturday).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Issue to report on, or to log time against.
    pub issue: Option<String>,
    /// Time spent, e.g. `1h 30m`; logs work instead of reporting.
    pub time_spent: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum LogMode {
    Report { issue: Option<String> },
    Record { issue: String, time_spent: String },
}

impl LogArgs {
    fn mode(&self) -> LogMode {
        match &self.issue {
            Some(issue) if !self.mine && !self.time_spent.is_empty() => LogMode::Record {
                issue: issue.clone(),
                time_spent: self.time_spent.join(" "),
            },
            issue => LogMode::Report {
                issue: issue.clone(),
            },
        }
    }

    fn author(&self, user: Option<&str>) -> Option<String> {
        self.author
            .clone()
            .or_else(|| self.mine.then(|| user.map(str::to_string)).flatten())
    }

    fn period(&self, today: NaiveDate) -> AppResult<Period> {
        let week = Period::week_containing(today);
        let period = Period::new(self.from.unwrap_or(week.begin), self.to.unwrap_or(week.end));
        if period.begin > period.end {
            return Err(AppError::Configuration(format!(
                "period starts after it ends ({} > {})",
                period.begin, period.end
            )));
        }
        Ok(period)
    }
}

pub async fn run(ctx: &AppContext, args: LogArgs) -> AppResult<()> {
    match args.mode() {
        LogMode::Record { issue, time_spent } => {
            log_work(ctx.issue_tracker.as_ref(), &issue, &time_spent).await?;
            println!("Logged {time_spent} on {issue}.");
        }
        LogMode::Report { issue } => {
            let query = TimeLogQuery {
                author: args.author(ctx.config.user.as_deref()),
                period: args.period(Local::now().date_naive())?,
                project: ctx.config.project.clone(),
                issue,
            };
            let log = collect_time_log(ctx.issue_tracker.as_ref(), &query).await?;
            if log.is_empty() {
                println!(
                    "No time logged between {} and {}.",
                    query.period.begin, query.period.end
                );
            } else {
                print!("{log}");
                println!("Total : {}", format_duration(log.total()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reports_without_time_spent() {
        let args = LogArgs {
            issue: Some("CORE-1".to_string()),
            ..LogArgs::default()
        };
        assert_eq!(
            args.mode(),
            LogMode::Report {
                issue: Some("CORE-1".to_string())
            }
        );
        assert_eq!(LogArgs::default().mode(), LogMode::Report { issue: None });
    }

    #[test]
    fn records_when_time_spent_is_given() {
        let args = LogArgs {
            issue: Some("CORE-1".to_string()),
            time_spent: vec!["1h".to_string(), "30m".to_string()],
            ..LogArgs::default()
        };
        assert_eq!(
            args.mode(),
            LogMode::Record {
                issue: "CORE-1".to_string(),
                time_spent: "1h 30m".to_string()
            }
        );
    }

    #[test]
    fn mine_forces_a_report() {
        let args = LogArgs {
            mine: true,
            issue: Some("CORE-1".to_string()),
            time_spent: vec!["1h".to_string()],
            ..LogArgs::default()
        };
        assert!(matches!(args.mode(), LogMode::Report { .. }));
    }

    #[test]
    fn picks_the_author() {
        let mine = LogArgs {
            mine: true,
            ..LogArgs::default()
        };
        assert_eq!(mine.author(Some("jdoe")).as_deref(), Some("jdoe"));

        let explicit = LogArgs {
            mine: true,
            author: Some("asmith".to_string()),
            ..LogArgs::default()
        };
        assert_eq!(explicit.author(Some("jdoe")).as_deref(), Some("asmith"));

        assert_eq!(LogArgs::default().author(Some("jdoe")), None);
    }

    #[test]
    fn defaults_to_the_current_week() {
        let period = LogArgs::default().period(date(2013, 11, 13)).unwrap();
        assert_eq!(period, Period::new(date(2013, 11, 10), date(2013, 11, 16)));

        let custom = LogArgs {
            from: Some(date(2013, 11, 1)),
            ..LogArgs::default()
        };
        assert_eq!(
            custom.period(date(2013, 11, 13)).unwrap().begin,
            date(2013, 11, 1)
        );

        let inverted = LogArgs {
            from: Some(date(2013, 11, 20)),
            ..LogArgs::default()
        };
        assert!(inverted.period(date(2013, 11, 13)).is_err());
    }
}
