use std::fmt::Write as _;

use clap::Args;

use crate::context::AppContext;
use crate::domain::issue::Issue;
use crate::domain::timelog::format_duration;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Key of the issue to show.
    pub key: String,
}

pub async fn run(ctx: &AppContext, args: ShowArgs) -> AppResult<()> {
    let issue = ctx.issue_tracker.get_issue(&args.key).await?;
    print!("{}", render_issue(&issue));
    Ok(())
}

fn render_issue(issue: &Issue) -> String {
    let mut out = format!("{issue}\n");
    if !issue.description.is_empty() {
        let _ = writeln!(out, "\n{}\n", issue.description.trim_end());
    }
    let _ = writeln!(
        out,
        "Estimate: {} original, {} remaining, {} spent",
        format_duration(issue.original_estimate as i64),
        format_duration(issue.remaining_estimate as i64),
        format_duration(issue.time_spent as i64),
    );
    if !issue.files.is_empty() {
        out.push_str("Files:\n");
        for file in &issue.files {
            let _ = writeln!(out, "  {} <{}>", file.name, file.url);
        }
    }
    if !issue.comments.is_empty() {
        out.push_str("Comments:\n");
        for comment in &issue.comments {
            let _ = writeln!(out, "  {comment}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_files_comments_and_estimates() {
        let issue = Issue::from_json(&json!({
            "key": "CORE-2",
            "fields": {
                "summary": "Write the importer",
                "issuetype": {"name": "Task"},
                "timeoriginalestimate": 7200,
                "timespent": 1800,
                "attachment": [{"filename": "plan.md", "content": "https://jira/c/1", "self": "https://jira/a/1"}],
                "comment": {"comments": [{"id": "7", "body": "on it", "author": {"displayName": "Jane"}}]}
            }
        }))
        .unwrap();

        assert_eq!(
            render_issue(&issue),
            "CORE-2 [Task] Write the importer\n\
             Estimate: 2h0m0s original, 0s remaining, 30m0s spent\n\
             Files:\n  plan.md <https://jira/c/1>\n\
             Comments:\n  #7 Jane: on it\n"
        );
    }
}
