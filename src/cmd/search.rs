use clap::Args;

use crate::context::AppContext;
use crate::domain::search::SearchOptions;
use crate::error::AppResult;

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Limit search to open issues.
    #[arg(short, long)]
    pub open: bool,
    /// Limit search to issues in the current sprint.
    #[arg(short = 's', long = "sprint")]
    pub current_sprint: bool,
    /// Limit search to an issue and its subtasks.
    #[arg(short, long)]
    pub issue: Option<String>,
    /// Raw JQL query; takes precedence over every other filter.
    #[arg(short = 'q', long)]
    pub jql: Option<String>,
}

impl SearchArgs {
    fn options(self, project: Option<String>) -> SearchOptions {
        SearchOptions {
            project,
            current_sprint: self.current_sprint,
            open: self.open,
            issue: self.issue,
            jql: self.jql,
        }
    }
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    let options = args.options(ctx.config.project.clone());
    let issues = ctx.issue_tracker.search(&options).await?;
    if issues.is_empty() {
        println!("No issues found.");
    }
    for issue in issues {
        println!("{issue}");
    }
    Ok(())
}
