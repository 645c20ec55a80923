use clap::Args;

use crate::context::AppContext;
use crate::domain::task::NewTask;
use crate::error::AppResult;
use crate::workflow::create::create_task;

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Friendly issue type name, e.g. `task` or `sub-task`.
    pub task_type: String,
    /// Summary of the new issue.
    #[arg(required = true, num_args = 1..)]
    pub summary: Vec<String>,
    /// Parent of the task you're creating.
    #[arg(short, long)]
    pub parent: Option<String>,
    /// Your original estimate of the story, e.g. `2h` or `1d 4h`.
    #[arg(short, long)]
    pub estimate: Option<String>,
}

impl CreateArgs {
    fn into_task(self) -> NewTask {
        NewTask {
            task_type: self.task_type,
            summary: self.summary.join(" "),
            original_estimate: self.estimate,
            parent: self.parent,
        }
    }
}

pub async fn run(ctx: &AppContext, args: CreateArgs) -> AppResult<()> {
    let created = create_task(ctx, args.into_task()).await?;
    println!("{} successfully created!", created.key);
    Ok(())
}
