use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommentCommand {
    /// Post a comment on an issue.
    Add {
        key: String,
        #[arg(required = true, num_args = 1..)]
        body: Vec<String>,
    },
    /// Delete a comment by id.
    Del { key: String, id: String },
}

pub async fn run(ctx: &AppContext, args: CommentArgs) -> AppResult<()> {
    match args.command {
        CommentCommand::Add { key, body } => {
            ctx.issue_tracker.add_comment(&key, &body.join(" ")).await?;
            println!("Comment added to {key}.");
        }
        CommentCommand::Del { key, id } => {
            ctx.issue_tracker.delete_comment(&key, &id).await?;
            println!("Comment {id} removed from {key}.");
        }
    }
    Ok(())
}
