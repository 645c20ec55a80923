use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct AttachArgs {
    #[command(subcommand)]
    pub command: AttachCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AttachCommand {
    /// Upload a local file to an issue.
    Upload { key: String, file: PathBuf },
    /// Remove an attachment by its file name.
    Del { key: String, name: String },
}

pub async fn run(ctx: &AppContext, args: AttachArgs) -> AppResult<()> {
    match args.command {
        AttachCommand::Upload { key, file } => {
            ctx.issue_tracker.upload(&key, &file).await?;
            println!("File uploaded!");
        }
        AttachCommand::Del { key, name } => {
            ctx.issue_tracker.delete_attachment(&key, &name).await?;
            println!("File removed from issue!");
        }
    }
    Ok(())
}
