use serde_json::json;

use crate::context::AppContext;
use crate::domain::task::{CreatedTask, NewTask};
use crate::error::{AppError, AppResult};

/// Creates a task in the configured project, optionally under a parent and
/// with an original estimate.
pub async fn create_task(ctx: &AppContext, mut task: NewTask) -> AppResult<CreatedTask> {
    let project = ctx.config.project.as_deref().ok_or_else(|| {
        AppError::Configuration(
            "a project is required to create tasks (-P/--project)".to_string(),
        )
    })?;
    if task.summary.trim().is_empty() {
        return Err(AppError::IssueTracker("summary must not be empty".to_string()));
    }

    if let Some(parent) = task.parent.take() {
        let parent = ctx.issue_tracker.get_issue(&parent).await?;
        task.parent = Some(parent.key);
    }

    let created = ctx.issue_tracker.create_task(project, &task).await?;

    if let Some(estimate) = task
        .original_estimate
        .as_deref()
        .map(str::trim)
        .filter(|estimate| !estimate.is_empty())
    {
        let update = json!({ "timetracking": [{ "edit": { "originalEstimate": estimate } }] });
        ctx.issue_tracker.update_issue(&created.key, update).await?;
    }

    Ok(created)
}
