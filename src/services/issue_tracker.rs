use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::issue::Issue;
use crate::domain::project::{Project, TaskTypes};
use crate::domain::search::SearchOptions;
use crate::domain::task::{CreatedTask, NewTask};
use crate::domain::timelog::WorklogEntry;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn search(&self, options: &SearchOptions) -> AppResult<Vec<Issue>>;
    async fn get_issue(&self, key: &str) -> AppResult<Issue>;
    async fn create_task(&self, project: &str, task: &NewTask) -> AppResult<CreatedTask>;
    async fn update_issue(&self, key: &str, update: Value) -> AppResult<()>;
    async fn upload(&self, key: &str, file: &Path) -> AppResult<()>;
    async fn delete_attachment(&self, key: &str, file_name: &str) -> AppResult<()>;
    async fn add_comment(&self, key: &str, body: &str) -> AppResult<()>;
    async fn delete_comment(&self, key: &str, comment_id: &str) -> AppResult<()>;
    async fn get_task_types(&self) -> AppResult<TaskTypes>;
    async fn get_projects(&self) -> AppResult<HashMap<String, Project>>;
    async fn get_worklogs(&self, key: &str) -> AppResult<Vec<WorklogEntry>>;
    async fn add_worklog(&self, key: &str, time_spent: &str) -> AppResult<()>;
}
