//! In-memory tracker used by the workflow tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::issue::Issue;
use crate::domain::project::{Project, TaskTypes};
use crate::domain::search::SearchOptions;
use crate::domain::task::{CreatedTask, NewTask};
use crate::domain::timelog::WorklogEntry;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

#[derive(Default)]
pub struct StubTracker {
    issues: Vec<String>,
    worklogs: HashMap<String, AppResult<Vec<WorklogEntry>>>,
    calls: Mutex<Vec<String>>,
}

impl StubTracker {
    pub fn with_issue(mut self, key: &str) -> Self {
        self.issues.push(key.to_string());
        self
    }

    pub fn with_worklogs(mut self, key: &str, entries: Vec<WorklogEntry>) -> Self {
        self.issues.push(key.to_string());
        self.worklogs.insert(key.to_string(), Ok(entries));
        self
    }

    pub fn with_failing_worklogs(mut self, key: &str) -> Self {
        self.issues.push(key.to_string());
        self.worklogs
            .insert(key.to_string(), Err(AppError::Unauthorized));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn issue(key: &str) -> Issue {
        Issue::from_json(&json!({
            "key": key,
            "fields": {"summary": format!("Summary of {key}"), "issuetype": {"name": "Task"}}
        }))
        .unwrap()
    }
}

fn unused<T>(operation: &str) -> AppResult<T> {
    Err(AppError::IssueTracker(format!("{operation} is not stubbed")))
}

#[async_trait]
impl IssueTrackerService for StubTracker {
    async fn search(&self, options: &SearchOptions) -> AppResult<Vec<Issue>> {
        self.record(format!("search {}", options.to_query()));
        Ok(self.issues.iter().map(|key| Self::issue(key)).collect())
    }

    async fn get_issue(&self, key: &str) -> AppResult<Issue> {
        self.record(format!("get_issue {key}"));
        if self.issues.iter().any(|known| known == key) {
            Ok(Self::issue(key))
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn create_task(&self, project: &str, task: &NewTask) -> AppResult<CreatedTask> {
        self.record(format!(
            "create_task {project} {} parent={}",
            task.task_type,
            task.parent.as_deref().unwrap_or("-")
        ));
        Ok(CreatedTask {
            key: "CORE-100".to_string(),
        })
    }

    async fn update_issue(&self, key: &str, update: Value) -> AppResult<()> {
        self.record(format!("update_issue {key} {update}"));
        Ok(())
    }

    async fn upload(&self, _key: &str, _file: &Path) -> AppResult<()> {
        unused("upload")
    }

    async fn delete_attachment(&self, _key: &str, _file_name: &str) -> AppResult<()> {
        unused("delete_attachment")
    }

    async fn add_comment(&self, _key: &str, _body: &str) -> AppResult<()> {
        unused("add_comment")
    }

    async fn delete_comment(&self, _key: &str, _comment_id: &str) -> AppResult<()> {
        unused("delete_comment")
    }

    async fn get_task_types(&self) -> AppResult<TaskTypes> {
        unused("get_task_types")
    }

    async fn get_projects(&self) -> AppResult<HashMap<String, Project>> {
        unused("get_projects")
    }

    async fn get_worklogs(&self, key: &str) -> AppResult<Vec<WorklogEntry>> {
        self.record(format!("get_worklogs {key}"));
        match self.worklogs.get(key) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(_)) => Err(AppError::Unauthorized),
            None => Ok(Vec::new()),
        }
    }

    async fn add_worklog(&self, key: &str, time_spent: &str) -> AppResult<()> {
        self.record(format!("add_worklog {key} {time_spent}"));
        Ok(())
    }
}
