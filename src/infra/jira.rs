use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Method, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::issue::Issue;
use crate::domain::json_path::{array_at, text_at};
use crate::domain::DecodeError;
use crate::domain::project::{
    Project, TaskTypes, find_project, friendly_name, projects_from_meta, task_types_from_meta,
};
use crate::domain::search::SearchOptions;
use crate::domain::task::{CreatedTask, NewTask};
use crate::domain::timelog::{WorklogEntry, worklogs_from_json};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

/// Header the API requires on POSTs coming from non-browser clients.
const ATLASSIAN_TOKEN: &str = "X-Atlassian-Token";

pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

pub struct JiraClient {
    http: Client,
    base_url: String,
    user: String,
    password: String,
}

impl JiraClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let base_url = config
            .base_url()
            .ok_or_else(|| AppError::Configuration("Jira server not configured".to_string()))?;
        let user = config
            .user
            .clone()
            .ok_or_else(|| AppError::Configuration("Jira user not configured".to_string()))?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| AppError::Configuration("Jira password not configured".to_string()))?;

        let http = Client::builder()
            .danger_accept_invalid_certs(config.no_check_ssl)
            .build()?;

        Ok(Self {
            http,
            base_url,
            user,
            password,
        })
    }

    pub async fn get(&self, url: &str) -> AppResult<Response> {
        self.send(Method::GET, url, RequestBody::Empty).await
    }

    pub async fn post(&self, url: &str, body: RequestBody) -> AppResult<Response> {
        self.send(Method::POST, url, body).await
    }

    pub async fn put(&self, url: &str, body: RequestBody) -> AppResult<Response> {
        self.send(Method::PUT, url, body).await
    }

    pub async fn delete(&self, url: &str) -> AppResult<Response> {
        self.send(Method::DELETE, url, RequestBody::Empty).await
    }

    async fn send(&self, method: Method, url: &str, body: RequestBody) -> AppResult<Response> {
        debug!(%method, url, "calling Jira");
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, Self::auth_header(&self.user, &self.password));
        if method == Method::POST {
            request = request.header(ATLASSIAN_TOKEN, "nocheck");
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request
                .header(CONTENT_TYPE, "application/json")
                .json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };
        Ok(request.send().await?)
    }

    fn auth_header(user: &str, password: &str) -> String {
        let credentials = format!("{user}:{password}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/2/issue/{key}", self.base_url)
    }

    fn create_meta_url(&self) -> String {
        format!("{}/rest/api/2/issue/createmeta", self.base_url)
    }

    /// Reads a successful response as JSON, mapping any other status to an error.
    async fn read_json(response: Response) -> AppResult<Value> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::from_status(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Returns the body when the response carries exactly `expected`.
    async fn expect_status(response: Response, expected: StatusCode) -> AppResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        if status == expected {
            return Ok(body);
        }
        debug!(%status, %body, "unexpected Jira response");
        if status.is_success() {
            Err(AppError::Status { status, body })
        } else {
            Err(AppError::from_status(status, body))
        }
    }

    async fn ensure_success(response: Response) -> AppResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%status, %body, "Jira request failed");
        Err(AppError::from_status(status, body))
    }

    async fn create_meta(&self) -> AppResult<Value> {
        let response = self.get(&self.create_meta_url()).await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn search(&self, options: &SearchOptions) -> AppResult<Vec<Issue>> {
        let url = format!(
            "{}/rest/api/2/search?jql={}&fields=*all",
            self.base_url,
            options.to_query()
        );
        let doc = Self::read_json(self.get(&url).await?).await?;

        let hits = match array_at(&doc, "issues") {
            Ok(hits) => hits,
            Err(err) => {
                debug!("search returned no issues: {err}");
                &[]
            }
        };
        Ok(hits
            .iter()
            .filter_map(|hit| match Issue::from_json(hit) {
                Ok(issue) => Some(issue),
                Err(err) => {
                    warn!("skipping search hit: {err}");
                    None
                }
            })
            .collect())
    }

    async fn get_issue(&self, key: &str) -> AppResult<Issue> {
        let doc = Self::read_json(self.get(&self.issue_url(key)).await?).await?;
        Ok(Issue::from_json(&doc)?)
    }

    async fn create_task(&self, project: &str, task: &NewTask) -> AppResult<CreatedTask> {
        let task_types = self.get_task_types().await?;
        let projects = self.get_projects().await?;

        let project = find_project(&projects, project)
            .ok_or_else(|| AppError::IssueTracker(format!("Project not found: {project}.")))?;
        let issue_type = task_types
            .get(&project.name)
            .and_then(|types| types.get(&friendly_name(&task.task_type)))
            .ok_or_else(|| {
                AppError::IssueTracker(format!(
                    "Task name not found for friendly name {}.",
                    task.task_type
                ))
            })?;

        let request = CreateIssueRequest::new(&project.key, issue_type, task);
        let body = serde_json::to_value(&request)?;
        debug!(%body, "creating issue");

        let url = format!("{}/rest/api/2/issue", self.base_url);
        let response = self.post(&url, RequestBody::Json(body)).await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::CREATED {
            debug!(%status, %body, "issue creation rejected");
            return Err(AppError::Status { status, body });
        }

        let doc: Value = serde_json::from_str(&body)?;
        let key = text_at(&doc, "key").map_err(|source| DecodeError::BadDocument {
            what: "created issue",
            source,
        })?;
        info!("{key} successfully created!");
        Ok(CreatedTask {
            key: key.to_string(),
        })
    }

    async fn update_issue(&self, key: &str, update: Value) -> AppResult<()> {
        let url = format!("{}/rest/api/latest/issue/{key}", self.base_url);
        let response = self
            .put(&url, RequestBody::Json(json!({ "update": update })))
            .await?;
        Self::expect_status(response, StatusCode::NO_CONTENT)
            .await
            .map_err(|err| match err {
                AppError::Status { status, .. } => {
                    AppError::BadRequest(format!("unexpected status {status}"))
                }
                other => other,
            })?;
        info!("Issue {key} updated!");
        Ok(())
    }

    async fn upload(&self, key: &str, file: &Path) -> AppResult<()> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::FileNotFound(file.display().to_string()))?;
        let contents = tokio::fs::read(file).await?;
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name));

        let url = format!("{}/attachments", self.issue_url(key));
        let response = self.post(&url, RequestBody::Multipart(form)).await?;
        Self::ensure_success(response).await?;
        info!("File uploaded!");
        Ok(())
    }

    async fn delete_attachment(&self, key: &str, file_name: &str) -> AppResult<()> {
        let issue = self.get_issue(key).await?;
        let file = issue
            .find_file(file_name)
            .ok_or_else(|| AppError::FileNotFound(file_name.to_string()))?;

        let response = self.delete(&file.self_link).await?;
        Self::ensure_success(response).await?;
        info!("File removed from issue!");
        Ok(())
    }

    async fn add_comment(&self, key: &str, body: &str) -> AppResult<()> {
        let url = format!("{}/comment", self.issue_url(key));
        let response = self
            .post(&url, RequestBody::Json(json!({ "body": body })))
            .await?;
        Self::ensure_success(response).await
    }

    async fn delete_comment(&self, key: &str, comment_id: &str) -> AppResult<()> {
        let url = format!("{}/comment/{comment_id}", self.issue_url(key));
        let response = self.delete(&url).await?;
        Self::ensure_success(response).await
    }

    async fn get_task_types(&self) -> AppResult<TaskTypes> {
        let meta = self.create_meta().await?;
        Ok(task_types_from_meta(&meta)?)
    }

    async fn get_projects(&self) -> AppResult<HashMap<String, Project>> {
        let meta = self.create_meta().await?;
        Ok(projects_from_meta(&meta)?)
    }

    async fn get_worklogs(&self, key: &str) -> AppResult<Vec<WorklogEntry>> {
        let url = format!("{}/worklog", self.issue_url(key));
        let doc = Self::read_json(self.get(&url).await?).await?;
        Ok(worklogs_from_json(&doc)?)
    }

    async fn add_worklog(&self, key: &str, time_spent: &str) -> AppResult<()> {
        let url = format!("{}/worklog", self.issue_url(key));
        let response = self
            .post(&url, RequestBody::Json(json!({ "timeSpent": time_spent })))
            .await?;
        Self::expect_status(response, StatusCode::CREATED).await?;
        info!("Log successful");
        Ok(())
    }
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    fields: CreateIssueFields<'a>,
}

impl<'a> CreateIssueRequest<'a> {
    fn new(project_key: &'a str, issue_type: &'a str, task: &'a NewTask) -> Self {
        Self {
            fields: CreateIssueFields {
                summary: &task.summary,
                project: KeyRef { key: project_key },
                issuetype: NameRef { name: issue_type },
                parent: task.parent.as_deref().map(|key| KeyRef { key }),
            },
        }
    }
}

#[derive(Serialize)]
struct CreateIssueFields<'a> {
    summary: &'a str,
    project: KeyRef<'a>,
    issuetype: NameRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<KeyRef<'a>>,
}

#[derive(Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct NameRef<'a> {
    name: &'a str,
}
