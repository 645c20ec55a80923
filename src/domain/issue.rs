use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::domain::DecodeError;
use crate::domain::json_path::{FieldError, array_at, number_at, text_at};
use crate::domain::timelog::TimeLog;

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub status: String,
    pub assignee: String,
    pub parent: Option<String>,
    /// `" of KEY"` when the issue has a parent, empty otherwise.
    pub parent_suffix: String,
    pub files: Vec<IssueFile>,
    pub comments: Vec<Comment>,
    pub original_estimate: f64,
    pub remaining_estimate: f64,
    pub time_spent: f64,
    pub time_log: Option<TimeLog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFile {
    pub name: String,
    pub url: String,
    pub self_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
}

impl Issue {
    /// Decodes an issue document as returned by the issue and search endpoints.
    ///
    /// Only the key, summary and issue type are required; everything else
    /// falls back to an empty value.
    pub fn from_json(doc: &Value) -> Result<Self, DecodeError> {
        let key = text_at(doc, "key").map_err(DecodeError::BadIssue)?;
        let summary = text_at(doc, "fields/summary").map_err(DecodeError::BadIssue)?;
        let issue_type = text_at(doc, "fields/issuetype/name").map_err(DecodeError::BadIssue)?;

        let description = text_at(doc, "fields/description").unwrap_or_default();
        let status = text_at(doc, "fields/status/name").unwrap_or_default();
        let assignee = text_at(doc, "fields/assignee/name").unwrap_or_default();

        let parent = text_at(doc, "fields/parent/key")
            .ok()
            .filter(|parent| !parent.is_empty())
            .map(str::to_string);
        let parent_suffix = parent
            .as_deref()
            .map(|parent| format!(" of {parent}"))
            .unwrap_or_default();

        let time_log = number_at(doc, "fields/timespent")
            .ok()
            .map(|seconds| TimeLog::new(key, seconds as i64));

        Ok(Self {
            key: key.to_string(),
            summary: summary.to_string(),
            description: description.to_string(),
            issue_type: issue_type.to_string(),
            status: status.to_string(),
            assignee: assignee.to_string(),
            parent,
            parent_suffix,
            files: decode_files(doc),
            comments: decode_comments(doc),
            original_estimate: number_at(doc, "fields/timeoriginalestimate").unwrap_or_default(),
            remaining_estimate: number_at(doc, "fields/timeremainingestimate").unwrap_or_default(),
            time_spent: number_at(doc, "fields/timespent").unwrap_or_default(),
            time_log,
        })
    }

    pub fn find_file(&self, name: &str) -> Option<&IssueFile> {
        self.files.iter().find(|file| file.name == name)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}{}] {}",
            self.key, self.issue_type, self.parent_suffix, self.summary
        )?;
        if !self.status.is_empty() {
            write!(f, " ({})", self.status)?;
        }
        if !self.assignee.is_empty() {
            write!(f, " @{}", self.assignee)?;
        }
        Ok(())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.id, self.author, self.body)
    }
}

fn decode_files(doc: &Value) -> Vec<IssueFile> {
    let Ok(entries) = array_at(doc, "fields/attachment") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            decode_file(entry)
                .map_err(|err| debug!("skipping attachment entry: {err}"))
                .ok()
        })
        .collect()
}

fn decode_file(entry: &Value) -> Result<IssueFile, FieldError> {
    Ok(IssueFile {
        name: text_at(entry, "filename")?.to_string(),
        url: text_at(entry, "content")?.to_string(),
        self_link: text_at(entry, "self")?.to_string(),
    })
}

fn decode_comments(doc: &Value) -> Vec<Comment> {
    let entries = match array_at(doc, "fields/comment/comments") {
        Ok(entries) => entries,
        Err(err) => {
            debug!("no comments decoded: {err}");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| match decode_comment(entry) {
            Ok(comment) => Some(comment),
            Err(err) => {
                debug!("skipping comment entry: {err}");
                None
            }
        })
        .collect()
}

fn decode_comment(entry: &Value) -> Result<Comment, FieldError> {
    Ok(Comment {
        id: text_at(entry, "id")?.to_string(),
        body: text_at(entry, "body")?.to_string(),
        author: text_at(entry, "author/displayName")?.to_string(),
    })
}
