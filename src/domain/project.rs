use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::domain::DecodeError;
use crate::domain::json_path::{array_at, text_at};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub key: String,
}

/// Issue type names per project name, keyed by friendly name.
pub type TaskTypes = HashMap<String, HashMap<String, String>>;

/// Lowercases a server-side name and hyphenates its spaces, e.g.
/// `"Sub-task Item"` becomes `"sub-task-item"`.
pub fn friendly_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Flattens an issue-creation metadata document into task types per project.
pub fn task_types_from_meta(meta: &Value) -> Result<TaskTypes, DecodeError> {
    let projects = array_at(meta, "projects").map_err(|source| DecodeError::BadDocument {
        what: "creation metadata",
        source,
    })?;

    let mut task_types = TaskTypes::new();
    for project in projects {
        let Ok(project_name) = text_at(project, "name") else {
            debug!("skipping project without a name");
            continue;
        };
        let types = task_types.entry(project_name.to_string()).or_default();
        let Ok(issue_types) = array_at(project, "issuetypes") else {
            continue;
        };
        for issue_type in issue_types {
            match text_at(issue_type, "name") {
                Ok(name) => {
                    types.insert(friendly_name(name), name.to_string());
                }
                Err(err) => debug!("skipping issue type of {project_name}: {err}"),
            }
        }
    }
    Ok(task_types)
}

/// Flattens an issue-creation metadata document into projects keyed by name.
pub fn projects_from_meta(meta: &Value) -> Result<HashMap<String, Project>, DecodeError> {
    let projects = array_at(meta, "projects").map_err(|source| DecodeError::BadDocument {
        what: "creation metadata",
        source,
    })?;

    Ok(projects
        .iter()
        .filter_map(|project| {
            let name = text_at(project, "name")
                .map_err(|err| debug!("skipping project: {err}"))
                .ok()?;
            let project = Project {
                id: text_at(project, "id").unwrap_or_default().to_string(),
                name: name.to_string(),
                key: text_at(project, "key").unwrap_or_default().to_string(),
            };
            Some((name.to_string(), project))
        })
        .collect())
}

/// Finds a project by display name, falling back to its key.
pub fn find_project<'a>(
    projects: &'a HashMap<String, Project>,
    wanted: &str,
) -> Option<&'a Project> {
    projects
        .get(wanted)
        .or_else(|| projects.values().find(|project| project.key == wanted))
}
