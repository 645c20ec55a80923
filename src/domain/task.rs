/// A task or subtask to be created in the configured project.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Friendly issue type name, e.g. `sub-task`.
    pub task_type: String,
    pub summary: String,
    pub original_estimate: Option<String>,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub key: String,
}
