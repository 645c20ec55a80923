/// Filters for an issue search. A raw `jql` query takes precedence over
/// every other option.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub project: Option<String>,
    pub current_sprint: bool,
    pub open: bool,
    pub issue: Option<String>,
    pub jql: Option<String>,
}

impl SearchOptions {
    pub fn raw(jql: impl Into<String>) -> Self {
        Self {
            jql: Some(jql.into()),
            ..Self::default()
        }
    }

    /// Builds the query string sent as the `jql` parameter.
    ///
    /// Spaces become `+`; no other escaping is applied.
    pub fn to_query(&self) -> String {
        if let Some(jql) = self.jql.as_deref().filter(|jql| !jql.is_empty()) {
            return plus_encode(jql);
        }

        let mut clauses = Vec::new();
        if self.current_sprint {
            clauses.push("sprint+in+openSprints()".to_string());
        }
        if self.open {
            clauses.push("status+=+'open'".to_string());
        }
        if let Some(issue) = self.issue.as_deref().filter(|issue| !issue.is_empty()) {
            let issue = plus_encode(issue);
            clauses.push(format!("issue+=+'{issue}'+or+parent+=+'{issue}'"));
        }
        if let Some(project) = self.project.as_deref().filter(|project| !project.is_empty()) {
            clauses.push(format!("project+=+'{}'", plus_encode(project)));
        }

        format!("{}+order+by+rank", clauses.join("+AND+"))
    }
}

fn plus_encode(text: &str) -> String {
    text.replace(' ', "+")
}
