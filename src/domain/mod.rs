pub mod issue;
pub mod json_path;
pub mod project;
pub mod search;
pub mod task;
pub mod timelog;

use thiserror::Error;

use crate::domain::json_path::FieldError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Bad Issue")]
    BadIssue(#[source] FieldError),
    #[error("bad {what}: {source}")]
    BadDocument {
        what: &'static str,
        #[source]
        source: FieldError,
    },
}
