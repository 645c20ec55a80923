//! Slash-delimited navigation through untyped JSON documents.
//!
//! Only objects are descended into; arrays have to be pulled out with one
//! walk and iterated by the caller.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("bad path, {segment} is not a mapping")]
    NotAMapping { segment: String },
    #[error("bad path, {segment} is missing")]
    MissingKey { segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("{path} is not {expected}")]
    WrongType { path: String, expected: &'static str },
}

/// Segment name reported when the document itself is not an object.
const ROOT: &str = "<root>";

/// Returns the value reached by following `path` through nested objects.
///
/// The final value is returned untouched, whatever its JSON type.
pub fn walk<'a>(value: &'a Value, path: &str) -> Result<&'a Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut current = value;
    let mut parent_segment = ROOT;
    for (index, segment) in segments.into_iter().enumerate() {
        let map = current.as_object().ok_or_else(|| PathError::NotAMapping {
            segment: parent_segment.to_string(),
        })?;
        current = match map.get(segment) {
            Some(next) => next,
            None if index == last => {
                return Err(PathError::MissingKey {
                    segment: segment.to_string(),
                });
            }
            // an absent intermediate reads as a non-mapping
            None => {
                return Err(PathError::NotAMapping {
                    segment: segment.to_string(),
                });
            }
        };
        parent_segment = segment;
    }
    Ok(current)
}

pub fn text_at<'a>(value: &'a Value, path: &str) -> Result<&'a str, FieldError> {
    walk(value, path)?
        .as_str()
        .ok_or_else(|| wrong_type(path, "a string"))
}

pub fn number_at(value: &Value, path: &str) -> Result<f64, FieldError> {
    walk(value, path)?
        .as_f64()
        .ok_or_else(|| wrong_type(path, "a number"))
}

pub fn array_at<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], FieldError> {
    walk(value, path)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| wrong_type(path, "an array"))
}

fn wrong_type(path: &str, expected: &'static str) -> FieldError {
    FieldError::WrongType {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects() {
        let doc = json!({"a": {"b": "c"}});
        assert_eq!(walk(&doc, "a/b"), Ok(&json!("c")));
        assert_eq!(walk(&doc, "a"), Ok(&json!({"b": "c"})));
    }

    #[test]
    fn refuses_to_descend_into_scalars() {
        let doc = json!({"a": {"b": "c"}});
        assert_eq!(
            walk(&doc, "a/b/c"),
            Err(PathError::NotAMapping {
                segment: "b".to_string()
            })
        );
    }

    #[test]
    fn refuses_to_descend_into_arrays() {
        let doc = json!({"items": [{"id": 1}]});
        assert!(matches!(
            walk(&doc, "items/0/id"),
            Err(PathError::NotAMapping { .. })
        ));
    }

    #[test]
    fn empty_path_fails() {
        let doc = json!({"a": 1});
        assert_eq!(walk(&doc, ""), Err(PathError::Empty));
    }

    #[test]
    fn reports_missing_keys() {
        let doc = json!({"a": {"b": "c"}});
        assert_eq!(
            walk(&doc, "a/x"),
            Err(PathError::MissingKey {
                segment: "x".to_string()
            })
        );
    }

    #[test]
    fn missing_intermediate_keys_are_not_mappings() {
        let doc = json!({"a": {"b": "c"}});
        assert_eq!(
            walk(&doc, "x/y"),
            Err(PathError::NotAMapping {
                segment: "x".to_string()
            })
        );
        assert_eq!(
            walk(&doc, "a/x/y"),
            Err(PathError::NotAMapping {
                segment: "x".to_string()
            })
        );
    }

    #[test]
    fn non_object_roots_name_the_root() {
        let err = walk(&json!([1, 2]), "a").unwrap_err();
        assert_eq!(
            err,
            PathError::NotAMapping {
                segment: "<root>".to_string()
            }
        );
        assert_eq!(err.to_string(), "bad path, <root> is not a mapping");
    }

    #[test]
    fn returns_null_leaves_as_is() {
        let doc = json!({"fields": {"parent": null}});
        assert_eq!(walk(&doc, "fields/parent"), Ok(&Value::Null));
        assert!(matches!(
            walk(&doc, "fields/parent/key"),
            Err(PathError::NotAMapping { .. })
        ));
    }

    #[test]
    fn typed_accessors_check_shape() {
        let doc = json!({"key": 123, "n": 4.5, "list": [1, 2], "s": "x"});
        assert_eq!(text_at(&doc, "s"), Ok("x"));
        assert_eq!(number_at(&doc, "n"), Ok(4.5));
        assert_eq!(array_at(&doc, "list").map(<[Value]>::len), Ok(2));
        assert_eq!(
            text_at(&doc, "key"),
            Err(FieldError::WrongType {
                path: "key".to_string(),
                expected: "a string"
            })
        );
        assert!(number_at(&doc, "s").is_err());
    }
}
