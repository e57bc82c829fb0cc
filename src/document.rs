//! Loading, saving and classifying JSON documents.
//!
//! Documents come either straight from disk or as a saved API response of the
//! form `{ "success": bool, "data": ..., "detail": "..." }`. Enveloped files
//! are unwrapped to their `data`; a failed response becomes
//! [`DocumentError::Rejected`] carrying the server's `detail`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Request failed: {0}")]
    Rejected(String),
}

/// Which family a document belongs to, decided by its top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Podcast,
    Course,
    Unknown,
}

impl DocumentKind {
    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Podcast => "podcast",
            DocumentKind::Course => "course",
            DocumentKind::Unknown => "unknown",
        }
    }
}

const COURSE_KEYS: &[&str] = &[
    "markdown_document",
    "main_body",
    "modules",
    "table_of_contents",
    "abstract",
    "introduction",
    "conclusion",
    "course_number",
];

pub fn classify(document: &Value) -> DocumentKind {
    let Some(map) = document.as_object() else {
        return DocumentKind::Unknown;
    };
    if map.get("podcast").is_some_and(Value::is_object) {
        DocumentKind::Podcast
    } else if COURSE_KEYS.iter().any(|key| map.contains_key(*key)) {
        DocumentKind::Course
    } else {
        DocumentKind::Unknown
    }
}

/// Strip an API response envelope if there is one.
pub fn unwrap_envelope(document: Value) -> Result<Value, DocumentError> {
    let success = match document.get("success") {
        Some(Value::Bool(flag)) => *flag,
        _ => return Ok(document),
    };
    if !success {
        let detail = document
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(DocumentError::Rejected(detail));
    }
    Ok(match document {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        other => other,
    })
}

pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    unwrap_envelope(value)
}

/// Write a document as pretty JSON with a trailing newline.
pub fn save_document(path: &Path, document: &Value) -> Result<(), DocumentError> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Display title: `podcast.title` for podcasts, `title` otherwise.
pub fn document_title(document: &Value) -> Option<String> {
    let title = match classify(document) {
        DocumentKind::Podcast => document.pointer("/podcast/title"),
        _ => document.get("title"),
    };
    title
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn classify_by_top_level_keys() {
        assert_eq!(classify(&json!({"podcast": {"title": "x"}})), DocumentKind::Podcast);
        assert_eq!(classify(&json!({"main_body": {}})), DocumentKind::Course);
        assert_eq!(classify(&json!({"abstract": "a"})), DocumentKind::Course);
        assert_eq!(classify(&json!({"title": "only"})), DocumentKind::Unknown);
        assert_eq!(classify(&json!({"podcast": "not an object"})), DocumentKind::Unknown);
        assert_eq!(classify(&json!([1, 2])), DocumentKind::Unknown);
    }

    #[test]
    fn envelope_is_unwrapped() {
        let doc = unwrap_envelope(json!({"success": true, "data": {"podcast": {}}})).unwrap();
        assert_eq!(doc, json!({"podcast": {}}));
    }

    #[test]
    fn failed_envelope_surfaces_detail() {
        let err = unwrap_envelope(json!({"success": false, "detail": "not found"})).unwrap_err();
        assert_eq!(err.to_string(), "Request failed: not found");
    }

    #[test]
    fn plain_documents_pass_through() {
        let raw = json!({"title": "T", "success": "yes"});
        assert_eq!(unwrap_envelope(raw.clone()).unwrap(), raw);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.json");
        let doc = json!({"podcast": {"title": "Round trip"}});
        save_document(&path, &doc).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        assert_eq!(load_document(&path).unwrap(), doc);
    }

    #[test]
    fn load_reports_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_document(&path), Err(DocumentError::Json(_))));
    }

    #[test]
    fn titles_by_kind() {
        assert_eq!(
            document_title(&json!({"podcast": {"title": " Show "}})).as_deref(),
            Some("Show")
        );
        assert_eq!(
            document_title(&json!({"title": "Course", "modules": []})).as_deref(),
            Some("Course")
        );
        assert_eq!(document_title(&json!({"podcast": {}})), None);
    }
}
