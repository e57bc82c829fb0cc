//! Content directory scanning.
//!
//! Walks a source directory for `*.json` documents and produces a
//! [`Library`] manifest that `build` and the `scan` command consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── coursecast.toml              # Config (optional)
//! ├── 010-intro-course.json        # Numbered = ordered by number
//! ├── 020-weekly-show.json
//! ├── archive/
//! │   └── 2023-recap.json          # Subdirectories are walked too
//! ├── .drafts/                     # Hidden entries are skipped
//! └── notes.json                   # Unnumbered = after numbered ones
//! ```
//!
//! File stems follow the `NNN-name` convention: the number sets the order,
//! the name becomes the slug. A document without a title is listed under
//! its file name with dashes turned into spaces.
//!
//! Unreadable or malformed files fail the scan. Documents that are neither
//! podcasts nor courses are listed as `unknown` and skipped by generation.

use crate::document::{self, DocumentError, DocumentKind};
use crate::markdown::Outline;
use crate::types::{Course, PodcastDocument};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("Duplicate slug '{slug}': {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Library {
    pub root: PathBuf,
    pub documents: Vec<DocumentEntry>,
}

impl Library {
    /// Documents that generation will render.
    pub fn renderable(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.documents
            .iter()
            .filter(|d| d.kind != DocumentKind::Unknown)
    }
}

/// One JSON document found under the source root.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    /// Path relative to the source root.
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub title: String,
    /// Output file stem (number prefix stripped).
    pub slug: String,
    /// Order key from the number prefix; unnumbered files sort last.
    pub sort_key: u32,
    pub counts: DocumentCounts,
}

/// Size summary: episodes/slides for podcasts, modules/lessons for courses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentCounts {
    pub episodes: usize,
    pub slides: usize,
    pub modules: usize,
    pub lessons: usize,
}

/// Result of parsing a file stem like `010-intro-course`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub number: Option<u32>,
    /// Name after `NNN-`, or the whole stem when unnumbered.
    pub name: String,
}

impl ParsedName {
    pub fn display_title(&self) -> String {
        self.name.replace('-', " ")
    }
}

/// Split an optional `NNN-` prefix off a file stem.
///
/// - `"010-intro-course"` → number=Some(10), name="intro-course"
/// - `"010"` → number=Some(10), name=""
/// - `"notes"` → number=None, name="notes"
pub fn parse_entry_name(stem: &str) -> ParsedName {
    if let Some((prefix, rest)) = stem.split_once('-') {
        if let Ok(number) = prefix.parse::<u32>() {
            return ParsedName {
                number: Some(number),
                name: rest.to_string(),
            };
        }
    }
    if let Ok(number) = stem.parse::<u32>() {
        return ParsedName {
            number: Some(number),
            name: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: stem.to_string(),
    }
}

pub fn scan(root: &Path) -> Result<Library, ScanError> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_json(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        let value = document::load_document(path).map_err(|source| ScanError::Load {
            path: path.clone(),
            source,
        })?;
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        documents.push(describe(relative, &value));
    }

    // Stable: equal keys keep walk order.
    documents.sort_by_key(|d| d.sort_key);
    check_unique_slugs(&documents)?;

    Ok(Library {
        root: root.to_path_buf(),
        documents,
    })
}

/// Manifest entry for a loaded document.
pub fn describe(path: PathBuf, value: &Value) -> DocumentEntry {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);
    let kind = document::classify(value);
    let title = document::document_title(value).unwrap_or_else(|| parsed.display_title());
    let slug = if parsed.name.is_empty() {
        stem.clone()
    } else {
        parsed.name.clone()
    };

    DocumentEntry {
        path,
        kind,
        title,
        slug,
        sort_key: parsed.number.unwrap_or(u32::MAX),
        counts: count(kind, value),
    }
}

fn count(kind: DocumentKind, value: &Value) -> DocumentCounts {
    match kind {
        DocumentKind::Podcast => {
            let Ok(doc) = serde_json::from_value::<PodcastDocument>(value.clone()) else {
                return DocumentCounts::default();
            };
            DocumentCounts {
                episodes: doc.podcast.episodes.len(),
                slides: doc.podcast.episodes.iter().map(|e| e.slides().len()).sum(),
                ..DocumentCounts::default()
            }
        }
        DocumentKind::Course => {
            let Ok(course) = serde_json::from_value::<Course>(value.clone()) else {
                return DocumentCounts::default();
            };
            match Outline::of(&course) {
                Outline::Modules(modules) => DocumentCounts {
                    modules: modules.len(),
                    lessons: modules.iter().map(|m| m.lessons.len()).sum(),
                    ..DocumentCounts::default()
                },
                Outline::Sections(_) | Outline::Empty => DocumentCounts::default(),
            }
        }
        DocumentKind::Unknown => DocumentCounts::default(),
    }
}

fn check_unique_slugs(documents: &[DocumentEntry]) -> Result<(), ScanError> {
    let mut seen: std::collections::HashMap<&str, &Path> = std::collections::HashMap::new();
    for doc in documents.iter().filter(|d| d.kind != DocumentKind::Unknown) {
        if let Some(first) = seen.insert(doc.slug.as_str(), doc.path.as_path()) {
            return Err(ScanError::DuplicateSlug {
                slug: doc.slug.clone(),
                first: first.to_path_buf(),
                second: doc.path.clone(),
            });
        }
    }
    Ok(())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
