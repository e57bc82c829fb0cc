//! Shared test utilities for the coursecast test suite.
//!
//! Sample documents are built inline with `json!` so unit tests don't touch
//! the filesystem; `setup_fixtures()` copies `fixtures/content/` for tests
//! that exercise scanning and site generation.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fields = extract_fields(&sample_podcast());
//! let title = field_at(&fields, "podcast.episodes[0].title");
//! assert_eq!(title.value, "Why We Sleep");
//! ```

use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

use crate::fields::EditableField;
use crate::scan::{DocumentEntry, Library};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Sample documents
// =========================================================================

/// A two-module course with modules under `main_body`.
pub fn sample_course() -> Value {
    json!({
        "title": "Podcasting Fundamentals",
        "number": "PC-101",
        "abstract": "Learn to plan, record and publish a show.",
        "introduction": "Anyone with a microphone can start.",
        "main_body": {
            "modules": [
                {
                    "id": "1",
                    "title": "Planning",
                    "lessons": [
                        {
                            "id": "1.1",
                            "title": "Finding Your Niche",
                            "timeBlock": "45 minutes",
                            "objectives": ["Pick a topic", "Define an audience"],
                            "homework": "Write three episode ideas",
                            "topics": [
                                {
                                    "id": "1",
                                    "title": "Audience research",
                                    "content": "Talk to ten listeners."
                                }
                            ]
                        }
                    ]
                },
                {
                    "id": "2",
                    "title": "Recording",
                    "lessons": [
                        {
                            "id": "2.1",
                            "title": "Microphone Basics",
                            "category": "Workshop",
                            "materials": "A USB microphone"
                        }
                    ]
                }
            ]
        },
        "conclusion": "Publish early and keep going.",
        "next_steps": ["Record a pilot", "Share it with a friend"],
        "references": ["The Podcast Handbook"]
    })
}

/// A one-episode podcast whose slides carry three different visuals.
pub fn sample_podcast() -> Value {
    json!({
        "podcast": {
            "title": "The Curious Listener",
            "description": "Short episodes about everyday science.",
            "fullVideoUrl": "https://media.example.com/curious/full.mp4",
            "episodes": [
                {
                    "id": 1,
                    "title": "Why We Sleep",
                    "description": "What happens after lights out.",
                    "videoStructure": {
                        "slides": [
                            {
                                "id": 1,
                                "title": "Lights out",
                                "audioScript": "Every night your brain runs a cleanup shift.",
                                "visualContent": {
                                    "type": "process",
                                    "content": {
                                        "title": "A night in four stages",
                                        "steps": [
                                            {"title": "Drowsy"},
                                            {"title": "Light sleep"},
                                            {"title": "Deep sleep"},
                                            {"title": "REM"}
                                        ]
                                    }
                                }
                            },
                            {
                                "id": 2,
                                "title": "Sleep by the numbers",
                                "audioScript": "Most adults need more than they get.",
                                "visualContent": {
                                    "type": "key_stats",
                                    "content": {
                                        "title": "Sleep at a glance",
                                        "keyStats": [
                                            {"label": "Recommended", "value": "7-9 hours"},
                                            {"label": "Cycles per night", "value": "4-6"}
                                        ]
                                    }
                                }
                            },
                            {
                                "id": 3,
                                "title": "Who sleeps least",
                                "audioScript": "Teenagers top the chart.",
                                "visualContent": {
                                    "type": "bar_chart",
                                    "content": {
                                        "title": "Short sleepers by age",
                                        "data": [
                                            {"label": "Teens", "value": 31},
                                            {"label": "Adults", "value": 26}
                                        ]
                                    }
                                }
                            }
                        ]
                    }
                }
            ]
        }
    })
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Find an extracted field by path. Panics if not found.
pub fn field_at<'a>(fields: &'a [EditableField], path: &str) -> &'a EditableField {
    fields.iter().find(|f| f.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
        panic!("field '{path}' not found. Available: {paths:#?}")
    })
}

/// Find a scanned document by title. Panics if not found.
pub fn find_document<'a>(library: &'a Library, title: &str) -> &'a DocumentEntry {
    library
        .documents
        .iter()
        .find(|d| d.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = library.documents.iter().map(|d| d.title.as_str()).collect();
            panic!("document '{title}' not found. Available: {titles:?}")
        })
}

/// Titles of all scanned documents, in scan order.
pub fn document_titles(library: &Library) -> Vec<&str> {
    library.documents.iter().map(|d| d.title.as_str()).collect()
}
