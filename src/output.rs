//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what an entity *is* (positional index and title) and
//! shows where it came from as indented context lines. The same two-level
//! pattern is used for documents, modules and fields:
//!
//! 1. **Header line**: positional index + title (+ optional detail)
//! 2. **Context lines**: indented `Source:`, `Path:`, `Value:` and so on
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Documents
//! 001 Podcasting Fundamentals (course: 2 modules, 3 lessons)
//!     Source: 010-intro-course.json
//! 002 scratch (unknown)
//!     Source: scratch.json
//!     Skipped: not a course or podcast
//!
//! Config
//!     coursecast.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Podcasting Fundamentals → intro-course.html
//!
//! Generated 1 course, 1 podcast
//! ```
//!
//! ## Fields
//!
//! ```text
//! Slides
//!     001 Slide 1 Title [text]
//!         Path: podcast.episodes[0].videoStructure.slides[0].title
//!         Value: Lights out
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::config::CONFIG_FILENAME;
use crate::document::DocumentKind;
use crate::fields::{EditableField, FieldCategory, FieldType};
use crate::generate::GenerateSummary;
use crate::layout::{InfographicLayout, LayoutSignals, SlideLayout, title_hash};
use crate::scan::{DocumentEntry, Library};
use crate::types::Module;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Planning (2 lessons)
/// 002 Recording
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// First line of `text`, cut to `max` characters with `...` appended.
fn truncate_desc(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    let cut = line.chars().count() > max || text.lines().nth(1).is_some();
    if line.chars().count() > max {
        format!("{}...", line.chars().take(max).collect::<String>())
    } else if cut {
        format!("{}...", line)
    } else {
        line.to_string()
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn document_detail(entry: &DocumentEntry) -> String {
    let c = entry.counts;
    match entry.kind {
        DocumentKind::Podcast => format!(
            "podcast: {}, {}",
            plural(c.episodes, "episode"),
            plural(c.slides, "slide")
        ),
        DocumentKind::Course => format!(
            "course: {}, {}",
            plural(c.modules, "module"),
            plural(c.lessons, "lesson")
        ),
        DocumentKind::Unknown => "unknown".to_string(),
    }
}

// ============================================================================
// toc
// ============================================================================

/// Modules and lessons parsed from a flat table of contents.
///
/// ```text
/// 001 Module 1: Basics (2 lessons)
///     1.1 Hello
///     1.2 World
/// ```
pub fn format_toc_outline(modules: &[Module]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, module) in modules.iter().enumerate() {
        let id = module.id.clone().unwrap_or_else(|| (i + 1).to_string());
        let title = format!("Module {}: {}", id, module.title);
        let count = plural(module.lessons.len(), "lesson");
        lines.push(entity_header(i + 1, &title, Some(&count)));
        for lesson in &module.lessons {
            let lesson_id = lesson.id.as_deref().unwrap_or("?");
            lines.push(format!("{}{} {}", indent(1), lesson_id, lesson.title));
        }
    }
    if lines.is_empty() {
        lines.push("No modules found".to_string());
    }
    lines
}

pub fn print_toc_outline(modules: &[Module]) {
    for line in format_toc_outline(modules) {
        println!("{}", line);
    }
}

// ============================================================================
// scan
// ============================================================================

/// Documents discovered under the source root, then the config file if any.
pub fn format_scan_output(library: &Library, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];

    for (i, entry) in library.documents.iter().enumerate() {
        lines.push(entity_header(i + 1, &entry.title, Some(&document_detail(entry))));
        lines.push(format!("{}Source: {}", indent(1), entry.path.display()));
        if entry.kind == DocumentKind::Unknown {
            lines.push(format!("{}Skipped: not a course or podcast", indent(1)));
        }
    }
    if library.documents.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join(CONFIG_FILENAME).exists() {
        lines.push(format!("{}{}", indent(1), CONFIG_FILENAME));
    } else {
        lines.push(format!("{}(defaults)", indent(1)));
    }

    lines
}

pub fn print_scan_output(library: &Library, source_root: &Path) {
    for line in format_scan_output(library, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];

    for (i, page) in summary.pages.iter().enumerate() {
        lines.push(format!(
            "{} \u{2192} {}",
            entity_header(i + 1, &page.title, None),
            page.file.display()
        ));
    }

    if !summary.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for path in &summary.skipped {
            lines.push(format!("{}{}", indent(1), path.display()));
        }
    }

    let courses = summary
        .pages
        .iter()
        .filter(|p| p.kind == DocumentKind::Course)
        .count();
    let podcasts = summary
        .pages
        .iter()
        .filter(|p| p.kind == DocumentKind::Podcast)
        .count();
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(courses, "course"),
        plural(podcasts, "podcast"),
        summary.output_dir.display()
    ));

    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// fields
// ============================================================================

fn type_tag(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "text",
        FieldType::Textarea => "textarea",
        FieldType::Number => "number",
        FieldType::Url => "url",
    }
}

/// Fields grouped by category, in extraction order within each group.
pub fn format_fields(fields: &[EditableField], only: Option<FieldCategory>) -> Vec<String> {
    let mut lines = Vec::new();

    for category in FieldCategory::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        let group: Vec<&EditableField> =
            fields.iter().filter(|f| f.category == category).collect();
        if group.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(category.label().to_string());
        for (i, field) in group.iter().enumerate() {
            lines.push(format!(
                "{}{} [{}]",
                indent(1),
                entity_header(i + 1, &field.label, None),
                type_tag(field.field_type)
            ));
            lines.push(format!("{}Path: {}", indent(2), field.path));
            lines.push(format!("{}Value: {}", indent(2), truncate_desc(&field.value, 60)));
        }
    }

    if lines.is_empty() {
        lines.push("No editable fields".to_string());
    }
    lines
}

pub fn print_fields(fields: &[EditableField], only: Option<FieldCategory>) {
    for line in format_fields(fields, only) {
        println!("{}", line);
    }
}

pub fn format_field_update(path: &str, value: &str, file: &Path) -> Vec<String> {
    vec![
        format!("Updated {}", path),
        format!("{}Value: {}", indent(1), truncate_desc(value, 60)),
        format!("{}Saved: {}", indent(1), file.display()),
    ]
}

pub fn print_field_update(path: &str, value: &str, file: &Path) {
    for line in format_field_update(path, value, file) {
        println!("{}", line);
    }
}

// ============================================================================
// layout
// ============================================================================

pub fn format_layout_report(
    title: &str,
    signals: LayoutSignals,
    slide: SlideLayout,
    infographic: InfographicLayout,
) -> Vec<String> {
    let slide_index = SlideLayout::ALL.iter().position(|l| *l == slide).unwrap_or(0);
    let infographic_index = InfographicLayout::ALL
        .iter()
        .position(|l| *l == infographic)
        .unwrap_or(0);
    vec![
        format!("Title: {}", title),
        format!("{}Hash: {}", indent(1), title_hash(title)),
        format!(
            "{}Slide layout: {} {} (points {}, subtitle {})",
            indent(1),
            slide_index,
            slide.name(),
            signals.point_count,
            signals.subtitle_len
        ),
        format!(
            "{}Infographic layout: {} {}",
            indent(1),
            infographic_index,
            infographic.name()
        ),
    ]
}

pub fn print_layout_report(
    title: &str,
    signals: LayoutSignals,
    slide: SlideLayout,
    infographic: InfographicLayout,
) {
    for line in format_layout_report(title, signals, slide, infographic) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
