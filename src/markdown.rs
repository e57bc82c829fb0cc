//! Markdown synthesis for course and podcast documents.
//!
//! A course document is flattened into one markdown string in a fixed order:
//!
//! ```text
//! # Title
//! **Course Number:** ...
//! ## Abstract
//! ## Introduction
//! ## Table of Contents        (listing of modules and lessons)
//! ## Module 1: ...            (detailed modules, lessons, topics)
//! ## Conclusion
//! ## Next Steps / References
//! ```
//!
//! Every part is skipped when its source field is missing or empty. Embedded
//! markdown is passed through untouched: sanitizing the rendered HTML is the
//! caller's job.
//!
//! Documents that already carry a `markdown_document` string short-circuit to
//! that string verbatim, so feeding synthesized output back in is a no-op.

use crate::config::MarkdownConfig;
use crate::document::{self, DocumentKind};
use crate::toc::parse_toc;
use crate::types::{
    Course, Lesson, Module, Podcast, PodcastDocument, Section, TableOfContents, TextOrList,
};
use crate::visual::VisualContent;
use serde_json::Value;

/// Returned when a document has nothing to render.
pub const NO_CONTENT: &str = "No content available";

/// The detailed body of a course, after resolving its several possible
/// sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Modules(Vec<Module>),
    Sections(Vec<Section>),
    Empty,
}

impl Outline {
    /// First non-empty source wins: `modules`, `main_body.modules`, then
    /// `table_of_contents` in whichever shape it has.
    pub fn of(course: &Course) -> Self {
        if !course.modules.is_empty() {
            return Self::Modules(course.modules.clone());
        }
        if let Some(body) = &course.main_body {
            if !body.modules.is_empty() {
                return Self::Modules(body.modules.clone());
            }
        }
        match &course.table_of_contents {
            Some(TableOfContents::Modules(modules)) if !modules.is_empty() => {
                Self::Modules(modules.clone())
            }
            Some(TableOfContents::Flat(text)) => {
                let modules = parse_toc(text);
                if modules.is_empty() {
                    Self::Empty
                } else {
                    Self::Modules(modules)
                }
            }
            Some(TableOfContents::Sections(sections)) if !sections.is_empty() => {
                Self::Sections(sections.clone())
            }
            _ => Self::Empty,
        }
    }
}

/// Synthesize markdown with default options.
pub fn synthesize(document: &Value) -> String {
    synthesize_with(document, &MarkdownConfig::default())
}

/// Synthesize markdown for a course-shaped JSON value.
pub fn synthesize_with(document: &Value, options: &MarkdownConfig) -> String {
    if is_blank(document) {
        return options.empty_message.clone();
    }
    let Ok(course) = serde_json::from_value::<Course>(document.clone()) else {
        return options.empty_message.clone();
    };
    if let Some(markdown) = &course.markdown_document {
        return markdown.clone();
    }
    let markdown = course_markdown(&course, options);
    if markdown.trim().is_empty() {
        options.empty_message.clone()
    } else {
        markdown
    }
}

/// Markdown for any loaded document: podcasts as a script, everything else
/// through the course synthesizer.
pub fn document_markdown(document: &Value, options: &MarkdownConfig) -> String {
    match document::classify(document) {
        DocumentKind::Podcast => match serde_json::from_value::<PodcastDocument>(document.clone()) {
            Ok(doc) => podcast_markdown(&doc.podcast, options),
            Err(_) => options.empty_message.clone(),
        },
        DocumentKind::Course | DocumentKind::Unknown => synthesize_with(document, options),
    }
}

fn is_blank(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Render a typed course. Ignores `markdown_document`.
pub fn course_markdown(course: &Course, options: &MarkdownConfig) -> String {
    let mut out = String::new();

    if let Some(title) = &course.title {
        out.push_str(&format!("# {}\n\n", title));
    }
    if let Some(number) = &course.number {
        out.push_str(&format!("**Course Number:** {}\n\n", number));
    }
    push_section(&mut out, "Abstract", course.summary.as_deref());
    push_section(&mut out, "Introduction", course.introduction.as_deref());

    let outline = Outline::of(course);
    if options.include_toc {
        push_toc_listing(&mut out, &outline);
    }
    match &outline {
        Outline::Modules(modules) => {
            for (i, module) in modules.iter().enumerate() {
                push_module(&mut out, module, i);
            }
        }
        Outline::Sections(sections) => {
            for section in sections {
                push_section(&mut out, &section.title, section.content.as_deref());
            }
        }
        Outline::Empty => {}
    }

    push_section(&mut out, "Conclusion", course.conclusion.as_deref());
    if options.include_appendix {
        push_text_or_list_section(&mut out, "Next Steps", course.next_steps.as_ref());
        push_text_or_list_section(&mut out, "References", course.references.as_ref());
    }

    finish(out)
}

/// Render a podcast as a readable script: episodes, slides, narration.
pub fn podcast_markdown(podcast: &Podcast, options: &MarkdownConfig) -> String {
    let mut out = String::new();

    if !podcast.title.is_empty() {
        out.push_str(&format!("# {}\n\n", podcast.title));
    }
    if let Some(description) = &podcast.description {
        out.push_str(&format!("{}\n\n", description));
    }
    if let Some(url) = &podcast.full_video_url {
        out.push_str(&format!("**Full Video:** <{}>\n\n", url));
    }

    for (e, episode) in podcast.episodes.iter().enumerate() {
        out.push_str(&format!("## Episode {}: {}\n\n", e + 1, episode.title));
        if let Some(description) = &episode.description {
            out.push_str(&format!("{}\n\n", description));
        }
        for (s, slide) in episode.slides().iter().enumerate() {
            out.push_str(&format!("### Slide {}: {}\n\n", s + 1, slide.title));
            let visual = VisualContent::from_value(&slide.visual_content);
            if !visual.kind_name().is_empty() {
                out.push_str(&format!("*Visual: {}*\n\n", visual.kind_name()));
            }
            if let Some(script) = &slide.audio_script {
                out.push_str(&format!("{}\n\n", script));
            }
        }
    }

    let markdown = finish(out);
    if markdown.is_empty() {
        options.empty_message.clone()
    } else {
        markdown
    }
}

fn finish(out: String) -> String {
    let trimmed = out.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

// ============================================================================
// Fragments
// ============================================================================

fn module_id(module: &Module, index: usize) -> String {
    module.id.clone().unwrap_or_else(|| (index + 1).to_string())
}

fn lesson_id(lesson: &Lesson, module_id: &str, index: usize) -> String {
    lesson
        .id
        .clone()
        .unwrap_or_else(|| format!("{}.{}", module_id, index + 1))
}

fn push_section(out: &mut String, heading: &str, body: Option<&str>) {
    if let Some(body) = body {
        out.push_str(&format!("## {}\n\n{}\n\n", heading, body));
    }
}

fn push_text_or_list_section(out: &mut String, heading: &str, body: Option<&TextOrList>) {
    match body {
        Some(TextOrList::Text(text)) => push_section(out, heading, Some(text)),
        Some(TextOrList::List(items)) => {
            out.push_str(&format!("## {}\n\n", heading));
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
        }
        None => {}
    }
}

fn push_toc_listing(out: &mut String, outline: &Outline) {
    match outline {
        Outline::Modules(modules) => {
            out.push_str("## Table of Contents\n\n");
            for (i, module) in modules.iter().enumerate() {
                let id = module_id(module, i);
                out.push_str(&format!("- **Module {}:** {}\n", id, module.title));
                for (j, lesson) in module.lessons.iter().enumerate() {
                    out.push_str(&format!(
                        "  - {}: {}\n",
                        lesson_id(lesson, &id, j),
                        lesson.title
                    ));
                }
            }
            out.push('\n');
        }
        Outline::Sections(sections) => {
            out.push_str("## Table of Contents\n\n");
            for section in sections {
                out.push_str(&format!("- {}\n", section.title));
            }
            out.push('\n');
        }
        Outline::Empty => {}
    }
}

fn push_module(out: &mut String, module: &Module, index: usize) {
    let id = module_id(module, index);
    out.push_str(&format!("## Module {}: {}\n\n", id, module.title));
    if let Some(description) = &module.description {
        out.push_str(&format!("{}\n\n", description));
    }
    for (j, lesson) in module.lessons.iter().enumerate() {
        push_lesson(out, lesson, &lesson_id(lesson, &id, j));
    }
}

fn push_lesson(out: &mut String, lesson: &Lesson, id: &str) {
    out.push_str(&format!("### {}: {}\n\n", id, lesson.title));

    if let Some(time_block) = &lesson.time_block {
        out.push_str(&format!("**Time Block:** {}\n\n", time_block));
    }
    if let Some(category) = &lesson.category {
        out.push_str(&format!("**Category:** {}\n\n", category));
    }
    push_labeled(out, "Objectives", lesson.objectives.as_ref());
    push_labeled(out, "Activities", lesson.activities.as_ref());
    push_labeled(out, "Materials", lesson.materials.as_ref());
    push_labeled(out, "Assessment", lesson.assessment.as_ref());
    push_labeled(out, "Homework", lesson.homework.as_ref());

    for topic in &lesson.topics {
        if topic.title.is_empty() && topic.content.is_empty() {
            continue;
        }
        if !topic.title.is_empty() {
            out.push_str(&format!("**{}**\n\n", topic.title));
        }
        if !topic.content.is_empty() {
            out.push_str(&format!("{}\n\n", topic.content));
        }
        out.push_str("---\n\n");
    }
}

/// `**Label:** text` for prose, `**Label:**` plus bullets for lists.
fn push_labeled(out: &mut String, label: &str, value: Option<&TextOrList>) {
    match value {
        Some(TextOrList::Text(text)) => out.push_str(&format!("**{}:** {}\n\n", label, text)),
        Some(TextOrList::List(items)) => {
            out.push_str(&format!("**{}:**\n\n", label));
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
        }
        None => {}
    }
}
