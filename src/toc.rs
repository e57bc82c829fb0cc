//! Flat table-of-contents parser.
//!
//! Course outlines are often pasted as one run-on string:
//!
//! ```text
//! Module 1: Foundations 1.1: Welcome 1.2: Setup Module 2: Practice 2.1: Drills
//! ```
//!
//! [`parse_toc`] turns that into nested [`Module`]s. It is a heuristic, not a
//! grammar: the input is cut before every `Module N:` token, the module title
//! runs up to the first lesson marker (`X.Y:` or `X.Y.Z:`), and every lesson
//! runs from its marker to the next one.
//!
//! Nothing here fails. A segment that doesn't start with `Module N:` yields
//! no module and a lesson marker with no title after it is dropped.
//!
//! A title that itself contains marker-like text is split at that text:
//! `"Module 3: Chapter 1.1: History"` gives a module titled `"Chapter"` with
//! a lesson `1.1 History`.

use crate::types::{Lesson, Module, Topic};
use once_cell::sync::Lazy;
use regex::Regex;

static MODULE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Module\s+\d+:").unwrap());

static MODULE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Module\s+(\d+):").unwrap());

static LESSON_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?):").unwrap());

/// Parse a flat TOC string into modules with lessons.
///
/// Every lesson gets a single placeholder topic (id `"1"`, the lesson title,
/// no content) so the result renders like a fully authored outline.
pub fn parse_toc(text: &str) -> Vec<Module> {
    module_segments(text)
        .into_iter()
        .filter_map(parse_module)
        .collect()
}

/// Cut the input before every `Module N:` token. Text ahead of the first
/// token can never match a module header and is discarded here.
fn module_segments(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = MODULE_MARKER.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

fn parse_module(segment: &str) -> Option<Module> {
    let header = MODULE_HEADER.captures(segment)?;
    let number = header.get(1)?.as_str().to_string();
    let rest = &segment[header.get(0)?.end()..];

    let title_end = LESSON_MARKER.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    let title = rest[..title_end].trim().to_string();

    Some(Module {
        id: Some(number),
        title,
        description: None,
        lessons: parse_lessons(rest),
    })
}

fn parse_lessons(rest: &str) -> Vec<Lesson> {
    // (id, end of marker) for each marker, in order
    let markers: Vec<(&str, usize, usize)> = LESSON_MARKER
        .captures_iter(rest)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some((cap.get(1)?.as_str(), whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, &(id, _, body_start))| {
            let body_end = markers.get(i + 1).map(|m| m.1).unwrap_or(rest.len());
            let title = rest[body_start..body_end].trim();
            if title.is_empty() {
                return None;
            }
            Some(placeholder_lesson(id, title))
        })
        .collect()
}

fn placeholder_lesson(id: &str, title: &str) -> Lesson {
    Lesson {
        id: Some(id.to_string()),
        title: title.to_string(),
        topics: vec![Topic {
            id: Some("1".to_string()),
            title: title.to_string(),
            content: String::new(),
        }],
        ..Lesson::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(modules: &[Module]) -> Vec<&str> {
        modules.iter().filter_map(|m| m.id.as_deref()).collect()
    }

    fn lesson_ids(module: &Module) -> Vec<&str> {
        module.lessons.iter().filter_map(|l| l.id.as_deref()).collect()
    }

    #[test]
    fn two_modules_with_lessons() {
        let modules = parse_toc("Module 1: T1 1.1: L1 1.2: L2 Module 2: T2 2.1: L3");
        assert_eq!(modules.len(), 2);
        assert_eq!(ids(&modules), vec!["1", "2"]);
        assert_eq!(lesson_ids(&modules[0]), vec!["1.1", "1.2"]);
        assert_eq!(lesson_ids(&modules[1]), vec!["2.1"]);
        assert_eq!(modules[0].title, "T1");
        assert_eq!(modules[1].title, "T2");
        assert_eq!(modules[1].lessons[0].title, "L3");
    }

    #[test]
    fn lessons_get_a_placeholder_topic() {
        let modules = parse_toc("Module 1: Intro 1.1: Welcome aboard");
        let lesson = &modules[0].lessons[0];
        assert_eq!(lesson.topics.len(), 1);
        assert_eq!(lesson.topics[0].id.as_deref(), Some("1"));
        assert_eq!(lesson.topics[0].title, "Welcome aboard");
        assert!(lesson.topics[0].content.is_empty());
    }

    #[test]
    fn multi_word_titles_are_trimmed() {
        let modules =
            parse_toc("  Module 1:   Getting   Started  1.1:  Install the tools \n 1.2: First run ");
        assert_eq!(modules[0].title, "Getting   Started");
        assert_eq!(modules[0].lessons[0].title, "Install the tools");
        assert_eq!(modules[0].lessons[1].title, "First run");
    }

    #[test]
    fn three_level_lesson_ids() {
        let modules = parse_toc("Module 4: Deep 4.1.1: First 4.1.2: Second");
        assert_eq!(lesson_ids(&modules[0]), vec!["4.1.1", "4.1.2"]);
    }

    #[test]
    fn module_without_lessons() {
        let modules = parse_toc("Module 7: Wrap up");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].title, "Wrap up");
        assert!(modules[0].lessons.is_empty());
    }

    #[test]
    fn leading_text_is_ignored() {
        let modules = parse_toc("Course outline: Module 1: A 1.1: B");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].title, "A");
    }

    #[test]
    fn input_without_modules_yields_nothing() {
        assert!(parse_toc("").is_empty());
        assert!(parse_toc("1.1: Orphan lesson 1.2: Another").is_empty());
        assert!(parse_toc("Modules are listed elsewhere").is_empty());
    }

    #[test]
    fn lesson_marker_without_title_is_dropped() {
        let modules = parse_toc("Module 1: A 1.1: 1.2: Kept");
        assert_eq!(lesson_ids(&modules[0]), vec!["1.2"]);
    }

    #[test]
    fn marker_like_text_in_title_splits_it() {
        let modules = parse_toc("Module 3: Chapter 1.1: History");
        assert_eq!(modules[0].title, "Chapter");
        assert_eq!(lesson_ids(&modules[0]), vec!["1.1"]);
        assert_eq!(modules[0].lessons[0].title, "History");
    }

    #[test]
    fn module_ids_come_from_the_text_not_position() {
        let modules = parse_toc("Module 3: C Module 9: I");
        assert_eq!(ids(&modules), vec!["3", "9"]);
    }
}
