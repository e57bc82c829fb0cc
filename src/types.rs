//! Document types shared by the parser, synthesizer, field editor and renderer.
//!
//! Persisted documents are loosely shaped JSON written by an authoring UI:
//! ids are sometimes numbers, optional texts are sometimes empty strings, and
//! lesson fields are either one text or a list of texts. Deserialization is
//! therefore lenient everywhere. A field of the wrong shape becomes its
//! default instead of failing the whole document, and a list element that
//! doesn't fit is dropped.
//!
//! Two document families exist:
//!
//! ```text
//! Course   { title, number, abstract, introduction, conclusion,
//!            modules | main_body.modules | table_of_contents,
//!            next_steps, references, markdown_document }
//! Podcast  { podcast: { title, description, fullVideoUrl,
//!            episodes: [{ id, title, description,
//!                         videoStructure: { slides: [...] } }] } }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Course documents
// ============================================================================

/// A course document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        alias = "course_number",
        alias = "courseNumber",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    #[serde(
        rename = "abstract",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(
        default,
        alias = "nextSteps",
        deserialize_with = "lenient_text_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_steps: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub references: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<Module>,
    #[serde(default, deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub main_body: Option<MainBody>,
    #[serde(default, deserialize_with = "lenient_toc", skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<TableOfContents>,
    /// Pre-rendered markdown. When present it is the document's markdown.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub markdown_document: Option<String>,
}

/// The `main_body` wrapper used by generated course documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainBody {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(
        default,
        rename = "timeBlock",
        alias = "time_block",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_block: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub objectives: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub activities: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub materials: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub assessment: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_text_or_list", skip_serializing_if = "Option::is_none")]
    pub homework: Option<TextOrList>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
}

/// A generic titled section, the third `table_of_contents` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// The three shapes `table_of_contents` comes in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableOfContents {
    /// Nested `[{ title, lessons: [...] }]`.
    Modules(Vec<Module>),
    /// `"Module 1: Intro 1.1: Welcome ..."`, parsed by [`crate::toc::parse_toc`].
    Flat(String),
    /// `[{ title, content }]` without lessons.
    Sections(Vec<Section>),
}

impl TableOfContents {
    /// Classify a raw `table_of_contents` value. Arrays whose elements carry
    /// `lessons` are modules, other arrays are sections.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self::Flat(s.clone())),
            Value::Array(items) if !items.is_empty() => {
                let nested = items.iter().any(|item| item.get("lessons").is_some());
                if nested {
                    Some(Self::Modules(collect_lenient(items)))
                } else {
                    Some(Self::Sections(collect_lenient(items)))
                }
            }
            _ => None,
        }
    }
}

/// Lesson and course fields that are written either as prose or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let list: Vec<String> = items.iter().filter_map(text_of).collect();
                (!list.is_empty()).then_some(Self::List(list))
            }
            other => text_of(other).map(Self::Text),
        }
    }
}

// ============================================================================
// Podcast documents
// ============================================================================

/// Top-level `{ "podcast": { ... } }` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodcastDocument {
    #[serde(default)]
    pub podcast: Podcast,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "fullVideoUrl",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_video_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "videoStructure", deserialize_with = "lenient_option_default")]
    pub video_structure: VideoStructure,
}

impl Episode {
    pub fn slides(&self) -> &[Slide] {
        &self.video_structure.slides
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStructure {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(
        default,
        rename = "audioScript",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_script: Option<String>,
    /// Explicit layout choice. Takes precedence over the title hash.
    #[serde(
        default,
        rename = "layoutIndex",
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout_index: Option<usize>,
    /// Raw payload; interpret with [`crate::visual::VisualContent::from_value`].
    #[serde(default, rename = "visualContent", skip_serializing_if = "Value::is_null")]
    pub visual_content: Value,
}

// ============================================================================
// Lenient deserialization helpers
// ============================================================================

/// Non-empty string or number as text. Everything else is absent.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn collect_lenient<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(text_of(&value))
}

pub(crate) fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_string(d)?.unwrap_or_default())
}

pub(crate) fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Array(items) => Ok(collect_lenient(&items)),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn lenient_option<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).ok())
}

pub(crate) fn lenient_option_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_option(d)?.unwrap_or_default())
}

pub(crate) fn lenient_text_or_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TextOrList>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(TextOrList::from_value(&value))
}

pub(crate) fn lenient_toc<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TableOfContents>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(TableOfContents::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_become_strings() {
        let module: Module = serde_json::from_value(json!({"id": 3, "title": "Three"})).unwrap();
        assert_eq!(module.id.as_deref(), Some("3"));
    }

    #[test]
    fn empty_strings_are_absent() {
        let course: Course =
            serde_json::from_value(json!({"title": "", "abstract": "Short"})).unwrap();
        assert_eq!(course.title, None);
        assert_eq!(course.summary.as_deref(), Some("Short"));
    }

    #[test]
    fn wrong_shapes_fall_back_to_defaults() {
        let course: Course = serde_json::from_value(json!({
            "title": {"nested": true},
            "modules": "not a list",
            "main_body": 42
        }))
        .unwrap();
        assert_eq!(course.title, None);
        assert!(course.modules.is_empty());
        assert_eq!(course.main_body, None);
    }

    #[test]
    fn malformed_list_items_are_dropped() {
        let module: Module = serde_json::from_value(json!({
            "title": "M",
            "lessons": [{"title": "ok"}, "junk", 7]
        }))
        .unwrap();
        assert_eq!(module.lessons.len(), 1);
        assert_eq!(module.lessons[0].title, "ok");
    }

    #[test]
    fn lesson_fields_accept_text_or_list() {
        let lesson: Lesson = serde_json::from_value(json!({
            "title": "L",
            "objectives": ["Read", "Write"],
            "homework": "Essay",
            "timeBlock": "30 min"
        }))
        .unwrap();
        assert_eq!(
            lesson.objectives,
            Some(TextOrList::List(vec!["Read".into(), "Write".into()]))
        );
        assert_eq!(lesson.homework, Some(TextOrList::Text("Essay".into())));
        assert_eq!(lesson.time_block.as_deref(), Some("30 min"));
    }

    #[test]
    fn table_of_contents_shapes() {
        let flat = TableOfContents::from_value(&json!("Module 1: A 1.1: B"));
        assert!(matches!(flat, Some(TableOfContents::Flat(_))));

        let nested = TableOfContents::from_value(&json!([{"title": "M", "lessons": []}]));
        assert!(matches!(nested, Some(TableOfContents::Modules(m)) if m.len() == 1));

        let sections = TableOfContents::from_value(&json!([{"title": "S", "content": "C"}]));
        assert!(matches!(sections, Some(TableOfContents::Sections(s)) if s.len() == 1));

        assert_eq!(TableOfContents::from_value(&json!(12)), None);
        assert_eq!(TableOfContents::from_value(&json!([])), None);
    }

    #[test]
    fn podcast_slides_parse_with_camel_case_keys() {
        let doc: PodcastDocument = serde_json::from_value(json!({
            "podcast": {
                "title": "Show",
                "fullVideoUrl": "https://example.com/v.mp4",
                "episodes": [{
                    "id": 1,
                    "title": "Ep",
                    "videoStructure": {"slides": [
                        {"id": "s1", "title": "Intro", "audioScript": "Hello", "layoutIndex": 2}
                    ]}
                }]
            }
        }))
        .unwrap();
        let episode = &doc.podcast.episodes[0];
        assert_eq!(episode.id.as_deref(), Some("1"));
        assert_eq!(episode.slides()[0].audio_script.as_deref(), Some("Hello"));
        assert_eq!(episode.slides()[0].layout_index, Some(2));
        assert_eq!(
            doc.podcast.full_video_url.as_deref(),
            Some("https://example.com/v.mp4")
        );
    }

    #[test]
    fn episode_without_video_structure_has_no_slides() {
        let episode: Episode =
            serde_json::from_value(json!({"title": "E", "videoStructure": null})).unwrap();
        assert!(episode.slides().is_empty());
    }
}
