//! Editable fields: flatten a document into (path, value) pairs and write
//! values back by path.
//!
//! [`extract_fields`] walks the known document shapes depth-first and emits
//! one [`EditableField`] per string or number leaf. Fields are a view: they
//! are rebuilt on every extraction and never stored.
//!
//! Paths use dots for keys and brackets for array indices:
//!
//! ```text
//! podcast.episodes[0].videoStructure.slides[2].visualContent.content.keyStats[1].value
//! main_body.modules[1].lessons[0].objectives[2]
//! slides[0].visualContent.content.labels["U.S."]
//! ```
//!
//! Keys that aren't plain identifiers (dots, brackets, spaces, empty or all
//! digits) are written as quoted brackets so every extracted path leads back
//! to the same value.
//!
//! [`update_field`] is forgiving. Missing containers along the path are
//! created, values that look like JSON arrays or objects are stored parsed,
//! and a path that can't be followed leaves the document untouched.
//! [`apply_field`] is the same operation with the failure reported.

use crate::document::{self, DocumentKind};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How far past the end of an array a write may land. Gaps are filled
/// with `null`.
pub const MAX_ARRAY_GROWTH: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Empty field path")]
    EmptyPath,
    #[error("Cannot descend into {found} at '{segment}'")]
    NotAContainer { segment: String, found: &'static str },
    #[error("Array index {index} is too far past the end (length {len})")]
    IndexTooLarge { index: usize, len: usize },
}

/// Coarse grouping of fields by where they live in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FieldCategory {
    Podcast,
    Episodes,
    Slides,
    #[serde(rename = "Visual Content")]
    VisualContent,
    Statistics,
    Data,
    Course,
    Modules,
    Lessons,
    Topics,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 10] = [
        FieldCategory::Podcast,
        FieldCategory::Episodes,
        FieldCategory::Slides,
        FieldCategory::VisualContent,
        FieldCategory::Statistics,
        FieldCategory::Data,
        FieldCategory::Course,
        FieldCategory::Modules,
        FieldCategory::Lessons,
        FieldCategory::Topics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::Podcast => "Podcast",
            FieldCategory::Episodes => "Episodes",
            FieldCategory::Slides => "Slides",
            FieldCategory::VisualContent => "Visual Content",
            FieldCategory::Statistics => "Statistics",
            FieldCategory::Data => "Data",
            FieldCategory::Course => "Course",
            FieldCategory::Modules => "Modules",
            FieldCategory::Lessons => "Lessons",
            FieldCategory::Topics => "Topics",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FieldCategory {
    type Err = String;

    /// Case-insensitive; spaces, dashes and underscores are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|c| squash(c.label()) == wanted)
            .ok_or_else(|| format!("unknown field category '{s}'"))
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Editor widget hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableField {
    /// Path with separators replaced, usable as an HTML id.
    pub id: String,
    pub label: String,
    pub value: String,
    pub path: String,
    pub category: FieldCategory,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Breadcrumb of the owning episode/slide or module/lesson.
    pub context: String,
}

// ============================================================================
// Extraction
// ============================================================================

/// Flatten a podcast or course document into editable fields.
pub fn extract_fields(document: &Value) -> Vec<EditableField> {
    let mut collector = Collector::default();
    match document::classify(document) {
        DocumentKind::Podcast => collector.podcast(document),
        DocumentKind::Course | DocumentKind::Unknown => collector.course(document),
    }
    collector.fields
}

/// Find the field at `path` in an extraction result.
pub fn find_field<'a>(fields: &'a [EditableField], path: &str) -> Option<&'a EditableField> {
    fields.iter().find(|f| f.path == path)
}

/// Keys whose values are long-form prose.
const LONG_FORM_KEYS: &[&str] = &[
    "description",
    "audioScript",
    "content",
    "abstract",
    "introduction",
    "conclusion",
    "next_steps",
    "table_of_contents",
];

#[derive(Default)]
struct Collector {
    fields: Vec<EditableField>,
}

impl Collector {
    fn push(
        &mut self,
        path: String,
        label: String,
        value: &Value,
        category: FieldCategory,
        context: &str,
    ) {
        let (text, field_type) = match value {
            Value::String(s) => (s.clone(), text_type(&last_key(&path), s)),
            Value::Number(n) => (n.to_string(), FieldType::Number),
            _ => return,
        };
        self.fields.push(EditableField {
            id: path_id(&path),
            label,
            value: text,
            path,
            category,
            field_type,
            context: context.to_string(),
        });
    }

    fn leaf(
        &mut self,
        parent: &Value,
        parent_path: &str,
        key: &str,
        label: String,
        category: FieldCategory,
        context: &str,
    ) {
        if let Some(value) = parent.get(key) {
            self.push(join(parent_path, key), label, value, category, context);
        }
    }

    /// A key holding either one text or a list of texts.
    fn text_or_list(
        &mut self,
        parent: &Value,
        parent_path: &str,
        key: &str,
        label: &str,
        category: FieldCategory,
        context: &str,
    ) {
        let path = join(parent_path, key);
        match parent.get(key) {
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let item_label = format!("{} {}", label, i + 1);
                    self.push(format!("{path}[{i}]"), item_label, item, category, context);
                }
            }
            Some(value) => self.push(path, label.to_string(), value, category, context),
            None => {}
        }
    }

    /// Every leaf below `value`.
    fn walk(
        &mut self,
        value: &Value,
        path: &str,
        label: &str,
        category: FieldCategory,
        context: &str,
    ) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_label = format!("{} {}", label, humanize(key));
                    self.walk(child, &join(path, key), &child_label, category, context);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_label = format!("{} {}", label, i + 1);
                    self.walk(item, &format!("{path}[{i}]"), &item_label, category, context);
                }
            }
            leaf => self.push(path.to_string(), label.to_string(), leaf, category, context),
        }
    }

    fn podcast(&mut self, document: &Value) {
        let Some(podcast) = document.get("podcast") else {
            return;
        };
        for (key, label) in [
            ("title", "Podcast Title"),
            ("description", "Podcast Description"),
            ("fullVideoUrl", "Full Video URL"),
        ] {
            self.leaf(podcast, "podcast", key, label.to_string(), FieldCategory::Podcast, "Podcast");
        }

        for (e, episode) in items_of(podcast.get("episodes")).iter().enumerate() {
            let episode_path = format!("podcast.episodes[{e}]");
            let context = format!("Episode {}", e + 1);
            for key in ["title", "description"] {
                let label = format!("{} {}", context, humanize(key));
                self.leaf(episode, &episode_path, key, label, FieldCategory::Episodes, &context);
            }

            let slides = items_of(episode.pointer("/videoStructure/slides"));
            for (s, slide) in slides.iter().enumerate() {
                self.slide(slide, &format!("{episode_path}.videoStructure.slides[{s}]"), e, s);
            }
        }
    }

    fn slide(&mut self, slide: &Value, slide_path: &str, episode: usize, index: usize) {
        let context = format!("Episode {} \u{203a} Slide {}", episode + 1, index + 1);
        let prefix = format!("Slide {}", index + 1);
        for key in ["title", "audioScript"] {
            let label = format!("{} {}", prefix, humanize(key));
            self.leaf(slide, slide_path, key, label, FieldCategory::Slides, &context);
        }

        let Some(visual) = slide.get("visualContent").filter(|v| v.is_object()) else {
            return;
        };
        let visual_path = join(slide_path, "visualContent");
        self.leaf(
            visual,
            &visual_path,
            "type",
            format!("{prefix} Visual Type"),
            FieldCategory::VisualContent,
            &context,
        );
        if let Some(Value::Object(content)) = visual.get("content") {
            let visual_prefix = format!("{prefix} Visual");
            self.visual_payload(content, &join(&visual_path, "content"), &visual_prefix, &context);
        }
    }

    fn visual_payload(
        &mut self,
        content: &Map<String, Value>,
        path: &str,
        prefix: &str,
        context: &str,
    ) {
        for (key, value) in content {
            let category = match key.as_str() {
                "keyStats" | "key_stats" | "stats" => FieldCategory::Statistics,
                "data" => FieldCategory::Data,
                _ => FieldCategory::VisualContent,
            };
            let label = format!("{} {}", prefix, humanize(key));
            self.walk(value, &join(path, key), &label, category, context);
        }
    }

    fn course(&mut self, document: &Value) {
        for (key, label) in [
            ("title", "Course Title"),
            ("number", "Course Number"),
            ("course_number", "Course Number"),
            ("abstract", "Abstract"),
            ("introduction", "Introduction"),
            ("conclusion", "Conclusion"),
        ] {
            self.leaf(document, "", key, label.to_string(), FieldCategory::Course, "Course");
        }
        if let Some(toc @ Value::String(_)) = document.get("table_of_contents") {
            self.push(
                "table_of_contents".to_string(),
                "Table of Contents".to_string(),
                toc,
                FieldCategory::Course,
                "Course",
            );
        }
        self.text_or_list(document, "", "next_steps", "Next Steps", FieldCategory::Course, "Course");
        self.text_or_list(document, "", "references", "References", FieldCategory::Course, "Course");

        let Some((modules_path, modules)) = course_modules(document) else {
            return;
        };
        for (m, module) in modules.iter().enumerate() {
            let module_path = format!("{modules_path}[{m}]");
            let module_id = id_text(module).unwrap_or_else(|| (m + 1).to_string());
            let context = format!("Module {module_id}");
            for key in ["title", "description"] {
                let label = format!("{} {}", context, humanize(key));
                self.leaf(module, &module_path, key, label, FieldCategory::Modules, &context);
            }
            for (l, lesson) in items_of(module.get("lessons")).iter().enumerate() {
                let lesson_id =
                    id_text(lesson).unwrap_or_else(|| format!("{}.{}", module_id, l + 1));
                self.lesson(lesson, &format!("{module_path}.lessons[{l}]"), &module_id, &lesson_id);
            }
        }
    }

    fn lesson(&mut self, lesson: &Value, lesson_path: &str, module_id: &str, lesson_id: &str) {
        let context = format!("Module {module_id} \u{203a} Lesson {lesson_id}");
        let prefix = format!("Lesson {lesson_id}");
        for key in ["title", "timeBlock", "time_block", "category"] {
            let label = format!("{} {}", prefix, humanize(key));
            self.leaf(lesson, lesson_path, key, label, FieldCategory::Lessons, &context);
        }
        for key in ["objectives", "activities", "materials", "assessment", "homework"] {
            let label = format!("{} {}", prefix, humanize(key));
            self.text_or_list(lesson, lesson_path, key, &label, FieldCategory::Lessons, &context);
        }
        for (t, topic) in items_of(lesson.get("topics")).iter().enumerate() {
            let topic_path = format!("{lesson_path}.topics[{t}]");
            for key in ["title", "content"] {
                let label = format!("{} Topic {} {}", prefix, t + 1, humanize(key));
                self.leaf(topic, &topic_path, key, label, FieldCategory::Topics, &context);
            }
        }
    }
}

/// Where a course keeps its modules, in the same precedence the markdown
/// synthesizer uses.
fn course_modules(document: &Value) -> Option<(&'static str, &[Value])> {
    [
        ("modules", document.get("modules")),
        ("main_body.modules", document.pointer("/main_body/modules")),
        ("table_of_contents", document.get("table_of_contents")),
    ]
    .into_iter()
    .find_map(|(path, value)| {
        let items = items_of(value);
        (!items.is_empty()).then_some((path, items))
    })
}

fn items_of(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn id_text(value: &Value) -> Option<String> {
    crate::types::text_of(value.get("id")?)
}

/// Append `key` to `parent`. Keys that wouldn't survive [`parse_path`]
/// (dots, brackets, spaces, empty, all digits) are written as a quoted
/// bracket segment: `content["U.S."]`.
fn join(parent: &str, key: &str) -> String {
    if !is_plain_key(key) {
        format!("{parent}[{}]", quote_key(key))
    } else if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key.bytes().all(|b| b.is_ascii_digit())
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn quote_key(key: &str) -> String {
    let mut quoted = String::with_capacity(key.len() + 2);
    quoted.push('"');
    for c in key.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Last object key on a path, ignoring trailing indices.
fn last_key(path: &str) -> String {
    parse_path(path)
        .ok()
        .and_then(|segments| {
            segments.into_iter().rev().find_map(|segment| match segment {
                PathSegment::Key(key) => Some(key),
                PathSegment::Index(_) => None,
            })
        })
        .unwrap_or_default()
}

fn text_type(key: &str, text: &str) -> FieldType {
    let lower = key.to_ascii_lowercase();
    if lower.ends_with("url") || text.starts_with("http://") || text.starts_with("https://") {
        FieldType::Url
    } else if LONG_FORM_KEYS.contains(&key) || text.contains('\n') || text.chars().count() > 120 {
        FieldType::Textarea
    } else {
        FieldType::Text
    }
}

/// `podcast.episodes[0].title` → `podcast-episodes-0-title`
fn path_id(path: &str) -> String {
    let mut id = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c);
        } else if !id.ends_with('-') {
            id.push('-');
        }
    }
    id.trim_matches('-').to_string()
}

/// `audioScript` → `Audio Script`, `time_block` → `Time Block`
fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    fn from_token(token: &str) -> Self {
        match token.parse::<usize>() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(token.to_string()),
        }
    }

    fn as_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

/// Split a dotted/bracket path into segments.
///
/// Unquoted numeric tokens are indices wherever they appear (`a.0` and
/// `a[0]` are the same). A quoted bracket (`a["U.S."]`, `a['']`) is always a
/// key, taken verbatim with a backslash escaping the quote or itself. Empty
/// unquoted tokens are skipped and an unclosed bracket is kept as part of a
/// key.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, FieldError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut pos = 0;

    while let Some(c) = path[pos..].chars().next() {
        match c {
            '.' => {
                flush_token(&mut current, &mut segments);
                pos += 1;
            }
            '[' => {
                flush_token(&mut current, &mut segments);
                match bracket_segment(&path[pos + 1..]) {
                    Some((segment, used)) => {
                        segments.extend(segment);
                        pos += 1 + used;
                    }
                    None => {
                        current.push_str(&path[pos..]);
                        pos = path.len();
                    }
                }
            }
            _ => {
                current.push(c);
                pos += c.len_utf8();
            }
        }
    }
    flush_token(&mut current, &mut segments);

    if segments.is_empty() {
        return Err(FieldError::EmptyPath);
    }
    Ok(segments)
}

/// Parse the inside of a bracket, `rest` starting just after `[`. Returns the
/// segment (none for `[]`) and the bytes used including `]`, or `None` when
/// the bracket never closes.
fn bracket_segment(rest: &str) -> Option<(Option<PathSegment>, usize)> {
    let body = rest.trim_start();
    let lead = rest.len() - body.len();

    match body.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let mut key = String::new();
            let mut escaped = false;
            for (i, c) in body.char_indices().skip(1) {
                if escaped {
                    key.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    let after = &body[i + 1..];
                    let tail = after.trim_start();
                    if !tail.starts_with(']') {
                        return None;
                    }
                    let used = lead + i + 1 + (after.len() - tail.len()) + 1;
                    return Some((Some(PathSegment::Key(key)), used));
                } else {
                    key.push(c);
                }
            }
            None
        }
        _ => {
            let end = rest.find(']')?;
            let token = rest[..end].trim();
            let segment = (!token.is_empty()).then(|| PathSegment::from_token(token));
            Some((segment, end + 1))
        }
    }
}

fn flush_token(current: &mut String, segments: &mut Vec<PathSegment>) {
    let token = current.trim();
    if !token.is_empty() {
        segments.push(PathSegment::from_token(token));
    }
    current.clear();
}

/// Interpret editor input: array/object literals are parsed, everything else
/// (including malformed literals) stays a string.
pub fn parse_field_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str(trimmed) {
            return parsed;
        }
    }
    Value::String(raw.to_string())
}

/// Write `raw` at `path`, creating containers on the way.
pub fn apply_field(document: &mut Value, path: &str, raw: &str) -> Result<(), FieldError> {
    let segments = parse_path(path)?;
    let mut cursor = document;
    for segment in &segments {
        cursor = descend(cursor, segment)?;
    }
    *cursor = parse_field_value(raw);
    Ok(())
}

/// Copy of `document` with `raw` written at `path`, or an unchanged copy if
/// the path can't be followed.
pub fn update_field(document: &Value, path: &str, raw: &str) -> Value {
    let mut updated = document.clone();
    match apply_field(&mut updated, path, raw) {
        Ok(()) => updated,
        Err(_) => document.clone(),
    }
}

fn descend<'a>(container: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, FieldError> {
    if container.is_null() {
        *container = match segment {
            PathSegment::Key(_) => Value::Object(Map::new()),
            PathSegment::Index(_) => Value::Array(Vec::new()),
        };
    }
    match container {
        Value::Object(map) => Ok(map.entry(segment.as_key()).or_insert(Value::Null)),
        Value::Array(items) => match segment {
            PathSegment::Index(index) => {
                let index = *index;
                if index >= items.len() {
                    if index > items.len() + MAX_ARRAY_GROWTH {
                        return Err(FieldError::IndexTooLarge {
                            index,
                            len: items.len(),
                        });
                    }
                    items.resize(index + 1, Value::Null);
                }
                Ok(&mut items[index])
            }
            PathSegment::Key(key) => Err(FieldError::NotAContainer {
                segment: key.clone(),
                found: "array",
            }),
        },
        other => Err(FieldError::NotAContainer {
            segment: segment.as_key(),
            found: value_kind(other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
