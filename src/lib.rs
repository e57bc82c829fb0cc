//! # coursecast
//!
//! Tools for course and podcast documents produced by an AI authoring
//! service: parse flat tables of contents, synthesize markdown, pick slide
//! layouts deterministically, flatten documents into editable fields and
//! render static HTML previews.
//!
//! # Architecture
//!
//! Everything works on loosely shaped JSON. Typed views are derived on
//! demand and the raw `serde_json::Value` stays the source of truth, so
//! editing never loses keys the types don't know about.
//!
//! ```text
//! file.json ─ document ─┬─ markdown ── (toc)         → markdown text
//!                       ├─ fields                     → editable fields / updated JSON
//!                       └─ generate ── layout, visual → HTML preview
//! content/  ─ scan ─────── generate                   → dist/
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Course and podcast document types with lenient deserialization |
//! | [`toc`] | Flat "Module N: ... N.M: ..." string → modules and lessons |
//! | [`markdown`] | Course/podcast → markdown in a fixed section order |
//! | [`layout`] | Title hash → slide and infographic layout variants |
//! | [`visual`] | Typed view of a slide's `visualContent` |
//! | [`fields`] | Document ↔ flat list of editable fields by path |
//! | [`document`] | Load, save and classify JSON documents |
//! | [`scan`] | Walk a content directory into a document manifest |
//! | [`generate`] | Render HTML previews with Maud |
//! | [`config`] | `coursecast.toml` loading, validation and CSS colors |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Hash-Derived Layouts
//!
//! Layout choice is not stored in documents. It is recomputed from the
//! title, so renders stay stable without a schema change. Slides may opt
//! out with an explicit `layoutIndex`; see [`layout`].
//!
//! ## Forgiving Edits
//!
//! [`fields::update_field`] never fails: a path that can't be followed
//! returns the document unchanged. The CLI uses [`fields::apply_field`]
//! instead so a typo in a path is reported.

pub mod config;
pub mod document;
pub mod fields;
pub mod generate;
pub mod layout;
pub mod markdown;
pub mod output;
pub mod scan;
pub mod toc;
pub mod types;
pub mod visual;

#[cfg(test)]
pub(crate) mod test_helpers;
