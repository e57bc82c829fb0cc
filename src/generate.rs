//! HTML preview generation.
//!
//! Takes a scanned [`Library`] and renders one static page per course or
//! podcast plus an index linking them.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): every renderable document with its counts
//! - **Course pages** (`/{slug}.html`): synthesized markdown rendered to HTML
//! - **Podcast pages** (`/{slug}.html`): episodes and slides, each slide
//!   tagged with its selected layout and its visual rendered per kind
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── intro-course.html
//! └── weekly-show.html
//! ```
//!
//! ## Layout Classes
//!
//! Slides carry `layout-{name}` from [`crate::layout::layout_for_slide`] and
//! their visual carries `infographic-{name}`. The stylesheet maps those
//! classes to arrangements; the HTML itself is the same for every layout.
//!
//! Uses [maud](https://maud.lambda.xyz/) for templating. Interpolated text is
//! escaped. Markdown-derived HTML is inserted as produced by
//! `pulldown-cmark`, so embedded HTML in source documents passes through.

use crate::config::{self, Config};
use crate::document::{self, DocumentError, DocumentKind};
use crate::layout::{infographic_layout_for_slide, layout_for_slide};
use crate::markdown;
use crate::scan::{DocumentEntry, Library};
use crate::types::{Episode, Podcast, PodcastDocument, Slide};
use crate::visual::{Heading, VisualContent, format_number};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// One page written by [`generate`].
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub title: String,
    pub kind: DocumentKind,
    /// Path relative to the output directory.
    pub file: PathBuf,
    /// Slides for podcasts, lessons for courses.
    pub items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    /// Documents that were scanned but not rendered.
    pub skipped: Vec<PathBuf>,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

pub fn generate(
    library: &Library,
    config: &Config,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    fs::create_dir_all(output_dir)?;

    let mut pages = Vec::new();
    for entry in library.renderable() {
        let value = document::load_document(&library.root.join(&entry.path))?;
        let page = render_document(entry, &value, config, &css);
        let file = PathBuf::from(format!("{}.html", entry.slug));
        fs::write(output_dir.join(&file), page.into_string())?;

        let items = match entry.kind {
            DocumentKind::Podcast => entry.counts.slides,
            _ => entry.counts.lessons,
        };
        pages.push(GeneratedPage {
            title: entry.title.clone(),
            kind: entry.kind,
            file,
            items,
        });
    }

    let index = render_index(library, &css);
    fs::write(output_dir.join("index.html"), index.into_string())?;

    let skipped = library
        .documents
        .iter()
        .filter(|d| d.kind == DocumentKind::Unknown)
        .map(|d| d.path.clone())
        .collect();

    Ok(GenerateSummary {
        output_dir: output_dir.to_path_buf(),
        pages,
        skipped,
    })
}

/// Page for one document, dispatched on its kind.
pub fn render_document(entry: &DocumentEntry, value: &Value, config: &Config, css: &str) -> Markup {
    match entry.kind {
        DocumentKind::Podcast => {
            let podcast = serde_json::from_value::<PodcastDocument>(value.clone())
                .map(|doc| doc.podcast)
                .unwrap_or_default();
            render_podcast_page(&entry.title, &podcast, config, css)
        }
        DocumentKind::Course | DocumentKind::Unknown => {
            let md = markdown::synthesize_with(value, &config.markdown);
            render_course_page(&entry.title, &md, css)
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

fn site_header(current: Option<&str>) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                a href="index.html" { "Library" }
                @if let Some(title) = current {
                    " \u{203a} "
                    (title)
                }
            }
        }
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(library: &Library, css: &str) -> Markup {
    let content = html! {
        (site_header(None))
        main.index-page {
            h1 { "Library" }
            ul.document-list {
                @for entry in library.renderable() {
                    li {
                        span.document-kind { (entry.kind.name()) }
                        a href={ (entry.slug) ".html" } { (entry.title) }
                        span.document-counts { (counts_label(entry)) }
                    }
                }
            }
        }
    };
    base_document("Library", css, None, content)
}

fn counts_label(entry: &DocumentEntry) -> String {
    let c = entry.counts;
    match entry.kind {
        DocumentKind::Podcast => format!("{} episodes, {} slides", c.episodes, c.slides),
        _ => format!("{} modules, {} lessons", c.modules, c.lessons),
    }
}

fn render_course_page(title: &str, markdown: &str, css: &str) -> Markup {
    let content = html! {
        (site_header(Some(title)))
        main.course-page {
            article.course-content {
                (PreEscaped(markdown_to_html(markdown)))
            }
        }
    };
    base_document(title, css, Some("course"), content)
}

fn render_podcast_page(title: &str, podcast: &Podcast, config: &Config, css: &str) -> Markup {
    let content = html! {
        (site_header(Some(title)))
        main.podcast-page {
            h1 { (title) }
            @if let Some(description) = &podcast.description {
                p.podcast-description { (description) }
            }
            @if let Some(url) = &podcast.full_video_url {
                p.full-video { a href=(url) { "Watch the full video" } }
            }
            @if podcast.episodes.is_empty() {
                p.empty { (config.markdown.empty_message) }
            }
            @for (e, episode) in podcast.episodes.iter().enumerate() {
                (render_episode(e + 1, episode, config))
            }
        }
    };
    base_document(title, css, Some("podcast"), content)
}

fn render_episode(number: usize, episode: &Episode, config: &Config) -> Markup {
    html! {
        section.episode id={ "episode-" (number) } {
            h2 { "Episode " (number) ": " (episode.title) }
            @if let Some(description) = &episode.description {
                p.episode-description { (description) }
            }
            @for (s, slide) in episode.slides().iter().enumerate() {
                (render_slide(s + 1, slide, config))
            }
        }
    }
}

/// A slide with its layout class. The visual gets its own infographic class.
pub fn render_slide(number: usize, slide: &Slide, config: &Config) -> Markup {
    let layout = layout_for_slide(slide, &config.layout);
    let visual = VisualContent::from_value(&slide.visual_content);
    let has_visual = !slide.visual_content.is_null();

    html! {
        section class={ "slide layout-" (layout.name()) } data-slide=(number) {
            h3 { (slide.title) }
            @if has_visual {
                @let infographic = infographic_layout_for_slide(slide);
                div class={ "visual infographic-" (infographic.name()) } data-kind=(visual.kind_name()) {
                    (render_visual(&visual))
                }
            }
            @if let Some(script) = &slide.audio_script {
                p.audio-script { (script) }
            }
        }
    }
}

// ============================================================================
// Visuals
// ============================================================================

pub fn render_visual(visual: &VisualContent) -> Markup {
    match visual {
        VisualContent::KeyStats(stats) => html! {
            (render_heading(&stats.heading))
            div.key-stats {
                @for stat in &stats.stats {
                    div.stat {
                        span.stat-value { (stat.value) }
                        span.stat-label { (stat.label) }
                        @if let Some(description) = &stat.description {
                            p.stat-description { (description) }
                        }
                    }
                }
            }
        },
        VisualContent::BarChart(chart) => {
            let max = chart.data.iter().map(|d| d.value).fold(0.0_f64, f64::max);
            html! {
                (render_heading(&chart.heading))
                div.bar-chart {
                    @for point in &chart.data {
                        div.bar-row {
                            span.bar-label { (point.label) }
                            span.bar-track {
                                span.bar-fill style={ "width: " (percent(point.value, max)) "%" } {}
                            }
                            span.bar-value { (point.display_value()) }
                        }
                    }
                }
            }
        }
        VisualContent::PieChart(chart) => {
            let total: f64 = chart.data.iter().map(|d| d.value.max(0.0)).sum();
            html! {
                (render_heading(&chart.heading))
                ul.pie-legend {
                    @for point in &chart.data {
                        li {
                            (point.label) ": " (point.display_value())
                            " (" (percent(point.value, total)) "%)"
                        }
                    }
                }
            }
        }
        VisualContent::Process(process) => html! {
            (render_heading(&process.heading))
            ol.process-steps {
                @for step in &process.steps {
                    li {
                        strong { (step.title) }
                        @if let Some(description) = &step.description {
                            " " span.step-description { (description) }
                        }
                    }
                }
            }
        },
        VisualContent::Network(network) => html! {
            (render_heading(&network.heading))
            ul.network-nodes {
                @for node in &network.nodes {
                    li data-node=(node.id) {
                        @if node.label.is_empty() { (node.id) } @else { (node.label) }
                    }
                }
            }
            @if !network.edges.is_empty() {
                ul.network-edges {
                    @for edge in &network.edges {
                        li {
                            (edge.from) " \u{2192} " (edge.to)
                            @if let Some(label) = &edge.label {
                                " (" (label) ")"
                            }
                        }
                    }
                }
            }
        },
        VisualContent::Map(map) => html! {
            (render_heading(&map.heading))
            ul.map-points {
                @for point in &map.points {
                    li data-lat=(point.lat) data-lng=(point.lng) {
                        strong { (point.name) }
                        " (" (format_number(point.lat)) ", " (format_number(point.lng)) ")"
                        @if let Some(description) = &point.description {
                            " " (description)
                        }
                    }
                }
            }
        },
        VisualContent::Comparison(comparison) => html! {
            (render_heading(&comparison.heading))
            table.comparison {
                thead {
                    tr {
                        th {}
                        th { (comparison.left_title.as_deref().unwrap_or("Before")) }
                        th { (comparison.right_title.as_deref().unwrap_or("After")) }
                    }
                }
                tbody {
                    @for feature in &comparison.features {
                        tr {
                            th scope="row" { (feature.name) }
                            td { (feature.left) }
                            td { (feature.right) }
                        }
                    }
                }
            }
        },
        VisualContent::Other { content, .. } => html! {
            pre.visual-raw { (serde_json::to_string_pretty(content).unwrap_or_default()) }
        },
    }
}

fn render_heading(heading: &Heading) -> Markup {
    html! {
        @if let Some(title) = &heading.title {
            h4 { (title) }
        }
        @if let Some(subtitle) = &heading.subtitle {
            p.visual-subtitle { (subtitle) }
        }
    }
}

/// Share of `whole` as a one-decimal percentage; 0 when `whole` isn't positive.
fn percent(part: f64, whole: f64) -> String {
    if whole > 0.0 {
        format!("{:.1}", (part.max(0.0) / whole) * 100.0)
    } else {
        "0.0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn first_slide(doc: &Value, index: usize) -> Slide {
        let podcast: PodcastDocument = serde_json::from_value(doc.clone()).unwrap();
        podcast.podcast.episodes[0].slides()[index].clone()
    }

    #[test]
    fn slide_carries_layout_classes() {
        let slide = first_slide(&sample_podcast(), 1);
        let config = Config::default();
        let html = render_slide(2, &slide, &config).into_string();

        let layout = layout_for_slide(&slide, &config.layout);
        let infographic = infographic_layout_for_slide(&slide);
        assert!(html.contains(&format!("slide layout-{}", layout.name())));
        assert!(html.contains(&format!("visual infographic-{}", infographic.name())));
        assert!(html.contains("data-kind=\"key stats\""));
        assert!(html.contains("7-9 hours"));
    }

    #[test]
    fn slide_without_visual_has_no_visual_block() {
        let slide: Slide = serde_json::from_value(json!({"title": "Plain"})).unwrap();
        let html = render_slide(1, &slide, &Config::default()).into_string();
        assert!(html.contains("<h3>Plain</h3>"));
        assert!(!html.contains("class=\"visual"));
    }

    #[test]
    fn bar_chart_scales_to_largest_value() {
        let visual = VisualContent::from_value(&json!({
            "type": "bar_chart",
            "content": {"data": [{"label": "A", "value": 50}, {"label": "B", "value": 25}]}
        }));
        let html = render_visual(&visual).into_string();
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains("width: 50.0%"));
    }

    #[test]
    fn pie_chart_shows_shares() {
        let visual = VisualContent::from_value(&json!({
            "type": "pie_chart",
            "content": {"data": [{"label": "A", "value": 3}, {"label": "B", "value": 1}]}
        }));
        let html = render_visual(&visual).into_string();
        assert!(html.contains("A: 3 (75.0%)"));
        assert!(html.contains("B: 1 (25.0%)"));
    }

    #[test]
    fn unknown_visual_is_shown_raw() {
        let visual = VisualContent::from_value(&json!({"type": "hologram", "content": {"x": 1}}));
        let html = render_visual(&visual).into_string();
        assert!(html.contains("visual-raw"));
        assert!(html.contains("&quot;x&quot;: 1"));
    }

    #[test]
    fn text_is_escaped() {
        let slide: Slide =
            serde_json::from_value(json!({"title": "<script>alert(1)</script>"})).unwrap();
        let html = render_slide(1, &slide, &Config::default()).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn markdown_is_rendered_to_html() {
        let html = markdown_to_html("## Module 1: Planning\n\n- one\n- two\n");
        assert!(html.contains("<h2>Module 1: Planning</h2>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn generate_writes_pages_and_index() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let library = scan(content.path()).unwrap();
        let summary = generate(&library, &Config::default(), out.path()).unwrap();

        assert_eq!(summary.pages.len(), 3);
        assert_eq!(summary.skipped, vec![PathBuf::from("scratch.json")]);

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("href=\"intro-course.html\""));
        assert!(index.contains("href=\"weekly-show.html\""));
        assert!(index.contains("2 episodes, 4 slides"));
        assert!(!index.contains("scratch"));

        let course = fs::read_to_string(out.path().join("intro-course.html")).unwrap();
        assert!(course.contains("<h2>Module 1: Planning</h2>"));
        assert!(course.contains("<em>ten</em>"));

        let show = fs::read_to_string(out.path().join("weekly-show.html")).unwrap();
        assert!(show.contains("Episode 2: Coffee and You"));
        // explicit layoutIndex 4
        assert!(show.contains("slide layout-grid"));
        assert!(show.contains("--color-accent"));
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let content = setup_fixtures();
        let library = scan(content.path()).unwrap();
        let blocker = TempDir::new().unwrap();
        let file = blocker.path().join("dist");
        fs::write(&file, "not a directory").unwrap();

        let err = generate(&library, &Config::default(), &file).unwrap_err();
        assert!(matches!(err, GenerateError::Io(_)), "unexpected error: {err}");
    }

    #[test]
    fn flat_toc_course_renders_parsed_modules() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let library = scan(content.path()).unwrap();
        generate(&library, &Config::default(), out.path()).unwrap();

        let notes = fs::read_to_string(out.path().join("notes.html")).unwrap();
        assert!(notes.contains("<h2>Module 2: Writing Up</h2>"));
        assert!(notes.contains("<h3>1.2: What to Bring</h3>"));
    }
}
