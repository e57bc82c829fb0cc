use clap::{Parser, Subcommand};
use coursecast::layout::{self, LayoutSignals};
use coursecast::{config, document, fields, generate, markdown, output, scan, toc};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("COURSECAST_ON_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("COURSECAST_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "coursecast")]
#[command(about = "Preview, edit and publish course and podcast documents")]
#[command(long_about = "\
Preview, edit and publish course and podcast documents

Documents are JSON files produced by an authoring tool. A course has
modules, lessons and topics; a podcast has episodes whose slides carry
narration and a visualization. Saved API responses of the form
{\"success\": true, \"data\": {...}} are unwrapped automatically.

Content structure:

  content/
  ├── coursecast.toml              # Config (optional)
  ├── 010-intro-course.json        # Numbered = ordered by number
  ├── 020-weekly-show.json
  └── archive/
      └── notes.json               # Unnumbered = listed last

Editing:

  coursecast fields show.json --category slides
  coursecast set show.json 'podcast.episodes[0].title' 'A better title'

Run 'coursecast gen-config' to generate a documented coursecast.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory holding coursecast.toml (defaults to the content directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a flat table-of-contents string into modules and lessons
    Toc {
        /// e.g. "Module 1: Basics 1.1: Hello 1.2: World"
        text: String,
        /// Print the parsed modules as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the markdown for a course or podcast document
    Markdown { file: PathBuf },
    /// List the editable fields of a document
    Fields {
        file: PathBuf,
        /// Only show one category (e.g. "slides", "visual content")
        #[arg(long)]
        category: Option<fields::FieldCategory>,
        /// Print fields as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one field by path and save the document
    Set {
        file: PathBuf,
        /// Dotted path, e.g. podcast.episodes[0].title
        path: String,
        /// New value; [..] and {..} are stored as JSON
        value: String,
    },
    /// Show the layouts a title would get
    Layout {
        title: String,
        /// Number of plotted items on the slide
        #[arg(long, default_value_t = 0)]
        points: usize,
        /// Visual subtitle
        #[arg(long, default_value = "")]
        subtitle: String,
    },
    /// List the documents in the content directory
    Scan,
    /// Scan and render HTML previews into the output directory
    Build,
    /// Print a stock coursecast.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_dir = cli.config_dir.clone().unwrap_or_else(|| cli.source.clone());

    match cli.command {
        Command::Toc { text, json } => {
            let modules = toc::parse_toc(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&modules)?);
            } else {
                output::print_toc_outline(&modules);
            }
        }
        Command::Markdown { file } => {
            let config = config::load_config(&config_dir)?;
            let doc = document::load_document(&file)?;
            println!("{}", markdown::document_markdown(&doc, &config.markdown));
        }
        Command::Fields {
            file,
            category,
            json,
        } => {
            let doc = document::load_document(&file)?;
            let extracted = fields::extract_fields(&doc);
            if json {
                let shown: Vec<_> = extracted
                    .iter()
                    .filter(|f| category.is_none_or(|c| f.category == c))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                output::print_fields(&extracted, category);
            }
        }
        Command::Set { file, path, value } => {
            let mut doc = document::load_document(&file)?;
            fields::apply_field(&mut doc, &path, &value)?;
            document::save_document(&file, &doc)?;
            output::print_field_update(&path, &value, &file);
        }
        Command::Layout {
            title,
            points,
            subtitle,
        } => {
            let config = config::load_config(&config_dir)?;
            let signals = if config.layout.mix_signals {
                LayoutSignals::new(points, &subtitle)
            } else {
                LayoutSignals::default()
            };
            output::print_layout_report(
                &title,
                signals,
                layout::select_slide_layout(&title, signals),
                layout::select_infographic_layout(&title),
            );
        }
        Command::Scan => {
            let library = scan::scan(&cli.source)?;
            output::print_scan_output(&library, &config_dir);
        }
        Command::Build => {
            let config = config::load_config(&config_dir)?;

            println!("==> Scanning {}", cli.source.display());
            let library = scan::scan(&cli.source)?;
            output::print_scan_output(&library, &config_dir);

            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let summary = generate::generate(&library, &config, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", display_dir(&cli.output));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn display_dir(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
