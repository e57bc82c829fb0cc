//! Configuration module.
//!
//! Handles loading, validating, and merging `coursecast.toml`. Stock defaults
//! are serialized to a TOML table, the user file is merged on top, and the
//! result is deserialized with unknown keys rejected.
//!
//! ## Config File Location
//!
//! `coursecast.toml` is read from the directory given by `--config-dir`
//! (defaults to the content directory):
//!
//! ```text
//! content/
//! ├── coursecast.toml
//! ├── 010-intro-course.json
//! └── 020-weekly-show.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! mix_signals = true         # Mix point count and subtitle length into slide layouts
//! honor_layout_index = true  # An explicit slide layoutIndex overrides the hash
//!
//! [markdown]
//! include_toc = true         # Emit the "Table of Contents" listing
//! include_appendix = true    # Emit "Next Steps" and "References" after the conclusion
//! empty_message = "No content available"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1a1a1a"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! accent = "#2f6fdf"
//!
//! [colors.dark]
//! background = "#111214"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! accent = "#7aa7ff"
//! ```
//!
//! Config files are sparse: override just the values you want.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "coursecast.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `coursecast.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Slide and infographic layout selection.
    pub layout: LayoutConfig,
    /// Markdown synthesis.
    pub markdown: MarkdownConfig,
    /// Preview page palette.
    pub colors: ColorConfig,
}

impl Config {
    /// Validate values that deserialize fine but can't be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markdown.empty_message.trim().is_empty() {
            return Err(ConfigError::Validation(
                "markdown.empty_message must not be empty".into(),
            ));
        }
        for (mode, scheme) in [("light", &self.colors.light), ("dark", &self.colors.dark)] {
            if let Some(key) = scheme.first_empty() {
                return Err(ConfigError::Validation(format!(
                    "colors.{mode}.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Mix the current item count and subtitle length into the slide hash.
    /// Matches previously rendered decks; turn off for layouts that only
    /// depend on the title.
    pub mix_signals: bool,
    /// Let a slide's explicit `layoutIndex` override the hash.
    pub honor_layout_index: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mix_signals: true,
            honor_layout_index: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Emit the "Table of Contents" listing before the detailed sections.
    pub include_toc: bool,
    /// Emit "Next Steps" and "References" after the conclusion.
    pub include_appendix: bool,
    /// Returned when a document has nothing to render.
    pub empty_message: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            include_toc: true,
            include_appendix: true,
            empty_message: crate::markdown::NO_CONTENT.to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: audio scripts, captions, breadcrumbs.
    pub text_muted: String,
    pub border: String,
    /// Chart bars, links, slide accents.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            accent: "#2f6fdf".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111214".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            accent: "#7aa7ff".to_string(),
        }
    }

    fn first_empty(&self) -> Option<&'static str> {
        [
            ("background", &self.background),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
            ("border", &self.border),
            ("accent", &self.accent),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(Config::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `coursecast.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `coursecast.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Fully-commented stock `coursecast.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# coursecast configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Layout selection
# ---------------------------------------------------------------------------
[layout]
# Slide templates are picked from a hash of the slide title. When true, the
# number of plotted items and the subtitle length are mixed in as well, which
# matches previously rendered decks but lets unrelated edits move a slide to
# another template. Set to false to depend on the title only.
mix_signals = true

# A slide's explicit "layoutIndex" overrides the hash.
honor_layout_index = true

# ---------------------------------------------------------------------------
# Markdown synthesis
# ---------------------------------------------------------------------------
[markdown]
# Emit the "Table of Contents" listing before the detailed sections.
include_toc = true

# Emit "Next Steps" and "References" after the conclusion.
include_appendix = true

# Returned for documents with nothing to render.
empty_message = "No content available"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1a1a1a"
text_muted = "#666666"    # Audio scripts, captions, breadcrumbs
border = "#e0e0e0"
accent = "#2f6fdf"        # Chart bars, links

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111214"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
accent = "#7aa7ff"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
    )
}
