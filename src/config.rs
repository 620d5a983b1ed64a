//! Site configuration module.
//!
//! Handles loading, validating, and layering configuration. Values resolve in
//! this order, later layers overriding earlier ones:
//!
//! ```text
//! stock defaults  →  moments.toml (or --config <path>)  →  MOMENTS_CONTENT_URL
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_url = "http://127.0.0.1:1337"  # Base URL of the content API
//!
//! [site]
//! title = "Moments"
//! subtitle = "Precious moments, one photo at a time"
//! empty_message = "No photos yet. Add the first moment in the content admin!"
//! lang = "en"
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [fetch]
//! timeout_secs = 30
//!
//! [images]
//! remote_origins = []      # Extra hosts allowed to serve images
//!
//! [theme]
//! grid_gap = "1.5rem"
//! page_padding = "2rem"
//! max_columns = 4
//!
//! [colors.light]
//! background = "#fafaf9"
//! ...
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Environment variable carrying the content API base URL.
pub const CONTENT_URL_ENV: &str = "MOMENTS_CONTENT_URL";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "moments.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Base URL of the content API, without a trailing slash once validated.
    pub content_url: String,
    /// Page titles and messages.
    pub site: SiteText,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Content API request settings.
    pub fetch: FetchConfig,
    /// Image hosting allowance.
    pub images: ImagesConfig,
    /// Grid layout settings.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_url: "http://127.0.0.1:1337".to_string(),
            site: SiteText::default(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            images: ImagesConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// The content URL must parse as an absolute `http`/`https` URL since its
    /// origin is what images are allowed to load from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_origin("content_url", &self.content_url)?;
        for origin in &self.images.remote_origins {
            parse_origin("images.remote_origins", origin)?;
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be non-zero".into(),
            ));
        }
        if !(1..=6).contains(&self.theme.max_columns) {
            return Err(ConfigError::Validation(
                "theme.max_columns must be 1-6".into(),
            ));
        }
        Ok(())
    }

    /// Base URL used for prefixing relative image paths.
    pub fn base_url(&self) -> &str {
        self.content_url.trim_end_matches('/')
    }

    /// Origins images may be served from: the content source itself plus any
    /// configured remote hosts. Order follows the config, duplicates removed.
    pub fn image_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let candidates =
            std::iter::once(&self.content_url).chain(self.images.remote_origins.iter());
        for candidate in candidates {
            if let Ok(origin) = parse_origin("", candidate) {
                if !origins.contains(&origin) {
                    origins.push(origin);
                }
            }
        }
        origins
    }
}

/// Parse `value` as an `http`/`https` URL and return its serialized origin.
fn parse_origin(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{key} is not a valid URL ({value}): {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{key} must use http or https: {value}"
        )));
    }
    Ok(url.origin().ascii_serialization())
}

/// Text shown on the pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteText {
    /// Heading of the listing page and suffix of every `<title>`.
    pub title: String,
    /// Line under the listing heading.
    pub subtitle: String,
    /// Shown instead of the grid when there is nothing to display.
    pub empty_message: String,
    /// `lang` attribute of the `<html>` element.
    pub lang: String,
}

impl Default for SiteText {
    fn default() -> Self {
        Self {
            title: "Moments".to_string(),
            subtitle: "Precious moments, one photo at a time".to_string(),
            empty_message: "No photos yet. Add the first moment in the content admin!"
                .to_string(),
            lang: "en".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Content API request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Whole-request timeout. A slow content source blocks the page this long.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Image hosting allowance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Additional origins (e.g. an object-storage bucket) allowed to serve
    /// images, besides the content source itself.
    pub remote_origins: Vec<String>,
}

/// Grid layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Gap between cards in the masonry grid (CSS value).
    pub grid_gap: String,
    /// Padding around page content (CSS value).
    pub page_padding: String,
    /// Column count on the widest screens.
    pub max_columns: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            grid_gap: "1.5rem".to_string(),
            page_padding: "2rem".to_string(),
            max_columns: 4,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
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

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Subtitles, location and date lines.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fafaf9".to_string(),
            text: "#292524".to_string(),
            text_muted: "#78716c".to_string(),
            border: "#e7e5e4".to_string(),
            link: "#3b82f6".to_string(),
            link_hover: "#2563eb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1c1917".to_string(),
            text: "#f5f5f4".to_string(),
            text_muted: "#a8a29e".to_string(),
            border: "#44403c".to_string(),
            link: "#93c5fd".to_string(),
            link_hover: "#bfdbfe".to_string(),
        }
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
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Build the environment overlay. Only the content URL is read from the
/// environment; `lookup` is `std::env::var` outside of tests.
pub fn env_overlay(lookup: impl Fn(&str) -> Option<String>) -> Option<toml::Value> {
    let url = lookup(CONTENT_URL_ENV).filter(|v| !v.trim().is_empty())?;
    let mut table = toml::map::Map::new();
    table.insert("content_url".to_string(), toml::Value::String(url));
    Some(toml::Value::Table(table))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let mut config: SiteConfig = merged.try_into()?;
    config.validate()?;
    config.content_url = config.base_url().to_string();
    Ok(config)
}

/// Load the site configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// [`DEFAULT_CONFIG_FILE`] in the working directory is used when present.
/// The environment is applied last.
pub fn load_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SiteConfig, ConfigError> {
    let file_overlay = match path {
        Some(path) => Some(load_raw_config(path)?.ok_or_else(|| {
            ConfigError::Validation(format!("config file not found: {}", path.display()))
        })?),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let overlays = file_overlay.into_iter().chain(env_overlay(lookup));
    resolve_config(stock_defaults_value(), overlays)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Moments Gallery Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The content URL can also be set with the MOMENTS_CONTENT_URL environment
# variable (or in a .env file), which wins over this file.
# Unknown keys will cause an error.

# Base URL of the content API. Moments are read from
# {content_url}/api/moments?populate=image and relative image paths are
# prefixed with it.
content_url = "http://127.0.0.1:1337"

# ---------------------------------------------------------------------------
# Page text
# ---------------------------------------------------------------------------
[site]
title = "Moments"
subtitle = "Precious moments, one photo at a time"
# Shown when there is nothing to display (no moments, or the API is down).
empty_message = "No photos yet. Add the first moment in the content admin!"
lang = "en"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:3000"

# ---------------------------------------------------------------------------
# Content API requests
# ---------------------------------------------------------------------------
[fetch]
# Seconds before a content API request is abandoned.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Image hosting
# ---------------------------------------------------------------------------
[images]
# Origins besides content_url that may serve images, e.g. an object-storage
# bucket: ["https://pub-example.r2.dev"]
remote_origins = []

# ---------------------------------------------------------------------------
# Masonry grid
# ---------------------------------------------------------------------------
[theme]
grid_gap = "1.5rem"
page_padding = "2rem"
# Columns on the widest screens (1-6). Narrower screens use fewer.
max_columns = 4

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#fafaf9"
text = "#292524"
text_muted = "#78716c"    # Subtitles, location and date
border = "#e7e5e4"
link = "#3b82f6"
link_hover = "#2563eb"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#1c1917"
text = "#f5f5f4"
text_muted = "#a8a29e"
border = "#44403c"
link = "#93c5fd"
link_hover = "#bfdbfe"
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
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

/// Generate CSS for the grid from theme config.
///
/// Columns step up with viewport width until `max_columns` is reached:
/// one column on phones, then one more per breakpoint.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    const BREAKPOINTS: [&str; 5] = ["640px", "1024px", "1280px", "1536px", "1920px"];

    let mut css = format!(
        r#":root {{
    --grid-gap: {grid_gap};
    --page-padding: {page_padding};
}}"#,
        grid_gap = theme.grid_gap,
        page_padding = theme.page_padding,
    );
    for (idx, width) in BREAKPOINTS
        .iter()
        .take(theme.max_columns.saturating_sub(1) as usize)
        .enumerate()
    {
        css.push_str(&format!(
            "\n\n@media (min-width: {width}) {{\n    .moment-grid {{ column-count: {}; }}\n}}",
            idx + 2
        ));
    }
    css
}
