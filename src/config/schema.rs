//! Configuration schema definitions.
//!
//! All types derive Serde traits so a config can come from a TOML file or be
//! built in code. Every field has a default, allowing minimal configs.

use serde::{Deserialize, Serialize};

/// Root configuration for the prettify middleware.
///
/// Resolved once at installation and shared (read-only) across all requests
/// handled by that installation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrettifyConfig {
    /// Query parameter that activates formatting for a single request.
    pub query: QueryTrigger,

    /// Format every response, regardless of the query trigger.
    pub always_on: bool,

    /// Deliver the original body when formatting fails instead of
    /// propagating the error.
    pub fallback_on_error: bool,

    /// Rewrite the `content-length` header after a successful format.
    pub override_content_length: bool,

    /// Options forwarded to the formatting engine.
    pub format: FormatOptions,

    /// Largest buffered response body considered for formatting (bytes).
    /// Larger bodies pass through untouched.
    pub max_buffer_size: usize,
}

impl Default for PrettifyConfig {
    fn default() -> Self {
        Self {
            query: QueryTrigger::default(),
            always_on: false,
            fallback_on_error: true,
            override_content_length: true,
            format: FormatOptions::default(),
            max_buffer_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Query parameter gate for per-request activation.
///
/// A request activates formatting when the parameter named `name` is present
/// and its value compares equal to `value` (as strings, after percent
/// decoding). Repeated parameters are joined with `,` before the comparison.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryTrigger {
    /// Whether the query gate is consulted at all.
    pub enabled: bool,

    /// Parameter name to look for.
    pub name: String,

    /// Value the parameter must equal.
    pub value: String,
}

impl Default for QueryTrigger {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "pretty".to_string(),
            value: "true".to_string(),
        }
    }
}

impl QueryTrigger {
    /// A trigger that never activates. Combined with `always_on = false`
    /// this disables formatting entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Options forwarded to the formatting engine.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Indentation width in spaces.
    pub indent_width: usize,

    /// Grammar the source text is formatted as.
    pub mode: FormatMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            mode: FormatMode::Json,
        }
    }
}

impl FormatOptions {
    /// Resolve the effective options for one send: override fields take
    /// precedence over the configured ones.
    pub fn merge(&self, overrides: Option<&FormatOverride>) -> FormatOptions {
        match overrides {
            Some(overrides) => FormatOptions {
                indent_width: overrides.indent_width.unwrap_or(self.indent_width),
                mode: overrides.mode.unwrap_or(self.mode),
            },
            None => *self,
        }
    }
}

/// Per-response [`FormatOptions`] overrides.
///
/// Handlers attach one to a response via extensions; the middleware merges
/// it over the installed configuration for that send only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOverride {
    /// Replacement indentation width.
    pub indent_width: Option<usize>,

    /// Replacement grammar.
    pub mode: Option<FormatMode>,
}

/// Grammar selector for the formatting engine.
///
/// The bundled engine handles [`FormatMode::Json`]; the other modes exist for
/// external engines plugged in through the `FormatEngine` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// JSON documents.
    Json,
    /// HTML documents.
    Html,
    /// CSS stylesheets.
    Css,
}

impl std::fmt::Display for FormatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatMode::Json => write!(f, "json"),
            FormatMode::Html => write!(f, "html"),
            FormatMode::Css => write!(f, "css"),
        }
    }
}
