//! Formatting engine seam.
//!
//! The middleware never pretty-prints anything itself; it hands normalized
//! source text to a [`FormatEngine`] and delivers whatever comes back. The
//! bundled [`JsonEngine`] covers the default JSON mode; other grammars plug
//! in through the trait.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::config::{FormatMode, FormatOptions};

/// Errors produced by a formatting engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The source text is not valid for the selected grammar.
    #[error("malformed {mode} input: {message}")]
    Syntax {
        /// Grammar the input was parsed as.
        mode: FormatMode,
        /// Parser diagnostic.
        message: String,
    },

    /// The engine does not implement the selected grammar.
    #[error("unsupported format mode: {0}")]
    UnsupportedMode(FormatMode),
}

/// Converts source text into a canonically indented form for a grammar.
pub trait FormatEngine: Send + Sync {
    /// Format `source` according to `opts`, failing on malformed input.
    fn format(&self, source: &str, opts: &FormatOptions) -> Result<String, EngineError>;

    /// Engine name for logging.
    fn name(&self) -> &'static str {
        "format_engine"
    }
}

/// JSON formatting engine backed by `serde_json`.
///
/// Re-emits the parsed document with the configured indent width, preserving
/// key order. Rejects anything that is not a complete JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEngine;

impl FormatEngine for JsonEngine {
    fn format(&self, source: &str, opts: &FormatOptions) -> Result<String, EngineError> {
        if opts.mode != FormatMode::Json {
            return Err(EngineError::UnsupportedMode(opts.mode));
        }

        let value: Value = serde_json::from_str(source).map_err(|err| EngineError::Syntax {
            mode: FormatMode::Json,
            message: err.to_string(),
        })?;

        let indent = " ".repeat(opts.indent_width);
        let mut out = Vec::with_capacity(source.len() * 2);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|err| EngineError::Syntax {
                mode: FormatMode::Json,
                message: err.to_string(),
            })?;

        String::from_utf8(out).map_err(|err| EngineError::Syntax {
            mode: FormatMode::Json,
            message: err.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "json_engine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(indent_width: usize) -> FormatOptions {
        FormatOptions {
            indent_width,
            mode: FormatMode::Json,
        }
    }

    #[test]
    fn test_format_object_two_spaces() {
        let out = JsonEngine
            .format(r#"{"test":true,"format":"json"}"#, &opts(2))
            .unwrap();
        assert_eq!(out, "{\n  \"test\": true,\n  \"format\": \"json\"\n}");
    }

    #[test]
    fn test_format_object_four_spaces() {
        let out = JsonEngine.format(r#"{"a":1}"#, &opts(4)).unwrap();
        assert_eq!(out, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_format_nested() {
        let out = JsonEngine
            .format(r#"{"outer":{"inner":[1,2]}}"#, &opts(2))
            .unwrap();
        assert_eq!(
            out,
            "{\n  \"outer\": {\n    \"inner\": [\n      1,\n      2\n    ]\n  }\n}"
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let out = JsonEngine
            .format(r#"{"zebra":1,"apple":2}"#, &opts(2))
            .unwrap();
        let zebra = out.find("zebra").unwrap();
        let apple = out.find("apple").unwrap();
        assert!(zebra < apple);
    }

    #[test]
    fn test_scalar_document() {
        assert_eq!(JsonEngine.format("42", &opts(2)).unwrap(), "42");
    }

    #[test]
    fn test_empty_input_is_syntax_error() {
        let err = JsonEngine.format("", &opts(2)).unwrap_err();
        assert!(matches!(err, EngineError::Syntax { .. }));
    }

    #[test]
    fn test_plain_text_is_syntax_error() {
        let err = JsonEngine.format("hello world", &opts(2)).unwrap_err();
        assert!(matches!(err, EngineError::Syntax { .. }));
    }

    #[test]
    fn test_unsupported_mode() {
        let css = FormatOptions {
            indent_width: 2,
            mode: FormatMode::Css,
        };
        let err = JsonEngine.format("body {}", &css).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedMode(FormatMode::Css)));
    }
}
