//! Shared output layer for text/JSON parity across CLI commands.
//!
//! Every command handler receives an [`OutputMode`]: text for people and
//! pipes, or stable JSON with the same payload.

use std::io::{self, Write};

use serde::Serialize;

/// Shared width for text separators.
pub const RULE_WIDTH: usize = 72;

/// Write a section heading followed by a separator.
pub fn section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// The output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code, e.g. `E1003`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: &str, suggestion: Option<&str>) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
            error_code: Some(code.to_string()),
        }
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode the value is serialized with `serde_json`; otherwise
/// `text_fn` writes the human rendering.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, mode, value, text_fn)
}

fn render_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

fn render_error_to(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        name: &'static str,
    }

    fn rendered(mode: OutputMode) -> String {
        let mut out = Vec::new();
        render_to(&mut out, mode, &Payload { name: "R" }, |p, w| {
            writeln!(w, "route {}", p.name)
        })
        .expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn json_flag_selects_mode() {
        assert_eq!(OutputMode::from_json_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_json_flag(false), OutputMode::Text);
    }

    #[test]
    fn text_and_json_render_same_payload() {
        assert_eq!(rendered(OutputMode::Text), "route R\n");
        let json: serde_json::Value =
            serde_json::from_str(&rendered(OutputMode::Json)).expect("valid json");
        assert_eq!(json["name"], "R");
    }

    #[test]
    fn errors_carry_code_and_suggestion() {
        let error = CliError::with_code("unknown condition", "E1003", Some("fix it"));
        let mut out = Vec::new();
        render_error_to(&mut out, OutputMode::Json, &error).expect("render");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(json["error"]["error_code"], "E1003");

        let mut out = Vec::new();
        let err = CliError::with_code("boom", "E1001", None);
        render_error_to(&mut out, OutputMode::Text, &err).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "error: boom\n");
    }
}
