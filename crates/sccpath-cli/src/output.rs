//! Output modes shared by every command.
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var (`pretty` | `text` | `json`)
//! 3. `[output] format` from project or user config
//! 4. [`OutputMode::Pretty`] on a TTY, [`OutputMode::Text`] when piped

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::error::ErrorCode;

/// Width of the separators in pretty output.
pub const PRETTY_RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:=<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Blank line, rule, heading, rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w)?;
    pretty_rule(w)?;
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Left-aligned key/value line.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<22} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sectioned human output.
    Pretty,
    /// Compact `key=value` lines for scripts and pipes.
    Text,
    /// One pretty-printed JSON document.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolution logic without I/O.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    // Unknown names fall through to the next layer.
    if let Some(mode) = format_env.and_then(OutputMode::from_name) {
        return mode;
    }
    if let Some(mode) = config_format.and_then(OutputMode::from_name) {
        return mode;
    }
    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from flags, `FORMAT`, config and TTY detection.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_format,
        is_tty,
    )
}

/// Render `value` to `out` as JSON or through the matching text/pretty closure.
pub fn render_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// [`render_to`] on locked stdout.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, mode, value, text_fn, pretty_fn)
}

/// A structured error with an optional suggestion and code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Build from a command failure; the code comes from [`ErrorCode::classify`].
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = ErrorCode::classify(err);
        Self {
            message: format!("{err:#}"),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    if mode.is_json() {
        let wrapper = serde_json::json!({ "error": error });
        serde_json::to_writer_pretty(&mut *out, &wrapper)?;
        writeln!(out)?;
    } else {
        match &error.error_code {
            Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
            None => writeln!(out, "error: {}", error.message)?,
        }
        if let Some(suggestion) = &error.suggestion {
            writeln!(out, "  suggestion: {suggestion}")?;
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("json"),
            Some("pretty"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_beats_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_beats_config() {
        let mode = resolve_output_mode_inner(None, false, Some("JSON"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn unknown_env_falls_through_to_config() {
        let mode = resolve_output_mode_inner(None, false, Some("yaml"), Some("text"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn tty_default() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, false),
            OutputMode::Text
        );
    }

    #[test]
    fn render_to_json_and_text() {
        #[derive(Serialize)]
        struct Payload {
            count: usize,
        }
        let payload = Payload { count: 3 };

        let mut buf = Vec::new();
        render_to(&mut buf, OutputMode::Json, &payload, |_, _| Ok(()), |_, _| Ok(())).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["count"], 3);

        let mut buf = Vec::new();
        render_to(
            &mut buf,
            OutputMode::Text,
            &payload,
            |p, w| writeln!(w, "count={}", p.count),
            |_, _| Ok(()),
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "count=3\n");
    }

    #[test]
    fn errors_carry_code_and_suggestion() {
        let err = anyhow::Error::new(ErrorCode::NoDatasets);
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E3003"));

        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Text, &cli).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("error[E3003]:"));
        assert!(text.contains("suggestion: Run `sccpath generate`"));

        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Json, &cli).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["error"]["error_code"], "E3003");
    }
}
