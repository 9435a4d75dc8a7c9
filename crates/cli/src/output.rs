//! CLI output formatting utilities.
//!
//! Status lines go to stdout, warnings and errors to stderr. Colors are only
//! used when the target stream supports them.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Kind of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Failed,
  Warning,
  Note,
}

impl Status {
  pub fn symbol(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Failed => "✗",
      Status::Warning => "⚠",
      Status::Note => "•",
    }
  }

  fn to_stderr(self) -> bool {
    matches!(self, Status::Failed | Status::Warning)
  }
}

pub const ARROW: &str = "→";

/// First 12 hex digits of a digest.
pub fn short_digest(digest: &str) -> &str {
  digest.get(..12).unwrap_or(digest)
}

pub fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut size = bytes as f64 / 1024.0;
  let mut unit = 0;
  while size >= 1024.0 && unit < UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", size, UNITS[unit])
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    0 => format!("{}ms", duration.subsec_millis()),
    1..60 => format!("{:.2}s", duration.as_secs_f64()),
    60..3600 => format!("{}m {}s", secs / 60, secs % 60),
    _ => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
  }
}

pub fn print_status(status: Status, message: &str) {
  let stream = if status.to_stderr() { Stream::Stderr } else { Stream::Stdout };
  let symbol_text = status.symbol();
  let symbol = symbol_text.if_supports_color(stream, |s| match status {
    Status::Done => s.green().to_string(),
    Status::Failed => s.red().to_string(),
    Status::Warning => s.yellow().to_string(),
    Status::Note => s.blue().to_string(),
  });
  if status.to_stderr() {
    eprintln!("{} {}", symbol, message);
  } else {
    println!("{} {}", symbol, message);
  }
}

pub fn print_error(message: &str) {
  print_status(Status::Failed, message);
}

/// An indented `label: value` line under a status line.
pub fn print_field(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
