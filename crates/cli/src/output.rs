//! Terminal rendering for `bgraph`.
//!
//! Model listings go to stdout as an indented tree (heading, item, edge).
//! Status lines for failures and missing task edges go to stderr so JSON on
//! stdout stays parseable.

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

/// Outcome shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Failed,
  Warning,
}

impl Status {
  fn symbol(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Failed => "✗",
      Status::Warning => "⚠",
    }
  }
}

pub fn print_status(status: Status, message: &str) {
  let symbol = status.symbol();
  match status {
    Status::Done => println!("{} {}", symbol.if_supports_color(Stream::Stdout, |s| s.green()), message),
    Status::Failed => eprintln!(
      "{} {}",
      symbol.if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
    Status::Warning => eprintln!(
      "{} {}",
      symbol.if_supports_color(Stream::Stderr, |s| s.yellow()),
      message.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
  }
}

/// Configuring a model is fast, so short runs keep sub-millisecond detail.
pub fn format_elapsed(elapsed: Duration) -> String {
  let micros = elapsed.as_micros();
  if micros < 1_000 {
    format!("{}µs", micros)
  } else if micros < 1_000_000 {
    format!("{:.1}ms", micros as f64 / 1_000.0)
  } else {
    format!("{:.2}s", elapsed.as_secs_f64())
  }
}

pub fn print_heading(title: &str) {
  println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
}

/// A node of the listing, one level under its heading.
pub fn print_item(message: &str) {
  println!("  {} {}", "•".if_supports_color(Stream::Stdout, |s| s.blue()), message);
}

/// A labelled relation `label → target`, under the item it belongs to.
pub fn print_edge(label: &str, target: &str) {
  println!(
    "    {} → {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    target
  );
}

/// A `key: value` fact about the current heading.
pub fn print_field(key: &str, value: &str) {
  println!("  {}: {}", key.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn elapsed_keeps_precision_for_short_runs() {
    assert_eq!(format_elapsed(Duration::from_micros(420)), "420µs");
    assert_eq!(format_elapsed(Duration::from_micros(12_340)), "12.3ms");
    assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2.50s");
  }

  #[test]
  fn statuses_have_distinct_symbols() {
    let symbols = [Status::Done, Status::Failed, Status::Warning].map(Status::symbol);
    assert_eq!(symbols, ["✓", "✗", "⚠"]);
  }

  #[test]
  fn text_is_the_default_format() {
    assert!(OutputFormat::Json.is_json());
    assert!(!OutputFormat::default().is_json());
  }
}
