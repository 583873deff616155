//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

fn print_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => print_error(&format!("Failed to encode JSON: {}", e)),
        },
        OutputFormat::Yaml => match serde_yaml::to_string(value) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => print_error(&format!("Failed to encode YAML: {}", e)),
        },
        OutputFormat::Table | OutputFormat::Plain => {}
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", table(std::slice::from_ref(item)));
        }
        OutputFormat::Json | OutputFormat::Yaml => print_serialized(item, format),
        OutputFormat::Plain => {
            let row = item.row();
            for (header, value) in T::headers().iter().zip(row.iter()) {
                println!("{}: {}", header, value);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            println!("{}", table(items));
        }
        OutputFormat::Json | OutputFormat::Yaml => print_serialized(items, format),
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                let row = item.row();
                for (header, value) in T::headers().iter().zip(row.iter()) {
                    println!("{}: {}", header, value);
                }
            }
        }
    }
}

/// Print any serializable value in a machine format, or via `fallback` for humans
pub fn print_value<T: Serialize>(value: &T, format: OutputFormat, fallback: impl FnOnce(&T)) {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_serialized(value, format),
        OutputFormat::Table | OutputFormat::Plain => fallback(value),
    }
}

/// Print a simple message
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        _ => {
            println!("{}", message);
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {}", message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

/// Parse `#rrggbb`, `#rgb` or `rgb(r, g, b)` into channels
pub fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some((short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        };
    }

    let inner = color.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let rgb = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    parts.next().is_none().then_some(rgb)
}

/// A colored block for a car color, or the raw value when it cannot be parsed
pub fn color_swatch(color: &str) -> String {
    match parse_color(color) {
        Some((r, g, b)) => "████".truecolor(r, g, b).to_string(),
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#ff8000", Some((255, 128, 0)) ; "long hex")]
    #[test_case("#fff", Some((255, 255, 255)) ; "short hex")]
    #[test_case("rgb(12, 34, 56)", Some((12, 34, 56)) ; "rgb function")]
    #[test_case("rgb(1, 2)", None ; "missing channel")]
    #[test_case("rgb(1, 2, 3, 4)", None ; "extra channel")]
    #[test_case("#12345", None ; "bad hex length")]
    #[test_case("red", None ; "named color")]
    fn test_parse_color(input: &str, expected: Option<(u8, u8, u8)>) {
        assert_eq!(parse_color(input), expected);
    }

    #[test]
    fn test_swatch_falls_back_to_text() {
        assert_eq!(color_swatch("teal"), "teal");
    }
}
