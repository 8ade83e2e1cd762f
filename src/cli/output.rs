//! CLI Output Formatting.
//!
//! Renders command results as colored text, JSON or bare values.

use console::style;
use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
    /// Pretty JSON format
    JsonPretty,
    /// Minimal format (values only)
    Minimal,
}

impl OutputFormat {
    /// True for either JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            "minimal" | "min" => Ok(OutputFormat::Minimal),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Disable color
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        println!("{}", self.render_status("success", message));
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.render_status("error", message));
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        println!("{}", self.render_status("warning", message));
    }

    /// Print serializable data (an attestation, a key pair, ...)
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Some(rendered) = self.render_data(data) {
            println!("{}", rendered);
        }
    }

    /// Print key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        println!("{}", self.render_kv(key, value));
    }

    /// Status line for `success`/`error`/`warning`
    pub fn render_status(&self, status: &str, message: &str) -> String {
        if self.format.is_json() {
            return self.to_json(&serde_json::json!({
                "status": status,
                "message": message,
            }));
        }

        let (symbol, plain) = match status {
            "success" => ("✓", "OK"),
            "error" => ("✗", "ERROR"),
            _ => ("⚠", "WARNING"),
        };

        if !self.color {
            return format!("{}: {}", plain, message);
        }

        let symbol = match status {
            "success" => style(symbol).green(),
            "error" => style(symbol).red(),
            _ => style(symbol).yellow(),
        };
        format!("{} {}", symbol, message)
    }

    /// Single key-value line
    pub fn render_kv(&self, key: &str, value: &str) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.to_json(&serde_json::json!({ key: value }))
            }
            OutputFormat::Minimal => value.to_string(),
            OutputFormat::Text if self.color => format!("{}: {}", style(key).bold(), value),
            OutputFormat::Text => format!("{}: {}", key, value),
        }
    }

    /// Render structured data, `None` if it cannot be serialized
    pub fn render_data<T: Serialize>(&self, data: &T) -> Option<String> {
        if self.format.is_json() {
            return Some(self.to_json(data));
        }

        let value = serde_json::to_value(data).ok()?;
        let mut lines = Vec::new();
        match self.format {
            OutputFormat::Minimal => collect_minimal(&value, &mut lines),
            _ => self.collect_text(&value, 0, &mut lines),
        }
        Some(lines.join("\n"))
    }

    fn to_json<T: Serialize>(&self, data: &T) -> String {
        let output = if self.format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        output.unwrap_or_default()
    }

    fn collect_text(&self, json: &serde_json::Value, indent: usize, lines: &mut Vec<String>) {
        let prefix = "  ".repeat(indent);

        match json {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    let key = if self.color {
                        style(key).bold().to_string()
                    } else {
                        key.clone()
                    };
                    match value {
                        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                            lines.push(format!("{}{}:", prefix, key));
                            self.collect_text(value, indent + 1, lines);
                        }
                        _ => lines.push(format!("{}{}: {}", prefix, key, format_value(value))),
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for (i, item) in arr.iter().enumerate() {
                    lines.push(format!("{}[{}]:", prefix, i));
                    self.collect_text(item, indent + 1, lines);
                }
            }
            _ => lines.push(format!("{}{}", prefix, format_value(json))),
        }
    }
}

fn collect_minimal(json: &serde_json::Value, lines: &mut Vec<String>) {
    match json {
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_minimal(v, lines)),
        serde_json::Value::Array(arr) => arr.iter().for_each(|v| collect_minimal(v, lines)),
        _ => lines.push(format_value(json)),
    }
}

/// Format a JSON value for text output
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".into(),
        serde_json::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(format: OutputFormat) -> OutputFormatter {
        OutputFormatter::new(format).without_color()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("min".parse::<OutputFormat>().unwrap(), OutputFormat::Minimal);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_status() {
        assert_eq!(plain(OutputFormat::Text).render_status("error", "boom"), "ERROR: boom");
        assert_eq!(
            plain(OutputFormat::Text).render_status("warning", "unchecked"),
            "WARNING: unchecked"
        );

        let json: serde_json::Value =
            serde_json::from_str(&plain(OutputFormat::Json).render_status("success", "ok")).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "ok");
    }

    #[test]
    fn test_render_kv() {
        assert_eq!(plain(OutputFormat::Text).render_kv("hash", "ab"), "hash: ab");
        assert_eq!(plain(OutputFormat::Minimal).render_kv("hash", "ab"), "ab");
        assert_eq!(plain(OutputFormat::Json).render_kv("hash", "ab"), r#"{"hash":"ab"}"#);
    }

    #[test]
    fn test_render_data() {
        let data = serde_json::json!({"price": "150250000", "nested": {"ok": true}});

        let text = plain(OutputFormat::Text).render_data(&data).unwrap();
        assert!(text.contains("price: 150250000"));
        assert!(text.contains("  ok: true"));

        let minimal = plain(OutputFormat::Minimal).render_data(&data).unwrap();
        assert!(minimal.lines().any(|l| l == "150250000"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&serde_json::Value::Null), "null");
        assert_eq!(format_value(&serde_json::json!(42)), "42");
        assert_eq!(format_value(&serde_json::json!("hello")), "hello");
    }
}
