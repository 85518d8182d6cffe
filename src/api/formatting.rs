//! Fix output formatting
//!
//! Human-readable text, JSON and CSV renderings of a [`LocalizationFix`] or
//! of the [`LocalizationError`] that replaced it.

use crate::api::types::LocalizationFix;
use crate::validation::error::LocalizationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Renders one localization outcome as a string
pub trait FixFormatter {
    fn format_fix(&self, fix: &LocalizationFix) -> String;
    fn format_error(&self, error: &LocalizationError) -> String;

    fn format_result(&self, result: &Result<LocalizationFix, LocalizationError>) -> String {
        match result {
            Ok(fix) => self.format_fix(fix),
            Err(err) => self.format_error(err),
        }
    }
}

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (expected text, json or csv)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl OutputFormat {
    /// Formatter for this format; `verbose` selects the long text form and
    /// pretty JSON.
    pub fn formatter(self, verbose: bool) -> Box<dyn FixFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter { compact: !verbose }),
            OutputFormat::Json => Box::new(JsonFormatter { pretty: verbose }),
            OutputFormat::Csv => Box::new(CsvFormatter::default()),
        }
    }
}

/// Human-readable text formatter
pub struct TextFormatter {
    /// Position line only
    pub compact: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { compact: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { compact: false }
    }
}

impl FixFormatter for TextFormatter {
    fn format_fix(&self, fix: &LocalizationFix) -> String {
        let mut output = format!("Estimated Position: {}", fix.position);
        if self.compact {
            return output;
        }

        let anchors: Vec<String> = fix.anchors_used.iter().map(|id| id.to_string()).collect();
        output.push_str(&format!("\nMode:       {}\n", fix.mode));
        output.push_str(&format!(
            "Anchors:    {} (of {})\n",
            anchors.join(", "),
            fix.anchors_available
        ));
        output.push_str(&format!("Geometry:   {:?}\n", fix.geometry_quality));
        if let Some(hdop) = fix.hdop {
            output.push_str(&format!("HDOP:       {:.2}\n", hdop));
        }
        if let Some(angle) = fix.crossing_angle_deg {
            output.push_str(&format!("Crossing:   {:.1}°\n", angle));
        }
        if let Some(rms) = fix.rms_residual {
            output.push_str(&format!("Residual:   {:.3} rms\n", rms));
        }

        if fix.has_warnings() {
            output.push_str("Warnings:\n");
            for warning in &fix.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output.trim_end().to_string()
    }

    fn format_error(&self, error: &LocalizationError) -> String {
        format!("error: {}", error)
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    #[serde(flatten)]
    error: &'a LocalizationError,
    message: String,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> String {
        self.format_json(value).unwrap_or_else(|err| {
            log::error!("cannot serialize output: {}", err);
            format!("{{\"kind\":\"serialization\",\"message\":\"{}\"}}", err)
        })
    }
}

impl FixFormatter for JsonFormatter {
    fn format_fix(&self, fix: &LocalizationFix) -> String {
        self.render(fix)
    }

    fn format_error(&self, error: &LocalizationError) -> String {
        self.render(&ErrorReport {
            error,
            message: error.to_string(),
        })
    }
}

/// CSV formatter for batch logging
pub struct CsvFormatter {
    /// Prefix every record with the header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self {
            include_header: true,
        }
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(String::new, |v| format!("{:.*}", precision, v))
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &'static str {
        "status,x,y,mode,anchors_used,anchors_available,geometry_quality,hdop,crossing_angle_deg,rms_residual,warnings,error"
    }

    fn with_header(&self, row: String) -> String {
        if self.include_header {
            format!("{}\n{}", self.header(), row)
        } else {
            row
        }
    }
}

impl FixFormatter for CsvFormatter {
    fn format_fix(&self, fix: &LocalizationFix) -> String {
        let anchors: Vec<String> = fix.anchors_used.iter().map(|id| id.to_string()).collect();
        let row = format!(
            "ok,{:.6},{:.6},{},{},{},{:?},{},{},{},{},",
            fix.position.x(),
            fix.position.y(),
            fix.mode,
            anchors.join(";"),
            fix.anchors_available,
            fix.geometry_quality,
            optional(fix.hdop, 3),
            optional(fix.crossing_angle_deg, 2),
            optional(fix.rms_residual, 6),
            fix.warnings.len(),
        );
        self.with_header(row)
    }

    fn format_error(&self, error: &LocalizationError) -> String {
        self.with_header(format!("error,,,,,,,,,,,{}", error.kind()))
    }
}
