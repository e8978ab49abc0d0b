//! Report formatting and delivery.

use crate::report::Report;
use crate::services::Verdict;
use console::style;
use std::io::Write;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Output formatter trait
pub trait OutputFormatter {
    fn format(&self, report: &Report) -> String;
}

/// Human-readable console output formatter
pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn styled_line(&self, line: &str, verdict: Verdict) -> String {
        if !self.use_colors {
            return line.to_string();
        }
        match verdict {
            Verdict::Yes => style(line).green().to_string(),
            Verdict::No | Verdict::Unsupported | Verdict::Blocked | Verdict::DisallowedIsp => {
                style(line).red().to_string()
            }
            Verdict::Failed => style(line).yellow().to_string(),
            Verdict::Unknown => style(line).dim().to_string(),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        if self.use_colors {
            output.push_str(&format!("\n{}\n", style(&report.title).bold()));
        } else {
            output.push_str(&format!("\n{}\n", report.title));
        }
        output.push_str(&format!("{}\n\n", "=".repeat(report.title.len())));

        for result in &report.results {
            output.push_str(&self.styled_line(&result.line(), result.verdict));
            output.push('\n');
        }

        let timestamp = report.timestamp_line();
        if self.use_colors {
            output.push_str(&format!("\n{}\n", style(timestamp).dim()));
        } else {
            output.push_str(&format!("\n{}\n", timestamp));
        }

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        result.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

/// Get formatter based on output format
pub fn get_formatter(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

/// Write output to file or stdout
pub fn write_output(output: &str, file_path: Option<&std::path::Path>) -> std::io::Result<()> {
    if let Some(path) = file_path {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
    } else {
        print!("{}", output);
    }
    Ok(())
}
