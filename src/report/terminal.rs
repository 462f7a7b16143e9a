//! Terminal reporter with colored output
//!
//! ```text
//! Unused keys in values-prod.yaml:
//!   - ingress.className
//!   - resources.limits.memory
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!   2 unused keys in 1 values file  ███░░░░░░░░░░░░░░░░░ 14.3% of 14 keys
//! ```

use crate::report::colors::{BoxChars, ChartChars, StructureColors};
use crate::report::UsageReport;
use colored::Colorize;
use std::fmt::Write;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Total keys analyzed, for the percentage bar
    keys_count: Option<usize>,
    /// Template files scanned
    templates_count: Option<usize>,
    /// Width of the bar chart
    bar_width: usize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            keys_count: None,
            templates_count: None,
            bar_width: 20,
        }
    }

    pub fn with_keys_count(mut self, count: usize) -> Self {
        self.keys_count = Some(count);
        self
    }

    pub fn with_templates_count(mut self, count: usize) -> Self {
        self.templates_count = Some(count);
        self
    }

    pub fn report(&self, report: &UsageReport) {
        print!("{}", self.render(report));
    }

    pub fn render(&self, report: &UsageReport) -> String {
        let mut out = String::new();

        if report.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                "All keys in the values files are used in the templates."
                    .green()
                    .bold()
            );
            return out;
        }

        for (source, keys) in report.groups() {
            let _ = writeln!(
                out,
                "Unused keys in {}:",
                StructureColors::source(source.as_str())
            );
            for key in keys {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    StructureColors::marker("-"),
                    StructureColors::key_path(key.as_str())
                );
            }
        }

        let _ = writeln!(out, "{}", BoxChars::heavy_line(40).dimmed());
        let _ = writeln!(out, "  {}", self.summary_line(report));
        out
    }

    fn summary_line(&self, report: &UsageReport) -> String {
        let total = report.total();
        let sources = report.groups().count();
        let mut line = format!(
            "{} unused {} in {} values {}",
            StructureColors::count(&total.to_string()),
            plural(total, "key", "keys"),
            sources,
            plural(sources, "file", "files"),
        );

        if let Some(keys) = self.keys_count.filter(|&k| k > 0) {
            let percentage = total as f64 * 100.0 / keys as f64;
            line.push_str(&format!(
                "  {} {:.1}% of {} keys",
                ChartChars::bar(percentage, self.bar_width).yellow(),
                percentage,
                keys
            ));
        }
        if let Some(templates) = self.templates_count {
            line.push_str(&format!(
                " ({} {} scanned)",
                templates,
                plural(templates, "template", "templates")
            ));
        }
        line
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
