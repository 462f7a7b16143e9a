//! Compact reporter - one line per unused key
//!
//! Suited to grep, sort and CI logs: `values-prod.yaml: ingress.className`

use crate::report::colors::StructureColors;
use crate::report::UsageReport;
use std::fmt::Write;

pub struct CompactReporter;

impl CompactReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, report: &UsageReport) {
        print!("{}", self.render(report));
    }

    pub fn render(&self, report: &UsageReport) -> String {
        let mut out = String::new();
        for (source, keys) in report.groups() {
            for key in keys {
                let _ = writeln!(
                    out,
                    "{}: {}",
                    StructureColors::source(source.as_str()),
                    key
                );
            }
        }
        out
    }
}

impl Default for CompactReporter {
    fn default() -> Self {
        Self::new()
    }
}
