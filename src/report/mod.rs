mod colors;
mod compact;
mod json;
mod terminal;

pub use compact::CompactReporter;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::error::Result;
use crate::values::{LeafPath, ProvenanceMap, SourceId};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Unused keys grouped by the values file that last set them
///
/// Groups iterate in the order their source was first seen while walking the
/// unused keys; keys keep their flattening order within a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageReport {
    groups: IndexMap<SourceId, Vec<LeafPath>>,
}

impl UsageReport {
    pub fn build(unused: &[LeafPath], provenance: &ProvenanceMap) -> Self {
        let mut groups: IndexMap<SourceId, Vec<LeafPath>> = IndexMap::new();
        for leaf in unused {
            let source = provenance
                .get(leaf.as_str())
                .cloned()
                .unwrap_or_else(SourceId::unknown);
            groups.entry(source).or_default().push(leaf.clone());
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of unused keys across all sources
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&SourceId, &[LeafPath])> {
        self.groups.iter().map(|(source, keys)| (source, keys.as_slice()))
    }

    pub fn get(&self, source: &str) -> Option<&[LeafPath]> {
        self.groups
            .iter()
            .find(|(id, _)| id.as_str() == source)
            .map(|(_, keys)| keys.as_slice())
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Grouped, colored terminal output
    #[default]
    Terminal,
    /// One `source: key` line per unused key
    Compact,
    /// JSON machine-readable format
    Json,
}

/// Options for report generation
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Output file path (for JSON)
    pub output_path: Option<PathBuf>,
    /// Total number of leaf keys analyzed (for the summary line)
    pub keys_count: Option<usize>,
    /// Number of template files scanned (for the summary line)
    pub templates_count: Option<usize>,
}

/// Reporter for outputting unused key results
pub struct Reporter {
    format: ReportFormat,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            options: ReportOptions {
                output_path,
                ..Default::default()
            },
        }
    }

    pub fn with_options(format: ReportFormat, options: ReportOptions) -> Self {
        Self { format, options }
    }

    /// Report the unused keys
    pub fn report(&self, report: &UsageReport) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                let mut reporter = TerminalReporter::new();
                if let Some(keys) = self.options.keys_count {
                    reporter = reporter.with_keys_count(keys);
                }
                if let Some(templates) = self.options.templates_count {
                    reporter = reporter.with_templates_count(templates);
                }
                reporter.report(report);
                Ok(())
            }
            ReportFormat::Compact => {
                CompactReporter::new().report(report);
                Ok(())
            }
            ReportFormat::Json => {
                let mut reporter = JsonReporter::new(self.options.output_path.clone());
                if let Some(keys) = self.options.keys_count {
                    reporter = reporter.with_keys_count(keys);
                }
                reporter.report(report)
            }
        }
    }
}
