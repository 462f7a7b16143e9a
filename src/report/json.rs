//! JSON reporter for CI pipelines and tooling

use crate::error::{Error, Result};
use crate::report::UsageReport;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total_unused: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_keys: Option<usize>,
    sources: Vec<JsonSource<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonSource<'a> {
    source: &'a str,
    keys: Vec<&'a str>,
}

pub struct JsonReporter {
    output_path: Option<PathBuf>,
    keys_count: Option<usize>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self {
            output_path,
            keys_count: None,
        }
    }

    pub fn with_keys_count(mut self, count: usize) -> Self {
        self.keys_count = Some(count);
        self
    }

    pub fn render(&self, report: &UsageReport) -> String {
        let json = JsonReport {
            version: env!("CARGO_PKG_VERSION"),
            total_unused: report.total(),
            total_keys: self.keys_count,
            sources: report
                .groups()
                .map(|(source, keys)| JsonSource {
                    source: source.as_str(),
                    keys: keys.iter().map(|k| k.as_str()).collect(),
                })
                .collect(),
        };
        // Only borrowed strings and integers: serialization cannot fail
        serde_json::to_string_pretty(&json).unwrap_or_default()
    }

    pub fn report(&self, report: &UsageReport) -> Result<()> {
        let output = self.render(report);
        match &self.output_path {
            Some(path) => std::fs::write(path, output + "\n").map_err(|source| Error::Io {
                path: path.clone(),
                source,
            }),
            None => {
                println!("{}", output);
                Ok(())
            }
        }
    }
}
