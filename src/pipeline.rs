//! End-to-end analysis: merge, flatten, scan, resolve, report

use crate::analysis::UsageResolver;
use crate::config::Config;
use crate::discovery::{read_template, ChartLayout, TemplateFinder};
use crate::error::Result;
use crate::report::UsageReport;
use crate::scan::{ReferenceScanner, ReferenceSet};
use crate::values::{merge, LeafPath, SourceDocument};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Every leaf of the merged values, in flattening order
    pub keys: Vec<LeafPath>,
    /// References found across all templates
    pub references: ReferenceSet,
    /// Unused leaves, in flattening order
    pub unused: Vec<LeafPath>,
    /// Unused leaves grouped by the values file that set them
    pub report: UsageReport,
    /// Number of template texts scanned
    pub templates_scanned: usize,
}

/// Runs the key-usage analysis over in-memory documents and templates
#[derive(Debug, Clone)]
pub struct ValuesAnalyzer {
    scanner: ReferenceScanner,
    resolver: UsageResolver,
    parallel: bool,
}

impl ValuesAnalyzer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: ReferenceScanner::new(&config.accessor)?,
            resolver: UsageResolver::new().with_ignore_patterns(&config.ignore),
            parallel: config.parallel,
        })
    }

    pub fn scanner(&self) -> &ReferenceScanner {
        &self.scanner
    }

    /// Analyze already-loaded documents (base first) against template texts
    pub fn analyze<S>(&self, documents: &[SourceDocument], templates: &[S]) -> Analysis
    where
        S: AsRef<str> + Sync,
    {
        let references = self.scanner.scan_all(templates, self.parallel);
        self.analyze_references(documents, references, templates.len())
    }

    /// Analyze documents against references that were collected elsewhere
    pub fn analyze_references(
        &self,
        documents: &[SourceDocument],
        references: ReferenceSet,
        templates_scanned: usize,
    ) -> Analysis {
        let merged = merge(documents);
        let keys = merged.leaves();
        info!(
            "Merged {} values files into {} keys",
            documents.len(),
            keys.len()
        );
        debug!("Recorded provenance for {} paths", merged.provenance.len());
        debug!("Found {} distinct references", references.len());

        let unused = self.resolver.resolve(&keys, &references);
        let report = UsageReport::build(&unused, &merged.provenance);
        info!("Found {} unused keys", unused.len());

        Analysis {
            keys,
            references,
            unused,
            report,
            templates_scanned,
        }
    }
}

/// A located chart with its values loaded and its templates discovered
#[derive(Debug, Clone)]
pub struct ChartInputs {
    /// Base values file first, then every override in order
    pub documents: Vec<SourceDocument>,
    /// Template files to scan, sorted
    pub templates: Vec<PathBuf>,
}

/// Locate the chart in `chart_dir`, load its values and find its templates
pub fn load_chart(chart_dir: &Path, config: &Config) -> Result<ChartInputs> {
    let layout = ChartLayout::locate(chart_dir, config)?;
    let documents = layout.load_values()?;
    info!("Loaded {} values files", documents.len());

    let templates = TemplateFinder::new(config).find_files(&layout.templates_dir)?;
    info!("Found {} template files", templates.len());
    if templates.is_empty() {
        warn!(
            "No template files in {}; every key will be reported",
            layout.templates_dir.display()
        );
    }

    Ok(ChartInputs {
        documents,
        templates,
    })
}

/// Read every template file, in order
pub fn read_templates(files: &[PathBuf], parallel: bool) -> Result<Vec<String>> {
    if parallel {
        files.par_iter().map(|f| read_template(f)).collect()
    } else {
        files.iter().map(|f| read_template(f)).collect()
    }
}

/// Discover, load and analyze the chart in `chart_dir`
pub fn analyze_chart(chart_dir: &Path, config: &Config) -> Result<Analysis> {
    let analyzer = ValuesAnalyzer::new(config)?;
    let inputs = load_chart(chart_dir, config)?;
    let templates = read_templates(&inputs.templates, config.parallel)?;

    Ok(analyzer.analyze(&inputs.documents, &templates))
}
