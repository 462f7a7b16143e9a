//! DeadValues - Fast unused key detection for Helm charts
//!
//! This library statically determines which keys declared in a chart's
//! values files are never referenced by its templates.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Chart Discovery** - Locate values files and template files
//! 2. **Merging** - Deep-merge base and override values, tracking provenance
//! 3. **Flattening** - Turn the merged document into dotted leaf paths
//! 4. **Scanning** - Extract `.Values.*` references from template text
//! 5. **Resolution** - Find leaves with no reference to themselves or an ancestor
//! 6. **Reporting** - Group unused keys by the values file that set them

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod values;

pub use analysis::UsageResolver;
pub use config::Config;
pub use discovery::{load_values_file, ChartLayout, TemplateFinder};
pub use error::{Error, Result};
pub use pipeline::{analyze_chart, load_chart, read_templates, Analysis, ChartInputs, ValuesAnalyzer};
pub use report::{ReportFormat, Reporter, UsageReport};
pub use scan::{ReferenceScanner, ReferenceSet};
pub use values::{
    flatten, merge, ConfigDocument, LeafPath, MergedValues, ProvenanceMap, SourceDocument,
    SourceId, ValueNode,
};
