//! Chart discovery
//!
//! Resolves the values files and templates of one chart directory and loads
//! them. Every failure here aborts the run: a values file that cannot be
//! loaded would leave its keys out of the merge, and an unreadable template
//! would make the keys it references look unused.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::values::{ConfigDocument, SourceDocument, SourceId};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Paths making up a chart, as seen by the analysis
#[derive(Debug, Clone)]
pub struct ChartLayout {
    pub chart_dir: PathBuf,
    pub values_file: PathBuf,
    pub additional_values: Vec<PathBuf>,
    pub templates_dir: PathBuf,
}

impl ChartLayout {
    /// Resolve and check the chart's paths
    ///
    /// Relative paths in `config` are taken from `chart_dir`.
    pub fn locate(chart_dir: &Path, config: &Config) -> Result<Self> {
        let values_file = chart_dir.join(&config.values_file);
        if !values_file.is_file() {
            return Err(Error::ValuesFileNotFound(values_file));
        }

        let templates_dir = chart_dir.join(&config.templates_dir);
        if !templates_dir.is_dir() {
            return Err(Error::TemplatesNotFound(templates_dir));
        }

        let additional_values = config
            .additional_values
            .iter()
            .map(|file| {
                let path = chart_dir.join(file);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(Error::AdditionalValuesNotFound(file.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chart_dir: chart_dir.to_path_buf(),
            values_file,
            additional_values,
            templates_dir,
        })
    }

    /// Load the base values file followed by every override, in merge order
    pub fn load_values(&self) -> Result<Vec<SourceDocument>> {
        std::iter::once(&self.values_file)
            .chain(self.additional_values.iter())
            .map(|path| load_values_file(path))
            .collect()
    }
}

/// Read and parse one values file; its id is the file name
pub fn load_values_file(path: &Path) -> Result<SourceDocument> {
    let id = SourceId::from_path(path);
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = ConfigDocument::parse(&text, &id)?;
    debug!("Loaded {} top-level keys from {}", document.len(), id);
    Ok(SourceDocument { id, document })
}

/// Finds template files below a directory
pub struct TemplateFinder {
    extensions: Vec<String>,
}

impl TemplateFinder {
    pub fn new(config: &Config) -> Self {
        Self::with_extensions(config.template_extensions.iter().cloned())
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.into().trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// All matching files, recursively, sorted by path
    pub fn find_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| Error::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e.into(),
            })?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|wanted| wanted == ext))
            .unwrap_or(false)
    }
}

/// Read a template as UTF-8 text
pub fn read_template(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| Error::InvalidEncoding {
        path: path.to_path_buf(),
    })
}
