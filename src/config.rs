//! Tool configuration
//!
//! Looked up in the chart directory as `.deadvalues.yml`, `.deadvalues.yaml`
//! or `.deadvalues.toml`, or passed explicitly with `--config`. CLI flags
//! override whatever the file sets.
//!
//! ```yaml
//! additional_values:
//!   - values-prod.yaml
//! ignore:
//!   - global
//!   - extra*
//! fail_on_unused: true
//! ```

use crate::error::{Error, Result};
use crate::scan::DEFAULT_ACCESSOR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_LOCATIONS: &[&str] = &[".deadvalues.yml", ".deadvalues.yaml", ".deadvalues.toml"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base values file, relative to the chart directory
    pub values_file: PathBuf,

    /// Templates directory, relative to the chart directory
    pub templates_dir: PathBuf,

    /// Override values files, merged after the base file in this order
    pub additional_values: Vec<PathBuf>,

    /// Extensions of template files to scan
    pub template_extensions: Vec<String>,

    /// Identifier that introduces a values reference in templates
    pub accessor: String,

    /// Keys never reported as unused (`path` for a subtree, `prefix*` for a prefix)
    pub ignore: Vec<String>,

    /// Scan templates on all cores
    pub parallel: bool,

    /// Exit with status 1 when unused keys are found
    pub fail_on_unused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            values_file: PathBuf::from("values.yaml"),
            templates_dir: PathBuf::from("templates"),
            additional_values: Vec::new(),
            template_extensions: vec!["yaml".to_string(), "tpl".to_string()],
            accessor: DEFAULT_ACCESSOR.to_string(),
            ignore: Vec::new(),
            parallel: true,
            fail_on_unused: false,
        }
    }
}

impl Config {
    /// Load from a YAML or TOML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let config = if is_toml {
            toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the first config file found in `chart_dir`, or the defaults
    pub fn from_default_locations(chart_dir: &Path) -> Result<Self> {
        for name in DEFAULT_LOCATIONS {
            let candidate = chart_dir.join(name);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }
}
