//! Error types shared by the library and the CLI

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// A document (or part of one) is not shaped like a values mapping
    #[error("invalid document shape at '{path}': {message}")]
    #[diagnostic(
        code(deadvalues::invalid_shape),
        help("values files must have a mapping at the root and scalar mapping keys")
    )]
    InvalidDocumentShape { path: String, message: String },

    #[error("failed to read '{path}': {source}")]
    #[diagnostic(code(deadvalues::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse values file '{source_id}': {source}")]
    #[diagnostic(code(deadvalues::yaml))]
    Yaml {
        source_id: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("'{path}' is not valid UTF-8")]
    #[diagnostic(
        code(deadvalues::encoding),
        help("templates are scanned as text; convert the file to UTF-8")
    )]
    InvalidEncoding { path: PathBuf },

    #[error("values file '{0}' not found")]
    #[diagnostic(code(deadvalues::values_not_found))]
    ValuesFileNotFound(PathBuf),

    #[error("templates directory '{0}' not found")]
    #[diagnostic(code(deadvalues::templates_not_found))]
    TemplatesNotFound(PathBuf),

    #[error("additional values file '{0}' not found in chart directory")]
    #[diagnostic(
        code(deadvalues::additional_values_not_found),
        help("paths passed with --values-file are resolved relative to the chart directory")
    )]
    AdditionalValuesNotFound(PathBuf),

    #[error("invalid accessor '{0}': expected an identifier such as 'Values'")]
    #[diagnostic(code(deadvalues::accessor))]
    InvalidAccessor(String),

    #[error("failed to parse config file '{path}': {message}")]
    #[diagnostic(code(deadvalues::config))]
    ConfigParse { path: PathBuf, message: String },
}
