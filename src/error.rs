use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Form description error: {0}")]
    DescriptionError(String),

    #[error("Form description not found: {}", .0.display())]
    DescriptionNotFound(PathBuf),

    #[error("No Textract JSON result files found in {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Keywords {keywords:?} not found on page {page} of files [{}]", .files.join(", "))]
    AlignmentError {
        files: Vec<String>,
        page: usize,
        keywords: Vec<String>,
    },

    #[error("Incomplete form: files [{}] make up {found} of {expected} pages", .files.join(", "))]
    IncompleteGroup {
        files: Vec<String>,
        found: usize,
        expected: usize,
    },

    #[error("Malformed Textract result {}: {reason}", .file.display())]
    TextractError { file: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FormError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FormError::DescriptionError(_) => Some(
                "A form description needs a `keywords_per_page` list and at least one [[items]] entry"
            ),
            FormError::DescriptionNotFound(_) => Some(
                "Check the path passed with --description"
            ),
            FormError::SourceNotFound(_) => Some(
                "Run Textract on the page images first; results are expected as <image>.json"
            ),
            FormError::AlignmentError { .. } => Some(
                "The files do not look like this form. Inspect them with:\n  form-analyzer fields <folder>"
            ),
            FormError::IncompleteGroup { .. } => Some(
                "The number of result files must be a multiple of the form's page count"
            ),
            FormError::TextractError { .. } | FormError::JsonError(_) => Some(
                "Re-run Textract for the affected page; the cached JSON looks damaged"
            ),
            FormError::TomlError(_) | FormError::ConfigError(_) => Some(
                "Run `form-analyzer config` to see the effective configuration"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
