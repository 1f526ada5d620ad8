use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Fl14Error {
    #[error("failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to parse document: {0}")]
    ParseError(String),

    #[error("marker '{marker}' not found on page {page}. The source document layout may have changed")]
    MarkerNotFound { marker: String, page: usize },

    #[error("marker '{marker}' occurs {count} times on page {page}, expected exactly once")]
    MarkerAmbiguous {
        marker: String,
        page: usize,
        count: usize,
    },

    #[error("export failed: {0}")]
    Export(String),

    #[error("no confirmation for table '{table}' after {attempts} poll attempt(s)")]
    ExportTimeout { table: String, attempts: u32 },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
