use crate::error::Fl14Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Medicare Claims Processing Manual, chapter 25 (completing the UB-04).
pub const DEFAULT_SOURCE_URL: &str =
    "https://www.cms.gov/Regulations-and-Guidance/Guidance/Manuals/downloads/clm104c25.pdf";

/// Everything a run needs, passed explicitly to each component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fl14Config {
    pub source_url: String,
    /// Zero-based index of the page holding the start marker.
    pub first_page: usize,
    /// Zero-based index of the page holding the end marker.
    pub last_page: usize,
    pub start_marker: String,
    pub end_marker: String,
    /// Format identifier written to every row and used as the sheet name.
    pub format_name: String,
    pub format_type: String,
    pub xlsx_path: PathBuf,
    pub store_root: PathBuf,
    pub library: String,
    pub table: String,
    /// Text that must appear in the session log before the store write counts as done.
    pub confirm_marker: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub http_timeout_secs: u64,
}

impl Default for Fl14Config {
    fn default() -> Self {
        Fl14Config {
            source_url: DEFAULT_SOURCE_URL.into(),
            first_page: 16,
            last_page: 17,
            start_marker: "FL 14 - Priority (Type) of Admission or Visit".into(),
            end_marker: "FL 15 - Point of Origin for Admission or Visit".into(),
            format_name: "ADMTYPE".into(),
            format_type: "C".into(),
            xlsx_path: PathBuf::from("output/fl14_admission_type.xlsx"),
            store_root: PathBuf::from("output/formats"),
            library: "fmtlib".into(),
            table: "admtype".into(),
            confirm_marker: "NOTE: The data set".into(),
            poll_interval_ms: 500,
            max_poll_attempts: 20,
            http_timeout_secs: 60,
        }
    }
}

impl Fl14Config {
    /// Zero-based page indices from the first to the last page of the table.
    pub fn page_indices(&self) -> Vec<usize> {
        (self.first_page..=self.last_page).collect()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Load a configuration from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<Fl14Config, Fl14Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Fl14Error::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: Fl14Config = serde_json::from_str(&content).map_err(|e| Fl14Error::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<Fl14Config, Fl14Error> {
    let config: Fl14Config = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &Fl14Config) -> Result<(), Fl14Error> {
    if config.first_page > config.last_page {
        return Err(Fl14Error::ConfigInvalid(format!(
            "first_page ({}) is after last_page ({})",
            config.first_page, config.last_page
        )));
    }

    let required = [
        ("start_marker", &config.start_marker),
        ("end_marker", &config.end_marker),
        ("format_name", &config.format_name),
        ("format_type", &config.format_type),
        ("library", &config.library),
        ("table", &config.table),
        ("confirm_marker", &config.confirm_marker),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(Fl14Error::ConfigInvalid(format!(
                "{field} must not be empty"
            )));
        }
    }

    if config.max_poll_attempts == 0 {
        return Err(Fl14Error::ConfigInvalid(
            "max_poll_attempts must be at least 1".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Fl14Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.page_indices(), vec![16, 17]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "format_name": "ADMTYP2", "first_page": 3, "last_page": 3 }"#;
        let config = parse_config_str(json).unwrap();
        assert_eq!(config.format_name, "ADMTYP2");
        assert_eq!(config.page_indices(), vec![3]);
        assert_eq!(config.format_type, "C");
        assert_eq!(config.max_poll_attempts, 20);
    }

    #[test]
    fn test_reversed_pages_rejected() {
        let json = r#"{ "first_page": 5, "last_page": 4 }"#;
        assert!(matches!(
            parse_config_str(json),
            Err(Fl14Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        assert!(parse_config_str(r#"{ "max_poll_attempts": 0 }"#).is_err());
    }

    #[test]
    fn test_empty_marker_rejected() {
        assert!(parse_config_str(r#"{ "end_marker": "  " }"#).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/fl14.json")).unwrap_err();
        assert!(matches!(err, Fl14Error::ConfigLoad { .. }));
    }
}
