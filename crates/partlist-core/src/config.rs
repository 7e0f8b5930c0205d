use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PartlistError;
use crate::model::CanonicalColumn;

pub const DEFAULT_CONFIG_FILE: &str = "partlist.toml";

/// Runtime configuration passed into every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub api: ApiConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub input_pdf: PathBuf,
    pub output_xlsx: PathBuf,
    /// Raw page text is dumped here when nothing could be extracted.
    pub raw_text_dump: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the inventory API; `/parts` is appended.
    pub base_url: String,
    pub submit_timeout_secs: u64,
    pub health_timeout_secs: u64,
    /// Book imported quantities as opening stock.
    pub stock_movements: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Output column order.
    pub columns: Vec<CanonicalColumn>,
    /// Substrings that mark a table row as the header row.
    pub header_keywords: Vec<String>,
    /// How many leading rows of a table are searched for a header.
    pub header_scan_rows: usize,
    /// A row is kept only if one of the first N canonical columns is set.
    pub meaningful_columns: usize,
    /// Columns filled by token positions 1.. of a delimited text line.
    /// Position 0 always fills `part no.`.
    pub fallback_positions: Vec<CanonicalColumn>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_pdf: PathBuf::from("CTC Item Lists.pdf"),
            output_xlsx: PathBuf::from("CTC Item Lists.xlsx"),
            raw_text_dump: PathBuf::from("pdf_extracted_text.txt"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            submit_timeout_secs: 30,
            health_timeout_secs: 5,
            stock_movements: true,
        }
    }
}

impl ApiConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            columns: CanonicalColumn::ALL.to_vec(),
            header_keywords: ["part no", "origin", "brand", "cost", "price"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            header_scan_rows: 5,
            meaningful_columns: 10,
            fallback_positions: vec![
                CanonicalColumn::SsPartNo,
                CanonicalColumn::Origin,
                CanonicalColumn::Brand,
            ],
        }
    }
}

/// On-disk TOML configuration. Every field is optional so partial files
/// are merged over the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsFile>,
    pub api: Option<ApiFile>,
    pub extraction: Option<ExtractionFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsFile {
    pub input_pdf: Option<PathBuf>,
    pub output_xlsx: Option<PathBuf>,
    pub raw_text_dump: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiFile {
    pub base_url: Option<String>,
    pub submit_timeout_secs: Option<u64>,
    pub health_timeout_secs: Option<u64>,
    pub stock_movements: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionFile {
    pub columns: Option<Vec<CanonicalColumn>>,
    pub header_keywords: Option<Vec<String>>,
    pub header_scan_rows: Option<usize>,
    pub meaningful_columns: Option<usize>,
    pub fallback_positions: Option<Vec<CanonicalColumn>>,
}

impl Config {
    /// Load config from an explicit path, or from `./partlist.toml` when it
    /// exists, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, PartlistError> {
        match explicit {
            Some(path) => Ok(Config::default().merge(load_file(path)?)),
            None => {
                let cwd = Path::new(DEFAULT_CONFIG_FILE);
                if cwd.exists() {
                    Ok(Config::default().merge(load_file(cwd)?))
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Overlay the values present in `file`.
    pub fn merge(mut self, file: ConfigFile) -> Config {
        if let Some(p) = file.paths {
            if let Some(v) = p.input_pdf {
                self.paths.input_pdf = v;
            }
            if let Some(v) = p.output_xlsx {
                self.paths.output_xlsx = v;
            }
            if let Some(v) = p.raw_text_dump {
                self.paths.raw_text_dump = v;
            }
        }
        if let Some(a) = file.api {
            if let Some(v) = a.base_url {
                self.api.base_url = v;
            }
            if let Some(v) = a.submit_timeout_secs {
                self.api.submit_timeout_secs = v;
            }
            if let Some(v) = a.health_timeout_secs {
                self.api.health_timeout_secs = v;
            }
            if let Some(v) = a.stock_movements {
                self.api.stock_movements = v;
            }
        }
        if let Some(e) = file.extraction {
            if let Some(v) = e.columns {
                self.extraction.columns = v;
            }
            if let Some(v) = e.header_keywords {
                self.extraction.header_keywords = v;
            }
            if let Some(v) = e.header_scan_rows {
                self.extraction.header_scan_rows = v;
            }
            if let Some(v) = e.meaningful_columns {
                self.extraction.meaningful_columns = v;
            }
            if let Some(v) = e.fallback_positions {
                self.extraction.fallback_positions = v;
            }
        }
        self
    }
}

/// Parse a TOML config file.
pub fn load_file(path: &Path) -> Result<ConfigFile, PartlistError> {
    let content = std::fs::read_to_string(path).map_err(|e| PartlistError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| PartlistError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.paths.input_pdf, PathBuf::from("CTC Item Lists.pdf"));
        assert_eq!(cfg.api.submit_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.api.health_timeout(), Duration::from_secs(5));
        assert!(cfg.api.stock_movements);
        assert_eq!(cfg.extraction.columns.len(), 17);
        assert_eq!(cfg.extraction.meaningful_columns, 10);
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
[api]
base_url = "http://inventory:8080/api"
stock_movements = false

[extraction]
fallback_positions = ["origin", "brand"]
"#,
        )
        .unwrap();
        let cfg = Config::default().merge(file);
        assert_eq!(cfg.api.base_url, "http://inventory:8080/api");
        assert_eq!(cfg.api.submit_timeout_secs, 30);
        assert!(!cfg.api.stock_movements);
        assert_eq!(
            cfg.extraction.fallback_positions,
            vec![CanonicalColumn::Origin, CanonicalColumn::Brand]
        );
        assert_eq!(cfg.paths.output_xlsx, PathBuf::from("CTC Item Lists.xlsx"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[paths]\noutput_xlsx = \"out.xlsx\"\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.paths.output_xlsx, PathBuf::from("out.xlsx"));
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[extraction]\ncolumns = [\"nope\"]\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(PartlistError::ConfigLoad { .. })
        ));
    }
}
