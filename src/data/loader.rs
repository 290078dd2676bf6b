//! Tabular file loading

use super::Dataset;
use crate::error::{CurveError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Parquet,
    Json,
    JsonLines,
}

impl FileFormat {
    /// Detect format from the file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "tsv" => FileFormat::Tsv,
            "parquet" | "pq" => FileFormat::Parquet,
            "json" => FileFormat::Json,
            "jsonl" | "ndjson" => FileFormat::JsonLines,
            _ => FileFormat::Csv,
        }
    }
}

/// Loads tabular files into DataFrames and Datasets
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: usize,
    has_header: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
            has_header: true,
        }
    }

    /// Rows scanned when inferring CSV column types
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Load a delimited text file
    pub fn load_csv(&self, path: &Path, delimiter: u8) -> Result<DataFrame> {
        let file = File::open(path)?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| CurveError::DataError(e.to_string()))
    }

    pub fn load_parquet(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;

        ParquetReader::new(file)
            .finish()
            .map_err(|e| CurveError::DataError(e.to_string()))
    }

    /// Load a JSON file (array of records or line-delimited)
    pub fn load_json(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;

        let format = match FileFormat::from_path(path) {
            FileFormat::JsonLines => JsonFormat::JsonLines,
            _ => JsonFormat::Json,
        };

        JsonReader::new(file)
            .with_json_format(format)
            .finish()
            .map_err(|e| CurveError::DataError(e.to_string()))
    }

    /// Detect the format from the extension and load
    pub fn load_auto(&self, path: &Path) -> Result<DataFrame> {
        let start = Instant::now();
        let df = match FileFormat::from_path(path) {
            FileFormat::Csv => self.load_csv(path, b',')?,
            FileFormat::Tsv => self.load_csv(path, b'\t')?,
            FileFormat::Parquet => self.load_parquet(path)?,
            FileFormat::Json | FileFormat::JsonLines => self.load_json(path)?,
        };

        debug!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded table"
        );

        Ok(df)
    }

    /// Load a file straight into a [`Dataset`]
    pub fn load_dataset(&self, path: &Path, target: &str, features: Option<&[String]>) -> Result<Dataset> {
        let df = self.load_auto(path)?;
        Dataset::from_dataframe(&df, target, features)
    }
}
