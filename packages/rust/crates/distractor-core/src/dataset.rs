//! Input dataset loading.
//!
//! The input is a CSV whose header is normalized (trimmed, lowercased,
//! whitespace runs turned into `_`) and must contain the
//! [`REQUIRED_COLUMNS`]. Extra columns are kept but ignored.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rand::Rng;
use serde_json::Value;

use crate::error::DatasetError;
use crate::projection::{AnnotationRecord, row_to_record};

/// Columns every input dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["domain", "scenario", "system_instruction", "conversation"];

/// Domain used when a row's domain cell is blank.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Normalize a header cell: trim, lowercase, whitespace runs to `_`.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Check that every required column is present.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumns`] naming each absent column, in
/// [`REQUIRED_COLUMNS`] order.
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|column| column.as_ref() == **required))
        .map(|required| (*required).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns(missing))
    }
}

/// One input row, keyed by normalized column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    index: usize,
    fields: AnnotationRecord,
}

impl DatasetRow {
    /// Position of the row in the dataset (0-based).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell value, or `""` when the column is absent for this row.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    /// Trimmed domain, or [`UNKNOWN_DOMAIN`] when blank.
    #[must_use]
    pub fn domain(&self) -> &str {
        let domain = self.get("domain").trim();
        if domain.is_empty() { UNKNOWN_DOMAIN } else { domain }
    }

    /// The raw conversation cell as a conversation value.
    #[must_use]
    pub fn conversation(&self) -> Value {
        Value::String(self.get("conversation").to_string())
    }
}

/// A loaded, validated input dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Load and validate a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when
    /// required columns are missing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let dataset = Self::from_reader(std::fs::File::open(path)?)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.columns.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse and validate a dataset from any reader.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::load`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        validate_columns(&columns)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            rows.push(DatasetRow {
                index,
                fields: row_to_record(&columns, &cells),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Normalized column names, in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, if in range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&DatasetRow> {
        self.rows.get(index)
    }

    /// Pick a uniformly random row index. `None` for an empty dataset.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.rows.len()))
        }
    }
}
