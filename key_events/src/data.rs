//! Tabular input handling: column validation and dataset loading

use crate::error::{ImpactError, Result};
use crate::features::{Feature, FeatureRow, DATE_COLUMN, TARGET_COLUMN};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Format of the optional `Date` column
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Columns an uploaded training table must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Total users",
    "New users",
    "Sessions",
    "Bounce rate",
    TARGET_COLUMN,
];

/// Raw table of string cells as read from a CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl Table {
    /// Create a table from headers and rows of cells
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            records: rows
                .into_iter()
                .map(|row| row.into_iter().collect::<StringRecord>())
                .collect(),
        }
    }

    /// Read a table from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading csv");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a table from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { headers, records })
    }

    /// Column headers
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Strip leading and trailing whitespace from every header
    pub fn trim_headers(mut self) -> Self {
        for header in &mut self.headers {
            let trimmed = header.trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
        self
    }

    /// Parse every cell of a column as `f64`
    fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ImpactError::MissingColumns(vec![name.to_string()]))?;

        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let cell = record.get(idx).unwrap_or("").trim();
                cell.parse::<f64>().map_err(|_| {
                    ImpactError::ParseError(format!(
                        "row {}, column '{}': '{}' is not a number",
                        row + 1,
                        name,
                        cell
                    ))
                })
            })
            .collect()
    }

    /// Parse the date column, if present
    fn date_column(&self) -> Result<Option<Vec<NaiveDate>>> {
        let Some(idx) = self.column_index(DATE_COLUMN) else {
            return Ok(None);
        };

        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let cell = record.get(idx).unwrap_or("").trim();
                NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|e| {
                    ImpactError::ParseError(format!(
                        "row {}, column '{}': '{}' is not a YYYYMMDD date ({})",
                        row + 1,
                        DATE_COLUMN,
                        cell,
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

/// Trim all headers and check that every required column is present
///
/// Returns the cleaned table, or [`ImpactError::MissingColumns`] listing the
/// absent names in the order they were required.
pub fn validate_columns(table: Table, required: &[&str]) -> Result<Table> {
    let table = table.trim_headers();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ImpactError::MissingColumns(missing));
    }

    Ok(table)
}

/// Predictor rows, optionally indexed by date
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    dates: Option<Vec<NaiveDate>>,
    rows: Vec<FeatureRow>,
}

impl FeatureSet {
    /// Create a feature set without a date index
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { dates: None, rows }
    }

    /// Attach a date index
    pub fn with_dates(mut self, dates: Vec<NaiveDate>) -> Result<Self> {
        if dates.len() != self.rows.len() {
            return Err(ImpactError::DimensionMismatch {
                expected: self.rows.len(),
                actual: dates.len(),
            });
        }
        self.dates = Some(dates);
        Ok(self)
    }

    /// Load the four predictor columns from a CSV file
    ///
    /// A target column is allowed but ignored.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(Table::from_csv(path)?)
    }

    /// Load the four predictor columns from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_table(Table::from_reader(reader)?)
    }

    /// Build a feature set from a raw table
    pub fn from_table(table: Table) -> Result<Self> {
        let table = validate_columns(table, &Feature::column_names())?;
        Self::extract(&table)
    }

    fn extract(table: &Table) -> Result<Self> {
        let columns = Feature::ALL
            .iter()
            .map(|f| table.numeric_column(f.column_name()))
            .collect::<Result<Vec<_>>>()?;

        let rows = (0..table.len())
            .map(|i| FeatureRow::new([columns[0][i], columns[1][i], columns[2][i], columns[3][i]]))
            .collect();

        Ok(Self {
            dates: table.date_column()?,
            rows,
        })
    }

    /// Predictor rows
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Date index, if the source had one
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a single feature across all rows
    pub fn column(&self, feature: Feature) -> Vec<f64> {
        self.rows.iter().map(|row| row[feature]).collect()
    }

    /// Mean of every feature, used as the representative row for scenarios
    pub fn baseline(&self) -> Result<FeatureRow> {
        if self.rows.is_empty() {
            return Err(ImpactError::DataError(
                "Cannot compute a baseline from an empty dataset".to_string(),
            ));
        }

        let n = self.rows.len() as f64;
        let mut sums = [0.0; Feature::COUNT];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(row.values()) {
                *sum += value;
            }
        }

        Ok(FeatureRow::new(sums.map(|sum| sum / n)))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            dates: self
                .dates
                .as_ref()
                .map(|dates| indices.iter().map(|&i| dates[i]).collect()),
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
        }
    }
}

/// Predictors paired with observed key events
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    inputs: FeatureSet,
    target: Vec<f64>,
}

impl Dataset {
    /// Create a dataset from feature rows and matching key event counts
    pub fn new(inputs: FeatureSet, target: Vec<f64>) -> Result<Self> {
        if inputs.len() != target.len() {
            return Err(ImpactError::DimensionMismatch {
                expected: inputs.len(),
                actual: target.len(),
            });
        }
        Ok(Self { inputs, target })
    }

    /// Load a training dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(Table::from_csv(path)?)
    }

    /// Load a training dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_table(Table::from_reader(reader)?)
    }

    /// Validate the schema of a raw table and parse it
    pub fn from_table(table: Table) -> Result<Self> {
        let table = validate_columns(table, &REQUIRED_COLUMNS)?;
        let inputs = FeatureSet::extract(&table)?;
        let target = table.numeric_column(TARGET_COLUMN)?;

        debug!(rows = inputs.len(), dated = inputs.dates().is_some(), "dataset loaded");
        Self::new(inputs, target)
    }

    /// The predictor side of the dataset
    pub fn inputs(&self) -> &FeatureSet {
        &self.inputs
    }

    /// Predictor rows
    pub fn features(&self) -> &[FeatureRow] {
        self.inputs.rows()
    }

    /// Observed key events
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Date index, if the source had one
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.inputs.dates()
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Check if there are no observations
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Mean of every feature
    pub fn baseline(&self) -> Result<FeatureRow> {
        self.inputs.baseline()
    }

    /// Subset of observations by position, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            inputs: self.inputs.select(indices),
            target: indices.iter().map(|&i| self.target[i]).collect(),
        }
    }
}
