//! Sample series and the sources they are loaded from.
//!
//! A batch is fed with [`SeriesSource`]s rather than ready-made series, so
//! that loading failures (a missing column, unparseable cells, an
//! unreadable file) surface per source and can be isolated by the batch
//! orchestrator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Column read from each source unless configured otherwise.
pub const DEFAULT_COLUMN: &str = "samples";

/// An immutable, ordered series of observations from one source.
///
/// # Examples
///
/// ```
/// use spc_capability::SampleSeries;
///
/// let series = SampleSeries::new("line-1", vec![10.0, 12.0, 11.0]);
/// assert_eq!(series.source_id(), "line-1");
/// assert_eq!(series.count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    source_id: String,
    values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(source_id: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            source_id: source_id.into(),
            values,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Observations in their original order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// Something that can produce a [`SampleSeries`] for a named column.
pub trait SeriesSource {
    /// Identifier used in records and error messages (typically a file name).
    fn source_id(&self) -> &str;

    /// Loads the values of `column`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingField`] if the column does not exist,
    /// [`AnalysisError::InvalidData`] if its cells cannot be read as numbers.
    fn load(&self, column: &str) -> Result<SampleSeries, AnalysisError>;
}

/// An already loaded series ignores the column name.
impl SeriesSource for SampleSeries {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn load(&self, _column: &str) -> Result<SampleSeries, AnalysisError> {
        Ok(self.clone())
    }
}

impl<T: SeriesSource + ?Sized> SeriesSource for &T {
    fn source_id(&self) -> &str {
        (**self).source_id()
    }

    fn load(&self, column: &str) -> Result<SampleSeries, AnalysisError> {
        (**self).load(column)
    }
}

impl<T: SeriesSource + ?Sized> SeriesSource for Box<T> {
    fn source_id(&self) -> &str {
        (**self).source_id()
    }

    fn load(&self, column: &str) -> Result<SampleSeries, AnalysisError> {
        (**self).load(column)
    }
}

/// A source whose loading already failed upstream (e.g. an unreadable
/// file). Loading it always yields the stored error.
#[derive(Debug, Clone)]
pub struct FailedSource {
    source_id: String,
    error: AnalysisError,
}

impl FailedSource {
    pub fn new(source_id: impl Into<String>, error: AnalysisError) -> Self {
        Self {
            source_id: source_id.into(),
            error,
        }
    }
}

impl SeriesSource for FailedSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn load(&self, _column: &str) -> Result<SampleSeries, AnalysisError> {
        Err(self.error.clone())
    }
}

// ---------------------------------------------------------------------------
// Tabular sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cells {
    Numeric(Vec<f64>),
    /// Raw text cells, parsed lazily so that unrelated non-numeric columns
    /// never fail a load.
    Text(Vec<String>),
}

/// In-memory table of named columns.
///
/// # Examples
///
/// ```
/// use spc_capability::{SeriesSource, Table};
///
/// let csv = "id,samples\n1,10.5\n2,11.0\n";
/// let table = Table::from_csv_reader("run.csv", csv.as_bytes()).unwrap();
/// let series = table.load("samples").unwrap();
/// assert_eq!(series.values(), &[10.5, 11.0]);
///
/// assert!(table.load("muestras").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source_id: String,
    columns: Vec<(String, Cells)>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            columns: Vec::new(),
        }
    }

    /// Adds (or replaces) a numeric column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name.into(), Cells::Numeric(values));
        self
    }

    /// Reads a CSV document with a header row.
    ///
    /// Cells are trimmed. Rows shorter than the header are padded with
    /// empty cells; empty cells are skipped when a column is loaded.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidData`] if the document is not valid CSV.
    pub fn from_csv_reader<R: io::Read>(
        source_id: impl Into<String>,
        reader: R,
    ) -> Result<Self, AnalysisError> {
        let source_id = source_id.into();
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| AnalysisError::invalid_data(&source_id, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record =
                record.map_err(|e| AnalysisError::invalid_data(&source_id, e.to_string()))?;
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or_default().to_string());
            }
        }

        let mut table = Self::new(source_id);
        for (name, column) in headers.into_iter().zip(cells) {
            table.insert(name, Cells::Text(column));
        }
        Ok(table)
    }

    /// Reads a CSV file; the source id is the file name.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidData`] if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path) -> Result<Self, AnalysisError> {
        let source_id = source_id_for(path);
        let file = fs::File::open(path)
            .map_err(|e| AnalysisError::invalid_data(&source_id, e.to_string()))?;
        Self::from_csv_reader(source_id, io::BufReader::new(file))
    }

    /// Column names in insertion (header) order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    fn insert(&mut self, name: String, cells: Cells) {
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = cells,
            None => self.columns.push((name, cells)),
        }
    }
}

impl SeriesSource for Table {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn load(&self, column: &str) -> Result<SampleSeries, AnalysisError> {
        let (_, cells) = self
            .columns
            .iter()
            .find(|(name, _)| name == column)
            .ok_or_else(|| AnalysisError::MissingField {
                source_id: self.source_id.clone(),
                column: column.to_string(),
            })?;

        let values = match cells {
            Cells::Numeric(values) => values.clone(),
            Cells::Text(raw) => parse_cells(&self.source_id, column, raw)?,
        };
        Ok(SampleSeries::new(self.source_id.clone(), values))
    }
}

fn parse_cells(source_id: &str, column: &str, raw: &[String]) -> Result<Vec<f64>, AnalysisError> {
    raw.iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(row, cell)| {
            cell.parse::<f64>().map_err(|_| {
                // +2: one for the header, one for 1-based numbering
                AnalysisError::invalid_data(
                    source_id,
                    format!("column '{column}' row {}: '{cell}' is not a number", row + 2),
                )
            })
        })
        .collect()
}

/// File name of `path`, falling back to the full path.
pub fn source_id_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Directories
// ---------------------------------------------------------------------------

/// Regular files of `dir` with a `csv` extension in any letter case,
/// sorted by path. Subdirectories are not descended into.
///
/// # Errors
///
/// Any I/O error raised while listing `dir`.
pub fn csv_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Opens the CSV file at `path` as a source. A file that cannot be read
/// or parsed becomes a [`FailedSource`], so the batch records the failure
/// and moves on.
pub fn load_csv(path: &Path) -> Box<dyn SeriesSource> {
    match Table::from_csv_path(path) {
        Ok(table) => Box::new(table),
        Err(err) => Box::new(FailedSource::new(source_id_for(path), err)),
    }
}
