use std::cell::OnceCell;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Source location and layout
// ---------------------------------------------------------------------------

/// Fixed location of the indicator table, relative to the working directory.
pub const DATA_PATH: &str = "data/dados.csv";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["dia", "poluicao", "transito", "areas_verdes"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("malformed CSV: {0}")]
    Parse(String),
    #[error("CSV missing '{0}' column")]
    MissingColumn(&'static str),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Raw rows (before date normalization)
// ---------------------------------------------------------------------------

/// One CSV row as read. Numeric cells that are empty or not numbers are `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "dia")]
    pub date: String,
    #[serde(rename = "poluicao", deserialize_with = "csv::invalid_option")]
    pub pollution: Option<f64>,
    #[serde(rename = "transito", deserialize_with = "csv::invalid_option")]
    pub traffic: Option<f64>,
    #[serde(rename = "areas_verdes", deserialize_with = "csv::invalid_option")]
    pub green_area: Option<f64>,
}

/// The whole file as read, zero rows included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read the indicator table from a file on disk.
pub fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    read_from(file)
}

/// Read the indicator table from any byte source.
///
/// Extra columns are ignored; the header must name every column in
/// [`REQUIRED_COLUMNS`].
pub fn read_from<R: Read>(source: R) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(LoadError::MissingColumn(missing));
    }

    let records = reader
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawTable { records })
}

// ---------------------------------------------------------------------------
// Memoizing loader
// ---------------------------------------------------------------------------

/// Reads its source once and hands out the same outcome afterwards.
///
/// Owned by the application state; failures are memoized too, so a missing
/// file is reported without touching the disk again.
#[derive(Debug)]
pub struct DatasetLoader {
    path: PathBuf,
    cached: OnceCell<Result<RawTable, LoadError>>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DATA_PATH)
    }
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the source has already been read.
    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    pub fn load(&self) -> Result<&RawTable, LoadError> {
        self.cached
            .get_or_init(|| {
                let outcome = read_csv(&self.path);
                match &outcome {
                    Ok(table) => log::info!(
                        "Loaded {} rows from {}",
                        table.len(),
                        self.path.display()
                    ),
                    Err(e) => log::error!("Failed to load {}: {e}", self.path.display()),
                }
                outcome
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let csv = "dia,poluicao,transito,areas_verdes,bairro\n\
                   2024-01-01,10,5,3,Centro\n\
                   2024-01-02,20.5,6,3,Norte\n";
        let table = read_from(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].date, "2024-01-02");
        assert_eq!(table.records[1].pollution, Some(20.5));
        assert_eq!(table.records[0].green_area, Some(3.0));
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = "areas_verdes,dia,transito,poluicao\n7,2024-03-01,2,1\n";
        let table = read_from(csv.as_bytes()).unwrap();
        let row = &table.records[0];
        assert_eq!(row.date, "2024-03-01");
        assert_eq!(row.pollution, Some(1.0));
        assert_eq!(row.traffic, Some(2.0));
        assert_eq!(row.green_area, Some(7.0));
    }

    #[test]
    fn empty_and_invalid_numbers_become_none() {
        let csv = "dia,poluicao,transito,areas_verdes\n2024-01-01,,abc,4\n";
        let table = read_from(csv.as_bytes()).unwrap();
        let row = &table.records[0];
        assert_eq!(row.pollution, None);
        assert_eq!(row.traffic, None);
        assert_eq!(row.green_area, Some(4.0));
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let csv = "dia,poluicao,transito,areas_verdes\n";
        let table = read_from(csv.as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "dia,poluicao,transito\n2024-01-01,1,2\n";
        assert_eq!(
            read_from(csv.as_bytes()).unwrap_err(),
            LoadError::MissingColumn("areas_verdes")
        );
    }

    #[test]
    fn empty_file_is_missing_columns() {
        assert_eq!(
            read_from("".as_bytes()).unwrap_err(),
            LoadError::MissingColumn("dia")
        );
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let csv = "dia,poluicao,transito,areas_verdes\n2024-01-01,1,2\n";
        assert!(matches!(
            read_from(csv.as_bytes()).unwrap_err(),
            LoadError::Parse(_)
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let loader = DatasetLoader::new("does/not/exist.csv");
        assert_eq!(
            loader.load().unwrap_err(),
            LoadError::NotFound(PathBuf::from("does/not/exist.csv"))
        );
        assert!(loader.is_loaded());
    }

    #[test]
    fn loader_reads_the_file_only_once() {
        let path = std::env::temp_dir().join(format!(
            "urban-monitor-loader-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "dia,poluicao,transito,areas_verdes\n2024-01-01,1,2,3\n").unwrap();

        let loader = DatasetLoader::new(&path);
        assert!(!loader.is_loaded());
        assert_eq!(loader.load().unwrap().len(), 1);

        std::fs::remove_file(&path).unwrap();
        assert_eq!(loader.load().unwrap().len(), 1);
    }
}
