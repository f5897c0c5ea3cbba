//! Flat-file CSV tables with whole-file read-modify-write semantics.
//!
//! Each table is one CSV file under the data directory. Rows are never updated
//! in place: an append reads the table, adds one row and rewrites the file.
//! There is no locking, so two processes writing the same table can lose each
//! other's rows.

use crate::error::{BioflocError, Result};
use biofloc_schemas::{
    file_formats::SettingsFile,
    record::{Record, TableKind},
};
use chrono::NaiveDate;
use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Dates are stored as calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| BioflocError::InvalidDate(value.to_string()))
}

/// Where the tables live and how they are written.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub measurements_file: String,
    pub mortality_file: String,
    pub expenses_file: String,
    /// Prefix files with a UTF-8 byte order mark so spreadsheet tools detect the encoding.
    pub write_bom: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_settings(&SettingsFile::default())
    }
}

impl StoreConfig {
    pub fn from_settings(settings: &SettingsFile) -> Self {
        Self {
            data_dir: settings.data_dir.clone(),
            measurements_file: settings.tables.measurements.clone(),
            mortality_file: settings.tables.mortality.clone(),
            expenses_file: settings.tables.expenses.clone(),
            write_bom: settings.write_bom,
        }
    }
}

/// Handle to the three research tables. Created once per process and passed by
/// reference to whatever needs to read or write records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    /// Opens a store rooted at `config.data_dir`, creating the directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| BioflocError::FileIO(config.data_dir.display().to_string(), e))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn path_for(&self, table: TableKind) -> PathBuf {
        let file = match table {
            TableKind::Measurements => &self.config.measurements_file,
            TableKind::Mortality => &self.config.mortality_file,
            TableKind::Expenses => &self.config.expenses_file,
        };
        self.config.data_dir.join(file)
    }

    pub fn exists(&self, table: TableKind) -> bool {
        self.path_for(table).is_file()
    }

    /// Adds `record` as the last row of its table. The first append creates the
    /// file with a header row.
    pub fn append<R: Record>(&self, record: &R) -> Result<()> {
        let path = self.path_for(R::TABLE);
        let mut rows = match read_table::<R>(&path) {
            Ok(rows) => rows,
            Err(BioflocError::TableNotFound(_)) => {
                info!(table = %R::TABLE, path = %path.display(), "creating table");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        rows.push(record.clone());
        self.write_table(&path, &rows)?;
        debug!(table = %R::TABLE, rows = rows.len(), "appended row");
        Ok(())
    }

    /// All rows in file order. A table whose file does not exist is empty.
    pub fn read_all<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path_for(R::TABLE);
        match read_table::<R>(&path) {
            Err(BioflocError::TableNotFound(_)) => {
                warn!(table = %R::TABLE, "table file absent, treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Replaces the whole table with `rows`.
    pub fn overwrite<R: Record>(&self, rows: &[R]) -> Result<()> {
        let path = self.path_for(R::TABLE);
        self.write_table(&path, rows)?;
        info!(table = %R::TABLE, rows = rows.len(), "table overwritten");
        Ok(())
    }

    /// Removes every row whose date is in `dates`, keeping the rest in order.
    /// Returns the number of rows removed. An absent table is left absent.
    pub fn delete_by_date<R: Record>(&self, dates: &HashSet<NaiveDate>) -> Result<usize> {
        if !self.exists(R::TABLE) {
            return Ok(0);
        }
        let rows = self.read_all::<R>()?;
        let before = rows.len();
        let kept: Vec<R> = rows.into_iter().filter(|r| !dates.contains(&r.date())).collect();
        let removed = before - kept.len();
        self.overwrite(&kept)?;
        info!(table = %R::TABLE, removed, "deleted rows by date");
        Ok(removed)
    }

    /// Dates present in the table, each once, in first-seen order.
    pub fn distinct_dates<R: Record>(&self) -> Result<Vec<NaiveDate>> {
        let mut seen = HashSet::new();
        Ok(self
            .read_all::<R>()?
            .iter()
            .map(|r| r.date())
            .filter(|d| seen.insert(*d))
            .collect())
    }

    /// The table file's bytes, checked to parse as rows of `R`. An absent
    /// table exports as a header row only.
    pub fn export<R: Record>(&self) -> Result<Vec<u8>> {
        let path = self.path_for(R::TABLE);
        let label = path.display().to_string();
        match fs::read(&path) {
            Ok(bytes) => {
                parse_rows::<R>(&bytes, &label)?;
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                serialize_rows::<R>(&[], self.config.write_bom, R::TABLE.name())
            }
            Err(e) => Err(BioflocError::FileIO(label, e)),
        }
    }

    /// Replays every row of an exported blob through [`RecordStore::append`].
    pub fn import<R: Record>(&self, blob: &[u8]) -> Result<usize> {
        let rows: Vec<R> = parse_rows(blob, R::TABLE.name())?;
        for row in &rows {
            self.append(row)?;
        }
        info!(table = %R::TABLE, rows = rows.len(), "imported rows");
        Ok(rows.len())
    }

    fn write_table<R: Record>(&self, path: &Path, rows: &[R]) -> Result<()> {
        let label = path.display().to_string();
        let bytes = serialize_rows(rows, self.config.write_bom, &label)?;
        write_atomically(path, &bytes).map_err(|e| BioflocError::FileIO(label, e))
    }
}

/// Writes a header row followed by `rows`. The header is always present, so an
/// empty table still documents its schema.
pub fn serialize_rows<R: Record>(rows: &[R], write_bom: bool, label: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if write_bom {
        buf.extend_from_slice(UTF8_BOM);
    }
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(buf);
    writer
        .write_record(R::COLUMNS)
        .map_err(|e| BioflocError::CsvError(label.to_string(), e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| BioflocError::CsvError(label.to_string(), e))?;
    }
    writer
        .into_inner()
        .map_err(|e| BioflocError::FileIO(label.to_string(), e.into_error()))
}

/// Parses CSV content (with or without a leading BOM) into rows. Columns are
/// matched by header name, so their order does not matter.
pub fn parse_rows<R: Record>(bytes: &[u8], label: &str) -> Result<Vec<R>> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new().from_reader(content);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let record: R = result.map_err(|e| BioflocError::CsvError(label.to_string(), e))?;
        rows.push(record);
    }
    Ok(rows)
}

fn read_table<R: Record>(path: &Path) -> Result<Vec<R>> {
    let label = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BioflocError::TableNotFound(label.clone()),
        _ => BioflocError::FileIO(label.clone(), e),
    })?;
    parse_rows(&bytes, &label)
}

/// Writes to a temp file next to `path` and renames it into place. The temp
/// file is removed if any step fails.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
