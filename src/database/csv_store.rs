use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::StoreError;

/// A row type stored in its own CSV file.
///
/// Struct field order must equal `HEADERS`: rows are written positionally and
/// read back by header name.
pub trait CsvRecord: Serialize + DeserializeOwned + Clone + Send + 'static {
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Stamp the modification time.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Flat CSV file with a fixed header. Every mutation reads the whole file,
/// applies the change in memory and rewrites the file.
///
/// Quoting follows RFC 4180: values containing a comma, a double quote or a
/// newline are wrapped in quotes and inner quotes are doubled.
pub struct CsvTable<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: CsvRecord> CsvTable<T> {
    /// Opens the table in `dir`, creating the directory and the header-only
    /// file when missing.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let table = Self {
            path: dir.join(T::FILE_NAME),
            lock: Mutex::new(()),
            _record: PhantomData,
        };
        table.ensure_file()?;
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &T) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.ensure_file()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// All parseable rows in file order. Rows that fail to parse are logged
    /// and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.guard();
        self.read_unlocked()
    }

    pub fn find(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.read_all()?.into_iter().find(|r| r.id() == id))
    }

    /// Applies `patch` to the row with `id`, stamps `updatedAt` and rewrites
    /// the file. Returns the updated row, or `None` if no row has that id.
    pub fn update<F>(&self, id: &str, patch: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let _guard = self.guard();
        let mut records = self.read_unlocked()?;

        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        patch(record);
        record.touch(Utc::now());
        let updated = record.clone();

        self.rewrite(&records)?;
        Ok(Some(updated))
    }

    /// Removes the row with `id`. Returns `false` if no row has that id.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.guard();
        let records = self.read_unlocked()?;
        let before = records.len();

        let remaining: Vec<T> = records.into_iter().filter(|r| r.id() != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.rewrite(&remaining)?;
        Ok(true)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_file(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(T::HEADERS)?;
        writer.flush()?;

        log::info!("📄 Created {} with header", self.path.display());
        Ok(())
    }

    fn read_unlocked(&self) -> Result<Vec<T>, StoreError> {
        if !self.path.exists() {
            self.ensure_file()?;
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut records = Vec::new();

        for result in reader.deserialize::<T>() {
            match result {
                Ok(record) => records.push(record),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    log::warn!(
                        "⚠️  Skipping unreadable row in {} (line {}): {}",
                        self.path.display(),
                        line,
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    /// Writes header + rows to a sibling temp file, then renames it over the
    /// table so readers never see a half-written file.
    fn rewrite(&self, records: &[T]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new().has_headers(false).from_path(&tmp)?;
            writer.write_record(T::HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
