//! CSV dataset access
//!
//! - `filter`: column predicates and duplicate-name detection
//! - `naming`: filename sanitizing and file id parsing

mod filter;
mod naming;

pub use filter::{duplicate_names, ColumnFilter};
pub use naming::{parse_file_id, sanitize_filename, usable_filename};

use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// An in-memory CSV export with a header row.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

/// One record, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    /// 0-based position in the dataset before any filtering.
    pub index: usize,
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl Dataset {
    /// Read a CSV file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;
        Self::collect(reader)
    }

    /// Read CSV data from any reader.
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let reader = ReaderBuilder::new().flexible(true).from_reader(input);
        Self::collect(reader)
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fail with [`Error::MissingColumn`] unless every named column is in the header.
    pub fn require_columns<'c, I>(&self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'c str>,
    {
        for column in columns {
            if !self.headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().enumerate().map(move |(index, record)| Row {
            index,
            headers: &self.headers,
            record,
        })
    }
}

impl<'a> Row<'a> {
    /// Raw cell value; `None` when the column is unknown or the record is short.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let position = self.headers.iter().position(|h| h == column)?;
        self.record.get(position)
    }

    /// Trimmed cell value; blank cells count as missing.
    pub fn value(&self, column: &str) -> Option<&'a str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }
}
