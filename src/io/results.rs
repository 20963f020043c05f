use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use csv::WriterBuilder;

use crate::error::{HrrError, Result};
use crate::io::discharge::DischargeRow;

/// How a row lands in the results file: `write` truncates and emits the
/// header, `append` adds rows without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    Append,
}

impl FromStr for WriteMode {
    type Err = HrrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "write" => Ok(WriteMode::Write),
            "append" => Ok(WriteMode::Append),
            other => Err(HrrError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Persist one day's row to the accumulating results CSV. The `Date` column
/// comes first; repeated dates are appended as-is, never deduplicated.
pub fn append_output(row: &DischargeRow, dest: &Path, mode: WriteMode) -> Result<()> {
    let io_err = |e: std::io::Error| HrrError::Io {
        path: dest.to_path_buf(),
        source: e,
    };

    let file: File = match mode {
        WriteMode::Write => File::create(dest).map_err(io_err)?,
        WriteMode::Append => OpenOptions::new()
            .create(true)
            .append(true)
            .open(dest)
            .map_err(io_err)?,
    };

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    let csv_err = |e: csv::Error| HrrError::Io {
        path: dest.to_path_buf(),
        source: std::io::Error::other(e),
    };

    if mode == WriteMode::Write {
        let mut header = vec!["Date".to_string()];
        header.extend(row.columns.iter().cloned());
        writer.write_record(&header).map_err(csv_err)?;
    }

    let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
    record.extend(row.values.iter().map(|v| v.to_string()));
    writer.write_record(&record).map_err(csv_err)?;

    writer.flush().map_err(io_err)
}
