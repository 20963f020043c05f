use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::error::{HrrError, Result};

// Outer time step: the model integrates ndt internal steps of dtis seconds
// per invocation. 24 x 3600 s = one day per call.
pub const NDT: u32 = 24;
pub const DTIS: u32 = 3600;

/// Daily runoff forcing file for a date: `<runoffDir>/<YYYYMMDD>.txt`.
/// Existence is not checked here; the model validates the file when it
/// reads it.
pub fn runoff_path(runoff_dir: &Path, date: NaiveDate) -> PathBuf {
    runoff_dir.join(format!("{}.txt", date.format("%Y%m%d")))
}

// The executable parses the deck by line position, never by key. Line
// order and the parameter order below must not change.
const PARAM_NAMES: [&str; 10] = [
    "pfafunits",
    "ndx",
    "ndt",
    "dtis",
    "iyear",
    "imonth",
    "iday",
    "Julian Day",
    "setfsub_rate",
    "n_ch_all",
];

/// One invocation's input deck, written to `<outDir>/input.txt`.
#[derive(Debug, Clone)]
pub struct InputDeck {
    pub assim_mode: String,
    pub src_dir: PathBuf,
    pub runoff_file: PathBuf,
    pub restart_file: PathBuf,
    pub out_dir: PathBuf,
    pub date: NaiveDate,
    pub pfafunits: String,
    pub ndx: String,
    pub sb_rate: String,
    pub n_ch_all: String,
}

impl InputDeck {
    pub fn render(&self) -> String {
        let values: [String; 10] = [
            self.pfafunits.clone(),
            self.ndx.clone(),
            NDT.to_string(),
            DTIS.to_string(),
            self.date.year().to_string(),
            self.date.month().to_string(),
            self.date.day().to_string(),
            self.date.ordinal().to_string(),
            self.sb_rate.clone(),
            self.n_ch_all.clone(),
        ];

        let mut text = String::new();
        text.push_str(&format!("{}\n", self.assim_mode));
        text.push_str(&format!("{}\n", self.src_dir.display()));
        text.push_str(&format!("{}\n", self.runoff_file.display()));
        text.push_str(&format!("{}\n", self.restart_file.display()));
        text.push_str(&format!("{}\n", self.out_dir.display()));
        for (value, name) in values.iter().zip(PARAM_NAMES) {
            text.push_str(&format!("{value}    {name}\n"));
        }
        text
    }

    /// Write the deck into the output directory and return its path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = self.out_dir.join("input.txt");
        std::fs::write(&path, self.render()).map_err(|e| HrrError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
