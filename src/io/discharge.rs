use std::path::Path;

use chrono::NaiveDate;

use crate::error::{HrrError, Result};

// One simulated day of model output, indexed under the simulation date.
// discharge_cms.txt is whitespace-delimited: a header row of station
// columns, then a single data row for the day just run.
#[derive(Debug, Clone)]
pub struct DischargeRow {
    pub date: NaiveDate,
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl DischargeRow {
    fn from_table(text: &str, date: NaiveDate) -> std::result::Result<Self, String> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let header = lines.next().ok_or("file is empty")?;
        let columns: Vec<String> = header.split_whitespace().map(str::to_string).collect();

        let row = lines.next().ok_or("no data row below the header")?;
        let mut values = Vec::with_capacity(columns.len());
        for field in row.split_whitespace() {
            let value = field
                .parse::<f64>()
                .map_err(|_| format!("non-numeric value {field:?}"))?;
            values.push(value);
        }

        if values.len() != columns.len() {
            return Err(format!(
                "{} columns in header but {} values in row",
                columns.len(),
                values.len()
            ));
        }

        Ok(DischargeRow {
            date,
            columns,
            values,
        })
    }
}

/// Read the model's discharge table and index its row under `date`.
pub fn read_discharge(path: &Path, date: NaiveDate) -> Result<DischargeRow> {
    let text = std::fs::read_to_string(path).map_err(|e| HrrError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    DischargeRow::from_table(&text, date).map_err(|message| HrrError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
