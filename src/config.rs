//! Configuration loading for the model wrapper.
//!
//! The configuration is a section/key/value TOML file read once at startup.
//! Values are kept as strings end to end: the deck writer passes them to the
//! model executable verbatim, so the loader does no type validation and has
//! no defaults. Callers convert to numeric types where they need to.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::Value;

use crate::error::{HrrError, Result};

/// Section -> key -> string mapping, immutable after load.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Read and parse a configuration file. Fails if the file is absent or
    /// malformed (including any key nested deeper than section/key).
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HrrError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let raw: BTreeMap<String, BTreeMap<String, Value>> =
            toml::from_str(&text).map_err(|e| HrrError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut sections = BTreeMap::new();
        for (section, table) in raw {
            let mut keys = BTreeMap::new();
            for (key, value) in table {
                let value = match value {
                    Value::String(s) => s,
                    Value::Integer(i) => i.to_string(),
                    Value::Float(f) => f.to_string(),
                    Value::Boolean(b) => b.to_string(),
                    Value::Datetime(d) => d.to_string(),
                    Value::Array(_) | Value::Table(_) => {
                        return Err(HrrError::Config {
                            path: path.to_path_buf(),
                            message: format!("[{section}] {key} is not a scalar value"),
                        });
                    }
                };
                keys.insert(key, value);
            }
            sections.insert(section, keys);
        }

        Ok(Config {
            path: path.to_path_buf(),
            sections,
        })
    }

    /// Look up a value. Missing section or key is a configuration error.
    pub fn get(&self, section: &str, key: &str) -> Result<&str> {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
            .ok_or_else(|| HrrError::Config {
                path: self.path.clone(),
                message: format!("missing key [{section}] {key}"),
            })
    }
}
