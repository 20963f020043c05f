//! Driver for the external HRR routing model.
//!
//! The model is a pre-compiled executable invoked once per simulated day:
//! `run <flag> <deckPath>`. The driver writes the deck, blocks on the
//! invocation (no timeout, at most one in flight), advances the simulation
//! clock by one outer step, and reads back the discharge table the model
//! wrote. Failures are never retried; they surface to the caller's loop.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::info;

use crate::config::Config;
use crate::deck::{DTIS, InputDeck, NDT, runoff_path};
use crate::error::{HrrError, Result};
use crate::io::discharge::{DischargeRow, read_discharge};
use crate::workdir::WorkDir;

/// Operation mode for one invocation: cold start, or continue from the
/// restart state written by the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFlag {
    Initial,
    Restart,
}

impl RunFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            RunFlag::Initial => "initial",
            RunFlag::Restart => "restart",
        }
    }
}

impl FromStr for RunFlag {
    type Err = HrrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "initial" => Ok(RunFlag::Initial),
            "restart" => Ok(RunFlag::Restart),
            other => Err(HrrError::Usage(other.to_string())),
        }
    }
}

pub struct Hrr {
    config: Config,
    src_dir: PathBuf,
    exe: PathBuf,
    outer_dt: Duration,
}

impl Hrr {
    /// Load the configuration and locate the model tree under
    /// `model.rootDir`. With `compile` set, runs `make clean` then
    /// `make all` in the model source directory before returning.
    pub fn new(config_path: &Path, compile: bool) -> Result<Self> {
        let config = Config::from_path(config_path)?;
        let root_dir = PathBuf::from(config.get("model", "rootDir")?);
        let src_dir = root_dir.join("src/");
        let exe = src_dir.join("run");

        let hrr = Hrr {
            config,
            src_dir,
            exe,
            outer_dt: Duration::seconds(i64::from(NDT * DTIS)),
        };
        if compile {
            hrr.compile()?;
        }
        Ok(hrr)
    }

    fn compile(&self) -> Result<()> {
        info!(dir = %self.src_dir.display(), "compilation is activated, make clean/all");
        // make runs inside the source tree; the guard puts the previous
        // working directory back on every exit path.
        let _guard = WorkDir::enter(&self.src_dir)?;
        self.make("clean")?;
        self.make("all")
    }

    fn make(&self, target: &str) -> Result<()> {
        info!("make {target}");
        let status = Command::new("make")
            .arg(target)
            .status()
            .map_err(|e| HrrError::Io {
                path: self.src_dir.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(HrrError::Build {
                command: format!("make {target}"),
                dir: self.src_dir.clone(),
                status,
            });
        }
        Ok(())
    }

    /// Run one simulated day. Writes the deck, invokes the model, and
    /// returns the day's discharge row together with the next simulation
    /// date. The runoff file is not checked for existence here; the model
    /// validates it when it reads it.
    pub fn run_day(
        &self,
        date: NaiveDate,
        flag: RunFlag,
        restart: &Path,
        runoff_dir: &Path,
        assim_mode: &str,
        out_dir: &Path,
    ) -> Result<(DischargeRow, NaiveDate)> {
        let deck = InputDeck {
            assim_mode: assim_mode.to_string(),
            src_dir: self.src_dir.clone(),
            runoff_file: runoff_path(runoff_dir, date),
            restart_file: restart.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            date,
            pfafunits: self.config.get("input", "pfafunits")?.to_string(),
            ndx: self.config.get("input", "ndx")?.to_string(),
            sb_rate: self.config.get("input", "sbRate")?.to_string(),
            n_ch_all: self.config.get("input", "n_ch_all")?.to_string(),
        };
        let deck_path = deck.write()?;

        info!(date = %date, flag = flag.as_str(), "running model");
        let status = Command::new(&self.exe)
            .arg(flag.as_str())
            .arg(&deck_path)
            .status()
            .map_err(|e| HrrError::Io {
                path: self.exe.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(HrrError::Process {
                exe: self.exe.clone(),
                flag: flag.as_str().to_string(),
                status,
            });
        }

        let row = read_discharge(&out_dir.join("discharge_cms.txt"), date)?;
        Ok((row, self.next_date(date)))
    }

    fn next_date(&self, date: NaiveDate) -> NaiveDate {
        (date.and_time(NaiveTime::MIN) + self.outer_dt).date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workdir::CWD_LOCK;
    use std::fs;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Model tree with a stub `run` executable and a seeded discharge table.
    #[cfg(unix)]
    fn stub_model(dir: &Path, exit_code: i32) -> (PathBuf, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let root = dir.join("hrr");
        let src = root.join("src");
        let out = dir.join("out");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&out).unwrap();

        let exe = src.join("run");
        fs::write(&exe, format!("#!/bin/sh\nexit {exit_code}\n")).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(
            out.join("discharge_cms.txt"),
            "st01   st02\n104.2   3.75\n",
        )
        .unwrap();

        let config_path = dir.join("config.toml");
        fs::write(
            &config_path,
            format!(
                "[model]\nrootDir = \"{}\"\n\n[input]\npfafunits = \"325\"\nndx = \"8\"\nsbRate = \"0.05\"\nn_ch_all = \"1060\"\n",
                root.display()
            ),
        )
        .unwrap();

        (config_path, out)
    }

    #[test]
    fn flag_parses_only_initial_and_restart() {
        assert_eq!("initial".parse::<RunFlag>().unwrap(), RunFlag::Initial);
        assert_eq!("restart".parse::<RunFlag>().unwrap(), RunFlag::Restart);

        let err = "banana".parse::<RunFlag>().unwrap_err();
        assert!(matches!(err, HrrError::Usage(_)));
        assert_eq!(err.to_string(), "undefined flag mode banana");
    }

    #[test]
    #[cfg(unix)]
    fn run_day_returns_the_row_and_the_next_date() {
        let dir = tempdir().unwrap();
        let (config_path, out) = stub_model(dir.path(), 0);
        let runoff = dir.path().join("runoff");

        let hrr = Hrr::new(&config_path, false).unwrap();
        let (row, next) = hrr
            .run_day(
                date(1990, 12, 31),
                RunFlag::Initial,
                Path::new("restart.txt"),
                &runoff,
                "normal",
                &out,
            )
            .unwrap();

        assert_eq!(row.date, date(1990, 12, 31));
        assert_eq!(row.values, vec![104.2, 3.75]);
        // one outer step = exactly one calendar day, across the year boundary
        assert_eq!(next, date(1991, 1, 1));

        let deck = fs::read_to_string(out.join("input.txt")).unwrap();
        let lines: Vec<&str> = deck.lines().collect();
        assert_eq!(lines[0], "normal");
        assert_eq!(
            lines[2],
            format!("{}/19901231.txt", runoff.display())
        );
        assert_eq!(lines[3], "restart.txt");
    }

    #[test]
    #[cfg(unix)]
    fn nonzero_model_exit_is_a_process_error() {
        let dir = tempdir().unwrap();
        let (config_path, out) = stub_model(dir.path(), 9);

        let hrr = Hrr::new(&config_path, false).unwrap();
        let err = hrr
            .run_day(
                date(1990, 1, 1),
                RunFlag::Restart,
                Path::new("restart.txt"),
                dir.path(),
                "normal",
                &out,
            )
            .unwrap_err();

        match err {
            HrrError::Process { status, .. } => assert_eq!(status.code(), Some(9)),
            other => panic!("expected Process, got {other}"),
        }
    }

    #[test]
    fn next_date_advances_one_day_across_boundaries() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[model]\nrootDir = \"/opt/hrr\"\n").unwrap();
        let hrr = Hrr::new(&config_path, false).unwrap();

        assert_eq!(hrr.next_date(date(1990, 1, 1)), date(1990, 1, 2));
        assert_eq!(hrr.next_date(date(1990, 2, 28)), date(1990, 3, 1));
        assert_eq!(hrr.next_date(date(1990, 12, 31)), date(1991, 1, 1));
    }

    #[test]
    fn failed_build_restores_the_working_directory() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let before = std::env::current_dir().unwrap();

        // a source tree with no Makefile, so `make clean` cannot succeed
        let root = dir.path().join("hrr");
        fs::create_dir_all(root.join("src")).unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("[model]\nrootDir = \"{}\"\n", root.display()),
        )
        .unwrap();

        assert!(Hrr::new(&config_path, true).is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
