use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure taxonomy for the wrapper. Nothing here is recovered locally;
/// every variant propagates to the caller and stops the day loop.
#[derive(Error, Debug)]
pub enum HrrError {
    #[error("configuration file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("`{command}` in {} exited with {status}", .dir.display())]
    Build {
        command: String,
        dir: PathBuf,
        status: ExitStatus,
    },

    #[error("undefined flag mode {0}")]
    Usage(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mode {0} is unsupported")]
    UnsupportedMode(String),

    #[error("{} {flag} exited with {status}", .exe.display())]
    Process {
        exe: PathBuf,
        flag: String,
        status: ExitStatus,
    },

    #[error("discharge table {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Convenience type for `Result<T, HrrError>`.
pub type Result<T> = std::result::Result<T, HrrError>;
