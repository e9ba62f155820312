use std::fs::File;
use std::io;
use std::path::Path;

use simplelog::{Config, LevelFilter, WriteLogger};

pub const LOG_PATH_VAR: &str = "LISTWIDGET_LOG";
pub const DEFAULT_LOG_PATH: &str = "listwidget.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("cannot create log file: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialised: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Routes the `log` facade to `path` at debug level.
pub fn init_file_logger(path: &Path) -> Result<(), LoggerError> {
    let log_file = File::create(path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;
    Ok(())
}
