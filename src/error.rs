use std::{error::Error as _, path::PathBuf};

use thiserror::Error;

use crate::city::TableError;

/// Conditions that abort a compile before any output is written.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("missing input: {0}")]
    InputMissing(PathBuf),

    #[error("I/O error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("could not read CSV header row")]
    MissingHeader,

    #[error("CSV missing required columns: {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[cfg(feature = "zip")]
    #[error("zip archive error")]
    Zip(#[from] zip::result::ZipError),

    #[error("no .csv entry in archive `{0}`")]
    NoCsvInArchive(PathBuf),

    #[error("community table `{0}` is invalid")]
    CommunityTable(PathBuf, #[source] TableError),

    #[error("could not serialize output")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    /// The error followed by its chain of causes, one per line.
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            report.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        report
    }
}
