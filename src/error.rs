use std::path::PathBuf;

use thiserror::Error;

/// Failure of one pipeline stage. Field-level problems never show up here;
/// they degrade to sentinel values inside the normalizers instead.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Creating tables in {database:?}")]
    Schema {
        database: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Reading sheet '{sheet}'")]
    Extract {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("Sheet '{sheet}' not found in {path:?}")]
    MissingSheet { sheet: String, path: PathBuf },
    #[error("Loading table '{table}'")]
    Load {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Reading table '{table}'")]
    Fetch {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StageError {
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Schema { .. } => "schema",
            StageError::Extract { .. } | StageError::MissingSheet { .. } => "extract",
            StageError::Load { .. } => "load",
            StageError::Fetch { .. } => "fetch",
        }
    }
}
