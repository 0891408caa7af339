use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoresError {
    #[error("input directory {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("{} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoresError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
