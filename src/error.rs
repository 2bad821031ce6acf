use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not open the {what} at {path:?}: {source}")]
    MissingFile {
        what: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    IO(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),
}

impl Error {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::MissingFile { what, path: path.into(), source }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
