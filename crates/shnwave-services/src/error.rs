use std::path::PathBuf;

use shnwave_core::WaveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Wave(#[from] WaveError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not open file '{}': {source}", path.display())]
    Open { path: PathBuf, source: std::io::Error },
    #[error("cannot open '{}' because it is a {kind}, not a regular file", path.display())]
    NotRegularFile { path: PathBuf, kind: &'static str },
    #[error("file '{}' is not handled by any of the builtin format modules", path.display())]
    UnrecognisedFormat { path: PathBuf },
    #[error("'{format}' files can only be read through the external decoder '{decoder}'")]
    NoNativeInput { format: &'static str, decoder: &'static str },
    #[error("no source file is recorded for this stream")]
    NoSourceFile,
    #[error("output file '{}' would overwrite input file '{}'", output.display(), input.display())]
    WouldOverwriteInput { output: PathBuf, input: PathBuf },
    #[error("output file '{}' already exists", path.display())]
    OutputExists { path: PathBuf },
    #[error("file '{}' is not CD-quality", path.display())]
    NotCdQuality { path: PathBuf },
    #[error("file '{}' is already sector-aligned", path.display())]
    AlreadySectorAligned { path: PathBuf },
    #[error("file '{}' has an inconsistent header", path.display())]
    InconsistentHeader { path: PathBuf },
    #[error("file '{}' seems to be truncated", path.display())]
    Truncated { path: PathBuf },
    #[error("file '{}' {reason}", path.display())]
    NothingToStrip { path: PathBuf, reason: &'static str },
    #[error("short transfer while {context}: {actual} of {expected} bytes")]
    ShortTransfer { context: &'static str, expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, ServiceError>;
