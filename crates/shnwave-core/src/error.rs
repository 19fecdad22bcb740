//! Error types for shnwave

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaveError {
    #[error("WAVE header is missing RIFF tag - possible truncated/corrupt file")]
    MissingRiffTag,
    #[error("file contains AIFF data, which is not handled by the WAVE parser")]
    AiffContainer,
    #[error("WAVE header is missing WAVE tag")]
    MissingWaveTag,
    #[error("reached end of file while looking for fmt tag")]
    FmtChunkNotFound,
    #[error("fmt chunk in WAVE header was too short ({0} bytes)")]
    FmtChunkTooShort(u32),
    #[error("reached end of file while looking for data tag")]
    DataChunkNotFound,
    #[error("unsupported format 0x{tag:04x} ({name}) - only PCM data is supported")]
    UnsupportedFormat { tag: u16, name: &'static str },
    #[error("reached end of file while {context}")]
    UnexpectedEof { context: String },
    #[error("calculated byte rate is zero")]
    ZeroRate,
    #[error("block align is zero")]
    ZeroBlockAlign,
    #[error("ID3v2 tag size {tag_size} exceeds file size {actual_size}")]
    Id3v2TagTooLarge { tag_size: u64, actual_size: u64 },
    #[error("{field} value {value} does not fit in a 32-bit WAVE header field")]
    SizeOverflow { field: &'static str, value: u64 },
    #[error("header size {header_size} is not valid for a {len}-byte header buffer")]
    BadHeaderSize { header_size: u32, len: usize },
    #[error("{format} to wav input kluge failed: {reason}")]
    HeaderKlugeFailed { format: &'static str, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WaveError {
    pub(crate) fn eof(context: impl Into<String>) -> Self {
        WaveError::UnexpectedEof { context: context.into() }
    }

    pub(crate) fn kluge(format: &'static str, reason: impl Into<String>) -> Self {
        WaveError::HeaderKlugeFailed { format, reason: reason.into() }
    }

    /// Structural failures abort the current file only
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WaveError::MissingRiffTag
                | WaveError::AiffContainer
                | WaveError::MissingWaveTag
                | WaveError::FmtChunkNotFound
                | WaveError::FmtChunkTooShort(_)
                | WaveError::DataChunkNotFound
                | WaveError::UnsupportedFormat { .. }
                | WaveError::UnexpectedEof { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WaveError>;
