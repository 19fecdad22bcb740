//! shnwave-core: WAVE header parsing, validation and canonical header writing

pub mod convert;
mod error;
pub mod format;
pub mod header;
pub mod kluge;
pub mod length;
mod parser;
pub mod tag;
mod wave;

pub use error::{Result, WaveError};
pub use format::{FORMATS, FormatDescriptor, FormatKind, find_format, sniff_format};
pub use header::{CanonicalHeader, build_canonical_header, patch_chunk_size, patch_data_size, wire_u32};
pub use kluge::{AiffComm, apply_header_kluges, read_aiff_comm};
pub use length::{format_duration, format_total_duration};
pub use parser::{ParseOptions, parse_header};
pub use wave::*;
