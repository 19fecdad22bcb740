//! shnwave-services: file inspection, configuration and the pad and strip operations

pub mod config;
mod error;
pub mod id3v2;
pub mod inspect;
pub mod output;
pub mod pad;
pub mod probe;
pub mod strip;
pub mod transfer;

pub use config::{ClobberAction, ProgressType, ToolConfig, load_config};
pub use error::{Result, ServiceError};
pub use id3v2::detect_id3v2;
pub use inspect::{inspect_file, inspect_stream, open_input_stream};
pub use pad::{PadOutcome, PadPlan, PadPosition, pad_file, plan_pad};
pub use probe::odd_sized_data_chunk_is_null_padded;
pub use strip::{StripOptions, StripOutcome, StripPlan, plan_strip, strip_file};
pub use transfer::{transfer_bytes, write_padding};
