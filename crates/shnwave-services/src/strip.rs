//! Rewrite headers in canonical form and drop trailing RIFF chunks

use std::io::Write;
use std::path::PathBuf;

use shnwave_core::{
    CANONICAL_HEADER_SIZE, WaveInfo, apply_header_kluges, build_canonical_header, patch_chunk_size, wire_u32,
};
use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::error::{Result, ServiceError};
use crate::inspect::open_input_stream;
use crate::output::{check_output, expect_moved, output_path, short_transfer, write_output};
use crate::probe::odd_sized_data_chunk_is_null_padded;
use crate::transfer::{read_fill, transfer_bytes};

const POSTFIX: &str = "stripped";

/// What to strip. At least one of the two should be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripOptions {
    /// Replace the header with the canonical 44-byte one
    pub header: bool,
    /// Leave out RIFF chunks that follow the data chunk
    pub chunks: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            header: true,
            chunks: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: StripOptions,
    /// Header size of the input
    pub header_size: u32,
    pub rewrites_header: bool,
    /// Trailing chunk bytes left out of the output
    pub stripped_bytes: u64,
    /// RIFF chunk size written to the output
    pub chunk_size: u32,
    has_null_pad: bool,
    kept_extra: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    pub plan: StripPlan,
    pub written: bool,
}

/// Decide whether and how `info` would be stripped.
///
/// Files with an odd-sized data chunk are reopened to check for the pad byte.
pub fn plan_strip(info: &WaveInfo, options: StripOptions, config: &ToolConfig) -> Result<StripPlan> {
    let input = info.filename.clone().ok_or(ServiceError::NoSourceFile)?;

    if info.is_header_inconsistent() {
        return Err(ServiceError::InconsistentHeader { path: input });
    }
    if info.may_be_truncated() {
        return Err(ServiceError::Truncated { path: input });
    }

    let canonical = !info.is_header_not_canonical();
    let no_extra = !info.has_extra_chunks();
    let nothing = match (options.header, options.chunks) {
        (true, true) if canonical && no_extra => Some("already has a canonical header and no extra RIFF chunks"),
        (false, true) if no_extra => Some("already has no extra RIFF chunks"),
        (true, false) if canonical => Some("already has a canonical header"),
        (false, false) => Some("has nothing selected to strip"),
        _ => None,
    };
    if let Some(reason) = nothing {
        return Err(ServiceError::NothingToStrip { path: input, reason });
    }

    let has_null_pad = if info.has_odd_sized_data() {
        let mut reader = open_input_stream(info)?;
        odd_sized_data_chunk_is_null_padded(info, &mut reader)?
    } else {
        false
    };

    // extra_riff_size assumes a pad byte after odd data
    let missing_pad = info.has_odd_sized_data() && !has_null_pad;
    let extra = u64::try_from(info.extra_riff_size + i64::from(missing_pad)).unwrap_or(0);
    let kept_extra = if options.chunks { 0 } else { extra };

    let header_size = if options.header {
        CANONICAL_HEADER_SIZE
    } else {
        info.header_size
    };
    let chunk_size = header_size as u64 + info.data_size + u64::from(has_null_pad) + kept_extra - 8;

    let output = output_path(&input, POSTFIX, config.output_dir.as_deref());
    Ok(StripPlan {
        input,
        output,
        options,
        header_size: info.header_size,
        rewrites_header: options.header && !canonical,
        stripped_bytes: extra - kept_extra,
        chunk_size: wire_u32("chunk size", chunk_size)?,
        has_null_pad,
        kept_extra,
    })
}

/// Write a copy of `info`'s file with a canonical header and/or without
/// trailing RIFF chunks. With `preview` set nothing is written.
pub fn strip_file(info: &WaveInfo, options: StripOptions, config: &ToolConfig, preview: bool) -> Result<StripOutcome> {
    let plan = plan_strip(info, options, config)?;
    if preview {
        return Ok(StripOutcome { plan, written: false });
    }

    check_output(&plan.input, &plan.output, config)?;

    info!("stripping '{}' as '{}'", plan.input.display(), plan.output.display());
    write_output(&plan.output, |output| write_stripped(info, &plan, output))?;

    Ok(StripOutcome { plan, written: true })
}

fn write_stripped<W: Write>(info: &WaveInfo, plan: &StripPlan, output: &mut W) -> Result<()> {
    let mut input = open_input_stream(info)?;
    let mut info = info.clone();

    let mut header = vec![0u8; info.header_size as usize];
    let got = read_fill(&mut input, &mut header)?;
    if got != header.len() {
        return Err(short_transfer("reading the WAVE header", header.len() as u64, got as u64));
    }

    apply_header_kluges(Some(&mut header), &mut info)?;
    if plan.options.header {
        header = build_canonical_header(&info)?.to_vec();
    }
    patch_chunk_size(&mut header, plan.chunk_size);

    output.write_all(&header)?;

    let data = info.data_size + u64::from(plan.has_null_pad);
    expect_moved("transferring the data chunk", data, transfer_bytes(&mut input, output, data)?)?;

    if plan.kept_extra > 0 {
        let moved = transfer_bytes(&mut input, output, plan.kept_extra)?;
        expect_moved("transferring extra RIFF chunks", plan.kept_extra, moved)?;
    }

    debug!("stripped output '{}' complete", plan.output.display());
    Ok(())
}
