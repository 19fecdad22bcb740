//! Pad CD-quality files out to the next sector boundary with silence

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use shnwave_core::{WaveInfo, apply_header_kluges, patch_chunk_size, patch_data_size, wire_u32};
use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::error::{Result, ServiceError};
use crate::inspect::open_input_stream;
use crate::output::{check_output, expect_moved, output_path, short_transfer, write_output};
use crate::probe::odd_sized_data_chunk_is_null_padded;
use crate::transfer::{read_fill, transfer_bytes, transfer_bytes_with_progress, write_padding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadPosition {
    Pre,
    #[default]
    Post,
}

impl PadPosition {
    pub fn label(self) -> &'static str {
        match self {
            PadPosition::Pre => "pre",
            PadPosition::Post => "post",
        }
    }

    fn postfix(self) -> &'static str {
        match self {
            PadPosition::Pre => "prepadded",
            PadPosition::Post => "postpadded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub position: PadPosition,
    pub pad_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadOutcome {
    pub plan: PadPlan,
    /// `false` in preview mode
    pub written: bool,
}

/// `<dir>/<stem>-prepadded.wav` or `-postpadded.wav`, next to the input
/// unless `output_dir` is given
pub fn pad_output_path(input: &Path, position: PadPosition, output_dir: Option<&Path>) -> PathBuf {
    output_path(input, position.postfix(), output_dir)
}

/// Decide whether and how `info` would be padded
pub fn plan_pad(info: &WaveInfo, position: PadPosition, config: &ToolConfig) -> Result<PadPlan> {
    let input = info.filename.clone().ok_or(ServiceError::NoSourceFile)?;

    if info.is_not_cd() {
        return Err(ServiceError::NotCdQuality { path: input });
    }
    if !info.has_bad_boundary() {
        return Err(ServiceError::AlreadySectorAligned { path: input });
    }

    let output = pad_output_path(&input, position, config.output_dir.as_deref());
    Ok(PadPlan {
        input,
        output,
        position,
        pad_bytes: info.bytes_to_sector_boundary(),
    })
}

/// Write a sector-aligned copy of `info`'s file.
///
/// `progress` receives `(bytes_done, data_size)` while the data chunk is
/// copied. With `preview` set nothing is written.
pub fn pad_file<F: FnMut(u64, u64)>(
    info: &WaveInfo,
    position: PadPosition,
    config: &ToolConfig,
    preview: bool,
    progress: F,
) -> Result<PadOutcome> {
    let plan = plan_pad(info, position, config)?;
    if preview {
        return Ok(PadOutcome { plan, written: false });
    }

    check_output(&plan.input, &plan.output, config)?;

    let has_null_pad = {
        let mut probe = open_input_stream(info)?;
        odd_sized_data_chunk_is_null_padded(info, &mut probe)?
    };

    info!(
        "{}-padding '{}' as '{}' with {} zero-bytes",
        position.label(),
        plan.input.display(),
        plan.output.display(),
        plan.pad_bytes
    );
    write_output(&plan.output, |output| write_padded(info, &plan, has_null_pad, output, progress))?;

    Ok(PadOutcome { plan, written: true })
}

fn write_padded<W: Write, F: FnMut(u64, u64)>(
    info: &WaveInfo,
    plan: &PadPlan,
    has_null_pad: bool,
    output: &mut W,
    mut progress: F,
) -> Result<()> {
    let mut input = open_input_stream(info)?;
    let mut info = info.clone();

    let mut header = vec![0u8; info.header_size as usize];
    let got = read_fill(&mut input, &mut header)?;
    if got != header.len() {
        return Err(short_transfer("reading the WAVE header", header.len() as u64, got as u64));
    }

    apply_header_kluges(Some(&mut header), &mut info)?;

    let padded_size = info.data_size + plan.pad_bytes;
    patch_data_size(&mut header, info.header_size, wire_u32("data size", padded_size)?)?;

    let mut chunk_size = info.header_size as u64 + padded_size - 8;
    if info.has_extra_chunks() {
        if info.has_odd_sized_data() && !has_null_pad {
            // the pad byte was never written, so the extra chunks start one byte earlier
            info.extra_riff_size += 1;
        }
        chunk_size += info.extra_riff_size as u64;
    }
    patch_chunk_size(&mut header, wire_u32("chunk size", chunk_size)?);

    output.write_all(&header)?;

    if plan.position == PadPosition::Pre {
        expect_moved("pre-padding", plan.pad_bytes, write_padding(output, plan.pad_bytes)?)?;
    }

    let total = info.data_size;
    let moved = transfer_bytes_with_progress(&mut input, output, total, |done| progress(done, total))?;
    expect_moved("transferring the data chunk", total, moved)?;

    if plan.position == PadPosition::Post {
        expect_moved("post-padding", plan.pad_bytes, write_padding(output, plan.pad_bytes)?)?;
    }

    if info.has_odd_sized_data() && has_null_pad {
        let mut pad = [0u8; 1];
        input.read_exact(&mut pad)?;
    }

    if info.extra_riff_size > 0 {
        let extra = info.extra_riff_size as u64;
        expect_moved("transferring extra RIFF chunks", extra, transfer_bytes(&mut input, output, extra)?)?;
    }

    debug!("padded output '{}' complete", plan.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shnwave_core::{CD_BLOCK_SIZE, Problems};

    fn cd_info(path: &str, data_size: u64) -> WaveInfo {
        WaveInfo {
            filename: Some(PathBuf::from(path)),
            data_size,
            problems: if data_size % CD_BLOCK_SIZE != 0 {
                Problems::CD_BUT_BAD_BOUNDARY
            } else {
                Problems::NONE
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_output_names() {
        let input = Path::new("/music/disc1/track01.wav");
        assert_eq!(
            pad_output_path(input, PadPosition::Post, None),
            PathBuf::from("/music/disc1/track01-postpadded.wav")
        );
        assert_eq!(
            pad_output_path(input, PadPosition::Pre, Some(Path::new("/out"))),
            PathBuf::from("/out/track01-prepadded.wav")
        );
        assert_eq!(
            pad_output_path(Path::new("noext"), PadPosition::Post, None),
            PathBuf::from("noext-postpadded.wav")
        );
    }

    #[test]
    fn test_plan_pad_bytes() {
        let plan = plan_pad(&cd_info("a.wav", CD_BLOCK_SIZE * 10 + 1000), PadPosition::Post, &ToolConfig::default())
            .unwrap();
        assert_eq!(plan.pad_bytes, CD_BLOCK_SIZE - 1000);
    }

    #[test]
    fn test_plan_rejections() {
        let config = ToolConfig::default();
        assert!(matches!(
            plan_pad(&cd_info("a.wav", CD_BLOCK_SIZE * 10), PadPosition::Post, &config),
            Err(ServiceError::AlreadySectorAligned { .. })
        ));

        let mut not_cd = cd_info("b.wav", 1000);
        not_cd.problems = Problems::NOT_CD_QUALITY;
        assert!(matches!(
            plan_pad(&not_cd, PadPosition::Post, &config),
            Err(ServiceError::NotCdQuality { .. })
        ));

        let mut unnamed = cd_info("c.wav", 1000);
        unnamed.filename = None;
        assert!(matches!(plan_pad(&unnamed, PadPosition::Post, &config), Err(ServiceError::NoSourceFile)));
    }

    #[test]
    fn test_preview_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("t.wav");
        let outcome = pad_file(
            &cd_info(input.to_str().unwrap(), 1000),
            PadPosition::Pre,
            &ToolConfig::default(),
            true,
            |_, _| {},
        )
        .unwrap();
        assert!(!outcome.written);
        assert!(!outcome.plan.output.exists());
    }
}
