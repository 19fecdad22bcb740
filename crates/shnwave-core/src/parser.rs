//! Streaming RIFF/WAVE header parser

use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::convert::{read_u16_le, read_u32_le};
use crate::error::{Result, WaveError};
use crate::format::FormatDescriptor;
use crate::kluge;
use crate::tag::{AIFF_FORM, WAVE_DATA, WAVE_FMT, WAVE_RIFF, WAVE_WAVE, tag_display, tag_equals};
use crate::wave::{WAVE_FORMAT_PCM, WaveInfo, wave_format_name};

/// Per-file facts the parser cannot learn from the stream itself
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Format the stream was decoded from
    pub format: &'static FormatDescriptor,
    /// Original file; the container kluge re-reads it
    pub filename: Option<&'a Path>,
    pub actual_size: u64,
    pub id3v2_tag_size: u64,
    /// Log a warning naming the failed expectation
    pub verbose: bool,
}

impl<'a> ParseOptions<'a> {
    pub fn new(format: &'static FormatDescriptor) -> Self {
        Self {
            format,
            filename: None,
            actual_size: 0,
            id3v2_tag_size: 0,
            verbose: false,
        }
    }

    pub fn filename(mut self, filename: &'a Path) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn actual_size(mut self, actual_size: u64) -> Self {
        self.actual_size = actual_size;
        self
    }

    pub fn id3v2_tag_size(mut self, id3v2_tag_size: u64) -> Self {
        self.id3v2_tag_size = id3v2_tag_size;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Parse and validate the WAVE header at the start of `reader`.
///
/// On success the reader is positioned at the first sample.
pub fn parse_header<R: Read>(reader: &mut R, opts: &ParseOptions<'_>) -> Result<WaveInfo> {
    let result = parse_header_quiet(reader, opts);
    if let Err(e) = &result
        && opts.verbose
    {
        let name = opts.filename.map(|p| p.display().to_string()).unwrap_or_else(|| "<stream>".into());
        warn!("while processing file '{}': {}", name, e);
    }
    result
}

fn parse_header_quiet<R: Read>(reader: &mut R, opts: &ParseOptions<'_>) -> Result<WaveInfo> {
    let tag = read_tag(reader)?;
    match tag {
        Some(t) if tag_equals(&t, WAVE_RIFF) => {}
        Some(t) if tag_equals(&t, AIFF_FORM) => return Err(WaveError::AiffContainer),
        _ => return Err(WaveError::MissingRiffTag),
    }

    let chunk_size = read_u32(reader, "reading chunk size from WAVE header")?;

    match read_tag(reader)? {
        Some(t) if tag_equals(&t, WAVE_WAVE) => {}
        _ => return Err(WaveError::MissingWaveTag),
    }

    let mut header_len: u64 = 12;

    let fmt_len = find_chunk(reader, WAVE_FMT, &mut header_len, WaveError::FmtChunkNotFound)?;
    if fmt_len < 16 {
        return Err(WaveError::FmtChunkTooShort(fmt_len));
    }

    let wave_format = read_u16(reader, "reading format")?;
    if wave_format != WAVE_FORMAT_PCM {
        return Err(WaveError::UnsupportedFormat {
            tag: wave_format,
            name: wave_format_name(wave_format),
        });
    }
    let channels = read_u16(reader, "reading channels")?;
    let samples_per_sec = read_u32(reader, "reading samples/sec")?;
    let avg_bytes_per_sec = read_u32(reader, "reading average bytes/sec")?;
    let block_align = read_u16(reader, "reading block align")?;
    let bits_per_sample = read_u16(reader, "reading bits/sample")?;
    header_len += 16;

    let fmt_extra = (fmt_len - 16) as u64;
    if fmt_extra > 0 {
        skip(reader, fmt_extra, "skipping the rest of the fmt chunk")?;
        header_len += fmt_extra;
    }

    let data_size = find_chunk(reader, WAVE_DATA, &mut header_len, WaveError::DataChunkNotFound)?;

    let header_size = u32::try_from(header_len).map_err(|_| WaveError::SizeOverflow {
        field: "header size",
        value: header_len,
    })?;

    let mut info = WaveInfo {
        filename: opts.filename.map(Path::to_path_buf),
        input_format: Some(opts.format),
        wave_format,
        channels,
        samples_per_sec,
        avg_bytes_per_sec,
        block_align,
        bits_per_sample,
        header_size,
        chunk_size: chunk_size as u64,
        data_size: data_size as u64,
        actual_size: opts.actual_size,
        file_has_id3v2_tag: opts.id3v2_tag_size > 0,
        id3v2_tag_size: opts.id3v2_tag_size,
        ..Default::default()
    };

    kluge::apply_header_kluges(None, &mut info)?;

    info.compute_derived()?;
    info.classify()?;

    debug!(
        header_size = info.header_size,
        data_size = info.data_size,
        chunk_size = info.chunk_size,
        problems = info.problems.bits(),
        "parsed WAVE header"
    );

    Ok(info)
}

/// Walk chunks until `wanted`, skipping others. Returns the chunk's declared length.
fn find_chunk<R: Read>(reader: &mut R, wanted: &str, header_len: &mut u64, not_found: WaveError) -> Result<u32> {
    loop {
        let Some(tag) = read_tag(reader)? else { return Err(not_found) };
        let Some(len) = read_array::<4, _>(reader)?.map(read_u32_le) else { return Err(not_found) };
        *header_len += 8;

        if tag_equals(&tag, wanted) {
            return Ok(len);
        }

        debug!(chunk = %tag_display(&tag), len, "skipping chunk while looking for '{}'", wanted.trim_end());
        skip(reader, len as u64, &format!("jumping ahead {len} bytes while looking for {} tag", wanted.trim_end()))?;
        *header_len += len as u64;
    }
}

fn skip<R: Read>(reader: &mut R, len: u64, context: &str) -> Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    if skipped != len {
        return Err(WaveError::eof(context));
    }
    Ok(())
}

/// `Ok(None)` on a clean or partial end of stream
fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<Option<[u8; N]>> {
    let mut buf = [0u8; N];
    match reader.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_tag<R: Read>(reader: &mut R) -> Result<Option<[u8; 4]>> {
    read_array::<4, _>(reader)
}

fn read_u32<R: Read>(reader: &mut R, context: &str) -> Result<u32> {
    read_array::<4, _>(reader)?
        .map(read_u32_le)
        .ok_or_else(|| WaveError::eof(context))
}

fn read_u16<R: Read>(reader: &mut R, context: &str) -> Result<u16> {
    read_array::<2, _>(reader)?
        .map(read_u16_le)
        .ok_or_else(|| WaveError::eof(context))
}
