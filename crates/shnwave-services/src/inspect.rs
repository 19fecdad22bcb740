//! File-level entry point: regular-file checks, format sniffing, header parse

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use shnwave_core::format::{FormatDescriptor, WAV, WV, sniff_format};
use shnwave_core::tag::{tag_display, tag_equals};
use shnwave_core::{ParseOptions, WaveInfo, parse_header};
use tracing::debug;

use crate::error::{Result, ServiceError};
use crate::id3v2::detect_id3v2;
use crate::transfer::read_fill;

const SNIFF_LEN: usize = 12;
const WAVPACK_MAGIC: &str = "wvpk";

/// Validate `path` and read its WAVE header.
///
/// Only formats readable without an external decoder are parsed; any other
/// recognised format yields [`ServiceError::NoNativeInput`].
pub fn inspect_file(path: &Path) -> Result<WaveInfo> {
    let actual_size = check_regular_file(path)?;

    let file = File::open(path).map_err(|source| ServiceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let id3v2_tag_size = detect_id3v2(&mut reader)?.unwrap_or(0);

    let mut head = [0u8; SNIFF_LEN];
    let got = read_fill(&mut reader, &mut head)?;
    reader.seek(SeekFrom::Start(id3v2_tag_size))?;

    let Some(format) = sniff_format(&head[..got]) else {
        debug!(
            "file '{}' has {}-byte magic header [{}]",
            path.display(),
            got.min(4),
            tag_display(&head[..got.min(4)])
        );
        return Err(ServiceError::UnrecognisedFormat { path: path.to_path_buf() });
    };

    if !has_native_input(format) {
        return Err(no_native_input(format));
    }

    let name = path.display().to_string();
    let info = inspect_stream(&name, format, &mut reader, actual_size, id3v2_tag_size, Some(path))?;

    // old WavPack files open with a complete RIFF header
    if format.name == WAV.name {
        let mut magic = [0u8; 4];
        if reader.read_exact(&mut magic).is_ok() && tag_equals(&magic, WAVPACK_MAGIC) {
            debug!("file '{}' is WavPack behind a RIFF header", name);
            return Err(no_native_input(&WV));
        }
    }

    Ok(info)
}

/// Parse a decoded WAVE stream as produced by `format`'s decoder.
///
/// `source` names the original file, which container-translation kluges
/// need to re-read.
pub fn inspect_stream<R: Read>(
    name: &str,
    format: &'static FormatDescriptor,
    reader: &mut R,
    actual_size: u64,
    id3v2_tag_size: u64,
    source: Option<&Path>,
) -> Result<WaveInfo> {
    debug!("reading WAVE header of '{}' as {}", name, format.name);

    let mut opts = ParseOptions::new(format)
        .actual_size(actual_size)
        .id3v2_tag_size(id3v2_tag_size)
        .verbose(true);
    if let Some(source) = source {
        opts = opts.filename(source);
    }

    Ok(parse_header(reader, &opts)?)
}

/// Reopen `info`'s file at the start of its WAVE stream, past any ID3v2 tag
pub fn open_input_stream(info: &WaveInfo) -> Result<BufReader<File>> {
    let path = info.filename.as_deref().ok_or(ServiceError::NoSourceFile)?;
    let file = File::open(path).map_err(|source| ServiceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(info.id3v2_tag_size))?;
    Ok(reader)
}

/// Size of `path` if it is a regular file
pub fn check_regular_file(path: &Path) -> Result<u64> {
    let meta = fs::metadata(path).map_err(|source| ServiceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if !meta.is_file() {
        return Err(ServiceError::NotRegularFile {
            path: path.to_path_buf(),
            kind: file_kind(&meta.file_type()),
        });
    }
    Ok(meta.len())
}

#[cfg(unix)]
fn file_kind(ft: &fs::FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if ft.is_dir() {
        "directory"
    } else if ft.is_char_device() {
        "character device"
    } else if ft.is_block_device() {
        "block device"
    } else if ft.is_fifo() {
        "named pipe"
    } else if ft.is_socket() {
        "socket"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn file_kind(ft: &fs::FileType) -> &'static str {
    if ft.is_dir() { "directory" } else { "special file" }
}

/// Plain WAVE is the only format read without a decoder subprocess
pub fn has_native_input(format: &FormatDescriptor) -> bool {
    format.supports_input() && format.decoder.is_none()
}

fn no_native_input(format: &'static FormatDescriptor) -> ServiceError {
    ServiceError::NoNativeInput {
        format: format.name,
        decoder: format.decoder.unwrap_or("none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shnwave_core::format::{AIFF, FLAC, WMA};

    #[test]
    fn test_native_input() {
        assert!(has_native_input(&WAV));
        assert!(!has_native_input(&AIFF));
        assert!(!has_native_input(&FLAC));
        assert!(!has_native_input(&WMA));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_regular_file(dir.path()).unwrap_err();
        assert!(matches!(err, ServiceError::NotRegularFile { kind: "directory", .. }));
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect_file(&dir.path().join("nope.wav")).unwrap_err();
        assert!(matches!(err, ServiceError::Open { .. }));
    }

    #[test]
    fn test_stream_without_source() {
        let mut bytes = b"RIFF\x24\0\0\0WAVEfmt \x10\0\0\0\x01\0\x02\0".to_vec();
        bytes.extend_from_slice(&44100u32.to_le_bytes());
        bytes.extend_from_slice(&176400u32.to_le_bytes());
        bytes.extend_from_slice(b"\x04\0\x10\0data\0\0\0\0");
        let info = inspect_stream("pipe", &WAV, &mut bytes.as_slice(), 44, 0, None).unwrap();
        assert!(info.filename.is_none());
        assert_eq!(info.header_size, 44);
    }
}
