//! Header corrections for decoders known to misreport WAVE sizes.
//!
//! Dispatch is on [`FormatKind`]; plain formats pass through untouched.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use tracing::debug;

use crate::convert::{read_u16_be, read_u32_be};
use crate::error::{Result, WaveError};
use crate::format::FormatKind;
use crate::header::{build_canonical_header, patch_data_size, wire_u32};
use crate::tag::{
    AIFF_COMM, AIFF_COMPRESSION_NONE, AIFF_COMPRESSION_SOWT, AIFF_FORM, AIFF_FORM_TYPE_AIFC, AIFF_FORM_TYPE_AIFF,
    tag_display, tag_equals,
};
use crate::wave::{CANONICAL_HEADER_SIZE, WaveInfo};

/// Fields recovered from an AIFF `COMM` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiffComm {
    pub channels: u16,
    pub sample_frames: u32,
    pub bits_per_sample: u16,
    /// Compression type, AIFF-C only
    pub compression: Option<[u8; 4]>,
}

impl AiffComm {
    /// Plain AIFF, or AIFF-C carrying uncompressed or byte-swapped PCM
    pub fn is_supported(&self) -> bool {
        self.compression.is_none_or(|c| {
            tag_equals(&c, AIFF_COMPRESSION_NONE) || tag_equals(&c, AIFF_COMPRESSION_SOWT)
        })
    }

    pub fn data_size(&self) -> u64 {
        self.channels as u64 * self.sample_frames as u64 * self.bits_per_sample as u64 / 8
    }
}

/// Run whichever correction `info.input_format` calls for.
///
/// When `header` holds the raw header bytes they are corrected as well.
pub fn apply_header_kluges(header: Option<&mut [u8]>, info: &mut WaveInfo) -> Result<()> {
    let Some(format) = info.input_format else { return Ok(()) };

    let result = match format.kind {
        FormatKind::TranslatedContainer => container_translation_kluge(header, info),
        FormatKind::SizeUnderreporting => size_underreporting_kluge(header, info),
        _ => return Ok(()),
    };

    result.map_err(|e| match e {
        WaveError::HeaderKlugeFailed { .. } => e,
        other => WaveError::kluge(format.name, other.to_string()),
    })
}

fn container_translation_kluge(header: Option<&mut [u8]>, info: &mut WaveInfo) -> Result<()> {
    let Some(path) = info.filename.clone() else {
        return Err(WaveError::kluge("aiff", "no source file to recover sizes from"));
    };
    debug!("performing AIFF input header kluges for file '{}'", path.display());

    let file = File::open(&path)?;
    aiff_input_kluge(BufReader::new(file), header, info)
}

/// Recompute sizes from the untranslated AIFF source.
///
/// sox cannot seek back on a pipe, so the WAVE header it writes carries
/// placeholder sizes. The COMM chunk has the real frame count.
pub fn aiff_input_kluge<R: Read + Seek>(mut source: R, header: Option<&mut [u8]>, info: &mut WaveInfo) -> Result<()> {
    source.seek(SeekFrom::Start(info.id3v2_tag_size))?;
    let comm = read_aiff_comm(&mut source)?;

    if !comm.is_supported() {
        let tag = comm.compression.map(|c| tag_display(&c)).unwrap_or_default();
        debug!("found unsupported AIFF-C compression type [{}]", tag);
        return Err(WaveError::kluge("aiff", format!("unsupported AIFF-C compression type [{tag}]")));
    }

    info.data_size = comm.data_size();
    // sox writes a canonical header
    info.chunk_size = info.data_size + CANONICAL_HEADER_SIZE as u64 - 8 + (info.data_size & 1);

    if let Some(header) = header {
        let canonical = build_canonical_header(info)?;
        let Some(dest) = header.get_mut(..canonical.len()) else {
            return Err(WaveError::kluge("aiff", "header buffer shorter than a canonical header"));
        };
        dest.copy_from_slice(&canonical);
    }

    Ok(())
}

/// Walk a FORM container up to its COMM chunk
pub fn read_aiff_comm<R: Read + Seek>(source: &mut R) -> Result<AiffComm> {
    let fail = |reason: &str| WaveError::kluge("aiff", reason);

    let tag = read_be::<4, _>(source).ok_or_else(|| fail("could not read FORM tag"))?;
    if !tag_equals(&tag, AIFF_FORM) {
        return Err(fail("missing FORM tag"));
    }
    read_be::<4, _>(source).ok_or_else(|| fail("could not read FORM size"))?;
    let form_type = read_be::<4, _>(source).ok_or_else(|| fail("could not read FORM type"))?;
    let is_aifc = tag_equals(&form_type, AIFF_FORM_TYPE_AIFC);
    if !is_aifc && !tag_equals(&form_type, AIFF_FORM_TYPE_AIFF) {
        return Err(fail("FORM type is neither AIFF nor AIFC"));
    }

    loop {
        let tag = read_be::<4, _>(source).ok_or_else(|| fail("reached end of file before COMM chunk"))?;
        let size = read_be::<4, _>(source)
            .map(read_u32_be)
            .ok_or_else(|| fail("could not read chunk size"))?;
        if tag_equals(&tag, AIFF_COMM) {
            break;
        }
        // chunks are padded to an even length
        let skip = size as i64 + (size & 1) as i64;
        source.seek(SeekFrom::Current(skip))?;
    }

    let short = || fail("COMM chunk too short");
    let channels = read_be::<2, _>(source).map(read_u16_be).ok_or_else(short)?;
    let sample_frames = read_be::<4, _>(source).map(read_u32_be).ok_or_else(short)?;
    let bits_per_sample = read_be::<2, _>(source).map(read_u16_be).ok_or_else(short)?;
    // 80-bit extended sample rate, not needed
    read_be::<10, _>(source).ok_or_else(short)?;

    let compression = if is_aifc {
        Some(read_be::<4, _>(source).ok_or_else(short)?)
    } else {
        None
    };

    Ok(AiffComm {
        channels,
        sample_frames,
        bits_per_sample,
        compression,
    })
}

fn read_be<const N: usize, R: Read>(source: &mut R) -> Option<[u8; N]> {
    let mut buf = [0u8; N];
    source.read_exact(&mut buf).ok().map(|_| buf)
}

/// Monkey's Audio decoders report a data size but leave the RIFF size short
pub fn size_underreporting_kluge(header: Option<&mut [u8]>, info: &mut WaveInfo) -> Result<()> {
    if let Some(path) = &info.filename {
        debug!("performing APE input header kluges for file '{}'", path.display());
    }

    let adjusted_data_size = info.data_size + (info.data_size & 1);
    if info.chunk_size < adjusted_data_size {
        info.chunk_size = info.header_size as u64 + adjusted_data_size - 8;
    }

    if let Some(header) = header {
        if header.len() < info.header_size as usize {
            return Err(WaveError::kluge("ape", "header buffer shorter than header size"));
        }
        patch_data_size(header, info.header_size, wire_u32("data size", info.data_size)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{APE, SHN};
    use std::io::Cursor;

    fn aiff(form_type: &[u8; 4], compression: Option<&[u8; 4]>, frames: u32) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"FORM");
        v.extend_from_slice(&0u32.to_be_bytes());
        v.extend_from_slice(form_type);
        // an odd-sized chunk ahead of COMM exercises pad skipping
        v.extend_from_slice(b"FVER");
        v.extend_from_slice(&3u32.to_be_bytes());
        v.extend_from_slice(&[1, 2, 3, 0]);
        v.extend_from_slice(b"COMM");
        v.extend_from_slice(&(18u32 + compression.map_or(0, |_| 4)).to_be_bytes());
        v.extend_from_slice(&2u16.to_be_bytes());
        v.extend_from_slice(&frames.to_be_bytes());
        v.extend_from_slice(&16u16.to_be_bytes());
        v.extend_from_slice(&[0x40, 0x0e, 0xac, 0x44, 0, 0, 0, 0, 0, 0]);
        if let Some(c) = compression {
            v.extend_from_slice(c);
        }
        v
    }

    fn sox_info() -> WaveInfo {
        WaveInfo {
            input_format: Some(&crate::format::AIFF),
            wave_format: 1,
            channels: 2,
            samples_per_sec: 44100,
            avg_bytes_per_sec: 176400,
            block_align: 4,
            bits_per_sample: 16,
            header_size: 44,
            chunk_size: 0x7fff_ffff,
            data_size: 0x7fff_ffdb,
            ..Default::default()
        }
    }

    #[test]
    fn test_read_aiff_comm() {
        let comm = read_aiff_comm(&mut Cursor::new(aiff(b"AIFF", None, 588))).unwrap();
        assert_eq!(comm.channels, 2);
        assert_eq!(comm.sample_frames, 588);
        assert_eq!(comm.bits_per_sample, 16);
        assert_eq!(comm.data_size(), 2352);
        assert!(comm.is_supported());
    }

    #[test]
    fn test_aiff_kluge_rebuilds_header() {
        let mut info = sox_info();
        let mut header = [0u8; 44];
        aiff_input_kluge(Cursor::new(aiff(b"AIFC", Some(b"sowt"), 589)), Some(&mut header), &mut info).unwrap();
        assert_eq!(info.data_size, 2356);
        assert_eq!(info.chunk_size, 2356 + 36);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[40..44], &2356u32.to_le_bytes());
    }

    #[test]
    fn test_aiff_kluge_rejects_compressed() {
        let mut info = sox_info();
        let err = aiff_input_kluge(Cursor::new(aiff(b"AIFC", Some(b"ulaw"), 10)), None, &mut info).unwrap_err();
        assert!(matches!(err, WaveError::HeaderKlugeFailed { format: "aiff", .. }));
        assert!(err.to_string().contains("[ulaw]"));
    }

    #[test]
    fn test_aiff_kluge_rejects_non_aiff() {
        let mut info = sox_info();
        assert!(aiff_input_kluge(Cursor::new(b"RIFF\0\0\0\0WAVE".to_vec()), None, &mut info).is_err());
    }

    #[test]
    fn test_aiff_kluge_needs_source() {
        let mut info = sox_info();
        let err = apply_header_kluges(None, &mut info).unwrap_err();
        assert!(matches!(err, WaveError::HeaderKlugeFailed { format: "aiff", .. }));
    }

    #[test]
    fn test_ape_kluge_grows_chunk_size() {
        let mut info = WaveInfo {
            input_format: Some(&APE),
            header_size: 44,
            data_size: 1001,
            chunk_size: 36,
            ..Default::default()
        };
        let mut header = [0u8; 44];
        apply_header_kluges(Some(&mut header), &mut info).unwrap();
        assert_eq!(info.chunk_size, 44 + 1002 - 8);
        assert_eq!(&header[40..44], &1001u32.to_le_bytes());
        assert_eq!(&header[4..8], &(1001u32 + 36).to_le_bytes());
    }

    #[test]
    fn test_ape_kluge_keeps_larger_chunk_size() {
        let mut info = WaveInfo {
            input_format: Some(&APE),
            header_size: 44,
            data_size: 1000,
            chunk_size: 5000,
            ..Default::default()
        };
        apply_header_kluges(None, &mut info).unwrap();
        assert_eq!(info.chunk_size, 5000);
    }

    #[test]
    fn test_plain_formats_untouched() {
        let mut info = WaveInfo {
            input_format: Some(&SHN),
            chunk_size: 1,
            ..Default::default()
        };
        apply_header_kluges(None, &mut info).unwrap();
        assert_eq!(info.chunk_size, 1);
    }
}
