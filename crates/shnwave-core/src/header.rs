//! Canonical 44-byte header construction and in-place size patching

use crate::convert::{write_u16_le, write_u32_le};
use crate::error::{Result, WaveError};
use crate::tag::{WAVE_DATA, WAVE_FMT, WAVE_RIFF, WAVE_WAVE, tag_copy};
use crate::wave::{CANONICAL_HEADER_SIZE, WaveInfo};

/// RIFF tag, chunk size and WAVE tag
const MIN_PATCHABLE_HEADER_SIZE: u32 = 12;

pub type CanonicalHeader = [u8; CANONICAL_HEADER_SIZE as usize];

/// Narrow a size to the 32 bits the wire format has room for
pub fn wire_u32(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| WaveError::SizeOverflow { field, value })
}

/// Build the minimal RIFF/WAVE/fmt/data header for `info`.
///
/// Fails only when `chunk_size` or `data_size` no longer fit in 32 bits.
pub fn build_canonical_header(info: &WaveInfo) -> Result<CanonicalHeader> {
    let chunk_size = wire_u32("chunk size", info.chunk_size)?;
    let data_size = wire_u32("data size", info.data_size)?;

    let mut header = [0u8; CANONICAL_HEADER_SIZE as usize];
    tag_copy(&mut header[0..], WAVE_RIFF);
    write_u32_le(&mut header, 4, chunk_size);
    tag_copy(&mut header[8..], WAVE_WAVE);
    tag_copy(&mut header[12..], WAVE_FMT);
    write_u32_le(&mut header, 16, 16);
    write_u16_le(&mut header, 20, info.wave_format);
    write_u16_le(&mut header, 22, info.channels);
    write_u32_le(&mut header, 24, info.samples_per_sec);
    write_u32_le(&mut header, 28, info.avg_bytes_per_sec);
    write_u16_le(&mut header, 32, info.block_align);
    write_u16_le(&mut header, 34, info.bits_per_sample);
    tag_copy(&mut header[36..], WAVE_DATA);
    write_u32_le(&mut header, 40, data_size);

    Ok(header)
}

/// Overwrite the RIFF chunk size at offset 4
pub fn patch_chunk_size(header: &mut [u8], new_chunk_size: u32) {
    write_u32_le(header, 4, new_chunk_size);
}

/// Overwrite the data chunk's size (the 4 bytes ending at `header_size`),
/// then the RIFF chunk size as `new_data_size + header_size - 8`.
///
/// `header` must hold at least `header_size` bytes, and `header_size` must
/// cover at least the RIFF/WAVE preamble.
pub fn patch_data_size(header: &mut [u8], header_size: u32, new_data_size: u32) -> Result<()> {
    if header_size < MIN_PATCHABLE_HEADER_SIZE || header.len() < header_size as usize {
        return Err(WaveError::BadHeaderSize {
            header_size,
            len: header.len(),
        });
    }
    let chunk_size = wire_u32("chunk size", new_data_size as u64 + header_size as u64 - 8)?;
    write_u32_le(header, header_size as usize - 4, new_data_size);
    patch_chunk_size(header, chunk_size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::read_u32_le;

    fn cd_info() -> WaveInfo {
        WaveInfo {
            wave_format: 1,
            channels: 2,
            samples_per_sec: 44100,
            avg_bytes_per_sec: 176400,
            block_align: 4,
            bits_per_sample: 16,
            data_size: 2352,
            chunk_size: 2352 + 36,
            ..Default::default()
        }
    }

    fn u32_at(buf: &[u8], offset: usize) -> u32 {
        read_u32_le(buf[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_canonical_layout() {
        let header = build_canonical_header(&cd_info()).unwrap();
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(u32_at(&header, 4), 2388);
        assert_eq!(&header[8..16], b"WAVEfmt ");
        assert_eq!(u32_at(&header, 16), 16);
        assert_eq!(&header[20..24], &[1, 0, 2, 0]);
        assert_eq!(u32_at(&header, 24), 44100);
        assert_eq!(u32_at(&header, 28), 176400);
        assert_eq!(&header[32..36], &[4, 0, 16, 0]);
        assert_eq!(&header[36..40], b"data");
        assert_eq!(u32_at(&header, 40), 2352);
    }

    #[test]
    fn test_oversized_fields_rejected() {
        let mut info = cd_info();
        info.data_size = u32::MAX as u64 + 1;
        assert!(matches!(
            build_canonical_header(&info),
            Err(WaveError::SizeOverflow { field: "data size", .. })
        ));
    }

    #[test]
    fn test_patch_data_size_updates_both_fields() {
        let mut header = build_canonical_header(&cd_info()).unwrap();
        patch_data_size(&mut header, 44, 4704).unwrap();
        assert_eq!(u32_at(&header, 40), 4704);
        assert_eq!(u32_at(&header, 4), 4704 + 36);
    }

    #[test]
    fn test_patch_data_size_non_canonical() {
        // 56-byte header: a 12-byte JUNK chunk before fmt
        let mut header = vec![0u8; 56];
        patch_data_size(&mut header, 56, 10).unwrap();
        assert_eq!(u32_at(&header, 52), 10);
        assert_eq!(u32_at(&header, 4), 58);
        assert!(patch_data_size(&mut header, 56, u32::MAX).is_err());
    }

    #[test]
    fn test_patch_data_size_rejects_tiny_header_size() {
        let mut header = [0u8; 44];
        assert!(matches!(
            patch_data_size(&mut header, 2, 10),
            Err(WaveError::BadHeaderSize { header_size: 2, len: 44 })
        ));
        assert!(patch_data_size(&mut header, 11, 10).is_err());
        assert_eq!(header, [0u8; 44]);
    }

    #[test]
    fn test_patch_data_size_rejects_short_buffer() {
        let mut header = [0u8; 20];
        assert!(matches!(
            patch_data_size(&mut header, 44, 10),
            Err(WaveError::BadHeaderSize { header_size: 44, len: 20 })
        ));
        assert!(patch_data_size(&mut header, 20, 10).is_ok());
        assert_eq!(u32_at(&header, 16), 10);
        assert_eq!(u32_at(&header, 4), 22);
    }

    #[test]
    fn test_patch_chunk_size_only() {
        let mut header = build_canonical_header(&cd_info()).unwrap();
        patch_chunk_size(&mut header, 99);
        assert_eq!(u32_at(&header, 4), 99);
        assert_eq!(u32_at(&header, 40), 2352);
    }
}
