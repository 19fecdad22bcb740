//! WaveInfo model and problem classification

use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

use crate::error::{Result, WaveError};
use crate::format::FormatDescriptor;
use crate::length;

pub const CANONICAL_HEADER_SIZE: u32 = 44;

pub const CD_CHANNELS: u16 = 2;
pub const CD_BITS_PER_SAMPLE: u16 = 16;
pub const CD_SAMPLES_PER_SEC: u32 = 44100;
pub const CD_RATE: u64 = 176_400;
pub const CD_BLOCK_ALIGN: u16 = 4;
/// Bytes per CD-DA sector
pub const CD_BLOCK_SIZE: u64 = 2352;
pub const CD_BLOCKS_PER_SEC: u64 = 75;
/// Four seconds of CD-DA audio
pub const CD_MIN_BURNABLE_SIZE: u64 = 4 * CD_RATE;

pub const WAVE_FORMAT_UNKNOWN: u16 = 0x0000;
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_ADPCM: u16 = 0x0002;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
pub const WAVE_FORMAT_ALAW: u16 = 0x0006;
pub const WAVE_FORMAT_MULAW: u16 = 0x0007;
pub const WAVE_FORMAT_OKI_ADPCM: u16 = 0x0010;
pub const WAVE_FORMAT_IMA_ADPCM: u16 = 0x0011;
pub const WAVE_FORMAT_DIGISTD: u16 = 0x0015;
pub const WAVE_FORMAT_DIGIFIX: u16 = 0x0016;
pub const WAVE_FORMAT_DOLBY_AC2: u16 = 0x0030;
pub const WAVE_FORMAT_GSM610: u16 = 0x0031;
pub const WAVE_FORMAT_ROCKWELL_ADPCM: u16 = 0x003b;
pub const WAVE_FORMAT_ROCKWELL_DIGITALK: u16 = 0x003c;
pub const WAVE_FORMAT_G721_ADPCM: u16 = 0x0040;
pub const WAVE_FORMAT_G728_CELP: u16 = 0x0041;
pub const WAVE_FORMAT_MPEG: u16 = 0x0050;
pub const WAVE_FORMAT_MPEGLAYER3: u16 = 0x0055;
pub const WAVE_FORMAT_G726_ADPCM: u16 = 0x0064;
pub const WAVE_FORMAT_G722_ADPCM: u16 = 0x0065;

/// Human-readable name of a WAVE format tag
pub fn wave_format_name(tag: u16) -> &'static str {
    match tag {
        WAVE_FORMAT_UNKNOWN => "Microsoft Official Unknown",
        WAVE_FORMAT_PCM => "Microsoft PCM",
        WAVE_FORMAT_ADPCM => "Microsoft ADPCM",
        WAVE_FORMAT_IEEE_FLOAT => "IEEE Float",
        WAVE_FORMAT_ALAW => "Microsoft A-law",
        WAVE_FORMAT_MULAW => "Microsoft U-law",
        WAVE_FORMAT_OKI_ADPCM => "OKI ADPCM format",
        WAVE_FORMAT_IMA_ADPCM => "IMA ADPCM",
        WAVE_FORMAT_DIGISTD => "Digistd format",
        WAVE_FORMAT_DIGIFIX => "Digifix format",
        WAVE_FORMAT_DOLBY_AC2 => "Dolby AC2",
        WAVE_FORMAT_GSM610 => "GSM 6.10",
        WAVE_FORMAT_ROCKWELL_ADPCM => "Rockwell ADPCM",
        WAVE_FORMAT_ROCKWELL_DIGITALK => "Rockwell DIGITALK",
        WAVE_FORMAT_G721_ADPCM => "G.721 ADPCM",
        WAVE_FORMAT_G728_CELP => "G.728 CELP",
        WAVE_FORMAT_MPEG => "MPEG",
        WAVE_FORMAT_MPEGLAYER3 => "MPEG Layer 3",
        WAVE_FORMAT_G726_ADPCM => "G.726 ADPCM",
        WAVE_FORMAT_G722_ADPCM => "G.722 ADPCM",
        _ => "Unknown",
    }
}

/// Bitmask of structural issues found while validating a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Problems(u32);

impl Problems {
    pub const NONE: Problems = Problems(0);
    pub const NOT_CD_QUALITY: Problems = Problems(1 << 0);
    pub const CD_BUT_TOO_SHORT: Problems = Problems(1 << 1);
    pub const CD_BUT_BAD_BOUNDARY: Problems = Problems(1 << 2);
    pub const HEADER_NOT_CANONICAL: Problems = Problems(1 << 3);
    pub const HEADER_INCONSISTENT: Problems = Problems(1 << 4);
    pub const DATA_NOT_ALIGNED: Problems = Problems(1 << 5);
    pub const JUNK_APPENDED: Problems = Problems(1 << 6);
    pub const MAY_BE_TRUNCATED: Problems = Problems(1 << 7);
    pub const EXTRA_CHUNKS: Problems = Problems(1 << 8);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Problems) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Problems) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Problems) {
        self.0 &= !other.0;
    }
}

impl BitOr for Problems {
    type Output = Problems;

    fn bitor(self, rhs: Problems) -> Problems {
        Problems(self.0 | rhs.0)
    }
}

impl BitOrAssign for Problems {
    fn bitor_assign(&mut self, rhs: Problems) {
        self.0 |= rhs.0;
    }
}

/// Everything known about one WAVE stream.
///
/// `Default` gives the all-zero aggregate used for totals.
#[derive(Debug, Clone, Default)]
pub struct WaveInfo {
    pub filename: Option<PathBuf>,
    pub input_format: Option<&'static FormatDescriptor>,

    pub wave_format: u16,
    pub channels: u16,
    pub samples_per_sec: u32,
    /// Header value, not trusted; see `rate`
    pub avg_bytes_per_sec: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,

    /// Byte offset of the first sample
    pub header_size: u32,
    /// RIFF chunk size as declared (or corrected by a kluge)
    pub chunk_size: u64,
    pub data_size: u64,
    /// `chunk_size + 8`
    pub total_size: u64,
    pub padded_data_size: u64,
    /// On-disk size, including any ID3v2 tag
    pub actual_size: u64,
    /// Bytes of RIFF data after the data chunk; negative on inconsistent headers
    pub extra_riff_size: i64,

    /// Calculated bytes/sec
    pub rate: u64,
    pub length: u64,
    pub exact_length: f64,

    pub problems: Problems,

    pub file_has_id3v2_tag: bool,
    pub id3v2_tag_size: u64,
}

/// Exact CD-DA profile; block align is deliberately not part of it
pub fn is_cd_profile(
    channels: u16,
    bits_per_sample: u16,
    samples_per_sec: u32,
    avg_bytes_per_sec: u32,
    rate: u64,
) -> bool {
    channels == CD_CHANNELS
        && bits_per_sample == CD_BITS_PER_SAMPLE
        && samples_per_sec == CD_SAMPLES_PER_SEC
        && avg_bytes_per_sec as u64 == CD_RATE
        && rate == CD_RATE
}

impl WaveInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in rate, sizes and lengths from the raw header fields
    pub fn compute_derived(&mut self) -> Result<()> {
        self.rate = self.samples_per_sec as u64 * self.channels as u64 * self.bits_per_sample as u64 / 8;
        if self.rate == 0 {
            return Err(WaveError::ZeroRate);
        }

        self.total_size = self.chunk_size + 8;

        // RIFF data chunks are always even-sized; odd data is followed by a NUL pad byte
        self.padded_data_size = self.data_size + (self.data_size & 1);

        self.extra_riff_size = self.total_size as i64 - (self.padded_data_size as i64 + self.header_size as i64);

        self.length = self.data_size / self.rate;
        self.exact_length = self.data_size as f64 / self.rate as f64;

        Ok(())
    }

    /// Set the problem bits. Expects `compute_derived` to have run.
    pub fn classify(&mut self) -> Result<()> {
        if self.block_align == 0 {
            return Err(WaveError::ZeroBlockAlign);
        }

        let mut problems = Problems::NONE;

        if is_cd_profile(
            self.channels,
            self.bits_per_sample,
            self.samples_per_sec,
            self.avg_bytes_per_sec,
            self.rate,
        ) {
            if self.data_size < CD_MIN_BURNABLE_SIZE {
                problems |= Problems::CD_BUT_TOO_SHORT;
            }
            if self.data_size % CD_BLOCK_SIZE != 0 {
                problems |= Problems::CD_BUT_BAD_BOUNDARY;
            }
        } else {
            problems |= Problems::NOT_CD_QUALITY;
        }

        if self.header_size != CANONICAL_HEADER_SIZE {
            problems |= Problems::HEADER_NOT_CANONICAL;
        }

        match self.total_size.checked_sub(self.header_size as u64) {
            Some(room) if self.data_size <= room => {}
            _ => problems |= Problems::HEADER_INCONSISTENT,
        }

        if self.data_size % self.block_align as u64 != 0 {
            problems |= Problems::DATA_NOT_ALIGNED;
        }

        if self.size_checks_apply() {
            let on_disk = self.stream_size_on_disk()?;
            if self.total_size < on_disk {
                problems |= Problems::JUNK_APPENDED;
            }
            if self.total_size > on_disk {
                problems |= Problems::MAY_BE_TRUNCATED;
            }
        }

        if self.extra_riff_size > 0 {
            problems |= Problems::EXTRA_CHUNKS;
        }

        self.problems = problems;
        Ok(())
    }

    /// File size minus any leading ID3v2 tag
    pub fn stream_size_on_disk(&self) -> Result<u64> {
        self.actual_size
            .checked_sub(self.id3v2_tag_size)
            .ok_or(WaveError::Id3v2TagTooLarge {
                tag_size: self.id3v2_tag_size,
                actual_size: self.actual_size,
            })
    }

    pub fn size_checks_apply(&self) -> bool {
        self.input_format.is_some_and(|f| f.size_checks_apply())
    }

    pub fn format_name(&self) -> &'static str {
        self.input_format.map_or("none", |f| f.name)
    }

    pub fn is_cd_quality(&self) -> bool {
        !self.is_not_cd()
    }

    pub fn is_not_cd(&self) -> bool {
        self.problems.contains(Problems::NOT_CD_QUALITY)
    }

    pub fn is_too_short(&self) -> bool {
        self.problems.contains(Problems::CD_BUT_TOO_SHORT)
    }

    pub fn has_bad_boundary(&self) -> bool {
        self.problems.contains(Problems::CD_BUT_BAD_BOUNDARY)
    }

    pub fn is_header_not_canonical(&self) -> bool {
        self.problems.contains(Problems::HEADER_NOT_CANONICAL)
    }

    pub fn is_header_inconsistent(&self) -> bool {
        self.problems.contains(Problems::HEADER_INCONSISTENT)
    }

    pub fn is_data_not_aligned(&self) -> bool {
        self.problems.contains(Problems::DATA_NOT_ALIGNED)
    }

    pub fn may_be_truncated(&self) -> bool {
        self.problems.contains(Problems::MAY_BE_TRUNCATED)
    }

    pub fn has_junk_appended(&self) -> bool {
        self.problems.contains(Problems::JUNK_APPENDED)
    }

    pub fn has_extra_chunks(&self) -> bool {
        self.problems.contains(Problems::EXTRA_CHUNKS)
    }

    pub fn has_odd_sized_data(&self) -> bool {
        self.data_size % 2 == 1
    }

    /// Bytes past the last full CD sector
    pub fn sector_misalignment(&self) -> u64 {
        self.data_size % CD_BLOCK_SIZE
    }

    /// Zero bytes needed to reach the next sector boundary (0 when aligned)
    pub fn bytes_to_sector_boundary(&self) -> u64 {
        match self.sector_misalignment() {
            0 => 0,
            rem => CD_BLOCK_SIZE - rem,
        }
    }

    /// Bytes missing from a truncated file, if that can be known
    pub fn missing_bytes(&self) -> Option<u64> {
        let on_disk = self.stream_size_on_disk().ok()?;
        self.total_size.checked_sub(on_disk).filter(|&n| n > 0)
    }

    /// Bytes of junk after the RIFF data, if that can be known
    pub fn appended_bytes(&self) -> Option<u64> {
        let on_disk = self.stream_size_on_disk().ok()?;
        on_disk.checked_sub(self.total_size).filter(|&n| n > 0)
    }

    /// `m:ss.ff` for CD-quality data, `m:ss` otherwise
    pub fn length_string(&self) -> String {
        if self.rate == 0 {
            return length::format_seconds(self.length);
        }
        length::format_duration(self.data_size, self.rate, self.is_cd_quality())
    }
}
