//! Duration strings for byte counts

use crate::wave::{CD_BLOCK_SIZE, CD_RATE};

/// Format `data_size` bytes at `rate` bytes/sec.
///
/// CD-quality data is shown as `m:ss.ff` where `ff` counts whole 1/75 s
/// sectors; anything else as `m:ss`, fractional seconds truncated.
/// `rate` must be non-zero.
pub fn format_duration(data_size: u64, rate: u64, is_cd_quality: bool) -> String {
    let seconds = data_size / rate;
    if is_cd_quality {
        let frames = (data_size % rate) / CD_BLOCK_SIZE;
        format!("{}.{:02}", format_seconds(seconds), frames)
    } else {
        format_seconds(seconds)
    }
}

/// `m:ss` from whole seconds
pub fn format_seconds(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Length of a run of files.
///
/// When every file was CD quality the total data size is exact, so the
/// frame count is derived from it; otherwise the summed per-file lengths
/// are truncated to whole seconds.
pub fn format_total_duration(total_data_size: u64, total_exact_seconds: f64, all_cd_quality: bool) -> String {
    if all_cd_quality {
        format_duration(total_data_size, CD_RATE, true)
    } else {
        format_seconds(total_exact_seconds as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cd_duration() {
        assert_eq!(format_duration(0, CD_RATE, true), "0:00.00");
        // 61 seconds and 10 sectors, plus a partial sector which is dropped
        let bytes = 61 * CD_RATE + 10 * CD_BLOCK_SIZE + 100;
        assert_eq!(format_duration(bytes, CD_RATE, true), "1:01.10");
        assert_eq!(format_duration(CD_RATE - 1, CD_RATE, true), "0:00.74");
    }

    #[test]
    fn test_non_cd_duration() {
        // 48kHz stereo 16-bit, 125.9 seconds
        let rate = 192_000;
        assert_eq!(format_duration(rate * 125 + rate * 9 / 10, rate, false), "2:05");
        assert_eq!(format_duration(10, 11025, false), "0:00");
    }

    #[test]
    fn test_total_duration() {
        let total = 3600 * CD_RATE + 2 * CD_BLOCK_SIZE;
        assert_eq!(format_total_duration(total, 0.0, true), "60:00.02");
        assert_eq!(format_total_duration(0, 3599.99, false), "59:59");
    }
}
