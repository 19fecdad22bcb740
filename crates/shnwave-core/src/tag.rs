//! Four-character chunk tags

pub const WAVE_RIFF: &str = "RIFF";
pub const WAVE_WAVE: &str = "WAVE";
pub const WAVE_FMT: &str = "fmt ";
pub const WAVE_DATA: &str = "data";

pub const AIFF_FORM: &str = "FORM";
pub const AIFF_FORM_TYPE_AIFF: &str = "AIFF";
pub const AIFF_FORM_TYPE_AIFC: &str = "AIFC";
pub const AIFF_COMM: &str = "COMM";
pub const AIFF_COMPRESSION_NONE: &str = "NONE";
/// Byte-swapped (little-endian) PCM inside AIFF-C
pub const AIFF_COMPRESSION_SOWT: &str = "sowt";

/// Compare raw tag bytes with an expected ASCII tag.
///
/// Only `expected.len()` bytes take part; a shorter `received` never matches.
pub fn tag_equals(received: &[u8], expected: &str) -> bool {
    let expected = expected.as_bytes();
    received.len() >= expected.len() && &received[..expected.len()] == expected
}

/// Copy `src` into the start of `dest` without a terminator.
pub fn tag_copy(dest: &mut [u8], src: &str) {
    let src = src.as_bytes();
    dest[..src.len()].copy_from_slice(src);
}

/// Printable form of a tag for diagnostics
pub fn tag_display(tag: &[u8]) -> String {
    tag.iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}
