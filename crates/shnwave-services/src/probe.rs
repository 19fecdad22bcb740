//! Pad-byte probe for odd-sized data chunks

use std::io::{self, Read};

use shnwave_core::WaveInfo;

/// Whether the byte after an odd-sized data chunk exists and is zero.
///
/// `reader` must be at the start of the WAVE stream (past any ID3v2 tag).
/// Even-sized data has no pad byte, so this is `false` for it.
pub fn odd_sized_data_chunk_is_null_padded<R: Read>(info: &WaveInfo, reader: &mut R) -> io::Result<bool> {
    if !info.has_odd_sized_data() {
        return Ok(false);
    }

    let skip = info.header_size as u64 + info.data_size;
    if io::copy(&mut reader.by_ref().take(skip), &mut io::sink())? != skip {
        return Ok(false);
    }

    let mut pad = [0u8; 1];
    match reader.read_exact(&mut pad) {
        Ok(()) => Ok(pad[0] == 0),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn info(data_size: u64) -> WaveInfo {
        WaveInfo {
            header_size: 4,
            data_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_null_pad_present() {
        let bytes = [9, 9, 9, 9, 1, 2, 3, 0, b'L'];
        assert!(odd_sized_data_chunk_is_null_padded(&info(3), &mut Cursor::new(bytes)).unwrap());
    }

    #[test]
    fn test_pad_missing_or_nonzero() {
        let missing = [9, 9, 9, 9, 1, 2, 3];
        assert!(!odd_sized_data_chunk_is_null_padded(&info(3), &mut Cursor::new(missing)).unwrap());

        // next chunk starts straight after the data
        let nonzero = [9, 9, 9, 9, 1, 2, 3, b'L', b'I'];
        assert!(!odd_sized_data_chunk_is_null_padded(&info(3), &mut Cursor::new(nonzero)).unwrap());

        let truncated = [9, 9, 9, 9, 1];
        assert!(!odd_sized_data_chunk_is_null_padded(&info(3), &mut Cursor::new(truncated)).unwrap());
    }

    #[test]
    fn test_even_data_is_never_padded() {
        let bytes = [9, 9, 9, 9, 1, 2, 0, 0];
        assert!(!odd_sized_data_chunk_is_null_padded(&info(2), &mut Cursor::new(bytes)).unwrap());
    }
}
