//! Leading ID3v2 tag detection

use std::io::{self, Read, Seek, SeekFrom};

use shnwave_core::convert::synchsafe_to_u32;
use tracing::debug;

const ID3V2_HEADER_SIZE: u64 = 10;
const ID3V2_FOOTER_SIZE: u64 = 10;
const ID3V2_FLAG_FOOTER: u8 = 0x10;

/// Size of the ID3v2 tag at the start of `reader`, header and footer included.
///
/// With a tag, the reader is left just past it. Without one it is rewound
/// to the start.
pub fn detect_id3v2<R: Read + Seek>(reader: &mut R) -> io::Result<Option<u64>> {
    let start = reader.stream_position()?;
    let mut header = [0u8; ID3V2_HEADER_SIZE as usize];

    let size = match reader.read_exact(&mut header) {
        Ok(()) => tag_size(&header),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(e) => return Err(e),
    };

    match size {
        Some(size) => {
            debug!("found {}-byte ID3v2 tag", size);
            reader.seek(SeekFrom::Start(start + size))?;
        }
        None => {
            reader.seek(SeekFrom::Start(start))?;
        }
    }
    Ok(size)
}

fn tag_size(header: &[u8; 10]) -> Option<u64> {
    if &header[0..3] != b"ID3" {
        return None;
    }
    // version bytes are never 0xff and size bytes never have the high bit set
    if header[3] == 0xff || header[4] == 0xff || header[6..10].iter().any(|b| b & 0x80 != 0) {
        return None;
    }

    let body = synchsafe_to_u32([header[6], header[7], header[8], header[9]]) as u64;
    let footer = if header[5] & ID3V2_FLAG_FOOTER != 0 { ID3V2_FOOTER_SIZE } else { 0 };
    Some(ID3V2_HEADER_SIZE + body + footer)
}
