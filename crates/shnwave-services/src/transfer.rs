//! Bounded byte copies between streams

use std::io::{self, Read, Write};

use shnwave_core::CD_BLOCK_SIZE;
use tracing::debug;

pub const TRANSFER_BUFFER_SIZE: usize = 256 * 1024;

/// Copy exactly `n` bytes, stopping early only at end of input.
///
/// Returns the number of bytes written.
pub fn transfer_bytes<R: Read, W: Write>(reader: &mut R, writer: &mut W, n: u64) -> io::Result<u64> {
    transfer_bytes_with_progress(reader, writer, n, |_| {})
}

/// As [`transfer_bytes`], calling `on_progress` with the running total after each buffer
pub fn transfer_bytes_with_progress<R, W, F>(reader: &mut R, writer: &mut W, n: u64, mut on_progress: F) -> io::Result<u64>
where
    R: Read,
    W: Write,
    F: FnMut(u64),
{
    let mut buf = vec![0u8; TRANSFER_BUFFER_SIZE];
    let mut moved = 0u64;

    while moved < n {
        let want = (n - moved).min(TRANSFER_BUFFER_SIZE as u64) as usize;
        let got = read_fill(reader, &mut buf[..want])?;
        writer.write_all(&buf[..got])?;
        moved += got as u64;
        on_progress(moved);
        if got < want {
            debug!("input ended after {} of {} bytes", moved, n);
            break;
        }
    }

    Ok(moved)
}

/// Read until `buf` is full or input ends
pub fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Write `n` zero bytes. Padding is always shorter than one CD sector;
/// larger requests write nothing and return 0.
pub fn write_padding<W: Write>(writer: &mut W, n: u64) -> io::Result<u64> {
    if n >= CD_BLOCK_SIZE {
        return Ok(0);
    }
    let silence = [0u8; CD_BLOCK_SIZE as usize];
    writer.write_all(&silence[..n as usize])?;
    Ok(n)
}
