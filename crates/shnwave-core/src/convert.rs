//! Fixed-width integer conversions between byte arrays and host integers

/// 4 little-endian bytes to u32
pub fn read_u32_le(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// 4 big-endian bytes to u32
pub fn read_u32_be(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// 2 little-endian bytes to u16
pub fn read_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// 2 big-endian bytes to u16
pub fn read_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Write `value` little-endian into `buf[offset..offset + 4]`.
///
/// Panics if the buffer is too short; callers size their header buffers up front.
pub fn write_u32_le(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub fn write_u32_be(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

pub fn write_u16_le(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn write_u16_be(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Decode an ID3v2 synchsafe integer: 4 bytes, 7 significant bits each.
pub fn synchsafe_to_u32(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | (b & 0x7f) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endianness() {
        assert_eq!(read_u32_le([0x24, 0, 0, 0]), 36);
        assert_eq!(read_u32_be([0, 0, 0x01, 0x02]), 0x0102);
        assert_eq!(read_u16_le([0x10, 0xb1]), 0xb110);
        assert_eq!(read_u16_be([0xb1, 0x10]), 0xb110);
    }

    #[test]
    fn test_write_at_offset() {
        let mut buf = [0u8; 8];
        write_u32_le(&mut buf, 4, 176400);
        assert_eq!(&buf[4..], &[0x10, 0xb1, 0x02, 0x00]);
        write_u16_be(&mut buf, 0, 0x4142);
        assert_eq!(&buf[..2], b"AB");
        write_u32_be(&mut buf, 0, 0x52494646);
        assert_eq!(&buf[..4], b"RIFF");
        write_u16_le(&mut buf, 2, 1);
        assert_eq!(&buf[2..4], &[1, 0]);
    }

    #[test]
    fn test_synchsafe() {
        // 0x00 0x00 0x02 0x01 -> (2 << 7) | 1
        assert_eq!(synchsafe_to_u32([0, 0, 2, 1]), 257);
        assert_eq!(synchsafe_to_u32([0x7f, 0x7f, 0x7f, 0x7f]), 0x0fff_ffff);
        // high bits are ignored
        assert_eq!(synchsafe_to_u32([0, 0, 0, 0x81]), 1);
    }
}
