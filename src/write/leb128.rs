//! Encoding of unsigned LEB128 integers.
//!
//! This is only used to build new framing. Sections copied from an existing
//! module keep their original size field.

use crate::write::WritableBuffer;

/// Return the number of bytes in the minimal LEB128 encoding of `value`.
pub fn u32_len(mut value: u32) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Write the minimal LEB128 encoding of `value`.
///
/// Returns the number of bytes written.
pub fn write_u32(buffer: &mut dyn WritableBuffer, mut value: u32) -> usize {
    let mut bytes = [0; 5];
    let mut len = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            bytes[len] = byte;
            len += 1;
            break;
        }
        bytes[len] = byte | 0x80;
        len += 1;
    }
    buffer.write_bytes(&bytes[..len]);
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read;
    use alloc::vec::Vec;

    #[test]
    fn encode() {
        for (value, expect) in [
            (0, &[0x00][..]),
            (0x7f, &[0x7f][..]),
            (0x80, &[0x80, 0x01][..]),
            (624_485, &[0xe5, 0x8e, 0x26][..]),
            (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f][..]),
        ] {
            let mut buffer: Vec<u8> = Vec::new();
            assert_eq!(write_u32(&mut buffer, value), expect.len());
            assert_eq!(buffer, expect);
            assert_eq!(u32_len(value), expect.len());
            assert_eq!(read::leb128::read_u32(&buffer, 0), Ok((value, expect.len())));
        }
    }
}
