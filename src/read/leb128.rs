//! Decoding of unsigned LEB128 integers.
//!
//! Each byte contributes its low 7 bits, least significant group first.
//! The high bit of a byte is set if more bytes follow.

use crate::read::{Error, ErrorKind, ReadError, Result};

/// The maximum number of bytes in the LEB128 encoding of a `u32`.
pub const MAX_U32_LEB128_LEN: usize = 5;

/// Decode an unsigned LEB128 integer at `offset` in `data`.
///
/// Returns the value and the number of bytes consumed, which is always at
/// least 1.
///
/// Fails with [`ErrorKind::MalformedEncoding`] if the end of `data` is reached
/// before the last byte, or if the encoding is longer than
/// [`MAX_U32_LEB128_LEN`], or if the value does not fit in a `u32`. The error
/// offset is that of the first byte of the integer.
pub fn read_u32(data: &[u8], offset: usize) -> Result<(u32, usize)> {
    let mut result = 0;
    let mut shift = 0;
    let mut index = offset;
    loop {
        let byte = *data.get(index).read_error(
            ErrorKind::MalformedEncoding,
            offset,
            "Truncated LEB128 integer",
        )?;
        index += 1;
        if shift == 7 * (MAX_U32_LEB128_LEN - 1) {
            if byte & 0x80 != 0 {
                return Err(Error::new(
                    ErrorKind::MalformedEncoding,
                    offset,
                    "LEB128 integer is too long",
                ));
            }
            if byte & 0x70 != 0 {
                return Err(Error::new(
                    ErrorKind::MalformedEncoding,
                    offset,
                    "LEB128 integer is too large for u32",
                ));
            }
        }
        result |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, index - offset));
        }
        shift += 7;
    }
}
