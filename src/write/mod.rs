//! Interface for writing module files.
//!
//! Sections are written back as the original bytes from
//! [`Section::data`](crate::read::Section::data). Nothing here re-encodes a
//! section that was read from a module.

use crate::read::{ModuleHeader, Section};

mod util;
pub use util::*;

pub mod leb128;

/// Write a module header followed by the given sections, in order.
///
/// Returns the number of bytes written.
pub fn write_module<'data, I>(
    buffer: &mut dyn WritableBuffer,
    header: ModuleHeader<'data>,
    sections: I,
) -> usize
where
    I: IntoIterator<Item = Section<'data>>,
{
    let start = buffer.len();
    buffer.write_bytes(header.data());
    for section in sections {
        buffer.write_bytes(section.data());
    }
    buffer.len() - start
}
