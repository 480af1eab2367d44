use core::ops::Range;
use core::{result, str};

use crate::read::{leb128, Bytes, Error, ErrorKind, NameError, ReadError, Result, SectionKind};

/// The magic constant at the start of every module.
pub const MODULE_MAGIC: [u8; 4] = *b"\0asm";

/// The size of the fixed module header: the magic and a 4 byte version.
pub const MODULE_HEADER_SIZE: usize = 8;

/// The id of a custom section.
pub const SECTION_CUSTOM: u8 = 0;

/// The fixed header at the start of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHeader<'data> {
    data: &'data [u8],
    version: u32,
}

impl<'data> ModuleHeader<'data> {
    /// Parse and validate the header at the start of `data`.
    ///
    /// Only the magic is validated. The version is returned as is.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let magic = data
            .get(..MODULE_MAGIC.len())
            .read_error(ErrorKind::InvalidFormat, 0, "Module is too short for magic")?;
        if magic != &MODULE_MAGIC[..] {
            return Err(Error::new(
                ErrorKind::InvalidFormat,
                0,
                "Invalid module magic",
            ));
        }
        let data = data.get(..MODULE_HEADER_SIZE).read_error(
            ErrorKind::InvalidFormat,
            0,
            "Module is too short for header",
        )?;
        let mut version = [0; 4];
        version.copy_from_slice(&data[MODULE_MAGIC.len()..]);
        Ok(ModuleHeader {
            data,
            version: u32::from_le_bytes(version),
        })
    }

    /// The raw bytes of the header.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// The version number that follows the magic.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// A parsed module.
///
/// Parsing walks the whole section table once, so a `ModuleFile` is known
/// to be structurally valid: every section lies within the data and the
/// sections exactly cover the data after the header.
#[derive(Debug, Clone, Copy)]
pub struct ModuleFile<'data> {
    data: &'data [u8],
    header: ModuleHeader<'data>,
    section_count: usize,
}

impl<'data> ModuleFile<'data> {
    /// Parse the raw module data.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let header = ModuleHeader::parse(data)?;
        let mut section_count = 0;
        for section in SectionIterator::new(data, MODULE_HEADER_SIZE) {
            section?;
            section_count += 1;
        }
        Ok(ModuleFile {
            data,
            header,
            section_count,
        })
    }

    /// The raw module data.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// The module header.
    #[inline]
    pub fn header(&self) -> ModuleHeader<'data> {
        self.header
    }

    /// The number of sections, including custom sections.
    #[inline]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Get an iterator over the sections in file order.
    pub fn sections(&self) -> SectionIterator<'data> {
        SectionIterator::new(self.data, MODULE_HEADER_SIZE)
    }

    /// Get the first custom section with the given name.
    pub fn section_by_name(&self, name: &str) -> Option<Section<'data>> {
        self.sections()
            .filter_map(result::Result::ok)
            .find(|section| section.name() == Some(name))
    }
}

/// An iterator over the sections of a module.
///
/// Yields an error at most once. Iteration stops after an error.
#[derive(Debug)]
pub struct SectionIterator<'data> {
    data: &'data [u8],
    offset: usize,
}

impl<'data> SectionIterator<'data> {
    /// Create an iterator over the sections in `data`, starting at `offset`.
    ///
    /// `offset` is normally [`MODULE_HEADER_SIZE`].
    pub fn new(data: &'data [u8], offset: usize) -> Self {
        SectionIterator { data, offset }
    }

    /// The offset of the next section.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn parse(&mut self) -> Result<Option<Section<'data>>> {
        let offset = self.offset;
        if offset == self.data.len() {
            return Ok(None);
        }
        let id = *self.data.get(offset).read_error(
            ErrorKind::TruncatedModule,
            offset,
            "Section offset exceeds module size",
        )?;
        let size_offset = offset + 1;
        if size_offset == self.data.len() {
            return Err(Error::new(
                ErrorKind::TruncatedModule,
                size_offset,
                "Missing section size",
            ));
        }
        let (size, size_len) = leb128::read_u32(self.data, size_offset)?;
        let payload_offset = size_offset + size_len;
        let end = payload_offset.checked_add(size as usize).read_error(
            ErrorKind::TruncatedModule,
            offset,
            "Invalid section size",
        )?;
        let data = self.data.get(offset..end).read_error(
            ErrorKind::TruncatedModule,
            offset,
            "Section payload exceeds module size",
        )?;
        let header_size = payload_offset - offset;
        let name = if id == SECTION_CUSTOM {
            Some(parse_custom_name(data.get(header_size..).unwrap_or(&[])))
        } else {
            None
        };
        self.offset = end;
        Ok(Some(Section {
            id,
            offset,
            data,
            header_size,
            name,
        }))
    }
}

impl<'data> Iterator for SectionIterator<'data> {
    type Item = Result<Section<'data>>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.parse().transpose();
        if let Some(Err(_)) = result {
            self.offset = self.data.len();
        }
        result
    }
}

fn parse_custom_name(payload: &[u8]) -> result::Result<&str, NameError> {
    let mut payload = Bytes(payload);
    let len = payload
        .read_uleb128_u32()
        .map_err(|()| NameError::Length)?;
    let name = payload
        .read_bytes(len as usize)
        .map_err(|()| NameError::Bounds)?;
    str::from_utf8(name.0).map_err(|_| NameError::Utf8)
}

/// A section of a module.
///
/// This is a view of the original bytes. The id, size field and payload are
/// all contained in [`Section::data`], exactly as they appear in the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'data> {
    id: u8,
    offset: usize,
    data: &'data [u8],
    header_size: usize,
    name: Option<result::Result<&'data str, NameError>>,
}

impl<'data> Section<'data> {
    /// The section id.
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The kind of the section, derived from its id.
    #[inline]
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_id(self.id)
    }

    /// Return true if this is a custom section.
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.id == SECTION_CUSTOM
    }

    /// The offset of the section id within the module.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The range of the whole section within the module.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.data.len()
    }

    /// The size of the whole section: id, size field and payload.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The original bytes of the whole section.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// The payload of the section.
    ///
    /// For custom sections this includes the name.
    #[inline]
    pub fn payload(&self) -> &'data [u8] {
        self.data.get(self.header_size..).unwrap_or(&[])
    }

    /// The name of a custom section.
    ///
    /// Returns `None` for other sections, and for custom sections whose name
    /// could not be decoded.
    #[inline]
    pub fn name(&self) -> Option<&'data str> {
        match self.name {
            Some(Ok(name)) => Some(name),
            _ => None,
        }
    }

    /// The reason the name of a custom section could not be decoded.
    #[inline]
    pub fn name_error(&self) -> Option<NameError> {
        match self.name {
            Some(Err(error)) => Some(error),
            _ => None,
        }
    }
}
