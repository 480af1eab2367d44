//! Interface for reading module files.
//!
//! ## Overview
//!
//! [`ModuleFile::parse`] validates the header and walks the whole section
//! table, so that any structural error is reported before a caller starts
//! producing output. [`ModuleFile::sections`] then returns a
//! [`SectionIterator`] that yields each [`Section`] in file order.
//!
//! The lower level pieces are public too:
//! - [`ModuleHeader::parse`] validates only the fixed header.
//! - [`SectionIterator::new`] walks sections starting at any offset.
//! - [`leb128::read_u32`] decodes a single size field.

use core::{fmt, result};

mod util;
pub use util::*;

pub mod leb128;

mod module;
pub use module::*;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The magic constant at the start of the module is missing or incorrect.
    InvalidFormat,
    /// A LEB128 integer does not terminate, or does not fit in its type.
    MalformedEncoding,
    /// A section extends past the end of the module.
    TruncatedModule,
}

impl ErrorKind {
    fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "invalid format",
            ErrorKind::MalformedEncoding => "malformed encoding",
            ErrorKind::TruncatedModule => "truncated module",
        }
    }
}

/// The error type used within the read module.
///
/// All errors from this module are fatal for the module being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
    message: &'static str,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind, offset: usize, message: &'static str) -> Self {
        Error {
            kind,
            offset,
            message,
        }
    }

    /// Get the kind of error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offset within the module at which the error was detected.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// A description of the error.
    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at offset {:#x}",
            self.kind.description(),
            self.message,
            self.offset
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The result type used within the read module.
pub type Result<T> = result::Result<T, Error>;

pub(crate) trait ReadError<T> {
    fn read_error(self, kind: ErrorKind, offset: usize, message: &'static str) -> Result<T>;
}

impl<T> ReadError<T> for result::Result<T, ()> {
    fn read_error(self, kind: ErrorKind, offset: usize, message: &'static str) -> Result<T> {
        self.map_err(|()| Error::new(kind, offset, message))
    }
}

impl<T> ReadError<T> for Option<T> {
    fn read_error(self, kind: ErrorKind, offset: usize, message: &'static str) -> Result<T> {
        self.ok_or(Error::new(kind, offset, message))
    }
}

/// The reason a custom section name could not be decoded.
///
/// This is not fatal. A section with an undecodable name is still a valid
/// section, but it has no name to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// The name length is not a valid LEB128 integer within the payload.
    Length,
    /// The name extends past the end of the payload.
    Bounds,
    /// The name is not valid UTF-8.
    Utf8,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameError::Length => "invalid custom section name length",
            NameError::Bounds => "custom section name exceeds payload",
            NameError::Utf8 => "custom section name is not valid UTF-8",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NameError {}

/// The kind of a section, as identified by its id.
///
/// This is informational only. The contents of a section are never checked
/// against its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// A named, producer defined section.
    Custom,
    /// The type section.
    Type,
    /// The import section.
    Import,
    /// The function section.
    Function,
    /// The table section.
    Table,
    /// The memory section.
    Memory,
    /// The global section.
    Global,
    /// The export section.
    Export,
    /// The start section.
    Start,
    /// The element section.
    Element,
    /// The code section.
    Code,
    /// The data section.
    Data,
    /// The data count section.
    DataCount,
    /// A section id without a known meaning.
    Unknown(u8),
}

impl SectionKind {
    /// Map a section id to its kind.
    pub fn from_id(id: u8) -> Self {
        match id {
            SECTION_CUSTOM => SectionKind::Custom,
            1 => SectionKind::Type,
            2 => SectionKind::Import,
            3 => SectionKind::Function,
            4 => SectionKind::Table,
            5 => SectionKind::Memory,
            6 => SectionKind::Global,
            7 => SectionKind::Export,
            8 => SectionKind::Start,
            9 => SectionKind::Element,
            10 => SectionKind::Code,
            11 => SectionKind::Data,
            12 => SectionKind::DataCount,
            id => SectionKind::Unknown(id),
        }
    }

    /// A short lowercase name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Custom => "custom",
            SectionKind::Type => "type",
            SectionKind::Import => "import",
            SectionKind::Function => "function",
            SectionKind::Table => "table",
            SectionKind::Memory => "memory",
            SectionKind::Global => "global",
            SectionKind::Export => "export",
            SectionKind::Start => "start",
            SectionKind::Element => "element",
            SectionKind::Code => "code",
            SectionKind::Data => "data",
            SectionKind::DataCount => "datacount",
            SectionKind::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Unknown(id) => write!(f, "unknown({})", id),
            kind => f.write_str(kind.as_str()),
        }
    }
}
