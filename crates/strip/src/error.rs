use modsect::read;
use std::{error, fmt, io};

/// An error that occurred while stripping a module.
#[derive(Debug)]
pub struct Error {
    inner: ErrorInner,
}

#[derive(Debug)]
enum ErrorInner {
    Io(io::Error),
    Parse(read::Error),
}

/// The kind of error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parse error occurred while reading the module.
    ///
    /// No output is produced for a module that fails to parse.
    Parse(read::ErrorKind),
    /// An I/O error occurred while writing the module.
    Io(io::ErrorKind),
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ErrorInner::Io(e) => e.fmt(f),
            ErrorInner::Parse(e) => e.fmt(f),
        }
    }
}

impl error::Error for Error {}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        match &self.inner {
            ErrorInner::Io(e) => ErrorKind::Io(e.kind()),
            ErrorInner::Parse(e) => ErrorKind::Parse(e.kind()),
        }
    }

    /// The offset in the input module at which a parse error was detected.
    pub fn offset(&self) -> Option<usize> {
        match &self.inner {
            ErrorInner::Io(_) => None,
            ErrorInner::Parse(e) => Some(e.offset()),
        }
    }

    pub(crate) fn io(error: io::Error) -> Self {
        Self {
            inner: ErrorInner::Io(error),
        }
    }

    pub(crate) fn parse(error: read::Error) -> Self {
        Self {
            inner: ErrorInner::Parse(error),
        }
    }
}

/// The  `Result` type for this library.
pub type Result<T> = std::result::Result<T, Error>;
