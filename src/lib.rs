//! # `modsect`
//!
//! The `modsect` crate reads the section table of a module container and
//! writes sections back without touching their encoding.
//!
//! A module is an 8 byte header (a 4 byte magic and a 4 byte version)
//! followed by a sequence of sections. Each section is a one byte id, a
//! LEB128 payload size, and the payload. Sections with id 0 are custom
//! sections, whose payload starts with a LEB128 length and a UTF-8 name.
//!
//! ## Reading
//!
//! Use [`read::ModuleFile`] to validate the header and walk the sections.
//! Nothing in a section payload is interpreted other than the name of a
//! custom section.
//!
//! ```
//! use modsect::read::ModuleFile;
//!
//! # fn main() -> modsect::read::Result<()> {
//! let data = [
//!     0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, // header
//!     0x00, 0x04, 0x03, b'f', b'o', b'o', // custom section "foo"
//! ];
//! let module = ModuleFile::parse(&data[..])?;
//! for section in module.sections() {
//!     let section = section?;
//!     assert_eq!(section.name(), Some("foo"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing
//!
//! The [`write`] module provides [`write::WritableBuffer`], which is
//! implemented for `Vec<u8>` and for [`write::StreamingBuffer`] (an adapter
//! for `std::io::Write`).

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![no_std]
#![warn(rust_2018_idioms)]

#[cfg(feature = "cargo-all")]
compile_error!("'--all-features' is not supported; use '--features all' instead");

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[allow(unused_imports)]
#[macro_use]
extern crate std;

pub mod read;
pub use read::{Error, ModuleFile, ModuleHeader, Section, SectionKind};

pub mod write;
