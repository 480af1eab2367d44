//! A library for removing custom sections from modules.
//!
//! Use the [`Stripper`] struct to read a module, choose the sections to
//! remove, and write it back. Sections that are kept are copied byte for
//! byte, including their original size fields.
//!
//! Sections can be removed using methods on the [`Stripper`] struct, or by
//! passing an [`Options`] struct to the [`Stripper::modify`] method. The
//! [`strip`] function does all of this for a single section name.
//!
//! # Example
//! ```no_run
//! use modsect_strip::{Options, Stripper};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let mut options = Options::default();
//!   options.delete_sections.insert(b"target_features".to_vec());
//!
//!   let input = std::fs::read("path/to/input.wasm")?;
//!   let mut stripper = Stripper::read(&input)?;
//!   stripper.modify(options);
//!   if stripper.removed_count() == 0 {
//!       eprintln!("no target_features section found");
//!   }
//!   let output = std::fs::File::create("path/to/output.wasm")?;
//!   stripper.write(std::io::BufWriter::new(output))?;
//!   Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod error;
pub use error::{Error, ErrorKind, Result};

mod stripper;
pub use stripper::{strip, Options, SectionEdit, Stripped, Stripper};
