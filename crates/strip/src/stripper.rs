use std::collections::HashSet;
use std::io::Write;

#[cfg(feature = "logging")]
use log::{debug, info, warn};
use modsect::read::{ModuleFile, Section};
use modsect::write::{self, StreamingBuffer, WritableBuffer};

use super::{Error, Result};

/// Options for modifying a module.
///
/// This is used as an argument to the [`Stripper::modify`] method.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Options {
    /// Delete custom sections with these names.
    ///
    /// Names are compared byte for byte with the decoded name of each custom
    /// section. See [`Stripper::delete_sections`].
    pub delete_sections: HashSet<Vec<u8>>,
}

/// The decision for a single section of the input module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionEdit<'data> {
    /// Copy the section to the output unchanged.
    Keep(Section<'data>),
    /// Omit the whole section from the output.
    Drop(Section<'data>),
}

impl<'data> SectionEdit<'data> {
    /// The section this edit applies to.
    #[inline]
    pub fn section(&self) -> &Section<'data> {
        match self {
            SectionEdit::Keep(section) | SectionEdit::Drop(section) => section,
        }
    }

    /// Return true if the section will be omitted from the output.
    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self, SectionEdit::Drop(_))
    }
}

/// A stripper for modules.
///
/// This struct provides a way to read a module, remove sections, and write it
/// back. Reading validates the whole section table, so once a `Stripper`
/// exists, writing can only fail with an I/O error.
#[derive(Debug)]
pub struct Stripper<'data> {
    file: ModuleFile<'data>,
    edits: Vec<SectionEdit<'data>>,
}

impl<'data> Stripper<'data> {
    /// Read a module and create a new stripper.
    ///
    /// Every section is initially kept.
    pub fn read(data: &'data [u8]) -> Result<Self> {
        let file = ModuleFile::parse(data).map_err(Error::parse)?;
        let edits = file
            .sections()
            .map(|section| section.map(SectionEdit::Keep))
            .collect::<modsect::read::Result<Vec<_>>>()
            .map_err(Error::parse)?;
        Ok(Self { file, edits })
    }

    /// The parsed input module.
    #[inline]
    pub fn file(&self) -> &ModuleFile<'data> {
        &self.file
    }

    /// The decision for each section, in file order.
    #[inline]
    pub fn edits(&self) -> &[SectionEdit<'data>] {
        &self.edits
    }

    /// Modify the module according to the given options.
    pub fn modify(&mut self, options: Options) {
        if !options.delete_sections.is_empty() {
            self.delete_sections(&options.delete_sections);
        }
    }

    /// Delete custom sections from the module.
    ///
    /// Every custom section whose name is in `names` is deleted, not just the
    /// first. Custom sections whose name cannot be decoded never match.
    ///
    /// Returns the number of sections that were deleted by this call.
    pub fn delete_sections(&mut self, names: &HashSet<Vec<u8>>) -> usize {
        let mut count = 0;
        #[cfg(feature = "logging")]
        let mut found = HashSet::new();
        for edit in &mut self.edits {
            let SectionEdit::Keep(section) = *edit else {
                continue;
            };
            #[cfg(feature = "logging")]
            {
                if let Some(error) = section.name_error() {
                    debug!(
                        "Ignoring custom section at {:#x}: {}",
                        section.offset(),
                        error
                    );
                }
            }
            let Some(name) = section.name() else {
                continue;
            };
            if names.contains(name.as_bytes()) {
                #[cfg(feature = "logging")]
                {
                    info!("Deleting section '{}' ({} bytes)", name, section.size());
                    found.insert(name.as_bytes());
                }
                *edit = SectionEdit::Drop(section);
                count += 1;
            }
        }
        #[cfg(feature = "logging")]
        {
            for name in names {
                if !found.contains(name.as_slice()) {
                    warn!(
                        "No custom section named '{}' found",
                        String::from_utf8_lossy(name)
                    );
                }
            }
        }
        count
    }

    /// The total number of sections that will be omitted from the output.
    pub fn removed_count(&self) -> usize {
        self.edits.iter().filter(|edit| edit.is_drop()).count()
    }

    /// The total number of bytes that will be omitted from the output.
    pub fn removed_size(&self) -> usize {
        self.edits
            .iter()
            .filter(|edit| edit.is_drop())
            .map(|edit| edit.section().size())
            .sum()
    }

    /// The size of the output module.
    pub fn output_size(&self) -> usize {
        self.file.data().len() - self.removed_size()
    }

    /// Write the module to an output stream.
    ///
    /// The writer is flushed before returning.
    pub fn write<W: Write>(&self, w: W) -> Result<()> {
        let mut buffer = StreamingBuffer::new(w);
        self.emit(&mut buffer);
        buffer.result().map_err(Error::io)?;
        buffer.into_inner().flush().map_err(Error::io)
    }

    /// Write the module to a new vector.
    pub fn write_to_vec(&self) -> Vec<u8> {
        let mut buffer: Vec<u8> = Vec::new();
        self.emit(&mut buffer);
        buffer
    }

    fn emit(&self, buffer: &mut dyn WritableBuffer) {
        // Reserving never fails for the buffers used here.
        buffer.reserve(self.output_size()).ok();
        let kept = self.edits.iter().filter_map(|edit| match edit {
            SectionEdit::Keep(section) => Some(*section),
            SectionEdit::Drop(_) => None,
        });
        let len = write::write_module(buffer, self.file.header(), kept);
        debug_assert_eq!(len, self.output_size());
    }
}

/// The result of [`strip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    /// The output module.
    pub data: Vec<u8>,
    /// The number of sections that were removed.
    ///
    /// This is zero if no custom section had the requested name, in which
    /// case `data` is identical to the input.
    pub removed_count: usize,
}

/// Remove every custom section named `name` from the module in `data`.
///
/// The input is fully validated before any output is produced.
pub fn strip(data: &[u8], name: &str) -> Result<Stripped> {
    let mut stripper = Stripper::read(data)?;
    let mut names = HashSet::new();
    names.insert(name.as_bytes().to_vec());
    let removed_count = stripper.delete_sections(&names);
    Ok(Stripped {
        data: stripper.write_to_vec(),
        removed_count,
    })
}
