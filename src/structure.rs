use crate::errors::{FileOperation, IoError};
use std::{fmt, fs, path::Path};

/// Whether a structure entry describes a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}
/// A single line of a structure resource.
///
/// Entries carry no identity beyond their text: duplicates are kept and blank lines are valid
/// [`EntryKind::File`] entries (which resolve to the root and get skipped by the materializer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureEntry {
    pub text: String,
}
impl StructureEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
    /// An entry ending in a path separator is a directory, anything else a file.
    pub fn kind(&self) -> EntryKind {
        if self.text.ends_with('/') || self.text.ends_with(std::path::MAIN_SEPARATOR) {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}
impl fmt::Display for StructureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Splits `content` on `\n` into entries, preserving order.
///
/// No trimming or filtering happens here. An empty resource yields a single empty entry and a
/// trailing newline yields a trailing empty entry; both resolve to the root later on.
pub fn parse_structure(content: &str) -> Vec<StructureEntry> {
    content.split('\n').map(StructureEntry::new).collect()
}

/// Reads the structure resource at `path` and parses it with [`parse_structure`].
///
/// # Errors
///
/// Returns an [`IoError`] if the resource cannot be read or is not valid UTF-8.
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Vec<StructureEntry>, IoError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    let entries = parse_structure(&content);

    log::debug!(
        "parsed {} structure entries from {}",
        entries.len(),
        path.display()
    );

    Ok(entries)
}
