use crate::structure::EntryKind;
use std::path::PathBuf;

/// A resolved structure entry, staged before anything is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    /// Cleaned join of the root path and the entry text.
    pub destination: PathBuf,
    pub kind: EntryKind,
}
impl VirtualEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
/// Ordered plan of directories and files to create underneath `root`.
///
/// Entries keep the order of the structure resource, duplicates included.
#[derive(Debug, Clone)]
pub struct VirtualFS {
    pub root: PathBuf,
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: Vec::new(),
        }
    }
    pub fn push(&mut self, destination: PathBuf, kind: EntryKind) {
        self.entries.push(VirtualEntry { destination, kind });
    }
}
