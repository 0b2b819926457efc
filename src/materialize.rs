use crate::{
    errors::{FileOperation, IoError},
    structure::{EntryKind, StructureEntry},
    transactions::{Active, RollbackOperation, Transaction},
    utils::{clean_join, clean_path},
    vfs::VirtualFS,
};
use colored::Colorize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A path this run created, in the order it was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Folder(PathBuf),
    File(PathBuf),
}

/// Resolves every entry against `root` into a [`VirtualFS`].
///
/// Entries whose cleaned target equals the cleaned root are dropped here, so the root itself is
/// never (re)created.
pub fn plan(root: &Path, entries: &[StructureEntry]) -> VirtualFS {
    let root = clean_path(root);
    let mut vfs = VirtualFS::new(root.clone());

    for entry in entries {
        let target = clean_join(&root, &entry.text);

        if target == root {
            log::debug!("skipping entry '{}': resolves to root", entry);
            continue;
        }

        vfs.push(target, entry.kind());
    }

    vfs
}

/// Creates every entry of `vfs` in order, announcing each one on stdout.
///
/// Each created directory and file is registered on `trx`. The first failure aborts; whatever
/// was created before it stays on disk and stays registered on `trx`.
///
/// # Errors
///
/// Returns an [`IoError`] naming the path that could not be created.
pub fn apply(vfs: &VirtualFS, trx: &mut Transaction<Active>) -> Result<Vec<Created>, IoError> {
    let mut created = Vec::with_capacity(vfs.entries.len());

    for entry in &vfs.entries {
        let path = entry.destination.as_path();

        match entry.kind {
            EntryKind::Directory => {
                create_directory(trx, path)?;

                println!("{} {}", "create folder".blue(), path.display());

                created.push(Created::Folder(path.to_path_buf()));
            }
            EntryKind::File => {
                if let Some(parent) = path.parent() {
                    create_directory(trx, parent)?;
                }

                create_file(trx, path)?;

                println!("{} {}", "create file".green(), path.display());

                created.push(Created::File(path.to_path_buf()));
            }
        }
    }

    Ok(created)
}

/// Plans and applies `entries` underneath `root`.
///
/// # Errors
///
/// Returns an [`IoError`] for the first directory or file that could not be created.
pub fn materialize(
    root: &Path,
    entries: &[StructureEntry],
    trx: &mut Transaction<Active>,
) -> Result<Vec<Created>, IoError> {
    let vfs = plan(root, entries);

    apply(&vfs, trx)
}

/// Creates `path` and any missing ancestors. Existing directories are fine.
///
/// Only directories that did not exist beforehand are registered for rollback.
fn create_directory(trx: &mut Transaction<Active>, path: &Path) -> Result<(), IoError> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }

    let first_missing = first_missing_ancestor(path);

    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    trx.add_operation(RollbackOperation::RemoveDir(first_missing));

    Ok(())
}

/// Creates an empty file at `path`, truncating any existing file.
///
/// Only files that did not exist beforehand are registered for rollback.
fn create_file(trx: &mut Transaction<Active>, path: &Path) -> Result<(), IoError> {
    let existed = path.exists();

    fs::File::create(path)
        .map_err(|error| IoError::new(FileOperation::Create, path.into(), error))?;

    if !existed {
        trx.add_operation(RollbackOperation::RemoveFile(path.to_path_buf()));
    }

    Ok(())
}

fn first_missing_ancestor(path: &Path) -> PathBuf {
    let mut missing = path;

    while let Some(parent) = missing.parent() {
        if parent.as_os_str().is_empty() || parent.exists() {
            break;
        }
        missing = parent;
    }

    missing.to_path_buf()
}
