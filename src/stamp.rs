use crate::{
    config::StampConfig,
    errors::{FileOperation, IoError},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Outcome of a stamping pass. Failures never stop the pass.
#[derive(Debug, Default)]
pub struct StampReport {
    pub stamped: Vec<PathBuf>,
    pub failures: Vec<IoError>,
}
impl StampReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Works out the declaration value for `file`, a path underneath `root`.
///
/// Entry-point files get the sentinel. Other files get the name of their directory; files sitting
/// directly in `root` get the name of `root` itself (falling back to the sentinel when `root` has
/// no usable name, e.g. `/`).
pub fn declaration_for(root: &Path, file: &Path, config: &StampConfig) -> String {
    if file.file_name().is_some_and(|name| name == config.entry_point.as_str()) {
        return config.sentinel.clone();
    }

    let relative_dir = file
        .strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .and_then(Path::file_name);

    match relative_dir {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root
            .canonicalize()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.sentinel.clone()),
    }
}

fn is_source_file(path: &Path, config: &StampConfig) -> bool {
    path.extension()
        .map(|ext| ext == config.extension.as_str())
        .unwrap_or(false)
}

/// Prepends `"<keyword> <value>\n"` to `path`, keeping the original bytes after it.
fn stamp_file(path: &Path, declaration: &str, keyword: &str) -> Result<(), IoError> {
    let original =
        fs::read(path).map_err(|error| IoError::new(FileOperation::Read, path.into(), error))?;

    let mut contents = format!("{} {}\n", keyword, declaration).into_bytes();
    contents.extend_from_slice(&original);

    fs::write(path, contents).map_err(|error| IoError::new(FileOperation::Write, path.into(), error))
}

/// Stamps every recognized source file underneath `root`, in file-name order.
///
/// Running it twice stamps twice. A file (or directory) that cannot be processed is recorded in
/// [`StampReport::failures`] and the walk moves on.
pub fn stamp_tree(root: &Path, config: &StampConfig) -> StampReport {
    let mut report = StampReport::default();

    // an empty structure never creates the root
    if !root.exists() {
        log::debug!("{} does not exist, nothing to stamp", root.display());
        return report;
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().unwrap_or(root).to_path_buf();
                log::warn!("unable to walk {}: {}", path.display(), error);
                report
                    .failures
                    .push(IoError::new(FileOperation::Walk, path, error.into()));
                continue;
            }
        };

        let path = entry.path();

        if !entry.file_type().is_file() || !is_source_file(path, config) {
            continue;
        }

        let declaration = declaration_for(root, path, config);

        match stamp_file(path, &declaration, &config.keyword) {
            Ok(()) => {
                log::debug!("stamped {} with '{}'", path.display(), declaration);
                report.stamped.push(path.to_path_buf());
            }
            Err(error) => {
                log::warn!("unable to stamp {}: {}", path.display(), error.source);
                report.failures.push(error);
            }
        }
    }

    report
}
