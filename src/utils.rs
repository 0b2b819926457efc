use std::path::{Component, Path, PathBuf};

/// Lexically cleans `path` without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous normal component. A `..` that would
/// climb above a filesystem root is discarded, while leading `..` on a relative path is kept.
/// A path that cleans down to nothing becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in path.components() {
        push_component(&mut new_path, component);
    }

    or_current_dir(new_path)
}

/// Joins `entry` onto `root` and cleans the result.
///
/// Unlike [`Path::join`], an absolute `entry` does not replace `root`: its root and prefix
/// components are ignored, so every entry resolves underneath `root`.
pub fn clean_join(root: &Path, entry: &str) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in root.components() {
        push_component(&mut new_path, component);
    }

    for component in Path::new(entry).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => push_component(&mut new_path, other),
        }
    }

    or_current_dir(new_path)
}

fn or_current_dir(path: PathBuf) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}

fn push_component(path: &mut PathBuf, component: Component<'_>) {
    match component {
        // Skip the current-dir marker "."
        Component::CurDir => {}

        Component::ParentDir => match path.components().next_back() {
            Some(Component::Normal(_)) => {
                path.pop();
            }
            // can't climb above "/"
            Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
            _ => path.push(".."),
        },

        other => path.push(other.as_os_str()),
    }
}
