use crate::vfs::VirtualFS;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Returns the node for `path`, creating it and any missing ancestors below the root.
fn node_for(
    path: &Path,
    is_file: bool,
    lookup: &mut HashMap<PathBuf, Rc<RefCell<TreeNode>>>,
) -> Option<Rc<RefCell<TreeNode>>> {
    if let Some(node) = lookup.get(path) {
        return Some(Rc::clone(node));
    }

    let parent_node = node_for(path.parent()?, false, lookup)?;

    let node = Rc::new(RefCell::new(TreeNode::new(display_name(path), is_file)));

    parent_node.borrow_mut().children.push(Rc::clone(&node));

    lookup.insert(path.to_path_buf(), Rc::clone(&node));

    Some(node)
}

/// Build the directory tree from the VFS entries, returning the root node.
fn build_tree(vfs: &VirtualFS) -> Rc<RefCell<TreeNode>> {
    let root = Rc::new(RefCell::new(TreeNode::new(
        vfs.root.display().to_string(),
        false,
    )));

    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(vfs.root.clone(), Rc::clone(&root));
    // "src" joined onto "." cleans to "src", whose parent is ""
    if vfs.root == Path::new(".") {
        lookup.insert(PathBuf::new(), Rc::clone(&root));
    }

    for entry in &vfs.entries {
        // entries like "../x" land outside the root and have no place in the tree
        if node_for(&entry.destination, entry.is_file(), &mut lookup).is_none() {
            log::debug!(
                "{} is outside {}, left out of the preview",
                entry.destination.display(),
                vfs.root.display()
            );
        }
    }

    root
}

/// Render the tree with a nice ASCII style.
fn render_tree(node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool, out: &mut String) {
    let node_borrow = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = if node_borrow.is_file {
        node_borrow.name.green()
    } else {
        node_borrow.name.blue()
    };
    out.push_str(&format!("{}{}{}\n", prefix, connector.yellow(), name));

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        render_tree(child, &child_prefix, last, out);
    }
}

/// Renders the planned layout as a tree rooted at the root path.
pub fn render(vfs: &VirtualFS) -> String {
    let mut out = String::new();

    render_tree(&build_tree(vfs), "", true, &mut out);

    out
}

pub fn preview_as_tree(vfs: &VirtualFS) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    println!("{} {}\n", "┌─".bold().bright_blue(), "Preview".bold().bright_blue());

    print!("{}", render(vfs));

    println!(
        "\n{} {}",
        "└─".bold().bright_blue(),
        "dry run, nothing was written".bright_green()
    );
}
