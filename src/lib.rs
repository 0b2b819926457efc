//! Materializes a directory/file layout described by a plain text structure file.
//!
//! Each line of the structure file is one entry: a line ending in `/` is a directory, anything
//! else is an empty file whose parent directories are implied. After the layout exists a module
//! manifest can be initialized with an external toolchain command and recognized source files can
//! be stamped with a declaration line derived from their directory.
pub mod api;
pub mod config;
pub mod errors;
pub mod materialize;
pub mod module;
pub mod preview;
pub mod stamp;
pub mod structure;
pub mod transactions;
pub mod utils;
pub mod vfs;

pub use api::{scaffold, ScaffoldError, ScaffoldOptions, ScaffoldSummary};
