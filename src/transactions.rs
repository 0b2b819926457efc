use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use std::{fs, io, marker::PhantomData, path::PathBuf};
use thiserror::Error;

/// Enum of possible operations to rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOperation {
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
}
impl RollbackOperation {
    fn path(&self) -> &PathBuf {
        match self {
            Self::RemoveFile(path) | Self::RemoveDir(path) => path,
        }
    }
}
/// Active Transaction
pub struct Active;
/// Committed Transaction
pub struct Committed;
/// Canceled Transaction
pub struct Canceled;
/// Marker trait for the lifecycle states of a [`Transaction`].
pub trait TransactionState {
    const NAME: &'static str;
}
impl TransactionState for Active {
    const NAME: &'static str = "active";
}
impl TransactionState for Committed {
    const NAME: &'static str = "committed";
}
impl TransactionState for Canceled {
    const NAME: &'static str = "canceled";
}

/// Every removal that failed while rolling back.
#[derive(Debug, Error, Diagnostic)]
#[error("rollback left {} path(s) behind", .failures.len())]
#[diagnostic(
    code(scaffy::rollback),
    help("Remove the listed paths by hand before running again.")
)]
pub struct RollbackError {
    #[related]
    pub failures: Vec<IoError>,
}

/// Tracks the paths created during a run so they can be removed again.
///
/// Nothing happens on drop: a [`Transaction<Active>`] is resolved explicitly with
/// [`Transaction::commit`] (keep everything) or [`Transaction::cancel`] followed by
/// [`Transaction::rollback`] (remove everything, reporting what could not be removed).
///
/// # Example
///
/// ```rust
/// use scaffy::transactions::{Active, RollbackOperation, Transaction};
///
/// let mut trx = Transaction::<Active>::new();
/// trx.add_operation(RollbackOperation::RemoveFile("some/path".into()));
/// trx.commit();
/// ```
pub struct Transaction<State: TransactionState> {
    rollback_operations: Vec<RollbackOperation>,
    state: PhantomData<State>,
}
impl Default for Transaction<Active> {
    fn default() -> Self {
        Self::new()
    }
}
impl Transaction<Active> {
    pub fn new() -> Self {
        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
    /// Registers an operation that undoes something this run created.
    pub fn add_operation(&mut self, operation: RollbackOperation) {
        self.rollback_operations.push(operation);
    }
    pub fn operations(&self) -> &[RollbackOperation] {
        &self.rollback_operations
    }
    /// Finalizes the transaction; the recorded operations are discarded.
    pub fn commit(mut self) -> Transaction<Committed> {
        log::debug!("...committing transaction");
        self.rollback_operations.clear();

        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
    /// Cancels the transaction, preserving the recorded operations for
    /// [`Transaction::rollback`].
    pub fn cancel(mut self) -> Transaction<Canceled> {
        let rollback_operations = std::mem::take(&mut self.rollback_operations);

        Transaction {
            rollback_operations,
            state: PhantomData,
        }
    }
}
impl Transaction<Canceled> {
    /// Undoes every recorded operation, newest first.
    ///
    /// Paths that are already gone count as removed. Every other failure is collected and the
    /// remaining operations still run.
    ///
    /// # Errors
    ///
    /// Returns a [`RollbackError`] listing each path that could not be removed.
    pub fn rollback(mut self) -> Result<(), RollbackError> {
        log::debug!("rolling back {} operation(s)", self.rollback_operations.len());

        let mut failures = Vec::new();

        while let Some(operation) = self.rollback_operations.pop() {
            let result = match &operation {
                RollbackOperation::RemoveDir(path) => {
                    log::debug!("...removing dir: {}", path.display());
                    fs::remove_dir_all(path)
                }
                RollbackOperation::RemoveFile(path) => {
                    log::debug!("...removing file: {}", path.display());
                    fs::remove_file(path)
                }
            };

            match result {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => failures.push(IoError::new(
                    FileOperation::Remove,
                    operation.path().clone(),
                    error,
                )),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RollbackError { failures })
        }
    }
}
impl<S: TransactionState> Transaction<S> {
    pub fn state(&self) -> &'static str {
        S::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_leaves_paths_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kept.txt");
        fs::write(&file, "").unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        let committed = trx.commit();

        assert_eq!(committed.state(), "committed");
        assert!(file.exists());
    }

    #[test]
    fn test_rollback_removes_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        let nested = root.join("src");
        let file = nested.join("main.go");
        fs::create_dir_all(&nested).unwrap();
        fs::write(&file, "").unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveDir(root.clone()));
        trx.add_operation(RollbackOperation::RemoveDir(nested.clone()));
        trx.add_operation(RollbackOperation::RemoveFile(file.clone()));

        trx.cancel().rollback().unwrap();

        assert!(!root.exists());
    }

    #[test]
    fn test_rollback_tolerates_missing_paths() {
        let dir = tempfile::tempdir().unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveDir(dir.path().join("never")));
        trx.add_operation(RollbackOperation::RemoveFile(dir.path().join("made")));

        assert!(trx.cancel().rollback().is_ok());
    }

    #[test]
    fn test_rollback_reports_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_file = dir.path().join("a-dir");
        let other = dir.path().join("other");
        fs::create_dir(&not_a_file).unwrap();
        fs::create_dir(&other).unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveDir(other.clone()));
        // remove_file on a directory fails
        trx.add_operation(RollbackOperation::RemoveFile(not_a_file.clone()));

        let error = trx.cancel().rollback().unwrap_err();

        assert_eq!(error.failures.len(), 1);
        assert_eq!(error.failures[0].path, not_a_file);
        assert!(!other.exists());
    }
}
