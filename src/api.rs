use crate::{
    config::{self, Config},
    errors::{IoError, ParseError},
    materialize::{self, Created},
    module::{ModuleError, ModuleInitializer},
    preview,
    stamp::{self, StampReport},
    structure,
    transactions::{Active, Transaction},
};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScaffoldError {
    #[error("{message}")]
    #[diagnostic(code(scaffy::usage), help("Run with --help to see the expected inputs"))]
    Usage { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ExternalTool(#[from] ModuleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ParseError),
}
impl From<config::ConfigError> for ScaffoldError {
    fn from(error: config::ConfigError) -> Self {
        // an unreadable config file is an I/O failure like any other
        match error {
            config::ConfigError::Io(error) => Self::Io(error),
            config::ConfigError::Parse(error) => Self::Config(error),
        }
    }
}
impl ScaffoldError {
    /// Process exit code for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => 2,
            Self::Io(_) => 3,
            Self::ExternalTool(_) => 4,
            Self::Config(_) => 5,
        }
    }
}

/// Inputs of a single scaffolding run.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub root: PathBuf,
    pub structure: PathBuf,
    /// Module identifier handed to the module initializer.
    pub module: Option<String>,
    pub config: Config,
    pub init_module: bool,
    pub stamp: bool,
    /// Remove everything this run created when materialization or module initialization fails.
    pub rollback_on_failure: bool,
    pub dry_run: bool,
}
impl ScaffoldOptions {
    pub fn new(root: impl Into<PathBuf>, structure: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            structure: structure.into(),
            module: None,
            config: Config::default(),
            init_module: true,
            stamp: true,
            rollback_on_failure: true,
            dry_run: false,
        }
    }
    fn validate(&self) -> Result<(), ScaffoldError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScaffoldError::Usage {
                message: "a root path is required".to_string(),
            });
        }
        if self.structure.as_os_str().is_empty() {
            return Err(ScaffoldError::Usage {
                message: "a structure file is required".to_string(),
            });
        }
        Ok(())
    }
}

/// What a successful run did.
#[derive(Debug, Default)]
pub struct ScaffoldSummary {
    pub created: Vec<Created>,
    /// `None` when stamping was skipped.
    pub stamp: Option<StampReport>,
}

/// Reads the structure resource, materializes it under the root path, then optionally runs the
/// module initializer and the declaration stamper.
///
/// Materialization and module initialization stop at the first failure; with
/// `rollback_on_failure` set, everything created so far is removed first. A rollback that cannot
/// remove everything is logged and the original error is returned. Stamping failures are
/// collected per file in the returned [`ScaffoldSummary`] and never fail the run.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] if:
///
/// - The root path or structure file is missing.
/// - The structure file cannot be read.
/// - A directory or file cannot be created.
/// - The module initializer cannot be run or exits non-zero.
pub fn scaffold(options: &ScaffoldOptions) -> Result<ScaffoldSummary, ScaffoldError> {
    options.validate()?;

    let entries = structure::read_structure(&options.structure)?;

    if options.dry_run {
        preview::preview_as_tree(&materialize::plan(&options.root, &entries));

        return Ok(ScaffoldSummary::default());
    }

    let mut trx = Transaction::<Active>::new();

    let created = match materialize::materialize(&options.root, &entries, &mut trx) {
        Ok(created) => created,
        Err(error) => return Err(abort(trx, error.into(), options.rollback_on_failure)),
    };

    // an empty structure never creates the root, so there is nowhere to run the command
    if options.init_module && !options.root.is_dir() {
        log::warn!(
            "{} was not created, skipping module initialization",
            options.root.display()
        );
    } else if options.init_module {
        let initializer = ModuleInitializer::from(&options.config.module);

        if let Err(error) = initializer.run(&options.root, options.module.as_deref()) {
            return Err(abort(trx, error.into(), options.rollback_on_failure));
        }
    }

    trx.commit();

    let stamp = options
        .stamp
        .then(|| stamp::stamp_tree(&options.root, &options.config.stamp));

    Ok(ScaffoldSummary { created, stamp })
}

fn abort(trx: Transaction<Active>, error: ScaffoldError, rollback: bool) -> ScaffoldError {
    if !rollback {
        trx.commit();
        return error;
    }

    log::debug!("scaffolding failed, rolling back");

    if let Err(rollback_error) = trx.cancel().rollback() {
        log::warn!("{}", rollback_error);
        for failure in &rollback_error.failures {
            log::warn!("{}", failure);
        }
    }

    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options(dir: &std::path::Path, structure: &str) -> ScaffoldOptions {
        let file = dir.join("structure.txt");
        fs::write(&file, structure).unwrap();

        let mut options = ScaffoldOptions::new(dir.join("proj"), file);
        options.init_module = false;
        options
    }

    #[test]
    fn test_scaffold_creates_and_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), "cmd/\ncmd/main.go\ninternal/db/db.go\n");

        let summary = scaffold(&options).unwrap();

        assert_eq!(summary.created.len(), 3);
        let report = summary.stamp.unwrap();
        assert_eq!(report.stamped.len(), 2);
        assert_eq!(
            fs::read_to_string(options.root.join("internal/db/db.go")).unwrap(),
            "package db\n"
        );
    }

    #[test]
    fn test_scaffold_without_stamp_leaves_files_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path(), "main.go");
        options.stamp = false;

        let summary = scaffold(&options).unwrap();

        assert!(summary.stamp.is_none());
        assert_eq!(fs::metadata(options.root.join("main.go")).unwrap().len(), 0);
    }

    #[test]
    fn test_scaffold_usage_error_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let options = ScaffoldOptions::new(dir.path().join("proj"), "");

        let error = scaffold(&options).unwrap_err();

        assert_eq!(error.exit_code(), 2);
        assert!(!dir.path().join("proj").exists());
    }

    #[test]
    fn test_scaffold_missing_structure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ScaffoldOptions::new(dir.path().join("proj"), dir.path().join("absent"));

        let error = scaffold(&options).unwrap_err();

        assert!(matches!(error, ScaffoldError::Io(_)));
        assert_eq!(error.exit_code(), 3);
        assert!(!options.root.exists());
    }

    #[test]
    fn test_scaffold_rolls_back_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), "docs/\nblocker\nblocker/x.go\n");

        let error = scaffold(&options).unwrap_err();

        assert_eq!(error.exit_code(), 3);
        assert!(!options.root.exists());
    }

    #[test]
    fn test_scaffold_keeps_partial_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path(), "docs/\nblocker\nblocker/x.go\n");
        options.rollback_on_failure = false;

        scaffold(&options).unwrap_err();

        assert!(options.root.join("docs").is_dir());
        assert!(options.root.join("blocker").is_file());
    }

    #[test]
    fn test_scaffold_rollback_spares_pre_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), "new/\nblocker\nblocker/x.go\n");
        fs::create_dir_all(&options.root).unwrap();
        fs::write(options.root.join("keep.txt"), "mine").unwrap();

        scaffold(&options).unwrap_err();

        assert!(options.root.join("keep.txt").exists());
        assert!(!options.root.join("new").exists());
        assert!(!options.root.join("blocker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_scaffold_module_failure_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path(), "src/\n");
        options.init_module = true;
        options.config.module = config::ModuleConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 1".to_string()],
        };

        let error = scaffold(&options).unwrap_err();

        assert_eq!(error.exit_code(), 4);
        assert!(!options.root.exists());
    }

    #[test]
    fn test_config_errors_map_to_their_kind() {
        let dir = tempfile::tempdir().unwrap();

        let missing: ScaffoldError = Config::from_file(dir.path().join("absent.toml"))
            .unwrap_err()
            .into();
        assert!(matches!(missing, ScaffoldError::Io(_)));
        assert_eq!(missing.exit_code(), 3);

        let file = dir.path().join("broken.toml");
        fs::write(&file, "[stamp\n").unwrap();
        let broken: ScaffoldError = Config::from_file(&file).unwrap_err().into();
        assert!(matches!(broken, ScaffoldError::Config(_)));
        assert_eq!(broken.exit_code(), 5);
    }

    #[test]
    fn test_scaffold_empty_structure_skips_module_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path(), "");
        options.init_module = true;
        options.config.module = config::ModuleConfig {
            program: "scaffy-no-such-tool".to_string(),
            args: vec![],
        };

        let summary = scaffold(&options).unwrap();

        assert!(summary.created.is_empty());
        assert!(!options.root.exists());
    }

    #[test]
    fn test_scaffold_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path(), "src/\nsrc/main.go\n");
        options.dry_run = true;

        let summary = scaffold(&options).unwrap();

        assert!(summary.created.is_empty());
        assert!(!options.root.exists());
    }
}
