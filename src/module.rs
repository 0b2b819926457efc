use crate::config::ModuleConfig;
use miette::Diagnostic;
use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ModuleError {
    #[error("'{program}' was not found on PATH")]
    #[diagnostic(
        code(scaffy::module::missing_tool),
        help("Install the toolchain or pass --no-mod-init to skip module initialization")
    )]
    MissingTool { program: String },

    #[error("unable to run '{program}' in '{dir}'")]
    #[diagnostic(code(scaffy::module::spawn))]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' failed ({status})\nOutput: {output}")]
    #[diagnostic(code(scaffy::module::failed))]
    Failed {
        command: String,
        status: ExitStatus,
        output: String,
    },
}

/// Runs the external module-initialization command against a root path.
///
/// The working directory is handed to the child process; the current process never changes
/// directory.
#[derive(Debug, Clone)]
pub struct ModuleInitializer {
    program: String,
    args: Vec<String>,
}
impl ModuleInitializer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
    fn command_line(&self, module: Option<&str>) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.extend(module);
        parts.join(" ")
    }
    /// Runs `<program> <args...> [module]` with `root` as working directory.
    ///
    /// # Errors
    ///
    /// - [`ModuleError::MissingTool`] if the program cannot be found.
    /// - [`ModuleError::Spawn`] if the process cannot be started for another reason.
    /// - [`ModuleError::Failed`] on a non-zero exit, carrying stdout followed by stderr.
    pub fn run(&self, root: &Path, module: Option<&str>) -> Result<(), ModuleError> {
        log::debug!("running '{}' in {}", self.command_line(module), root.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(module)
            .current_dir(root)
            .output();

        match output {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&out.stderr));

                Err(ModuleError::Failed {
                    command: self.command_line(module),
                    status: out.status,
                    output: combined,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && root.is_dir() => {
                Err(ModuleError::MissingTool {
                    program: self.program.clone(),
                })
            }
            Err(e) => Err(ModuleError::Spawn {
                program: self.program.clone(),
                dir: root.to_path_buf(),
                source: e,
            }),
        }
    }
}
impl From<&ModuleConfig> for ModuleInitializer {
    fn from(config: &ModuleConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }
}
impl Default for ModuleInitializer {
    fn default() -> Self {
        Self::from(&ModuleConfig::default())
    }
}
