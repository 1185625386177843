//! Handing the terminal over to an interactive shell.

use crate::{
    constants::{DEFAULT_SHELL, SHELL_ENV},
    error::WtError,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
    sync::Mutex,
};

pub trait ProcessLauncher: Send + Sync {
    /// Run an interactive shell with `dir` as its working directory. On Unix this
    /// replaces the current process and only returns on failure.
    fn shell(&self, dir: &Path) -> Result<(), WtError>;
}

/// `$SHELL` when set and non-empty, `/bin/sh` otherwise
pub fn shell_program(shell_env: Option<OsString>) -> OsString {
    shell_env
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SHELL.into())
}

pub struct CliProcessLauncher;

impl ProcessLauncher for CliProcessLauncher {
    fn shell(&self, dir: &Path) -> Result<(), WtError> {
        let program = shell_program(std::env::var_os(SHELL_ENV));
        log::info!("launching {} in {}", program.to_string_lossy(), dir.display());
        let mut command = Command::new(&program);
        command.current_dir(dir);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let source = command.exec();
            Err(WtError::Spawn {
                program: "shell",
                source,
            })
        }

        #[cfg(not(unix))]
        {
            command
                .status()
                .map(|_| ())
                .map_err(|source| WtError::Spawn {
                    program: "shell",
                    source,
                })
        }
    }
}

/// Records requested shells instead of launching them
#[derive(Default)]
pub struct MockProcessLauncher {
    pub launched: Mutex<Vec<PathBuf>>,
}

impl ProcessLauncher for MockProcessLauncher {
    fn shell(&self, dir: &Path) -> Result<(), WtError> {
        self.launched.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
