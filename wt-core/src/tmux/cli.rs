use super::provider::TmuxProvider;
use crate::{
    constants::{TMUX_BINARY, TMUX_ENV},
    error::WtError,
};
use std::{
    path::Path,
    process::{Command, Stdio},
};

pub struct CliTmuxProvider;

impl CliTmuxProvider {
    /// Run tmux with captured output, failing with its stderr on a non-zero exit
    fn run(args: &[&str]) -> Result<(), WtError> {
        log::debug!("{TMUX_BINARY} {}", args.join(" "));
        let output = Command::new(TMUX_BINARY)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| WtError::Spawn {
                program: TMUX_BINARY,
                source,
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WtError::Tmux {
                command: format!("{TMUX_BINARY} {}", args.first().unwrap_or(&"")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl TmuxProvider for CliTmuxProvider {
    fn session_exists(&self, name: &str) -> bool {
        Command::new(TMUX_BINARY)
            .args(["has-session", "-t", &format!("={name}")])
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn create_session(&self, name: &str, dir: &Path) -> Result<(), WtError> {
        let dir = dir.to_string_lossy();
        Self::run(&["new-session", "-d", "-s", name, "-c", dir.as_ref()])
    }

    fn switch_to_session(&self, name: &str) -> Result<(), WtError> {
        Self::run(&["switch-client", "-t", &format!("={name}")])
    }

    fn attach_session(&self, name: &str) -> Result<(), WtError> {
        log::debug!("{TMUX_BINARY} attach-session -t {name}");
        // Interactive: inherits the terminal
        let status = Command::new(TMUX_BINARY)
            .args(["attach-session", "-t", &format!("={name}")])
            .status()
            .map_err(|source| WtError::Spawn {
                program: TMUX_BINARY,
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(WtError::Tmux {
                command: format!("{TMUX_BINARY} attach-session"),
                stderr: format!("exited with {status}"),
            })
        }
    }

    fn is_inside_tmux(&self) -> bool {
        std::env::var_os(TMUX_ENV).is_some_and(|v| !v.is_empty())
    }
}
