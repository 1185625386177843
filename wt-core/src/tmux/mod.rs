pub mod cli;
pub mod mock;
pub mod provider;

pub use cli::CliTmuxProvider;
pub use provider::TmuxProvider;

use crate::error::WtError;
use std::path::Path;

/// Open the session for `dir`, creating it first when missing. Inside tmux the
/// client switches to it; outside, the terminal attaches.
pub fn open_session(tmux: &dyn TmuxProvider, dir: &Path) -> Result<(), WtError> {
    let name = tmux.session_name_for(dir);
    if !tmux.session_exists(&name) {
        log::info!("creating tmux session {name} in {}", dir.display());
        tmux.create_session(&name, dir)?;
    }
    if tmux.is_inside_tmux() {
        tmux.switch_to_session(&name)
    } else {
        tmux.attach_session(&name)
    }
}

/// Session name for a worktree directory: its basename with `.` (which tmux
/// treats as a pane separator in targets) replaced by `_`
pub fn session_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .replace('.', "_")
}
