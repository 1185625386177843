use crate::error::WtError;
use std::path::Path;

pub trait TmuxProvider: Send + Sync {
    fn session_exists(&self, name: &str) -> bool;
    /// Create a detached session rooted at `dir`
    fn create_session(&self, name: &str, dir: &Path) -> Result<(), WtError>;
    fn switch_to_session(&self, name: &str) -> Result<(), WtError>;
    /// Attach the current terminal; returns when the client detaches
    fn attach_session(&self, name: &str) -> Result<(), WtError>;
    fn is_inside_tmux(&self) -> bool;
    fn session_name_for(&self, dir: &Path) -> String {
        super::session_name(dir)
    }
}
