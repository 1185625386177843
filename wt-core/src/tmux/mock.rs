use super::provider::TmuxProvider;
use crate::error::WtError;
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxCall {
    Create { name: String, dir: PathBuf },
    Switch(String),
    Attach(String),
}

#[derive(Default)]
pub struct MockTmuxProvider {
    pub sessions: Vec<String>,
    pub inside_tmux: bool,
    pub create_error: Mutex<Option<WtError>>,
    pub calls: Mutex<Vec<TmuxCall>>,
}

impl MockTmuxProvider {
    pub fn recorded_calls(&self) -> Vec<TmuxCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TmuxProvider for MockTmuxProvider {
    fn session_exists(&self, name: &str) -> bool {
        self.sessions.iter().any(|s| s == name)
    }

    fn create_session(&self, name: &str, dir: &Path) -> Result<(), WtError> {
        self.calls.lock().unwrap().push(TmuxCall::Create {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
        match self.create_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn switch_to_session(&self, name: &str) -> Result<(), WtError> {
        self.calls
            .lock()
            .unwrap()
            .push(TmuxCall::Switch(name.to_string()));
        Ok(())
    }

    fn attach_session(&self, name: &str) -> Result<(), WtError> {
        self.calls
            .lock()
            .unwrap()
            .push(TmuxCall::Attach(name.to_string()));
        Ok(())
    }

    fn is_inside_tmux(&self) -> bool {
        self.inside_tmux
    }
}
