use super::{provider::GitProvider, repo::Worktree};
use crate::error::WtError;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Mutating git calls recorded by [`MockGitProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    AddWorktree {
        worktree_path: PathBuf,
        branch: String,
    },
    CreateBranchAndWorktree {
        worktree_path: PathBuf,
        new_branch: String,
        base: Option<String>,
    },
    RemoveWorktree {
        worktree_path: PathBuf,
    },
}

#[derive(Default)]
pub struct MockGitProvider {
    pub repo_root: Option<PathBuf>,
    pub branches: Vec<String>,
    pub worktrees: Vec<Worktree>,
    pub dirty_paths: Vec<PathBuf>,
    /// Keyed by rev for `commit_time` and by path for `commit_time_at`
    pub commit_times: HashMap<String, i64>,
    /// Create the worktree directory on disk when a worktree is added
    pub materialize: bool,
    pub list_branches_error: Mutex<Option<WtError>>,
    pub list_worktrees_error: Mutex<Option<WtError>>,
    pub worktree_clean_error: Mutex<Option<WtError>>,
    pub add_worktree_result: Mutex<Option<Result<(), WtError>>>,
    pub create_branch_result: Mutex<Option<Result<(), WtError>>>,
    pub remove_worktree_result: Mutex<Option<Result<(), WtError>>>,
    pub calls: Mutex<Vec<GitCall>>,
}

impl MockGitProvider {
    pub fn recorded_calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: GitCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn materialize(&self, worktree_path: &Path) {
        if self.materialize {
            std::fs::create_dir_all(worktree_path).unwrap();
        }
    }
}

impl GitProvider for MockGitProvider {
    fn repo_root(&self, _cwd: &Path) -> Result<PathBuf, WtError> {
        self.repo_root.clone().ok_or(WtError::NotInRepo)
    }

    fn list_branches(&self, _repo_path: &Path) -> Result<Vec<String>, WtError> {
        match self.list_branches_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(self.branches.clone()),
        }
    }

    fn branch_exists(&self, _repo_path: &Path, name: &str) -> Result<bool, WtError> {
        Ok(self.branches.iter().any(|b| b == name))
    }

    fn list_worktrees(&self, _repo_path: &Path) -> Result<Vec<Worktree>, WtError> {
        match self.list_worktrees_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(self.worktrees.clone()),
        }
    }

    fn worktree_clean(&self, worktree_path: &Path) -> Result<bool, WtError> {
        if let Some(e) = self.worktree_clean_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(!self.dirty_paths.iter().any(|p| p == worktree_path))
    }

    fn commit_time(&self, _repo_path: &Path, rev: &str) -> i64 {
        self.commit_times.get(rev).copied().unwrap_or(0)
    }

    fn commit_time_at(&self, worktree_path: &Path) -> i64 {
        self.commit_times
            .get(worktree_path.to_string_lossy().as_ref())
            .copied()
            .unwrap_or(0)
    }

    fn add_worktree(
        &self,
        _repo_path: &Path,
        worktree_path: &Path,
        branch: &str,
    ) -> Result<(), WtError> {
        self.record(GitCall::AddWorktree {
            worktree_path: worktree_path.to_path_buf(),
            branch: branch.to_string(),
        });
        let result = self
            .add_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()));
        if result.is_ok() {
            self.materialize(worktree_path);
        }
        result
    }

    fn create_branch_and_worktree(
        &self,
        _repo_path: &Path,
        worktree_path: &Path,
        new_branch: &str,
        base: Option<&str>,
    ) -> Result<(), WtError> {
        self.record(GitCall::CreateBranchAndWorktree {
            worktree_path: worktree_path.to_path_buf(),
            new_branch: new_branch.to_string(),
            base: base.map(String::from),
        });
        let result = self
            .create_branch_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()));
        if result.is_ok() {
            self.materialize(worktree_path);
        }
        result
    }

    fn remove_worktree(&self, _repo_path: &Path, worktree_path: &Path) -> Result<(), WtError> {
        self.record(GitCall::RemoveWorktree {
            worktree_path: worktree_path.to_path_buf(),
        });
        self.remove_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }
}
