use super::{parse_commit_time, parse_worktree_porcelain, provider::GitProvider, repo::Worktree};
use crate::{constants::GIT_BINARY, error::WtError};
use std::{
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

pub struct CliGitProvider;

impl CliGitProvider {
    fn output(dir: &Path, args: &[&str]) -> Result<Output, WtError> {
        log::debug!("git {} (in {})", args.join(" "), dir.display());
        Command::new(GIT_BINARY)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| WtError::Spawn {
                program: GIT_BINARY,
                source,
            })
    }

    /// Run git and return stdout, turning a non-zero exit into an error carrying stderr
    fn run(dir: &Path, args: &[&str]) -> Result<String, WtError> {
        let output = Self::output(dir, args)?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn failure(args: &[&str], output: &Output) -> WtError {
    let subcommand: Vec<&str> = args.iter().take(2).copied().collect();
    WtError::Git {
        command: format!("git {}", subcommand.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Arguments for checking out an existing branch into `worktree_path`
pub fn worktree_add_existing_args(worktree_path: &Path, branch: &str) -> Vec<String> {
    vec![
        "worktree".to_string(),
        "add".to_string(),
        worktree_path.to_string_lossy().into_owned(),
        branch.to_string(),
    ]
}

/// Arguments for creating `new_branch` in `worktree_path`, optionally from `base`
pub fn worktree_add_new_args(
    worktree_path: &Path,
    new_branch: &str,
    base: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        "worktree".to_string(),
        "add".to_string(),
        "-b".to_string(),
        new_branch.to_string(),
        worktree_path.to_string_lossy().into_owned(),
    ];
    if let Some(base) = base {
        args.push(base.to_string());
    }
    args
}

impl GitProvider for CliGitProvider {
    fn repo_root(&self, cwd: &Path) -> Result<PathBuf, WtError> {
        let output = Self::output(cwd, &["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(WtError::NotInRepo);
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            return Err(WtError::NotInRepo);
        }
        Ok(PathBuf::from(root))
    }

    fn list_branches(&self, repo_path: &Path) -> Result<Vec<String>, WtError> {
        // `git branch` also prints "(HEAD detached at …)", which is not a ref
        let stdout = Self::run(
            repo_path,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads/"],
        )?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn branch_exists(&self, repo_path: &Path, name: &str) -> Result<bool, WtError> {
        let reference = format!("refs/heads/{name}");
        let args = ["rev-parse", "--verify", "--quiet", reference.as_str()];
        let output = Self::output(repo_path, &args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            // --quiet exits 1 with no output when the ref does not resolve
            Some(1) => Ok(false),
            _ => Err(failure(&args, &output)),
        }
    }

    fn list_worktrees(&self, repo_path: &Path) -> Result<Vec<Worktree>, WtError> {
        let stdout = Self::run(repo_path, &["worktree", "list", "--porcelain"])?;
        Ok(parse_worktree_porcelain(&stdout))
    }

    fn worktree_clean(&self, worktree_path: &Path) -> Result<bool, WtError> {
        let stdout = Self::run(worktree_path, &["status", "--porcelain"])?;
        Ok(stdout.trim().is_empty())
    }

    fn commit_time(&self, repo_path: &Path, rev: &str) -> i64 {
        match Self::run(repo_path, &["log", "-1", "--format=%ct", rev, "--"]) {
            Ok(stdout) => parse_commit_time(&stdout),
            Err(e) => {
                log::debug!("commit time for {rev} unavailable: {e}");
                0
            }
        }
    }

    fn commit_time_at(&self, worktree_path: &Path) -> i64 {
        match Self::run(worktree_path, &["log", "-1", "--format=%ct"]) {
            Ok(stdout) => parse_commit_time(&stdout),
            Err(e) => {
                log::debug!(
                    "commit time for {} unavailable: {e}",
                    worktree_path.display()
                );
                0
            }
        }
    }

    fn add_worktree(
        &self,
        repo_path: &Path,
        worktree_path: &Path,
        branch: &str,
    ) -> Result<(), WtError> {
        let args = worktree_add_existing_args(worktree_path, branch);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::run(repo_path, &args)?;
        Ok(())
    }

    fn create_branch_and_worktree(
        &self,
        repo_path: &Path,
        worktree_path: &Path,
        new_branch: &str,
        base: Option<&str>,
    ) -> Result<(), WtError> {
        let args = worktree_add_new_args(worktree_path, new_branch, base);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::run(repo_path, &args)?;
        Ok(())
    }

    fn remove_worktree(&self, repo_path: &Path, worktree_path: &Path) -> Result<(), WtError> {
        let path = worktree_path.to_string_lossy();
        Self::run(repo_path, &["worktree", "remove", path.as_ref()])?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {args:?} failed: {status:?}");
    }

    pub(crate) fn init_test_repo(dir: &Path) {
        git(dir, &["init", "-b", "main"]);
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
        fs::write(dir.join("README.md"), "# test").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "init"]);
    }

    fn make_repo() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        init_test_repo(&repo);
        (tmp, repo)
    }

    #[test]
    fn test_worktree_add_new_args_from_head() {
        let args = worktree_add_new_args(Path::new("/r-worktrees/feature"), "feature", None);
        assert_eq!(args, ["worktree", "add", "-b", "feature", "/r-worktrees/feature"]);
    }

    #[test]
    fn test_worktree_add_new_args_from_base() {
        let args = worktree_add_new_args(
            Path::new("/r-worktrees/feature2"),
            "feature2",
            Some("develop"),
        );
        assert_eq!(
            args,
            ["worktree", "add", "-b", "feature2", "/r-worktrees/feature2", "develop"]
        );
    }

    #[test]
    fn test_worktree_add_existing_args_has_no_b_flag() {
        let args = worktree_add_existing_args(Path::new("/r-worktrees/dev"), "dev");
        assert_eq!(args, ["worktree", "add", "/r-worktrees/dev", "dev"]);
    }

    #[test]
    fn test_repo_root_from_subdirectory() {
        let (_tmp, repo) = make_repo();
        let sub = repo.join("nested").join("deeper");
        fs::create_dir_all(&sub).unwrap();

        let root = CliGitProvider.repo_root(&sub).unwrap();
        assert_eq!(
            dunce_like(&root),
            dunce_like(&repo),
            "root should be the repository top level"
        );
    }

    #[test]
    fn test_repo_root_outside_repo() {
        let tmp = tempfile::tempdir().unwrap();
        let result = CliGitProvider.repo_root(tmp.path());
        assert!(matches!(result, Err(WtError::NotInRepo)));
    }

    #[test]
    fn test_list_branches() {
        let (_tmp, repo) = make_repo();
        git(&repo, &["branch", "feat/test"]);

        let branches = CliGitProvider.list_branches(&repo).unwrap();
        assert!(branches.contains(&"main".to_string()));
        assert!(branches.contains(&"feat/test".to_string()));
        assert!(branches.iter().all(|b| !b.is_empty()));
    }

    #[test]
    fn test_list_branches_skips_detached_head() {
        let (_tmp, repo) = make_repo();
        git(&repo, &["branch", "dev"]);
        git(&repo, &["checkout", "--detach"]);

        let branches = CliGitProvider.list_branches(&repo).unwrap();
        assert_eq!(branches, vec!["dev".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_branch_exists() {
        let (_tmp, repo) = make_repo();
        git(&repo, &["branch", "dev"]);

        assert!(CliGitProvider.branch_exists(&repo, "dev").unwrap());
        assert!(CliGitProvider.branch_exists(&repo, "main").unwrap());
        assert!(!CliGitProvider.branch_exists(&repo, "nope").unwrap());
    }

    #[test]
    fn test_add_and_list_worktree() {
        let (tmp, repo) = make_repo();
        git(&repo, &["branch", "feat/wt-test"]);

        let wt_path = tmp.path().join("repo-worktrees").join("feat").join("wt-test");
        fs::create_dir_all(wt_path.parent().unwrap()).unwrap();
        CliGitProvider
            .add_worktree(&repo, &wt_path, "feat/wt-test")
            .unwrap();

        assert!(wt_path.join("README.md").exists());

        let worktrees = CliGitProvider.list_worktrees(&repo).unwrap();
        assert_eq!(worktrees.len(), 2);
        assert!(worktrees[0].is_main);
        assert_eq!(worktrees[1].branch.as_deref(), Some("feat/wt-test"));
    }

    #[test]
    fn test_list_worktrees_is_stable() {
        let (_tmp, repo) = make_repo();
        let first = CliGitProvider.list_worktrees(&repo).unwrap();
        let second = CliGitProvider.list_worktrees(&repo).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_create_branch_and_worktree() {
        let (tmp, repo) = make_repo();
        let wt_path = tmp.path().join("repo-new-branch");
        CliGitProvider
            .create_branch_and_worktree(&repo, &wt_path, "new-branch", Some("main"))
            .unwrap();

        assert!(wt_path.exists());
        let branches = CliGitProvider.list_branches(&repo).unwrap();
        assert!(branches.contains(&"new-branch".to_string()));
    }

    #[test]
    fn test_create_existing_branch_fails_with_stderr() {
        let (tmp, repo) = make_repo();
        git(&repo, &["branch", "dup"]);
        let wt_path = tmp.path().join("repo-dup");
        let err = CliGitProvider
            .create_branch_and_worktree(&repo, &wt_path, "dup", Some("main"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("git worktree add"), "{msg}");
        assert!(msg.contains("already exists"), "{msg}");
    }

    #[test]
    fn test_add_worktree_fails_for_nonexistent_branch() {
        let (tmp, repo) = make_repo();
        let wt_path = tmp.path().join("wt-nope");
        let result = CliGitProvider.add_worktree(&repo, &wt_path, "nonexistent-branch");
        assert!(matches!(result, Err(WtError::Git { .. })));
    }

    #[test]
    fn test_worktree_clean_and_dirty() {
        let (_tmp, repo) = make_repo();
        assert!(CliGitProvider.worktree_clean(&repo).unwrap());

        fs::write(repo.join("README.md"), "# changed").unwrap();
        assert!(!CliGitProvider.worktree_clean(&repo).unwrap());
    }

    #[test]
    fn test_remove_worktree() {
        let (tmp, repo) = make_repo();
        let wt_path = tmp.path().join("repo-gone");
        CliGitProvider
            .create_branch_and_worktree(&repo, &wt_path, "gone", None)
            .unwrap();
        assert_eq!(CliGitProvider.list_worktrees(&repo).unwrap().len(), 2);

        CliGitProvider.remove_worktree(&repo, &wt_path).unwrap();
        assert!(!wt_path.exists());
        assert_eq!(CliGitProvider.list_worktrees(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_time() {
        let (_tmp, repo) = make_repo();
        assert!(CliGitProvider.commit_time(&repo, "main") > 0);
        assert!(CliGitProvider.commit_time_at(&repo) > 0);
        assert_eq!(CliGitProvider.commit_time(&repo, "no-such-ref"), 0);
    }

    #[test]
    fn test_commit_time_at_non_repo_is_zero() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(CliGitProvider.commit_time_at(tmp.path()), 0);
    }

    /// Resolve symlinked temp dirs (e.g. /var -> /private/var on macOS)
    fn dunce_like(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
