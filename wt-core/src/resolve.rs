use crate::{error::WtError, git::Worktree};
use std::path::Path;

/// Find the worktree `name` refers to: an exact branch name wins, then the
/// directory basename, then the full path. The first match at the highest
/// priority is returned.
pub fn resolve_worktree<'a>(
    worktrees: &'a [Worktree],
    name: &str,
) -> Result<&'a Worktree, WtError> {
    worktrees
        .iter()
        .find(|wt| wt.branch.as_deref() == Some(name))
        .or_else(|| worktrees.iter().find(|wt| wt.dir_name() == name))
        .or_else(|| worktrees.iter().find(|wt| wt.path == Path::new(name)))
        .ok_or_else(|| WtError::WorktreeNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn wt(path: &str, branch: Option<&str>) -> Worktree {
        Worktree {
            path: PathBuf::from(path),
            branch: branch.map(String::from),
            is_main: false,
        }
    }

    fn sample() -> Vec<Worktree> {
        vec![
            wt("/src/app", Some("main")),
            wt("/src/app-worktrees/feat/login", Some("feat/login")),
            wt("/src/app-worktrees/detached", None),
        ]
    }

    #[test]
    fn test_resolve_by_branch() {
        let wts = sample();
        assert_eq!(
            resolve_worktree(&wts, "feat/login").unwrap().path,
            PathBuf::from("/src/app-worktrees/feat/login")
        );
    }

    #[test]
    fn test_resolve_by_basename() {
        let wts = sample();
        assert_eq!(
            resolve_worktree(&wts, "login").unwrap().branch.as_deref(),
            Some("feat/login")
        );
        assert!(resolve_worktree(&wts, "detached").unwrap().branch.is_none());
    }

    #[test]
    fn test_resolve_by_full_path() {
        let wts = sample();
        assert_eq!(
            resolve_worktree(&wts, "/src/app").unwrap().branch.as_deref(),
            Some("main")
        );
    }

    #[test]
    fn test_branch_beats_basename() {
        // Branch "app" lives elsewhere; the main worktree's basename is also "app"
        let wts = vec![
            wt("/src/app", Some("main")),
            wt("/src/app-worktrees/app", Some("app")),
        ];
        assert_eq!(
            resolve_worktree(&wts, "app").unwrap().path,
            PathBuf::from("/src/app-worktrees/app")
        );
    }

    #[test]
    fn test_not_found() {
        let err = resolve_worktree(&sample(), "nope").unwrap_err();
        assert!(matches!(err, WtError::WorktreeNotFound(ref n) if n == "nope"));
    }
}
