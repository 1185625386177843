//! Most-recent-first ordering by commit time.

use crate::git::{GitProvider, Worktree};
use rayon::prelude::*;
use std::{cmp::Reverse, path::Path};

/// How an item is turned into a commit time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyKind {
    /// Items are worktree paths; the time is HEAD's commit in that directory
    Worktrees,
    /// Items are refs resolved against the repository root
    Branches,
}

/// Stable sort by commit time, newest first. Lookups that fail count as 0
/// and so sink to the end; ties keep their input order.
pub fn order_by_recent(
    git: &dyn GitProvider,
    repo_root: &Path,
    items: Vec<String>,
    kind: RecencyKind,
) -> Vec<String> {
    sort_by_times(items, |item| match kind {
        RecencyKind::Worktrees => git.commit_time_at(Path::new(item)),
        RecencyKind::Branches => git.commit_time(repo_root, item),
    })
}

/// [`order_by_recent`] over enumerated worktrees, keyed by each worktree's path
pub fn order_worktrees(git: &dyn GitProvider, worktrees: Vec<Worktree>) -> Vec<Worktree> {
    sort_by_times(worktrees, |wt| git.commit_time_at(&wt.path))
}

fn sort_by_times<T, F>(items: Vec<T>, time_of: F) -> Vec<T>
where
    T: Send + Sync,
    F: Fn(&T) -> i64 + Send + Sync,
{
    let times: Vec<i64> = items.par_iter().map(&time_of).collect();
    let mut keyed: Vec<(i64, T)> = times.into_iter().zip(items).collect();
    keyed.sort_by_key(|(time, _)| Reverse(*time));
    keyed.into_iter().map(|(_, item)| item).collect()
}
