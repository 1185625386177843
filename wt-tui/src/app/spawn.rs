use super::EventSender;
use std::{
    sync::{Arc, atomic::Ordering},
    thread,
};
use wt_core::{
    copy::Filesystem,
    git::GitProvider,
    service::RepoContext,
    update::{Effect, perform},
};

/// Run a task effect on its own thread and post the result back to the main loop.
/// Results that arrive after the user quit are dropped.
pub(super) fn spawn_task(
    git: &Arc<dyn GitProvider>,
    fs: &Arc<dyn Filesystem>,
    repo: &RepoContext,
    effect: Effect,
    sender: &EventSender,
) {
    let git = Arc::clone(git);
    let fs = Arc::clone(fs);
    let repo = repo.clone();
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        log::debug!("running {effect:?}");
        let Some(event) = perform(git.as_ref(), fs.as_ref(), &repo, &effect) else {
            return;
        };
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        sender.send(event);
    });
}
