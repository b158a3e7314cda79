//! `nebula run --watch`: re-execute a workflow definition each time its file
//! is saved, until the process is interrupted.

use std::path::{Path, PathBuf};

use nebula_log::{info, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Run `path` once, then again every time it changes, until Ctrl-C.
pub async fn run_and_watch(path: &PathBuf, jwt: Option<String>) -> anyhow::Result<()> {
    if let Err(e) = crate::run_once(path, jwt.clone()).await {
        warn!(error = %e, "initial run failed");
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    // The file may not exist yet under some editors' save sequences (write
    // to a temp file, then rename); watching the parent directory catches
    // the rename event that a direct file watch would miss.
    let watch_target = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    watcher.watch(watch_target, RecursiveMode::NonRecursive)?;

    info!(path = %path.display(), "watching for changes (ctrl-c to stop)");

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(Ok(event)) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                        && event.paths.iter().any(|p| p == path) =>
                    {
                        info!(path = %path.display(), "change detected, re-running");
                        if let Err(e) = crate::run_once(path, jwt.clone()).await {
                            warn!(error = %e, "run failed");
                        }
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => warn!(error = %e, "watch error"),
                    None => return Ok(()),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                return Ok(());
            }
        }
    }
}
