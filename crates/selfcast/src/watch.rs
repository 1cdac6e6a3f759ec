//! Continuous-watch supervisor.
//!
//! Filesystem change notifications trigger scan-and-upload passes, one per
//! change batch, strictly serially. A failing pass is logged and the loop
//! keeps going; Ctrl-C stops the watcher and exits with status 1.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::runner::Runner;

/// How long to let a burst of change events settle before scanning.
const SETTLE: Duration = Duration::from_millis(500);

pub async fn watch(runner: &Runner, paths: &[PathBuf]) -> Result<()> {
    let (tx, rx) = mpsc::channel::<()>(16);

    // The notify callback runs on the watcher's own thread; a full channel
    // just means a scan is already pending.
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        if event.is_ok() {
            let _ = tx.try_send(());
        }
    })
    .context("failed to initialise filesystem watcher")?;

    for path in paths {
        watcher
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", path.display()))?;
    }
    info!(
        "watching {}",
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if supervise(runner, paths, rx, tokio::signal::ctrl_c()).await? {
        info!("exiting");
        std::process::exit(1);
    }
    Ok(())
}

/// Run scan passes until the channel closes or `interrupt` completes.
/// Returns whether the loop ended on an interrupt.
///
/// The interrupt future is pinned once and polled across iterations: one
/// arriving while a pass is in flight is picked up on the next select
/// instead of being dropped with a per-iteration future.
async fn supervise<F>(
    runner: &Runner,
    paths: &[PathBuf],
    mut rx: mpsc::Receiver<()>,
    interrupt: F,
) -> Result<bool>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            changed = rx.recv() => {
                if changed.is_none() {
                    return Ok(false);
                }
                // Let the batch settle, then drain it so one burst of
                // events triggers exactly one pass.
                tokio::time::sleep(SETTLE).await;
                while rx.try_recv().is_ok() {}

                if let Err(err) = runner.process(paths).await {
                    error!("scan failed: {err:#}");
                }
            }
            _ = &mut interrupt => {
                return Ok(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendClient;
    use crate::config::Config;
    use crate::runner::Options;
    use crate::schedule::Schedule;

    fn test_runner() -> Runner {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            auth_token: "secret".to_string(),
        };
        Runner::new(
            BackendClient::new(&config),
            Schedule::from_toml_str("").unwrap(),
            Options::default(),
        )
    }

    #[tokio::test]
    async fn interrupt_during_a_pass_is_not_lost() {
        let runner = test_runner();
        let (event_tx, event_rx) = mpsc::channel::<()>(16);
        let (int_tx, int_rx) = tokio::sync::oneshot::channel::<()>();
        let interrupt = async move {
            int_rx.await.ok();
            Ok::<(), std::io::Error>(())
        };

        let drive = async {
            // Kick off a pass, then fire the interrupt while the loop is
            // still settling that batch.
            event_tx.send(()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            int_tx.send(()).unwrap();
            event_tx
        };

        let (ended, _event_tx) = tokio::join!(supervise(&runner, &[], event_rx, interrupt), drive);
        assert!(ended.unwrap(), "interrupt should end the loop");
    }

    #[tokio::test]
    async fn closed_event_channel_ends_the_loop_cleanly() {
        let runner = test_runner();
        let (event_tx, event_rx) = mpsc::channel::<()>(16);
        drop(event_tx);
        let interrupt = std::future::pending::<std::io::Result<()>>();

        let ended = supervise(&runner, &[], event_rx, interrupt).await.unwrap();
        assert!(!ended, "channel close is not an interrupt");
    }
}
