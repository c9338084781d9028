use crate::{InkCommand, InkUpdate, RequestId};
use inkkey_core::{ImageSource, ProcessingOptions, calculate_summary, process};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Spawn the worker on the current tokio runtime
pub fn spawn_worker() -> (
    mpsc::UnboundedSender<InkCommand>,
    mpsc::UnboundedReceiver<InkUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx)
}

/// Async worker task that processes analysis commands and sends updates.
///
/// Returns once every command sender has been dropped and the queue is empty.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<InkCommand>,
    update_tx: mpsc::UnboundedSender<InkUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        let mut pending = vec![cmd];

        // Collapse whatever else is already queued
        while let Ok(next_cmd) = command_rx.try_recv() {
            queue_command(&mut pending, next_cmd, &update_tx);
        }

        for cmd in pending {
            process_command(cmd, &update_tx).await;
        }
    }
}

/// Queue `cmd`, replacing an older analysis of the same source in place
fn queue_command(
    pending: &mut Vec<InkCommand>,
    cmd: InkCommand,
    update_tx: &mpsc::UnboundedSender<InkUpdate>,
) {
    if let InkCommand::Analyze {
        request_id: newer_id,
        source: ref newer_source,
        ..
    } = cmd
    {
        let stale = pending.iter_mut().find(|queued| {
            matches!(queued, InkCommand::Analyze { source, .. } if source == newer_source)
        });

        if let Some(slot) = stale {
            if let InkCommand::Analyze { request_id, .. } = slot {
                log::debug!(
                    "Discarding queued analysis {:?}, using newer request {:?}",
                    request_id,
                    newer_id
                );
                let _ = update_tx.send(InkUpdate::Superseded {
                    request_id: *request_id,
                });
            }
            *slot = cmd;
            return;
        }
    }

    pending.push(cmd);
}

async fn process_command(cmd: InkCommand, update_tx: &mpsc::UnboundedSender<InkUpdate>) {
    match cmd {
        InkCommand::Analyze {
            request_id,
            source,
            options,
        } => {
            handle_analyze(request_id, source, options, update_tx).await;
        }
        InkCommand::LoadConfig { path } => {
            handle_load_config(path, update_tx).await;
        }
    }
}

async fn handle_analyze(
    request_id: RequestId,
    source: ImageSource,
    options: ProcessingOptions,
    update_tx: &mpsc::UnboundedSender<InkUpdate>,
) {
    let _ = update_tx.send(InkUpdate::Started { request_id });

    let result = process(source, &options)
        .await
        .and_then(|levels| calculate_summary(&levels).map(|summary| (levels, summary)));

    match result {
        Ok((levels, summary)) => {
            let _ = update_tx.send(InkUpdate::Completed {
                request_id,
                levels,
                summary,
            });
        }
        Err(e) => {
            log::error!("Analysis {:?} failed: {}", request_id, e);
            let _ = update_tx.send(InkUpdate::Error {
                request_id: Some(request_id),
                message: format!("Failed to analyze image: {}", e),
            });
        }
    }
}

async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<InkUpdate>) {
    match ProcessingOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(InkUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(InkUpdate::Error {
                request_id: None,
                message: format!("Failed to load {}: {}", path.display(), e),
            });
        }
    }
}
