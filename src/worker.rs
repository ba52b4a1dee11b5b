use std::sync::mpsc::{Receiver, Sender};

use crate::aws::{AwsLogError, FetchLogsParams, LogPage};

pub enum WorkerRequest {
    /// Fetch one page of a time window, sending the result on the provided channel.
    FetchLogPage {
        profile: Option<String>,
        region: Option<String>,
        log_group: String,
        filter_pattern: Option<String>,
        start_timestamp: Option<i64>,
        end_timestamp: Option<i64>,
        limit: usize,
        offset: usize,
        max_events: usize,
        respond_to: Sender<Result<LogPage, AwsLogError>>,
    },

    /// List log groups for given profile/region, sending result on the provided channel.
    ListLogGroups {
        profile: Option<String>,
        region: Option<String>,
        limit: i32,
        respond_to: Sender<Result<Vec<String>, AwsLogError>>,
    },
}

/// Handle for sending work to the worker.
#[derive(Clone)]
pub struct WorkerHandle {
    sender: Sender<WorkerRequest>,
}

impl WorkerHandle {
    pub fn send(&self, req: WorkerRequest) {
        if self.sender.send(req).is_err() {
            log::warn!("AWS worker is gone, dropping request");
        }
    }
}

/// Spawn the worker thread and return a handle for sending it requests.
///
/// The worker runs a single-threaded Tokio runtime (current_thread).
pub fn spawn_worker() -> std::io::Result<WorkerHandle> {
    let (tx, rx): (Sender<WorkerRequest>, Receiver<WorkerRequest>) = std::sync::mpsc::channel();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("aws-worker".to_string())
        .spawn(move || {
            rt.block_on(async move {
                worker_loop(rx).await;
            });
        })?;

    Ok(WorkerHandle { sender: tx })
}

async fn worker_loop(rx: Receiver<WorkerRequest>) {
    use crate::aws::{fetch_log_page, list_log_groups};

    while let Ok(req) = rx.recv() {
        match req {
            WorkerRequest::FetchLogPage {
                profile,
                region,
                log_group,
                filter_pattern,
                start_timestamp,
                end_timestamp,
                limit,
                offset,
                max_events,
                respond_to,
            } => {
                let params = FetchLogsParams {
                    profile: profile.as_deref(),
                    region: region.as_deref(),
                    log_group: &log_group,
                    filter_pattern: filter_pattern.as_deref(),
                    start_timestamp,
                    end_timestamp,
                    limit,
                    offset,
                    max_events,
                };
                let result = fetch_log_page(params).await;
                let _ = respond_to.send(result);
            }
            WorkerRequest::ListLogGroups {
                profile,
                region,
                limit,
                respond_to,
            } => {
                let result = list_log_groups(profile.as_deref(), region.as_deref(), limit).await;
                let _ = respond_to.send(result);
            }
        }
    }
    log::debug!("AWS worker stopped");
}
