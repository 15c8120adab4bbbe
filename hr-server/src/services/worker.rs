//! Background Job Worker
//!
//! 单一 worker 串行消费队列。收到 shutdown 信号后停止取新任务,
//! 当前任务执行完才退出。

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::services::{Job, payroll};

pub async fn run(state: ServerState, mut rx: mpsc::Receiver<Job>, shutdown: CancellationToken) {
    tracing::info!("Job worker started");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Job worker shutting down");
                break;
            }
            job = rx.recv() => {
                match job {
                    Some(job) => handle_job(&state, job).await,
                    None => {
                        tracing::warn!("Job queue closed, worker exiting");
                        break;
                    }
                }
            }
        }
    }
}

async fn handle_job(state: &ServerState, job: Job) {
    tracing::debug!(job = job.kind(), "Processing job");
    match job {
        Job::ProcessPayroll { run_id } => {
            payroll::process_run(state.get_db().pool(), &state.config, state.notifier(), run_id)
                .await;
        }
        Job::SyncCalendar {
            employee_id,
            leave_request_id,
            status,
            start_date,
            end_date,
        } => {
            state
                .notifier()
                .sync_calendar(
                    employee_id,
                    leave_request_id,
                    &status,
                    &start_date,
                    &end_date,
                )
                .await;
        }
    }
}
