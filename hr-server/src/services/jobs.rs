//! Job Queue Service
//!
//! 进程内任务队列。HTTP 处理器只负责入队, 真正的副作用由后台
//! worker 在请求事务提交之后执行。

use tokio::sync::mpsc;

/// Work item handed to the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Compute payslips for a PENDING payroll run.
    ProcessPayroll { run_id: i64 },
    /// Push an approved leave request to the external calendar.
    SyncCalendar {
        employee_id: i64,
        leave_request_id: i64,
        status: String,
        start_date: String,
        end_date: String,
    },
}

impl Job {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Job::ProcessPayroll { .. } => "process_payroll",
            Job::SyncCalendar { .. } => "sync_calendar",
        }
    }
}

/// Cloneable sending half of the queue. The receiving half goes to the
/// worker task at startup.
#[derive(Debug, Clone)]
pub struct JobQueueService {
    tx: mpsc::Sender<Job>,
}

impl JobQueueService {
    /// Builds the queue with a bounded capacity.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Best-effort enqueue. A full or closed queue is logged and
    /// swallowed; the originating request has already committed and
    /// must not fail because of it.
    pub fn enqueue(&self, job: Job) -> bool {
        let kind = job.kind();
        match self.tx.try_send(job) {
            Ok(()) => {
                tracing::debug!(job = kind, "Job enqueued");
                true
            }
            Err(e) => {
                tracing::warn!(job = kind, error = %e, "Failed to enqueue job");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_delivers_job() {
        let (queue, mut rx) = JobQueueService::new(4);
        assert!(queue.enqueue(Job::ProcessPayroll { run_id: 7 }));
        assert_eq!(rx.recv().await, Some(Job::ProcessPayroll { run_id: 7 }));
    }

    #[tokio::test]
    async fn test_enqueue_full_queue_is_swallowed() {
        let (queue, _rx) = JobQueueService::new(1);
        assert!(queue.enqueue(Job::ProcessPayroll { run_id: 1 }));
        assert!(!queue.enqueue(Job::ProcessPayroll { run_id: 2 }));
    }

    #[tokio::test]
    async fn test_enqueue_closed_queue_is_swallowed() {
        let (queue, rx) = JobQueueService::new(1);
        drop(rx);
        assert!(!queue.enqueue(Job::ProcessPayroll { run_id: 1 }));
    }
}
