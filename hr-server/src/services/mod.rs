//! Background Services
//!
//! 请求之外的一切: 任务队列、后台 worker、对外回调与工资计算。

pub mod jobs;
pub mod notifier;
pub mod payroll;
pub mod worker;

pub use jobs::{Job, JobQueueService};
pub use notifier::NotifierService;
