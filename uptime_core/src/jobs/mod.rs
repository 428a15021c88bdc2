pub mod models;
pub mod queue;
pub mod worker;

pub use models::MonitorJob;
pub use queue::{CompletionSender, MonitorQueue};
pub use worker::JobWorker;
