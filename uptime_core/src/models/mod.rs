pub mod integration;
pub mod payload;
pub mod report;

pub use integration::IntegrationDescriptor;
pub use payload::{MonitorPayload, Setting};
pub use report::Report;
