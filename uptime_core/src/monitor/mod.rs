//! Check-and-report pipeline: probe sites, aggregate failures, deliver the report

pub mod aggregator;
pub mod dispatcher;
pub mod pipeline;
pub mod prober;

pub use aggregator::ResultAggregator;
pub use dispatcher::{DispatchOutcome, ReportDispatcher};
pub use pipeline::{MonitorPipeline, PipelineSummary};
pub use prober::{probe_site, ProbeFailure, ProbeOutcome, SiteProber};
