pub mod api;
pub mod monitor;
pub mod report;

pub use api::{setup, start_api, Api};
pub use monitor::{refresh_loop, Monitor};
pub use report::{build_report, GpuReport, NodeGpuUsage};
