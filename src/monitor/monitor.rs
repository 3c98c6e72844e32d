use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tracing::{error, info};

use crate::kubectl::{self, parse_node_description, parse_pod_info, Kubectl};
use crate::monitor::report::{build_report, GpuReport};

/// Owns the kubectl client and the last report that was built successfully.
/// Handlers and the refresh loop share it behind an Arc; the cached report
/// sits in an ArcSwap so readers never wait on a refresh in flight.
pub struct Monitor {
    kubectl: Kubectl,
    report: ArcSwapOption<GpuReport>,
}

impl Monitor {
    pub fn new(kubectl: Kubectl) -> Self {
        Monitor {
            kubectl,
            report: ArcSwapOption::const_empty(),
        }
    }

    pub fn latest(&self) -> Option<Arc<GpuReport>> {
        self.report.load_full()
    }

    pub async fn refresh(&self) -> kubectl::Result<Arc<GpuReport>> {
        let node_text = self.kubectl.node_description().await?;
        let pod_text = self.kubectl.pod_gpu_report().await?;

        let nodes = parse_node_description(&node_text);
        let pods = parse_pod_info(&pod_text);
        info!("collected {} nodes and {} pod records", nodes.len(), pods.len());

        let report = Arc::new(build_report(&nodes, &pods));
        self.report.store(Some(report.clone()));
        Ok(report)
    }
}

pub async fn refresh_loop(monitor: Arc<Monitor>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match monitor.refresh().await {
            Ok(report) => info!("refreshed report, {} nodes", report.nodes.len()),
            Err(e) => error!("report refresh failed: {}", e),
        }
    }
}
