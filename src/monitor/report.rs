use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::kubectl::{NodeDescription, PodInfo};

#[derive(Debug, Clone, Serialize)]
pub struct GpuReport {
    pub generated_at: DateTime<Utc>,
    pub nodes: Vec<NodeGpuUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeGpuUsage {
    pub name: String,
    pub capacity_gpus: i64,
    pub allocatable_gpus: i64,
    pub allocated_gpus: i64,
    // negative means the node's limits overcommit its GPUs
    pub available_gpus: i64,
    pub pods: Vec<PodInfo>,
}

/// Joins the two record sequences by node name. Pods that use no GPU are
/// dropped, as are pods on nodes the describe output never mentioned; node
/// order follows the describe output.
pub fn build_report(nodes: &[NodeDescription], pods: &[PodInfo]) -> GpuReport {
    let gpu_pods: Vec<&PodInfo> = pods.iter().filter(|p| p.used_nvidia_gpus > 0).collect();

    let nodes = nodes
        .iter()
        .map(|node| NodeGpuUsage {
            name: node.name.clone(),
            capacity_gpus: node.capacity_nvidia_gpu(),
            allocatable_gpus: node.allocatable_nvidia_gpu(),
            allocated_gpus: node.allocated_nvidia_gpu(),
            available_gpus: node.available_nvidia_gpu(),
            pods: gpu_pods
                .iter()
                .filter(|p| p.node_name == node.name)
                .map(|p| (*p).clone())
                .collect(),
        })
        .collect();

    GpuReport {
        generated_at: Utc::now(),
        nodes,
    }
}
