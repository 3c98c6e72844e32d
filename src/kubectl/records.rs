use std::collections::HashMap;

use serde::Serialize;

pub const NVIDIA_GPU: &str = "nvidia.com/gpu";

// requests/limits pair from a node's "Allocated resources" table, kept as the
// raw quantity strings kubectl printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocatedResource {
    pub requests: String,
    pub limits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescription {
    pub name: String,
    pub capacity: HashMap<String, String>,
    pub allocatable: HashMap<String, String>,
    pub allocated: HashMap<String, AllocatedResource>,
    pub labels: HashMap<String, String>,
}

impl NodeDescription {
    pub fn new(name: &str) -> Self {
        NodeDescription {
            name: name.to_string(),
            capacity: HashMap::new(),
            allocatable: HashMap::new(),
            allocated: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    pub fn capacity_nvidia_gpu(&self) -> i64 {
        self.capacity.get(NVIDIA_GPU).map_or(0, |v| parse_int_or_zero(v))
    }

    pub fn allocatable_nvidia_gpu(&self) -> i64 {
        self.allocatable
            .get(NVIDIA_GPU)
            .map_or(0, |v| parse_int_or_zero(v))
    }

    // kubectl reports allocated GPUs under limits, not requests
    pub fn allocated_nvidia_gpu(&self) -> i64 {
        self.allocated
            .get(NVIDIA_GPU)
            .map_or(0, |r| parse_int_or_zero(&r.limits))
    }

    // can go negative when limits overcommit the node; callers must not clamp
    pub fn available_nvidia_gpu(&self) -> i64 {
        self.allocatable_nvidia_gpu() - self.allocated_nvidia_gpu()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub node_name: String,
    pub used_nvidia_gpus: i64,
}

pub fn parse_int_or_zero(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
