pub mod kubectl;
pub mod parser;
pub mod records;

pub use kubectl::{Error, Kubectl, Result};
pub use parser::{parse_node_description, parse_pod_info};
pub use records::{AllocatedResource, NodeDescription, PodInfo, NVIDIA_GPU};
