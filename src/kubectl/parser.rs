use crate::kubectl::records::{parse_int_or_zero, AllocatedResource, NodeDescription, PodInfo};

const NAME: &str = "Name:";
const CAPACITY: &str = "Capacity:";
const ALLOCATABLE: &str = "Allocatable:";
const LABELS: &str = "Labels:";
const ANNOTATIONS: &str = "Annotations:";
const SYSTEM_INFO: &str = "System Info:";
const EVENTS: &str = "Events:";
const ALLOCATED_RESOURCES: &str = "Allocated resources:";

// which section of the describe output the scanner is currently inside,
// inferred from the most recent recognized header line
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    None,
    Capacity,
    Allocatable,
    Labels,
    AllocatedResources,
}

/// Scans the output of `kubectl describe nodes` into one record per "Name:"
/// line. The format has no delimiters and no schema, so every line the
/// scanner does not recognize is skipped; this never fails, it just returns
/// whatever it could collect.
pub fn parse_node_description(text: &str) -> Vec<NodeDescription> {
    let mut nodes: Vec<NodeDescription> = Vec::new();
    let mut current: Option<NodeDescription> = None;
    let mut mode = Mode::None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let first = tokens[0];

        if first == NAME {
            // a nameless "Name:" line contributes nothing
            let Some(name) = tokens.get(1) else {
                continue;
            };
            if let Some(done) = current.take() {
                nodes.push(done);
            }
            current = Some(NodeDescription::new(name));
            mode = Mode::None;
        } else if first == CAPACITY {
            mode = Mode::Capacity;
        } else if first == ALLOCATABLE {
            mode = Mode::Allocatable;
        } else if first == LABELS {
            mode = Mode::Labels;
            // kubectl prints the first label on the header line itself; the
            // scanner replaces the whole map here instead of merging, so a
            // repeated "Labels:" header wipes everything collected so far.
            // Looks like a bug, but downstream output depends on it.
            if let Some(node) = current.as_mut() {
                let inline = line[LABELS.len()..].trim();
                if let Some((key, value)) = inline.split_once('=') {
                    node.labels.clear();
                    node.labels.insert(key.to_string(), value.to_string());
                }
            }
        } else if first == ANNOTATIONS {
            mode = Mode::None;
        } else if (line.starts_with(SYSTEM_INFO) && tokens.len() == 2) || first == EVENTS {
            mode = Mode::None;
        } else if line.starts_with(ALLOCATED_RESOURCES) && tokens.len() == 2 {
            mode = Mode::AllocatedResources;
        } else if let Some(node) = current.as_mut() {
            match mode {
                Mode::Labels => {
                    if let Some((key, value)) = line.split_once('=') {
                        node.labels.insert(key.to_string(), value.to_string());
                    }
                }
                Mode::Capacity | Mode::Allocatable => {
                    if tokens.len() >= 2 && first.len() >= 2 {
                        // drop the trailing ':' from the resource name
                        let mut key = first.to_string();
                        key.pop();
                        let value = tokens[1].to_string();
                        if mode == Mode::Capacity {
                            node.capacity.insert(key, value);
                        } else {
                            node.allocatable.insert(key, value);
                        }
                    }
                }
                Mode::AllocatedResources => {
                    // rows are either "name requests limits" or, with
                    // percentages, "name requests (x%) limits (y%)"; the
                    // header row and the dashed separator are skipped
                    if (tokens.len() == 3 || tokens.len() == 5)
                        && !first.starts_with('-')
                        && first != "Resource"
                    {
                        let limits = if tokens.len() == 3 { tokens[2] } else { tokens[3] };
                        node.allocated.insert(
                            first.to_string(),
                            AllocatedResource {
                                requests: tokens[1].to_string(),
                                limits: limits.to_string(),
                            },
                        );
                    }
                }
                Mode::None => {}
            }
        }
    }

    if let Some(done) = current.take() {
        nodes.push(done);
    }
    nodes
}

/// Parses the templated pod report, one `namespace,podname,nodename[,gpus]`
/// tuple per line. Lines with fewer than three fields are skipped.
pub fn parse_pod_info(text: &str) -> Vec<PodInfo> {
    let mut pods = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            continue;
        }
        pods.push(PodInfo {
            namespace: fields[0].to_string(),
            name: fields[1].to_string(),
            node_name: fields[2].to_string(),
            used_nvidia_gpus: fields.get(3).map_or(0, |f| parse_int_or_zero(f)),
        });
    }
    pods
}
