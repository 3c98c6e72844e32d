use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use gpuboard::kubectl::Kubectl;
use gpuboard::monitor::{self, Monitor};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let kubectl_path = env::var("KUBECTL").unwrap_or_else(|_| "kubectl".to_string());
    // set SNAPSHOT_DIR to record raw kubectl output and replay it offline
    let snapshot_dir = env::var("SNAPSHOT_DIR").ok().map(PathBuf::from);
    let refresh_secs: u64 = env::var("REFRESH_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);

    let kubectl = Kubectl::new(kubectl_path, snapshot_dir);
    let monitor = Arc::new(Monitor::new(kubectl));

    info!("Starting gpuboard on {}:{}", host, port);
    let api = monitor::setup(&host, port, monitor.clone());
    monitor::start_api(api, monitor, Duration::from_secs(refresh_secs)).await;
}
