use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use super::monitor::{self, Monitor};
use crate::monitor::report::GpuReport;

type AppState = State<Arc<Monitor>>;
type ErrorResponse = (StatusCode, Json<Value>);

pub struct Api {
    address: String,
    port: u16,
    router: Router,
}

impl Api {
    pub async fn start(self) {
        let socket = format!("{}:{}", self.address, self.port);
        let listener = tokio::net::TcpListener::bind(socket).await.unwrap();
        axum::serve(listener, self.router).await.unwrap();
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

pub async fn start_api(api: Api, monitor: Arc<Monitor>, period: Duration) {
    tokio::spawn(monitor::refresh_loop(monitor, period));
    api.start().await;
}

pub fn setup(address: &str, port: u16, monitor: Arc<Monitor>) -> Api {
    let router = Router::new()
        .route("/report", get(get_report))
        .route("/report/cached", get(get_cached_report))
        .with_state(monitor);
    Api {
        address: address.to_string(),
        port,
        router,
    }
}

fn error_response(status: StatusCode, message: String) -> ErrorResponse {
    (status, Json(json!({ "message": message })))
}

async fn get_report(State(monitor): AppState) -> Result<Json<GpuReport>, ErrorResponse> {
    match monitor.refresh().await {
        Ok(report) => Ok(Json((*report).clone())),
        Err(e) => {
            error!("could not collect cluster info: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}

async fn get_cached_report(State(monitor): AppState) -> Result<Json<GpuReport>, ErrorResponse> {
    match monitor.latest() {
        Some(report) => Ok(Json((*report).clone())),
        None => Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "no report collected yet".to_string(),
        )),
    }
}
