/*!
Stub du registre d'appareils (`GET /registeredDevices`)
*/

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct RegistryState {
    devices: Mutex<Vec<Value>>,
    failing: Mutex<Option<u16>>,
    hits: AtomicUsize,
}

#[derive(Clone)]
pub struct RegistryStub {
    addr: SocketAddr,
    state: Arc<RegistryState>,
}

impl RegistryStub {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(RegistryState::default());
        let app = Router::new()
            .route("/registeredDevices", get(list_devices))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("[registry-stub] server stopped: {}", e);
            }
        });

        log::info!("📟 [STUB] device registry on http://{}", addr);
        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn add_device(&self, device: Value) {
        self.state.devices.lock().unwrap().push(device);
    }

    /// Fait répondre le registre avec ce code HTTP
    pub fn fail_with(&self, status: u16) {
        *self.state.failing.lock().unwrap() = Some(status);
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::Relaxed)
    }
}

async fn list_devices(State(state): State<Arc<RegistryState>>) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    if let Some(code) = *state.failing.lock().unwrap() {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return status.into_response();
    }
    let devices = state.devices.lock().unwrap().clone();
    Json(Value::Array(devices)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegisteredDeviceBuilder;

    #[tokio::test]
    async fn test_serves_registered_devices() {
        let stub = RegistryStub::start().await.unwrap();
        stub.add_device(RegisteredDeviceBuilder::new("dev-1", -3.37, 36.68).build());

        let url = format!("{}/registeredDevices", stub.base_url());
        let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body[0]["deviceId"], "dev-1");
        assert_eq!(stub.hits(), 1);

        stub.fail_with(500);
        assert_eq!(reqwest::get(&url).await.unwrap().status().as_u16(), 500);
    }
}
