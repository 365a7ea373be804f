/*!
Stub du service d'itinéraires (compatible OSRM) pour développement sans réseau

Serveur axum sur un port éphémère de 127.0.0.1. Enregistre toutes les requêtes
reçues et renvoie une réponse configurable par destination, avec latence
optionnelle pour simuler des réponses lentes ou hors d'ordre.
*/

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Réponse préparée du stub
#[derive(Debug, Clone)]
pub struct RouteStub {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl RouteStub {
    pub fn json(body: Value) -> Self {
        Self { status: 200, body: body.to_string(), delay: None }
    }

    /// Corps brut (pour simuler un corps non JSON)
    pub fn raw<S: Into<String>>(body: S) -> Self {
        Self { status: 200, body: body.into(), delay: None }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: String::new(), delay: None }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Requête reçue par le stub (pour assertions de tests)
#[derive(Debug, Clone, Serialize)]
pub struct RecordedRequest {
    pub profile: String,
    /// Segment brut `lon,lat;lon,lat`
    pub coordinates: String,
    /// Partie destination `lon,lat`
    pub destination: String,
    pub query: HashMap<String, String>,
}

struct StubState {
    default: RouteStub,
    by_destination: HashMap<String, RouteStub>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct RoutingStub {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
}

impl RoutingStub {
    /// Démarre le stub ; par défaut il répond `routes: []`.
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(StubState {
            default: RouteStub::json(crate::OsrmResponseBuilder::no_route()),
            by_destination: HashMap::new(),
            requests: Vec::new(),
        }));

        let app = Router::new()
            .route("/route/v1/{profile}/{coordinates}", get(handle_route))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("[routing-stub] server stopped: {}", e);
            }
        });

        log::info!("🧭 [STUB] routing service on http://{}", addr);
        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_default(&self, stub: RouteStub) {
        self.state.lock().unwrap().default = stub;
    }

    /// Réponse spécifique pour une destination (lat, lon)
    pub fn on_destination(&self, lat: f64, lon: f64, stub: RouteStub) {
        self.state.lock().unwrap().by_destination.insert(format!("{},{}", lon, lat), stub);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, lat: f64, lon: f64) -> Vec<RecordedRequest> {
        let key = format!("{},{}", lon, lat);
        self.requests().into_iter().filter(|r| r.destination == key).collect()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.requests.clear();
        state.by_destination.clear();
    }
}

async fn handle_route(
    State(state): State<Arc<Mutex<StubState>>>,
    Path((profile, coordinates)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let destination = coordinates.split(';').nth(1).unwrap_or_default().to_string();
    let stub = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            profile,
            coordinates: coordinates.clone(),
            destination: destination.clone(),
            query,
        });
        state.by_destination.get(&destination).cloned().unwrap_or_else(|| state.default.clone())
    };

    log::info!("📨 [STUB] route request {} -> {}", coordinates, stub.status);
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], stub.body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OsrmResponseBuilder;

    #[tokio::test]
    async fn test_records_and_routes_by_destination() {
        let stub = RoutingStub::start().await.unwrap();
        stub.on_destination(-3.3739, 36.6911, RouteStub::json(OsrmResponseBuilder::new().totals(10.0, 2.0).build()));

        let url = format!(
            "{}/route/v1/driving/36.6825,-3.3675;36.6911,-3.3739?overview=full",
            stub.base_url()
        );
        let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["routes"][0]["distance"], 10.0);

        let other = format!("{}/route/v1/driving/36.6825,-3.3675;1,2", stub.base_url());
        let body: Value = reqwest::get(&other).await.unwrap().json().await.unwrap();
        assert_eq!(body["routes"], serde_json::json!([]));

        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].profile, "driving");
        assert_eq!(requests[0].query.get("overview").map(String::as_str), Some("full"));
        assert_eq!(stub.requests_to(-3.3739, 36.6911).len(), 1);
    }

    #[tokio::test]
    async fn test_status_override() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::status(502));
        let url = format!("{}/route/v1/driving/0,0;1,1", stub.base_url());
        assert_eq!(reqwest::get(&url).await.unwrap().status().as_u16(), 502);
    }
}
