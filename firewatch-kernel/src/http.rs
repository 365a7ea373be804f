/**
 * API REST FIREWATCH - Serveur HTTP principal du kernel
 *
 * RÔLE :
 * Expose au tableau de bord les nœuds capteurs, les urgences, l'itinéraire
 * courant, la vue carte et les métriques.
 *
 * FONCTIONNEMENT :
 * - Serveur Axum (adresse configurable, 0.0.0.0:8080 par défaut)
 * - Routes : /health, /system, /nodes, /emergencies, /route, /map, /metrics
 * - Sélection d'une urgence + itinéraire via POST /emergencies/{id}/navigate
 * - 404 sur tout identifiant inconnu
 */

use axum::{extract::{Path, State}, routing::{get, post}, Json, Router};
use axum::http::StatusCode;
use crate::config::MapConf;
use crate::health::{HealthTracker, KernelHealth};
use crate::map::{build_map_view, MapInput, MapView};
use crate::models::{Contact, Emergency, SensorNode};
use crate::nearest::find_nearest;
use crate::state::{with_locked, Shared};
use crate::tracker::{RouteSnapshot, RouteTracker};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub nodes: Arc<Vec<SensorNode>>,
    pub emergencies: Arc<Vec<Emergency>>,
    /// Urgence sélectionnée (focus de la carte)
    pub selected: Shared<Option<String>>,
    pub tracker: RouteTracker,
    pub map: MapConf,
    pub health_tracker: HealthTracker,
}

impl AppState {
    fn emergency(&self, id: &str) -> Option<&Emergency> {
        self.emergencies.iter().find(|e| e.id == id)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NearestView {
    emergency_id: String,
    node: SensorNode,
    contacts: Vec<Contact>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/nodes", get(get_nodes))
        .route("/nodes/{id}", get(get_node))
        .route("/emergencies", get(get_emergencies))
        .route("/emergencies/{id}", get(get_emergency))
        .route("/emergencies/{id}/nearest", get(get_nearest))
        .route("/emergencies/{id}/navigate", post(navigate))
        .route("/route", get(get_route).delete(clear_route))
        .route("/map", get(get_map))
        .route("/metrics", get(get_metrics))
        .with_state(app_state)
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<KernelHealth> {
    Json(app.health_tracker.get_health(&app.nodes, app.emergencies.len(), &app.tracker))
}

// GET /nodes (liste)
async fn get_nodes(State(app): State<AppState>) -> Json<Vec<SensorNode>> {
    Json(app.nodes.as_ref().clone())
}

// GET /nodes/{id} (détail)
async fn get_node(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SensorNode>, StatusCode> {
    let Some(node) = app.nodes.iter().find(|n| n.id == id) else { return Err(StatusCode::NOT_FOUND); };
    Ok(Json(node.clone()))
}

// GET /emergencies (liste)
async fn get_emergencies(State(app): State<AppState>) -> Json<Vec<Emergency>> {
    Json(app.emergencies.as_ref().clone())
}

// GET /emergencies/{id} (détail)
async fn get_emergency(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Emergency>, StatusCode> {
    app.emergency(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

// GET /emergencies/{id}/nearest (nœud le plus proche + contacts)
async fn get_nearest(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NearestView>, StatusCode> {
    let emergency = app.emergency(&id).ok_or(StatusCode::NOT_FOUND)?;
    let node = find_nearest(emergency.location, &app.nodes).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(NearestView {
        emergency_id: emergency.id.clone(),
        node: node.clone(),
        contacts: node.contacts.clone().unwrap_or_default(),
    }))
}

// POST /emergencies/{id}/navigate (sélection + itinéraire)
async fn navigate(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteSnapshot>, StatusCode> {
    let destination = app.emergency(&id).ok_or(StatusCode::NOT_FOUND)?.location;
    // sélection et requête changent ensemble
    with_locked(&app.selected, |selected| {
        *selected = Some(id.clone());
        app.tracker.navigate(destination);
    });
    info!("[http] navigating to emergency {id}");
    Ok(Json(app.tracker.snapshot()))
}

// GET /route (état courant)
async fn get_route(State(app): State<AppState>) -> Json<RouteSnapshot> {
    Json(app.tracker.snapshot())
}

// DELETE /route (efface destination et sélection)
async fn clear_route(State(app): State<AppState>) -> Json<RouteSnapshot> {
    with_locked(&app.selected, |selected| {
        *selected = None;
        app.tracker.clear();
    });
    Json(app.tracker.snapshot())
}

// GET /map (vue carte dérivée)
async fn get_map(State(app): State<AppState>) -> Json<MapView> {
    // sélection et état lus ensemble
    let (selected_id, state) = with_locked(&app.selected, |selected| (selected.clone(), app.tracker.state()));
    Json(build_map_view(MapInput {
        conf: &app.map,
        nodes: &app.nodes,
        emergencies: &app.emergencies,
        selected: selected_id.as_deref().and_then(|id| app.emergency(id)),
        origin: app.tracker.origin(),
        state: &state,
    }))
}

// GET /metrics (données figées)
async fn get_metrics() -> Json<crate::metrics::MetricsDashboard> {
    Json(crate::metrics::dashboard())
}
