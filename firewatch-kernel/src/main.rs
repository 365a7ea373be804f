/**
 * FIREWATCH KERNEL - Point d'entrée principal du serveur Firewatch
 *
 * RÔLE : Orchestration de tous les modules : config, registre d'appareils,
 * itinéraires, health, HTTP. Bootstrap du système avec gestion d'erreurs et logging.
 *
 * ARCHITECTURE : API REST + tracker d'itinéraire à écrivain unique + service OSRM externe.
 * UTILITÉ : Backend du tableau de bord urgences/capteurs.
 */

mod config;
mod fixtures;
mod health;
mod http;
mod map;
mod metrics;
mod models;
mod nearest;
mod registry;
mod routing;
mod state;
mod tracker;

use crate::config::load_config;
use crate::health::HealthTracker;
use crate::http::AppState;
use crate::registry::load_nodes;
use crate::routing::RoutingClient;
use crate::state::new_state;
use crate::tracker::RouteTracker;

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok(); // Ok si .env n'existe pas

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config().await;

    // health tracker
    let health_tracker = HealthTracker::new();

    // nœuds capteurs (immuables pour la session)
    let nodes = load_nodes(&cfg, &health_tracker).await;
    info!("[kernel] tracking {} sensor nodes", nodes.len());

    let emergencies = fixtures::emergencies();
    info!("[kernel] {} active emergencies", emergencies.len());

    // itinéraires : origine = agence
    let routing = RoutingClient::new(&cfg.routing).context("failed to build routing client")?;
    let tracker = RouteTracker::new(routing, cfg.map.agency);
    info!("[kernel] routing via {} ({})", cfg.routing.base_url, cfg.routing.profile);

    // fabrique l'état unique pour Axum
    let app_state = AppState {
        nodes: Arc::new(nodes),
        emergencies: Arc::new(emergencies),
        selected: new_state(None),
        tracker,
        map: cfg.map.clone(),
        health_tracker,
    };

    // HTTP
    let app = http::build_router(app_state);

    let addr: SocketAddr = cfg.listen.parse().with_context(|| format!("invalid listen address {}", cfg.listen))?;
    info!("[kernel] listening on http://{addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
