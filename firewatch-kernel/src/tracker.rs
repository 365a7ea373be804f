/**
 * ROUTE TRACKER - Itinéraire courant (cellule à écrivain unique)
 *
 * RÔLE :
 * Détient le seul "itinéraire courant" du tableau de bord et le publie via un
 * canal `watch`. Toute mutation passe par le protocole annuler-puis-remplacer.
 *
 * FONCTIONNEMENT :
 * - navigate() : génération +1, annule la requête en vol, publie Loading, lance la requête
 * - clear()    : génération +1, annule la requête en vol, publie Idle
 * - settle()   : applique un résultat seulement si sa génération est encore courante ;
 *                une requête annulée ne modifie jamais l'état
 */

use crate::models::GeoPoint;
use crate::routing::{cancel_pair, CancelHandle, RouteError, RouteErrorKind, RouteResult, RoutingClient, Step};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
    /// Aucune destination : pas d'itinéraire, pas d'erreur
    Idle,
    Loading { destination: GeoPoint },
    Ready { destination: GeoPoint, route: RouteResult },
    Failed { destination: GeoPoint, error: RouteErrorKind, message: String },
}

impl RouteState {
    pub fn destination(&self) -> Option<GeoPoint> {
        match self {
            RouteState::Idle => None,
            RouteState::Loading { destination }
            | RouteState::Ready { destination, .. }
            | RouteState::Failed { destination, .. } => Some(*destination),
        }
    }

    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            RouteState::Ready { route, .. } => Some(route),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RouteState::Loading { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Vue à plat de l'état pour l'API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSnapshot {
    pub status: RouteStatus,
    pub origin: GeoPoint,
    pub destination: Option<GeoPoint>,
    pub geometry: Vec<GeoPoint>,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub steps: Vec<Step>,
    pub error: Option<RouteErrorKind>,
    pub message: Option<String>,
}

impl RouteSnapshot {
    pub fn new(origin: GeoPoint, state: &RouteState) -> Self {
        let status = match state {
            RouteState::Idle => RouteStatus::Idle,
            RouteState::Loading { .. } => RouteStatus::Loading,
            RouteState::Ready { .. } => RouteStatus::Ready,
            RouteState::Failed { .. } => RouteStatus::Failed,
        };
        let (error, message) = match state {
            RouteState::Failed { error, message, .. } => (Some(*error), Some(message.clone())),
            _ => (None, None),
        };
        let route = state.route();
        RouteSnapshot {
            status,
            origin,
            destination: state.destination(),
            geometry: route.map(|r| r.geometry.clone()).unwrap_or_default(),
            distance: route.and_then(|r| r.distance),
            duration: route.and_then(|r| r.duration),
            steps: route.map(|r| r.steps.clone()).unwrap_or_default(),
            error,
            message,
        }
    }
}

struct TrackerInner {
    generation: u64,
    pending: Option<CancelHandle>,
}

#[derive(Clone)]
pub struct RouteTracker {
    client: RoutingClient,
    origin: GeoPoint,
    inner: Arc<Mutex<TrackerInner>>,
    state: Arc<watch::Sender<RouteState>>,
}

impl RouteTracker {
    pub fn new(client: RoutingClient, origin: GeoPoint) -> Self {
        let (tx, _rx) = watch::channel(RouteState::Idle);
        Self {
            client,
            origin,
            inner: Arc::new(Mutex::new(TrackerInner { generation: 0, pending: None })),
            state: Arc::new(tx),
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn state(&self) -> RouteState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot::new(self.origin, &self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.state.subscribe()
    }

    /// Lance un itinéraire vers `destination`, en annulant le précédent.
    /// Retourne la génération attribuée à la requête.
    pub fn navigate(&self, destination: GeoPoint) -> u64 {
        let (generation, signal) = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            if let Some(prev) = inner.pending.take() {
                prev.cancel();
                debug!("[route] cancelled request #{}", inner.generation - 1);
            }
            let (handle, signal) = cancel_pair();
            inner.pending = Some(handle);
            self.state.send_replace(RouteState::Loading { destination });
            (inner.generation, signal)
        };

        info!("[route] request #{} to {},{}", generation, destination.lat, destination.lon);

        let tracker = self.clone();
        tokio::spawn(async move {
            let outcome = tracker.client.fetch_route(tracker.origin, destination, signal).await;
            tracker.settle(generation, destination, outcome);
        });
        generation
    }

    /// Efface la destination : annule la requête en vol et revient à Idle.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Some(prev) = inner.pending.take() {
            prev.cancel();
        }
        self.state.send_replace(RouteState::Idle);
        info!("[route] cleared");
    }

    fn settle(&self, generation: u64, destination: GeoPoint, outcome: Result<RouteResult, RouteError>) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!("[route] discarding superseded response #{generation}");
            return false;
        }

        let next = match outcome {
            Err(RouteError::Cancelled) => return false,
            Ok(route) => {
                info!(
                    "[route] request #{generation} ready ({} points, {:?} m)",
                    route.geometry.len(),
                    route.distance
                );
                RouteState::Ready { destination, route }
            }
            Err(e) => {
                warn!("[route] request #{generation} failed: {e}");
                RouteState::Failed { destination, error: e.kind(), message: e.to_string() }
            }
        };

        inner.pending = None;
        self.state.send_replace(next);
        true
    }
}
