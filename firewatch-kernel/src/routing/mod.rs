/**
 * ROUTING - Itinéraire routier agence → urgence
 *
 * RÔLE :
 * Interroge un service d'itinéraires compatible OSRM, valide la réponse
 * et la convertit en `RouteResult` (géométrie lat/lon, distance, durée, étapes).
 *
 * FONCTIONNEMENT :
 * - GET /route/v1/{profile}/{lon,lat};{lon,lat}?overview=full&geometries=geojson&steps=true
 * - Réponse désérialisée dans un modèle typé (wire) puis validée
 * - Une seule tentative, annulable via `CancelSignal`
 */

pub mod cancel;
pub mod client;
pub mod wire;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use client::RoutingClient;

use crate::models::GeoPoint;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub maneuver: Maneuver,
    pub name: String,
    pub distance: Option<f64>,  // mètres
    pub duration: Option<f64>,  // secondes
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub geometry: Vec<GeoPoint>,
    /// Mètres. `None` = inconnu, distinct de 0.
    pub distance: Option<f64>,
    /// Secondes. `None` = inconnu, distinct de 0.
    pub duration: Option<f64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("route request cancelled")]
    Cancelled,
    #[error("routing service returned no route")]
    NoRouteFound,
    #[error("routing service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteErrorKind {
    Cancelled,
    NoRouteFound,
    ServiceUnavailable,
    MalformedResponse,
}

impl RouteError {
    pub fn kind(&self) -> RouteErrorKind {
        match self {
            RouteError::Cancelled => RouteErrorKind::Cancelled,
            RouteError::NoRouteFound => RouteErrorKind::NoRouteFound,
            RouteError::ServiceUnavailable(_) => RouteErrorKind::ServiceUnavailable,
            RouteError::MalformedResponse(_) => RouteErrorKind::MalformedResponse,
        }
    }
}
