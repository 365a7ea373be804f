//! Modèle filaire de la réponse OSRM et validation.
//!
//! Tous les champs sont optionnels côté désérialisation ; `validate` décide
//! ensuite de ce qui est requis. Les coordonnées arrivent en `[lon, lat]`.

use super::{Maneuver, RouteError, RouteResult, Step};
use crate::models::GeoPoint;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: Option<OsrmGeometry>,
    // Value : un champ non numérique ne doit pas rejeter toute la réponse
    pub distance: Option<Value>,
    pub duration: Option<Value>,
    pub legs: Option<Vec<OsrmLeg>>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmLeg {
    pub steps: Option<Vec<OsrmStep>>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmStep {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub name: Option<String>,
    pub maneuver: Option<OsrmManeuver>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmManeuver {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modifier: Option<String>,
}

impl From<OsrmStep> for Step {
    fn from(s: OsrmStep) -> Self {
        let (kind, modifier) = match s.maneuver {
            Some(m) => (m.kind.unwrap_or_default(), m.modifier),
            None => (String::new(), None),
        };
        Step {
            maneuver: Maneuver { kind, modifier },
            name: s.name.unwrap_or_default(),
            distance: s.distance,
            duration: s.duration,
        }
    }
}

/// Désérialise puis valide un corps de réponse brut.
pub fn parse_route(body: &[u8]) -> Result<RouteResult, RouteError> {
    let response: OsrmResponse = serde_json::from_slice(body)
        .map_err(|e| RouteError::MalformedResponse(e.to_string()))?;
    validate(response)
}

pub fn validate(response: OsrmResponse) -> Result<RouteResult, RouteError> {
    let Some(route) = response.routes.and_then(|r| r.into_iter().next()) else {
        return Err(RouteError::NoRouteFound);
    };

    let coordinates = route
        .geometry
        .and_then(|g| g.coordinates)
        .ok_or_else(|| RouteError::MalformedResponse("route has no geometry coordinates".into()))?;

    let geometry = coordinates
        .iter()
        .enumerate()
        .map(|(i, pair)| match pair.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint::new(*lat, *lon)),
            _ => Err(RouteError::MalformedResponse(format!("coordinate {i} is not a [lon, lat] pair"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // les deux ou aucun : 0 reste une valeur valide
    let (distance, duration) = match (
        route.distance.as_ref().and_then(Value::as_f64),
        route.duration.as_ref().and_then(Value::as_f64),
    ) {
        (Some(d), Some(t)) => (Some(d), Some(t)),
        _ => (None, None),
    };

    let steps = route
        .legs
        .and_then(|legs| legs.into_iter().next())
        .and_then(|leg| leg.steps)
        .unwrap_or_default()
        .into_iter()
        .map(Step::from)
        .collect();

    Ok(RouteResult { geometry, distance, duration, steps })
}
