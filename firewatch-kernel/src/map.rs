//! Vue carte : marqueurs, tracé et cadrage dérivés de l'état courant.

use crate::config::MapConf;
use crate::models::{Emergency, GeoPoint, NodeStatus, SensorNode, Severity};
use crate::nearest::find_nearest;
use crate::tracker::{RouteSnapshot, RouteState};
use serde::Serialize;

/// Zoom appliqué quand une urgence est sélectionnée
pub const FOCUS_ZOOM: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Agency,
    Node,
    Emergency,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub location: GeoPoint,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolylineKind {
    Routed,
    /// Repli quand la destination existe mais sans géométrie
    StraightLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub kind: PolylineKind,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode")]
pub enum Viewport {
    Fit { bounds: Bounds },
    Center { center: GeoPoint, zoom: u8 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub emergency_id: String,
    pub center: GeoPoint,
    pub zoom: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub markers: Vec<Marker>,
    pub polyline: Option<Polyline>,
    pub viewport: Viewport,
    pub focus: Option<Focus>,
    /// Nœud le plus proche de l'urgence sélectionnée (avec ses contacts)
    pub nearest_device: Option<SensorNode>,
    pub route: RouteSnapshot,
}

pub fn bounds(points: &[GeoPoint]) -> Option<Bounds> {
    let first = points.first()?;
    let mut sw = *first;
    let mut ne = *first;
    for p in &points[1..] {
        sw.lat = sw.lat.min(p.lat);
        sw.lon = sw.lon.min(p.lon);
        ne.lat = ne.lat.max(p.lat);
        ne.lon = ne.lon.max(p.lon);
    }
    Some(Bounds { south_west: sw, north_east: ne })
}

pub fn polyline(origin: GeoPoint, state: &RouteState) -> Option<Polyline> {
    if let Some(route) = state.route().filter(|r| !r.geometry.is_empty()) {
        return Some(Polyline { kind: PolylineKind::Routed, points: route.geometry.clone() });
    }
    state
        .destination()
        .map(|dest| Polyline { kind: PolylineKind::StraightLine, points: vec![origin, dest] })
}

pub fn viewport(origin: GeoPoint, state: &RouteState, conf: &MapConf) -> Viewport {
    let framed = match polyline(origin, state) {
        Some(line) => bounds(&line.points),
        None => None,
    };
    match framed {
        Some(bounds) => Viewport::Fit { bounds },
        None => Viewport::Center { center: conf.default_center, zoom: conf.default_zoom },
    }
}

pub struct MapInput<'a> {
    pub conf: &'a MapConf,
    pub nodes: &'a [SensorNode],
    pub emergencies: &'a [Emergency],
    pub selected: Option<&'a Emergency>,
    pub origin: GeoPoint,
    pub state: &'a RouteState,
}

pub fn build_map_view(input: MapInput<'_>) -> MapView {
    let mut markers = Vec::with_capacity(input.nodes.len() + input.emergencies.len() + 1);
    markers.push(Marker {
        id: "agency".into(),
        kind: MarkerKind::Agency,
        location: input.origin,
        label: "Fire & Rescue Agency".into(),
        status: None,
        severity: None,
    });
    markers.extend(input.nodes.iter().map(|n| Marker {
        id: n.id.clone(),
        kind: MarkerKind::Node,
        location: n.location,
        label: n.name.clone(),
        status: Some(n.status),
        severity: None,
    }));
    markers.extend(input.emergencies.iter().map(|e| Marker {
        id: e.id.clone(),
        kind: MarkerKind::Emergency,
        location: e.location,
        label: e.title.clone(),
        status: None,
        severity: Some(e.severity),
    }));

    let focus = input.selected.map(|e| Focus { emergency_id: e.id.clone(), center: e.location, zoom: FOCUS_ZOOM });
    let nearest_device = input
        .selected
        .and_then(|e| find_nearest(e.location, input.nodes))
        .cloned();

    MapView {
        markers,
        polyline: polyline(input.origin, input.state),
        viewport: viewport(input.origin, input.state, input.conf),
        focus,
        nearest_device,
        route: RouteSnapshot::new(input.origin, input.state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::routing::{RouteErrorKind, RouteResult};

    const AGENCY: GeoPoint = GeoPoint::new(-3.3675, 36.6825);
    const DEST: GeoPoint = GeoPoint::new(-3.3739, 36.6911);

    #[test]
    fn idle_has_no_line_and_default_center() {
        let conf = MapConf::default();
        assert!(polyline(AGENCY, &RouteState::Idle).is_none());
        assert_eq!(
            viewport(AGENCY, &RouteState::Idle, &conf),
            Viewport::Center { center: conf.default_center, zoom: 13 }
        );
    }

    #[test]
    fn failed_route_falls_back_to_straight_line() {
        let state = RouteState::Failed {
            destination: DEST,
            error: RouteErrorKind::ServiceUnavailable,
            message: "down".into(),
        };
        let line = polyline(AGENCY, &state).unwrap();
        assert_eq!(line.kind, PolylineKind::StraightLine);
        assert_eq!(line.points, vec![AGENCY, DEST]);

        let loading = RouteState::Loading { destination: DEST };
        assert_eq!(polyline(AGENCY, &loading).unwrap().kind, PolylineKind::StraightLine);
    }

    #[test]
    fn viewport_frames_routed_geometry() {
        let geometry = vec![AGENCY, GeoPoint::new(-3.3800, 36.6700), DEST];
        let state = RouteState::Ready {
            destination: DEST,
            route: RouteResult { geometry, distance: Some(2000.0), duration: Some(300.0), steps: vec![] },
        };
        assert_eq!(polyline(AGENCY, &state).unwrap().kind, PolylineKind::Routed);
        let Viewport::Fit { bounds } = viewport(AGENCY, &state, &MapConf::default()) else {
            panic!("expected a fitted viewport");
        };
        assert_eq!(bounds.south_west, GeoPoint::new(-3.3800, 36.6700));
        assert_eq!(bounds.north_east, GeoPoint::new(-3.3675, 36.6911));
    }

    #[test]
    fn empty_geometry_still_draws_straight_line() {
        let state = RouteState::Ready {
            destination: DEST,
            route: RouteResult { geometry: vec![], distance: None, duration: None, steps: vec![] },
        };
        assert_eq!(polyline(AGENCY, &state).unwrap().kind, PolylineKind::StraightLine);
    }

    #[test]
    fn map_view_focuses_selection_and_nearest_device() {
        let nodes = fixtures::sensor_nodes();
        let emergencies = fixtures::emergencies();
        let conf = MapConf::default();
        let view = build_map_view(MapInput {
            conf: &conf,
            nodes: &nodes,
            emergencies: &emergencies,
            selected: emergencies.iter().find(|e| e.id == "emg-02"),
            origin: AGENCY,
            state: &RouteState::Idle,
        });

        assert_eq!(view.markers.len(), 1 + nodes.len() + emergencies.len());
        let focus = view.focus.as_ref().unwrap();
        assert_eq!(focus.zoom, FOCUS_ZOOM);
        assert_eq!(focus.center, GeoPoint::new(-3.3698, 36.6878));
        assert_eq!(view.nearest_device.as_ref().unwrap().id, "node-03");
        assert!(view.polyline.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["focus"]["emergencyId"], "emg-02");
        assert_eq!(json["nearestDevice"]["batteryLevel"], 78);
        assert!(json.get("nearest_device").is_none());
    }

    #[test]
    fn bounds_use_camel_case_keys() {
        let json = serde_json::to_value(bounds(&[AGENCY, DEST]).unwrap()).unwrap();
        assert_eq!(json["southWest"], serde_json::json!([-3.3739, 36.6825]));
        assert_eq!(json["northEast"], serde_json::json!([-3.3675, 36.6911]));
    }
}
