//! Recherche du nœud capteur le plus proche d'un point.
//!
//! Distance euclidienne au carré dans l'espace des degrés (lat/lon bruts).
//! Approximation planaire connue : valable pour une zone régionale restreinte
//! (une ville), pas pour des distances continentales.

use crate::models::{GeoPoint, SensorNode};

fn squared_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = b.lat - a.lat;
    let d_lon = b.lon - a.lon;
    d_lat * d_lat + d_lon * d_lon
}

/// Nœud de score minimal ; à égalité le premier rencontré gagne.
/// `None` si la liste est vide.
pub fn find_nearest(point: GeoPoint, nodes: &[SensorNode]) -> Option<&SensorNode> {
    let mut best: Option<(&SensorNode, f64)> = None;
    for node in nodes {
        let score = squared_distance(point, node.location);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((node, score)),
        }
    }
    best.map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeStatus, SensorKind};

    fn node_at(id: &str, lat: f64, lon: f64) -> SensorNode {
        SensorNode {
            id: id.into(),
            name: id.into(),
            location: GeoPoint::new(lat, lon),
            status: NodeStatus::Online,
            battery_level: 100,
            last_ping: String::new(),
            region: "arusha".into(),
            install_date: String::new(),
            kind: SensorKind::Smoke,
            contacts: None,
        }
    }

    #[test]
    fn empty_list_yields_none() {
        assert!(find_nearest(GeoPoint::new(-3.37, 36.68), &[]).is_none());
    }

    #[test]
    fn closer_node_wins_regardless_of_order() {
        let q = GeoPoint::new(-3.3700, 36.6880);
        let near = node_at("near", -3.3698, 36.6878);
        let far = node_at("far", -3.3611, 36.6911);

        let forward = vec![near.clone(), far.clone()];
        let backward = vec![far, near];
        assert_eq!(find_nearest(q, &forward).unwrap().id, "near");
        assert_eq!(find_nearest(q, &backward).unwrap().id, "near");
    }

    #[test]
    fn first_minimum_wins_on_ties() {
        let q = GeoPoint::new(0.0, 0.0);
        let nodes = vec![node_at("a", 1.0, 1.0), node_at("b", 1.0, 1.0), node_at("c", -1.0, -1.0)];
        assert_eq!(find_nearest(q, &nodes).unwrap().id, "a");
    }

    #[test]
    fn result_is_member_of_input() {
        let nodes: Vec<SensorNode> = (0..20)
            .map(|i| node_at(&format!("n{i}"), -3.0 - i as f64 * 0.01, 36.0 + (i % 7) as f64 * 0.02))
            .collect();
        for q in [GeoPoint::new(-3.1, 36.05), GeoPoint::new(10.0, -20.0), GeoPoint::new(-3.19, 36.12)] {
            let found = find_nearest(q, &nodes).unwrap();
            assert!(nodes.iter().any(|n| std::ptr::eq(n, found)));
            let best = nodes.iter().map(|n| squared_distance(q, n.location)).fold(f64::INFINITY, f64::min);
            assert_eq!(squared_distance(q, found.location), best);
        }
    }
}
