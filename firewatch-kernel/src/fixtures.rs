/**
 * FIXTURES - Données statiques de la session (Arusha)
 *
 * RÔLE : Nœuds capteurs, urgences actives et position de l'agence utilisés
 * quand aucun registre d'appareils n'est configuré ou joignable.
 */

use crate::models::{Contact, Emergency, EmergencyKind, GeoPoint, NodeStatus, SensorKind, SensorNode, Severity};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Arusha Fire & Rescue Agency (approximative)
pub const AGENCY_LOCATION: GeoPoint = GeoPoint::new(-3.3675, 36.6825);

/// Centre par défaut de la carte (Clock Tower)
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(-3.3667, 36.6833);

fn contact(name: &str, role: &str, phone: &str, email: &str) -> Contact {
    Contact {
        name: name.into(),
        role: Some(role.into()),
        phone: Some(phone.into()),
        email: Some(email.into()),
    }
}

fn node(id: &str, name: &str, location: GeoPoint, battery: u8, region: &str, kind: SensorKind, owner: Contact, now: &str) -> SensorNode {
    SensorNode {
        id: id.into(),
        name: name.into(),
        location,
        status: NodeStatus::Online,
        battery_level: battery,
        last_ping: now.to_string(),
        region: region.into(),
        install_date: "2025-01-15".into(),
        kind,
        contacts: Some(vec![owner]),
    }
}

pub fn sensor_nodes() -> Vec<SensorNode> {
    let now = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    vec![
        node("node-01", "Clock Tower", GeoPoint::new(-3.3667, 36.6833), 85, "Arusha CBD", SensorKind::Combined,
             contact("John M", "Station Officer", "+255 27 254 xxxx", "john.m@arushafire.go.tz"), &now),
        node("node-02", "Sheikh Amri Abeid Stadium", GeoPoint::new(-3.3739, 36.6911), 92, "Arusha", SensorKind::Heat,
             contact("Asha K", "Field Officer", "+255 27 254 yyyy", "asha.k@arushafire.go.tz"), &now),
        node("node-03", "Central Market", GeoPoint::new(-3.3698, 36.6878), 78, "Arusha CBD", SensorKind::Smoke,
             contact("Peter L", "Contact", "+255 27 254 zzzz", "peter.l@arushafire.go.tz"), &now),
        node("node-04", "Arusha Technical College", GeoPoint::new(-3.3611, 36.6911), 95, "Arusha", SensorKind::Combined,
             contact("Sara N", "Liaison", "+255 27 254 aaaa", "sara.n@arushafire.go.tz"), &now),
        node("node-05", "Arusha Declaration Museum", GeoPoint::new(-3.3728, 36.6856), 88, "Arusha", SensorKind::Combined,
             contact("Michael B", "Curator", "+255 27 254 bbbb", "michael.b@arushafire.go.tz"), &now),
    ]
}

pub fn emergencies() -> Vec<Emergency> {
    vec![
        Emergency {
            id: "emg-01".into(),
            location: GeoPoint::new(-3.3739, 36.6911),
            title: "Fire Alert at Sheikh Amri Abeid Stadium".into(),
            kind: EmergencyKind::Fire,
            severity: Severity::High,
            address: "Sheikh Amri Abeid Stadium, Arusha".into(),
        },
        Emergency {
            id: "emg-02".into(),
            location: GeoPoint::new(-3.3698, 36.6878),
            title: "Fire Detection at Central Market".into(),
            kind: EmergencyKind::Fire,
            severity: Severity::Critical,
            address: "Central Market Area, Arusha CBD".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nearest::find_nearest;

    #[test]
    fn every_emergency_sits_on_a_node() {
        let nodes = sensor_nodes();
        let expected = [("emg-01", "node-02"), ("emg-02", "node-03")];
        for (emg, node_id) in expected {
            let e = emergencies().into_iter().find(|e| e.id == emg).unwrap();
            assert_eq!(find_nearest(e.location, &nodes).unwrap().id, node_id);
        }
    }

    #[test]
    fn fixture_nodes_have_contacts() {
        assert!(sensor_nodes().iter().all(|n| n.contacts.as_ref().is_some_and(|c| !c.is_empty())));
    }
}
