//! Données figées de la page métriques (aucun calcul historique).

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub houses_saved: u32,
    pub people_rescued: u32,
    pub avg_fire_response_min: f32,
    pub avg_flood_response_min: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RescuedMonth {
    pub month: &'static str,
    pub houses: u32,
    pub people: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseTimeMonth {
    pub month: &'static str,
    pub fire: f32,
    pub flood: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentTypeCount {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDashboard {
    pub summary: Summary,
    pub rescued: Vec<RescuedMonth>,
    pub response_time: Vec<ResponseTimeMonth>,
    pub incident_types: Vec<IncidentTypeCount>,
}

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

const RESCUED: [(u32, u32); 12] = [
    (45, 120), (52, 140), (49, 130), (62, 170), (55, 150), (71, 190),
    (58, 160), (63, 180), (60, 170), (66, 185), (53, 145), (48, 130),
];

const RESPONSE_TIME: [(f32, f32); 12] = [
    (8.2, 12.5), (7.9, 11.8), (8.1, 12.2), (7.7, 11.5), (7.8, 11.9), (7.5, 11.2),
    (7.6, 11.4), (7.4, 11.0), (7.3, 10.8), (7.2, 10.7), (7.5, 11.3), (7.8, 11.7),
];

const INCIDENT_TYPES: [(&str, u32); 8] = [
    ("Residential Fire", 280),
    ("Commercial Fire", 150),
    ("Industrial Fire", 80),
    ("Vehicle Fire", 120),
    ("Flash Flood", 90),
    ("River Flood", 70),
    ("Urban Flood", 110),
    ("Other", 50),
];

pub fn dashboard() -> MetricsDashboard {
    MetricsDashboard {
        summary: Summary {
            houses_saved: 682,
            people_rescued: 1870,
            avg_fire_response_min: 7.6,
            avg_flood_response_min: 11.5,
        },
        rescued: MONTHS
            .iter()
            .zip(RESCUED)
            .map(|(&month, (houses, people))| RescuedMonth { month, houses, people })
            .collect(),
        response_time: MONTHS
            .iter()
            .zip(RESPONSE_TIME)
            .map(|(&month, (fire, flood))| ResponseTimeMonth { month, fire, flood })
            .collect(),
        incident_types: INCIDENT_TYPES
            .iter()
            .map(|&(kind, count)| IncidentTypeCount { kind, count })
            .collect(),
    }
}
