/**
 * DEVICE REGISTRY - Lecture du registre d'appareils distant
 *
 * RÔLE : Récupère la liste des appareils enregistrés (GET /registeredDevices)
 * et la convertit en nœuds capteurs pour la carte du réseau.
 *
 * UTILITÉ : Optionnel. Chargé une fois au démarrage ; en cas d'échec le kernel
 * garde les fixtures.
 */

use crate::config::KernelConfig;
use crate::fixtures;
use crate::health::HealthTracker;
use crate::models::{Contact, GeoPoint, NodeStatus, SensorKind, SensorNode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("device registry unavailable: {0}")]
    Unavailable(String),
    #[error("malformed device registry response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDevice {
    pub id: String,
    pub device_id: String,
    pub device_name: String,
    #[serde(default)]
    pub list_to_be_notified: Vec<NotifiedPerson>,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub online: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifiedPerson {
    pub name: String,
    pub phone_number: String,
}

impl From<RegisteredDevice> for SensorNode {
    fn from(d: RegisteredDevice) -> Self {
        let contacts = d
            .list_to_be_notified
            .into_iter()
            .map(|p| Contact { name: p.name, role: None, phone: Some(p.phone_number), email: None })
            .collect();
        SensorNode {
            id: d.id,
            name: d.device_name,
            location: GeoPoint::new(d.latitude, d.longitude),
            status: if d.online { NodeStatus::Online } else { NodeStatus::Offline },
            // le registre ne fournit ni batterie, ni type, ni région
            battery_level: 100,
            last_ping: "2023-06-01T00:00:00.000Z".into(),
            region: "arusha".into(),
            install_date: "2023-06-01T00:00:00.000Z".into(),
            kind: SensorKind::Smoke,
            contacts: Some(contacts),
        }
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    api_url: String,
}

impl RegistryClient {
    pub fn new(api_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("firewatch-kernel")
            .build()?;
        Ok(Self { http, api_url: api_url.trim_end_matches('/').to_string() })
    }

    pub async fn fetch_devices(&self) -> Result<Vec<SensorNode>, RegistryError> {
        let url = format!("{}/registeredDevices", self.api_url);
        debug!("[registry] GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RegistryError::Unavailable(format!("registry answered {}", response.status())));
        }

        let body = response.bytes().await.map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        let devices: Vec<RegisteredDevice> =
            serde_json::from_slice(&body).map_err(|e| RegistryError::Malformed(e.to_string()))?;

        info!("[registry] fetched {} devices", devices.len());
        Ok(devices.into_iter().map(SensorNode::from).collect())
    }
}

/// Nœuds du registre si configuré et joignable, sinon fixtures.
pub async fn load_nodes(cfg: &KernelConfig, health: &HealthTracker) -> Vec<SensorNode> {
    let Some(registry) = &cfg.registry else {
        info!("[kernel] no device registry configured, using fixture nodes");
        return fixtures::sensor_nodes();
    };

    let fetched = match RegistryClient::new(&registry.api_url) {
        Ok(client) => client.fetch_devices().await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    match fetched {
        Ok(nodes) => {
            health.mark_registry_loaded();
            nodes
        }
        Err(e) => {
            warn!("[kernel] device registry failed, using fixture nodes: {e}");
            health.mark_registry_failed();
            fixtures::sensor_nodes()
        }
    }
}
