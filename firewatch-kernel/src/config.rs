use crate::fixtures::{AGENCY_LOCATION, DEFAULT_CENTER};
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KernelConfig {
    pub listen: String,
    pub map: MapConf,
    pub routing: RoutingConf,
    pub registry: Option<RegistryConf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MapConf {
    pub agency: GeoPoint,        // origine de tous les itinéraires
    pub default_center: GeoPoint,
    pub default_zoom: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RoutingConf {
    pub base_url: String,        // ex: "https://router.project-osrm.org"
    pub profile: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegistryConf {
    pub api_url: String,         // GET {api_url}/registeredDevices
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
            map: MapConf::default(),
            routing: RoutingConf::default(),
            registry: None,
        }
    }
}

impl Default for MapConf {
    fn default() -> Self {
        Self { agency: AGENCY_LOCATION, default_center: DEFAULT_CENTER, default_zoom: 13 }
    }
}

impl Default for RoutingConf {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".into(),
            profile: "driving".into(),
            timeout_secs: 10,
        }
    }
}

pub fn parse_config(txt: &str) -> KernelConfig {
    if txt.trim().is_empty() { return KernelConfig::default(); }
    serde_yaml::from_str(txt).unwrap_or_else(|e| {
        warn!("[kernel] invalid config: {e}");
        KernelConfig::default()
    })
}

pub async fn load_config_from(path: &Path) -> KernelConfig {
    if path.exists() {
        let txt = fs::read_to_string(path).await.unwrap_or_default();
        parse_config(&txt)
    } else {
        warn!("[kernel] no {} found, using default config", path.display());
        KernelConfig::default()
    }
}

/// Fichier désigné par FIREWATCH_KERNEL_CONFIG (défaut `kernel.yaml`),
/// puis surcharges FIREWATCH_ROUTING_URL / FIREWATCH_REGISTRY_URL.
pub async fn load_config() -> KernelConfig {
    let path = std::env::var("FIREWATCH_KERNEL_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    let mut cfg = load_config_from(Path::new(&path)).await;
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    cfg
}

fn apply_env_overrides(cfg: &mut KernelConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("FIREWATCH_ROUTING_URL").filter(|v| !v.is_empty()) {
        cfg.routing.base_url = url;
    }
    if let Some(url) = var("FIREWATCH_REGISTRY_URL").filter(|v| !v.is_empty()) {
        cfg.registry = Some(RegistryConf { api_url: url });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_text_gives_defaults() {
        let cfg = parse_config("  \n");
        assert_eq!(cfg.listen, "0.0.0.0:8080");
        assert_eq!(cfg.routing.profile, "driving");
        assert_eq!(cfg.map.agency, AGENCY_LOCATION);
        assert!(cfg.registry.is_none());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = parse_config(
            "routing:\n  base_url: http://127.0.0.1:5000\nregistry:\n  api_url: http://10.0.0.2:3000\n",
        );
        assert_eq!(cfg.routing.base_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.routing.timeout_secs, 10);
        assert_eq!(cfg.registry.unwrap().api_url, "http://10.0.0.2:3000");
        assert_eq!(cfg.map.default_zoom, 13);
    }

    #[test]
    fn invalid_yaml_falls_back() {
        let cfg = parse_config("listen: [unterminated");
        assert_eq!(cfg.listen, "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kernel.yaml");
        std::fs::write(&path, "listen: 127.0.0.1:9090\nmap:\n  agency: [-3.36, 36.68]\n").unwrap();

        let cfg = load_config_from(&path).await;
        assert_eq!(cfg.listen, "127.0.0.1:9090");
        assert_eq!(cfg.map.agency, GeoPoint::new(-3.36, 36.68));

        let missing = load_config_from(&dir.path().join("nope.yaml")).await;
        assert_eq!(missing.listen, "0.0.0.0:8080");
    }

    #[test]
    fn env_overrides_win() {
        let mut cfg = KernelConfig::default();
        apply_env_overrides(&mut cfg, |key| match key {
            "FIREWATCH_ROUTING_URL" => Some("http://osrm.local".into()),
            "FIREWATCH_REGISTRY_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.routing.base_url, "http://osrm.local");
        assert!(cfg.registry.is_none());
    }
}
