/*!
Test Harness pour le kernel Firewatch

Facilite l'écriture de tests avec:
- Démarrage des stubs (service d'itinéraires + registre d'appareils)
- Expectations sur les requêtes d'itinéraires reçues
- Attente active bornée sur l'arrivée des requêtes
*/

use crate::registry_stub::RegistryStub;
use crate::routing_stub::RoutingStub;
use std::collections::HashMap;
use std::time::Duration;
use anyhow::Result;
use serde::Serialize;

/// Harness de test complet : stubs externes + expectations
pub struct TestHarness {
    pub routing: RoutingStub,
    pub registry: RegistryStub,
    expectations: Vec<Expectation>,
}

#[derive(Debug)]
struct Expectation {
    /// Destination `lon,lat` telle qu'elle apparaît sur le fil
    destination: String,
    expected_count: usize,
}

impl TestHarness {
    /// Crée un harness avec des stubs démarrés
    pub async fn start() -> Result<Self> {
        env_logger::try_init().ok(); // Init logging pour tests

        Ok(Self {
            routing: RoutingStub::start().await?,
            registry: RegistryStub::start().await?,
            expectations: Vec::new(),
        })
    }

    /// On s'attend à N requêtes d'itinéraire vers la destination (lat, lon)
    pub fn expect_route_requests(&mut self, lat: f64, lon: f64, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            destination: format!("{},{}", lon, lat),
            expected_count: count,
        });
        self
    }

    /// Attend qu'au moins `count` requêtes aient été reçues
    pub async fn wait_for_requests(&self, count: usize, timeout_ms: u64) -> Result<()> {
        let start = std::time::Instant::now();

        while start.elapsed() < Duration::from_millis(timeout_ms) {
            if self.routing.requests().len() >= count {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        log::warn!("⏰ Timeout waiting for {} route requests", count);
        anyhow::bail!("expected {} route requests, got {}", count, self.routing.requests().len());
    }

    /// Vérifie toutes les expectations configurées
    pub fn verify_expectations(&self) -> Result<()> {
        log::info!("🔍 Verifying {} expectations...", self.expectations.len());

        let stats = self.get_stats();
        log::debug!("stats: {}", serde_json::to_string(&stats).unwrap_or_default());
        for expectation in &self.expectations {
            let actual = stats.destination_counts.get(&expectation.destination).copied().unwrap_or(0);
            if actual != expectation.expected_count {
                anyhow::bail!(
                    "destination {}: expected {} requests, got {}",
                    expectation.destination, expectation.expected_count, actual
                );
            }
        }
        Ok(())
    }

    pub fn get_stats(&self) -> TestStats {
        let requests = self.routing.requests();
        let mut destination_counts = HashMap::new();
        for req in &requests {
            *destination_counts.entry(req.destination.clone()).or_insert(0) += 1;
        }
        TestStats {
            total_requests: requests.len(),
            destination_counts,
            registry_hits: self.registry.hits(),
        }
    }

    /// Reset le harness pour un nouveau test
    pub fn reset(&mut self) {
        self.routing.clear();
        self.expectations.clear();
        log::info!("🧹 Test harness reset");
    }
}

#[derive(Debug, Serialize)]
pub struct TestStats {
    pub total_requests: usize,
    pub destination_counts: HashMap<String, usize>,
    pub registry_hits: usize,
}
