use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use crate::models::{NodeStatus, SensorNode};
use crate::tracker::{RouteStatus, RouteTracker};

#[derive(Debug, Serialize)]
pub struct KernelHealth {
    pub uptime_seconds: u64,
    pub nodes_tracked: u32,
    pub nodes_online: u32,
    pub emergencies_active: u32,
    pub node_source: String,       // fixture, registry
    pub registry_failures: u32,
    pub route_status: RouteStatus,
    pub memory_usage_mb: f32,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
    registry_failures: Arc<AtomicU32>,
    node_source: Arc<parking_lot::Mutex<String>>,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            registry_failures: Arc::new(AtomicU32::new(0)),
            node_source: Arc::new(parking_lot::Mutex::new("fixture".to_string())),
        }
    }

    pub fn mark_registry_loaded(&self) {
        *self.node_source.lock() = "registry".to_string();
    }

    pub fn mark_registry_failed(&self) {
        self.registry_failures.fetch_add(1, Ordering::Relaxed);
        *self.node_source.lock() = "fixture".to_string();
    }

    pub fn get_health(&self, nodes: &[SensorNode], emergencies: usize, tracker: &RouteTracker) -> KernelHealth {
        KernelHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            nodes_tracked: nodes.len() as u32,
            nodes_online: nodes.iter().filter(|n| n.status == NodeStatus::Online).count() as u32,
            emergencies_active: emergencies as u32,
            node_source: self.node_source.lock().clone(),
            registry_failures: self.registry_failures.load(Ordering::Relaxed),
            route_status: tracker.snapshot().status,
            memory_usage_mb: get_memory_usage_mb(),
        }
    }
}

fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        let pid = std::process::id();
        if let Ok(status) = std::fs::read_to_string(format!("/proc/{}/status", pid)) {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    if let Some(kb) = line.split_whitespace().nth(1).and_then(|s| s.parse::<u64>().ok()) {
                        return (kb as f32) / 1024.0; // KB -> MB
                    }
                }
            }
        }
    }

    0.0
}
