/*!
Construction de réponses conformes aux formats externes

- `OsrmResponseBuilder` : corps de réponse du service d'itinéraires
- `RegisteredDeviceBuilder` : enregistrement du registre d'appareils
*/

use serde_json::{json, Map, Value};

/// Corps `{ code, routes: [ { geometry, distance, duration, legs } ] }`
pub struct OsrmResponseBuilder {
    coordinates: Vec<[f64; 2]>,
    distance: Option<Value>,
    duration: Option<Value>,
    steps: Vec<Value>,
}

impl OsrmResponseBuilder {
    pub fn new() -> Self {
        Self { coordinates: Vec::new(), distance: None, duration: None, steps: Vec::new() }
    }

    /// Réponse valide sans aucun itinéraire
    pub fn no_route() -> Value {
        json!({ "code": "Ok", "routes": [] })
    }

    /// Coordonnées au format du service : `[lon, lat]`
    pub fn coordinates(mut self, coords: &[[f64; 2]]) -> Self {
        self.coordinates = coords.to_vec();
        self
    }

    pub fn totals(mut self, distance: f64, duration: f64) -> Self {
        self.distance = Some(json!(distance));
        self.duration = Some(json!(duration));
        self
    }

    /// Valeurs arbitraires (non numériques comprises)
    pub fn raw_totals(mut self, distance: Value, duration: Value) -> Self {
        self.distance = Some(distance);
        self.duration = Some(duration);
        self
    }

    pub fn step(mut self, kind: &str, modifier: Option<&str>, name: &str, distance: f64, duration: f64) -> Self {
        let mut maneuver = Map::new();
        maneuver.insert("type".into(), Value::String(kind.into()));
        if let Some(m) = modifier {
            maneuver.insert("modifier".into(), Value::String(m.into()));
        }
        self.steps.push(json!({
            "distance": distance,
            "duration": duration,
            "name": name,
            "maneuver": maneuver,
        }));
        self
    }

    pub fn build(self) -> Value {
        let mut route = Map::new();
        route.insert("geometry".into(), json!({ "type": "LineString", "coordinates": self.coordinates }));
        if let Some(d) = self.distance {
            route.insert("distance".into(), d);
        }
        if let Some(d) = self.duration {
            route.insert("duration".into(), d);
        }
        if !self.steps.is_empty() {
            route.insert("legs".into(), json!([{ "steps": self.steps }]));
        }
        json!({ "code": "Ok", "routes": [Value::Object(route)] })
    }
}

impl Default for OsrmResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Enregistrement `registeredDevices` (champs camelCase)
pub struct RegisteredDeviceBuilder {
    payload: Map<String, Value>,
    contacts: Vec<Value>,
}

impl RegisteredDeviceBuilder {
    pub fn new(device_id: &str, latitude: f64, longitude: f64) -> Self {
        let mut payload = Map::new();
        payload.insert("id".into(), Value::String(format!("id-{}", device_id)));
        payload.insert("deviceId".into(), Value::String(device_id.into()));
        payload.insert("deviceName".into(), Value::String(device_id.into()));
        payload.insert("userId".into(), Value::String("user-1".into()));
        payload.insert("latitude".into(), json!(latitude));
        payload.insert("longitude".into(), json!(longitude));
        payload.insert("online".into(), Value::Bool(true));
        Self { payload, contacts: Vec::new() }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.payload.insert("deviceName".into(), Value::String(name.into()));
        self
    }

    pub fn online(mut self, online: bool) -> Self {
        self.payload.insert("online".into(), Value::Bool(online));
        self
    }

    pub fn notify(mut self, name: &str, phone: &str) -> Self {
        self.contacts.push(json!({ "name": name, "phoneNumber": phone }));
        self
    }

    pub fn build(mut self) -> Value {
        self.payload.insert("listToBeNotified".into(), Value::Array(self.contacts));
        Value::Object(self.payload)
    }
}
