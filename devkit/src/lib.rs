/*!
# Firewatch DevKit - Stubs et Utilitaires pour Développement

Bibliothèque facilitant le développement et les tests du kernel Firewatch:
- Stub du service d'itinéraires (OSRM) sans accès réseau
- Stub du registre d'appareils
- Builders de réponses conformes aux formats externes
- Harness de test avec expectations
*/

pub mod routing_stub;
pub mod registry_stub;
pub mod response_builders;
pub mod test_utils;

pub use routing_stub::{RecordedRequest, RouteStub, RoutingStub};
pub use registry_stub::RegistryStub;
pub use response_builders::{OsrmResponseBuilder, RegisteredDeviceBuilder};
pub use test_utils::TestHarness;
