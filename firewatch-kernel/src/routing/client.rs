use super::{wire, CancelSignal, RouteError, RouteResult};
use crate::config::RoutingConf;
use crate::models::GeoPoint;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl RoutingClient {
    pub fn new(conf: &RoutingConf) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(conf.timeout_secs))
            .user_agent("firewatch-kernel")
            .build()?;
        Ok(Self {
            http,
            base_url: conf.base_url.trim_end_matches('/').to_string(),
            profile: conf.profile.clone(),
        })
    }

    /// Coordonnées en `lon,lat` sur le fil, origine puis destination.
    pub fn route_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url, self.profile, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }

    /// Une seule tentative. Retourne `Cancelled` dès que le signal se déclenche,
    /// avant ou pendant la requête.
    pub async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mut cancel: CancelSignal,
    ) -> Result<RouteResult, RouteError> {
        if cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RouteError::Cancelled),
            result = self.request(origin, destination) => result,
        }
    }

    async fn request(&self, origin: GeoPoint, destination: GeoPoint) -> Result<RouteResult, RouteError> {
        let url = self.route_url(origin, destination);
        debug!("[routing] GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RouteError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::ServiceUnavailable(format!("routing service answered {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RouteError::ServiceUnavailable(e.to_string()))?;
        wire::parse_route(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::cancel_pair;
    use firewatch_devkit::{OsrmResponseBuilder, RouteStub, RoutingStub};
    use std::time::Duration;

    fn client_for(base_url: &str) -> RoutingClient {
        RoutingClient::new(&RoutingConf { base_url: base_url.into(), profile: "driving".into(), timeout_secs: 5 }).unwrap()
    }

    const AGENCY: GeoPoint = GeoPoint::new(-3.3675, 36.6825);
    const STADIUM: GeoPoint = GeoPoint::new(-3.3739, 36.6911);

    #[test]
    fn url_is_lon_first_origin_first() {
        let client = client_for("http://osrm.local/");
        assert_eq!(
            client.route_url(AGENCY, STADIUM),
            "http://osrm.local/route/v1/driving/36.6825,-3.3675;36.6911,-3.3739?overview=full&geometries=geojson&steps=true"
        );
    }

    #[tokio::test]
    async fn fetches_and_converts_route() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::json(
            OsrmResponseBuilder::new()
                .coordinates(&[[36.6825, -3.3675], [36.6911, -3.3739]])
                .totals(1350.0, 190.0)
                .step("depart", None, "Boma Road", 300.0, 45.0)
                .build(),
        ));

        let route = client_for(&stub.base_url())
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(route.geometry, vec![AGENCY, STADIUM]);
        assert_eq!(route.distance, Some(1350.0));
        assert_eq!(route.steps.len(), 1);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].coordinates, "36.6825,-3.3675;36.6911,-3.3739");
        assert_eq!(requests[0].query.get("steps").map(String::as_str), Some("true"));
        assert_eq!(requests[0].query.get("geometries").map(String::as_str), Some("geojson"));
    }

    #[tokio::test]
    async fn error_status_is_service_unavailable() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::status(503));
        let err = client_for(&stub.base_url())
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_service_unavailable() {
        // port 9 (discard) : connexion refusée
        let err = client_for("http://127.0.0.1:9")
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::routing::RouteErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::raw("not json at all"));
        let err = client_for(&stub.base_url())
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_routes_is_no_route() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::json(OsrmResponseBuilder::no_route()));
        let err = client_for(&stub.base_url())
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err, RouteError::NoRouteFound);
    }

    #[tokio::test]
    async fn non_numeric_totals_over_http_stay_unset() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::json(
            OsrmResponseBuilder::new()
                .coordinates(&[[36.6825, -3.3675], [36.6911, -3.3739]])
                .raw_totals(serde_json::json!("1.3 km"), serde_json::json!(190.0))
                .build(),
        ));
        let route = client_for(&stub.base_url())
            .fetch_route(AGENCY, STADIUM, CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(route.geometry.len(), 2);
        assert_eq!((route.distance, route.duration), (None, None));
    }

    #[tokio::test]
    async fn cancel_interrupts_slow_request() {
        let stub = RoutingStub::start().await.unwrap();
        stub.set_default(RouteStub::json(OsrmResponseBuilder::new().build()).delayed(Duration::from_secs(5)));

        let client = client_for(&stub.base_url());
        let (handle, signal) = cancel_pair();
        let task = tokio::spawn(async move { client.fetch_route(AGENCY, STADIUM, signal).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        let res = tokio::time::timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
        assert_eq!(res, Err(RouteError::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_skips_request() {
        let stub = RoutingStub::start().await.unwrap();
        let (handle, signal) = cancel_pair();
        handle.cancel();
        let res = client_for(&stub.base_url()).fetch_route(AGENCY, STADIUM, signal).await;
        assert_eq!(res, Err(RouteError::Cancelled));
        assert!(stub.requests().is_empty());
    }
}
