//! Optional Prometheus middleware exposing `/metrics`.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

const METRICS_NAMESPACE: &str = "recipes";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build request metrics, or `None` when registration fails.
pub(crate) fn build_metrics() -> Option<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint(METRICS_ENDPOINT)
        .build()
        .inspect_err(|error| warn!(%error, "metrics disabled"))
        .ok()
}

/// Wraps the app in [`PrometheusMetrics`] when configured, otherwise only
/// boxes the response body so both branches share one type.
#[derive(Clone)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
            return Box::pin(async move { Ok(boxed::service(svc)) });
        };
        let fut = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(fut.await?)) })
    }
}
