pub mod alarms;
pub mod chart;
pub mod devices;
pub mod health;
pub mod ingest;
mod rate_limit;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use rate_limit::{PushSourceKeyExtractor, SOURCE_ID_HEADER};

use crate::common::AppState;

/// Largest accepted push body
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::status,
        chart::get_chart,
        chart::get_series,
        chart::list_samples,
        devices::list_devices,
        devices::get_device,
        devices::get_overview,
        ingest::post_snapshots,
        alarms::list_alarms,
        alarms::alarm_stream,
    ),
    components(
        schemas(
            health::StatusResponse,
            chart::ChartResponse,
            chart::ChartDataset,
            chart::SeriesResponse,
            chart::SampleResponse,
            devices::DeviceResponse,
            devices::OverviewResponse,
            ingest::IngestResponse,
            alarms::AlarmResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and upstream connection status"),
        (name = "chart", description = "Rolling chart window and risk projections"),
        (name = "devices", description = "Latest device readings and status overview"),
        (name = "ingest", description = "Push ingestion of device batches"),
        (name = "alarms", description = "Alarm log and live alarm stream"),
    ),
    info(
        title = "Firewatch API",
        description = "Real-time fire-alarm sensor dashboard backend",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let ingest_base = Router::new().route("/snapshots", post(ingest::post_snapshots));

    let ingest_routes = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        ingest_base
    } else {
        let per_second = config.rate_limit_ingest_per_second.max(1);
        let burst = config.rate_limit_ingest_burst.max(1);

        match GovernorConfigBuilder::default()
            .key_extractor(PushSourceKeyExtractor {
                trust_source_header: config.trust_source_id_header,
            })
            .per_second(per_second)
            .burst_size(burst)
            .finish()
        {
            Some(limiter) => {
                tracing::info!(
                    ingest_rate = %format!("{per_second}/s burst {burst}"),
                    trust_source_header = config.trust_source_id_header,
                    "Rate limiting configured"
                );
                ingest_base.layer(GovernorLayer {
                    config: Arc::new(limiter),
                })
            }
            None => {
                tracing::warn!(per_second, burst, "Invalid rate limit settings, ingest is unlimited");
                ingest_base
            }
        }
    }
    .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let read_routes = Router::new()
        .route("/status", get(health::status))
        .route("/chart", get(chart::get_chart))
        .route("/series/{field}", get(chart::get_series))
        .route("/samples", get(chart::list_samples))
        .route("/devices", get(devices::list_devices))
        .route("/devices/{device_id}", get(devices::get_device))
        .route("/overview", get(devices::get_overview))
        .route("/alarms", get(alarms::list_alarms))
        .route("/alarms/stream", get(alarms::alarm_stream));

    let api_routes = Router::new().merge(read_routes).merge(ingest_routes);

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
