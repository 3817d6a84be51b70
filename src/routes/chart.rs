use axum::{
    extract::{Path, Query, State},
    http::{
        header::{self, HeaderMap, HeaderValue},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::series::{AggregatedSample, ChartProjection, ChartView, SensorField};

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChartQuery {
    /// Chart view: combined (default), temperature, smoke, flame, humidity, light
    pub view: Option<String>,
    /// Response format: json (default), csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartDataset {
    pub label: String,
    /// One value per label
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChartResponse {
    pub view: String,
    pub title: String,
    pub unit_label: String,
    pub axis_max: f64,
    /// Wall-clock labels, oldest first
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartResponse {
    fn new(view: ChartView, projection: ChartProjection) -> Self {
        let axis = view.axis();
        let (labels, datasets) = match projection {
            ChartProjection::Combined { labels, risk } => {
                let to_f64 =
                    |scores: Vec<u8>| -> Vec<f64> { scores.into_iter().map(f64::from).collect() };
                let datasets = vec![
                    ChartDataset {
                        label: "Temperature (%)".to_string(),
                        values: to_f64(risk.temperature),
                    },
                    ChartDataset {
                        label: "Smoke (%)".to_string(),
                        values: to_f64(risk.smoke),
                    },
                    ChartDataset {
                        label: "Flame risk (%)".to_string(),
                        values: to_f64(risk.flame),
                    },
                ];
                (labels, datasets)
            }
            ChartProjection::Raw { labels, values, .. } => (
                labels,
                vec![ChartDataset {
                    label: axis.unit_label.to_string(),
                    values,
                }],
            ),
        };

        Self {
            view: view.to_string(),
            title: axis.title.to_string(),
            unit_label: axis.unit_label.to_string(),
            axis_max: axis.max,
            labels,
            datasets,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesResponse {
    pub field: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SampleResponse {
    pub label: String,
    pub avg_temperature_c: f64,
    pub avg_humidity_pct: f64,
    pub avg_smoke: f64,
    pub avg_flame_raw: f64,
    pub avg_light: f64,
    /// Devices that contributed to the averages
    pub contributors: usize,
}

impl From<AggregatedSample> for SampleResponse {
    fn from(s: AggregatedSample) -> Self {
        Self {
            label: s.label,
            avg_temperature_c: s.avg_temperature_c,
            avg_humidity_pct: s.avg_humidity_pct,
            avg_smoke: s.avg_smoke,
            avg_flame_raw: s.avg_flame_raw,
            avg_light: s.avg_light,
            contributors: s.contributors,
        }
    }
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> String {
    // Query parameter takes precedence
    if query_format != "json" {
        return query_format.to_lowercase();
    }

    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
        && accept_str.contains("text/csv")
    {
        return "csv".to_string();
    }

    "json".to_string()
}

fn build_csv_response(chart: &ChartResponse) -> AppResult<Response> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header_row = vec!["time".to_string()];
    header_row.extend(chart.datasets.iter().map(|d| d.label.clone()));
    writer
        .write_record(&header_row)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    for (i, label) in chart.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        for dataset in &chart.datasets {
            row.push(dataset.values.get(i).map(ToString::to_string).unwrap_or_default());
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Get chart data for a view
///
/// The combined view returns temperature, smoke and flame risk scores on a
/// shared 0-100 axis. Every other view returns one channel in raw units.
/// Switching views never alters the stored samples.
#[utoipa::path(
    get,
    path = "/api/chart",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart data retrieved successfully", body = ChartResponse),
        (status = 400, description = "Unknown view or format"),
    ),
    tag = "chart"
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let view = match query.view.as_deref() {
        Some(v) => v.parse::<ChartView>()?,
        None => ChartView::default(),
    };

    let format = determine_format(&query.format, &headers);
    if format != "json" && format != "csv" {
        return Err(AppError::BadRequest(format!(
            "Invalid format: {format}. Must be one of: json, csv"
        )));
    }

    let projection = state.dashboard.read().await.aggregator().project(view);
    let chart = ChartResponse::new(view, projection);

    if format == "csv" {
        build_csv_response(&chart)
    } else {
        Ok(Json(chart).into_response())
    }
}

/// Get the raw series of one sensor field
#[utoipa::path(
    get,
    path = "/api/series/{field}",
    params(
        ("field" = String, Path, description = "Sensor field: temperature, humidity, smoke, flame, light"),
    ),
    responses(
        (status = 200, description = "Series retrieved successfully", body = SeriesResponse),
        (status = 400, description = "Unknown sensor field"),
    ),
    tag = "chart"
)]
pub async fn get_series(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> AppResult<Json<SeriesResponse>> {
    let field: SensorField = field.parse()?;

    let dashboard = state.dashboard.read().await;
    let aggregator = dashboard.aggregator();

    Ok(Json(SeriesResponse {
        field: field.to_string(),
        labels: aggregator.labels(),
        values: aggregator.raw_series(field),
    }))
}

/// List every aggregated sample in the window, oldest first
#[utoipa::path(
    get,
    path = "/api/samples",
    responses(
        (status = 200, description = "Samples retrieved successfully", body = Vec<SampleResponse>),
    ),
    tag = "chart"
)]
pub async fn list_samples(State(state): State<AppState>) -> Json<Vec<SampleResponse>> {
    let samples = state.dashboard.read().await.aggregator().samples();
    Json(samples.into_iter().map(SampleResponse::from).collect())
}
