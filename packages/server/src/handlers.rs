//! HTTP handler functions for the quake map API.

use actix_web::{HttpResponse, web};
use quake_map_analytics::{aggregate, aggregate_strict};
use quake_map_dashboard::{Dashboard, LoadReport, PageSnapshot, StaticPage};
use quake_map_server_models::{ApiError, ApiHealth, SummaryQueryParams};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /api/dashboard`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// What happened during the load.
    pub report: LoadReport,
    /// The rendered page.
    pub page: PageSnapshot,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/summary`
///
/// Fetches the earthquake list and returns the three aggregates. With
/// `?strict=true` a single malformed record rejects the batch.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<SummaryQueryParams>,
) -> HttpResponse {
    let records = match state.feed.fetch_earthquakes().await {
        Ok(records) => records,
        Err(e) => {
            log::error!("Error fetching earthquake data: {e}");
            return HttpResponse::BadGateway().json(ApiError::new(e));
        }
    };

    if params.strict.unwrap_or(false) {
        match aggregate_strict(&records) {
            Ok(summary) => HttpResponse::Ok().json(summary),
            Err(e) => HttpResponse::UnprocessableEntity().json(ApiError::new(e)),
        }
    } else {
        HttpResponse::Ok().json(aggregate(&records))
    }
}

/// `GET /api/dashboard`
///
/// Runs a full dashboard load against an in-memory page and returns the
/// load report with the resulting page snapshot.
pub async fn dashboard(state: web::Data<AppState>) -> HttpResponse {
    let mut page = StaticPage::new(state.config.map_view());
    let report = Dashboard::new()
        .load(&mut page, state.feed.as_ref())
        .await;

    let body = ApiDashboard {
        page: page.snapshot(),
        report,
    };

    if body.report.is_loaded() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::BadGateway().json(body)
    }
}
