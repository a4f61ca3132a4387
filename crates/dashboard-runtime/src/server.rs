//! HTTP/JSON surface of the dashboard.
//!
//! Endpoints:
//! - `GET /api/health`: liveness check
//! - `GET /api/years`: picker options and the default selection
//! - `GET /api/labels`: page title, picker prompt and chart labels
//! - `GET /api/figures?years=2022,2023`: the five chart specifications

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use dashboard_core::labels::ChartLabels;
use dashboard_core::models::YearSelection;
use dashboard_core::Result;
use dashboard_data::figures::DashboardFigures;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::service::{DashboardService, YearOptions};

/// Bind `host:port` and serve the dashboard API until the process exits.
///
/// When `port` is 0 the OS picks one; the bound port is always logged.
pub async fn serve(service: DashboardService, host: &str, port: u16) -> Result<()> {
    let app = router(service);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(host = %bound.ip(), port = bound.port(), "dashboard API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(service: DashboardService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/years", get(years))
        .route("/api/labels", get(labels))
        .route("/api/figures", get(figures))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn years(State(service): State<DashboardService>) -> Json<YearOptions> {
    Json(service.options())
}

async fn labels(State(service): State<DashboardService>) -> Json<ChartLabels> {
    Json(service.labels().clone())
}

#[derive(Debug, Default, Deserialize)]
struct FiguresQuery {
    years: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

async fn figures(
    State(service): State<DashboardService>,
    Query(query): Query<FiguresQuery>,
) -> std::result::Result<Json<DashboardFigures>, (StatusCode, Json<ErrorBody>)> {
    let selection = match query.years.as_deref().map(str::trim) {
        None | Some("") => service.default_selection().clone(),
        Some(list) => YearSelection::parse_list(list).map_err(|e| {
            warn!(years = list, error = %e, "rejected figures request");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
        })?,
    };

    Ok(Json(service.update(&selection)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use chrono::NaiveDate;
    use dashboard_core::models::{Dataset, Ticket, YearCutoff};
    use http::Request;
    use tower::ServiceExt;

    fn ticket(y: i32, m: u32, d: u32, amount: f64, customer: &str) -> Ticket {
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Ticket::new(
            Some(customer.to_string()),
            Some(format!("{customer}{y}{m}{d}")),
            date,
            amount,
        )
    }

    fn app() -> Router {
        let dataset = Dataset::from_tickets(vec![
            ticket(2022, 1, 10, 100.0, "A"),
            ticket(2022, 2, 15, 50.0, "A"),
            ticket(2023, 4, 2, 25.0, "B"),
            ticket(2023, 10, 2, 75.0, "B"),
        ]);
        let service = DashboardService::new(
            Arc::new(dataset),
            Some(YearCutoff::default()),
            ChartLabels::spanish(),
        );
        router(service)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_years_lists_options_and_default() {
        let (status, json) = get_json("/api/years").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["options"], serde_json::json!(["2022", "2023"]));
        assert_eq!(json["default"], serde_json::json!(["2023"]));
    }

    #[tokio::test]
    async fn test_labels_are_localised() {
        let (status, json) = get_json("/api/labels").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["page_title"], "Dashboard Interactivo - Análisis de Clientes");
        assert_eq!(json["picker_prompt"], "Selecciona uno o más años:");
    }

    #[tokio::test]
    async fn test_figures_for_explicit_selection() {
        let (status, json) = get_json("/api/figures?years=2022").await;
        assert_eq!(status, StatusCode::OK);

        let spend = &json["monthly_spend"];
        assert_eq!(spend["kind"], "bar");
        assert_eq!(spend["title"], "Valor total de compras por mes en 2022");
        let points = spend["series"][0]["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["x"], 1);
        assert_eq!(points[0]["y"], 100.0);

        let volume = json["ticket_volume"]["series"][0]["points"]
            .as_array()
            .unwrap();
        assert_eq!(volume[0]["x"], "2022-01-01");
        assert_eq!(volume[1]["x"], "2022-02-01");
    }

    #[tokio::test]
    async fn test_figures_default_selection_applies_cutoff() {
        let (status, json) = get_json("/api/figures").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["average_ticket"]["title"],
            "Ticket medio por cliente en 2023"
        );
        let points = json["monthly_spend"]["series"][0]["points"]
            .as_array()
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["x"], 4);
    }

    #[tokio::test]
    async fn test_figures_blank_years_uses_default() {
        let (status, json) = get_json("/api/figures?years=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["purchase_frequency"]["title"],
            "Frecuencia de compra por cliente en 2023"
        );
    }

    #[tokio::test]
    async fn test_figures_disjoint_selection_is_blank() {
        let (status, json) = get_json("/api/figures?years=1999").await;
        assert_eq!(status, StatusCode::OK);
        for key in [
            "monthly_spend",
            "average_ticket",
            "purchase_frequency",
            "yearly_comparison",
            "ticket_volume",
        ] {
            assert!(json[key]["kind"].is_null());
            assert_eq!(json[key]["series"], serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn test_figures_rejects_malformed_years() {
        let (status, json) = get_json("/api/figures?years=20x2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid year selection: 20x2");
    }

    #[tokio::test]
    async fn test_serve_binds_ephemeral_port() {
        let dataset = Dataset::from_tickets(vec![ticket(2022, 1, 1, 1.0, "A")]);
        let service = DashboardService::new(Arc::new(dataset), None, ChartLabels::spanish());
        let handle = tokio::spawn(async move { serve(service, "127.0.0.1", 0).await });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
