// IFTA Calculator - Web Server
// REST API with Axum: upload CSV text, get the quarterly report back

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ifta_calc::{
    all_rates, to_csv_string, FilingBatch, FilingReport, IftaError, TaxRate, DEFAULT_EXPORT_FILENAME,
};

#[derive(Parser)]
#[command(name = "ifta-server", version, about = "HTTP API for IFTA quarterly summaries")]
struct Args {
    /// Address to bind
    #[arg(long, env = "IFTA_SERVER_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Request body: raw CSV text of every upload, one string per file
#[derive(Deserialize)]
struct CalculateRequest {
    #[serde(default)]
    fuel: Vec<String>,
    #[serde(default)]
    mileage: Vec<String>,
}

impl CalculateRequest {
    fn into_batch(self) -> FilingBatch {
        let mut batch = FilingBatch::new();
        for (i, text) in self.fuel.iter().enumerate() {
            batch.add_fuel_text(&format!("fuel-{}", i + 1), text);
        }
        for (i, text) in self.mileage.iter().enumerate() {
            batch.add_mileage_text(&format!("mileage-{}", i + 1), text);
        }
        batch
    }
}

fn status_for(err: &IftaError) -> StatusCode {
    match err {
        IftaError::NoSources { .. } | IftaError::NoFuelData | IftaError::NoMileageData => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IftaError::Io { .. } | IftaError::Write { .. } | IftaError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/rates - The fuel tax rate table
async fn get_rates() -> impl IntoResponse {
    Json(ApiResponse::<Vec<TaxRate>>::ok(all_rates()))
}

/// POST /api/calculate - Full filing report
async fn post_calculate(Json(request): Json<CalculateRequest>) -> Response {
    let batch = request.into_batch();

    match batch.calculate() {
        Ok(report) => {
            info!(run_id = %report.run_id, rows = report.result.rows.len(), "calculated report");
            (StatusCode::OK, Json(ApiResponse::ok(report))).into_response()
        }
        Err(e) => {
            error!("Error calculating report: {}", e);
            (status_for(&e), Json(ApiResponse::<FilingReport>::err(e.to_string()))).into_response()
        }
    }
}

/// POST /api/export - CSV summary download
async fn post_export(Json(request): Json<CalculateRequest>) -> Response {
    let batch = request.into_batch();

    let csv = batch
        .calculate()
        .and_then(|report| to_csv_string(&report.result));

    match csv {
        Ok(text) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DEFAULT_EXPORT_FILENAME),
                ),
            ],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Error exporting summary: {}", e);
            (status_for(&e), Json(ApiResponse::<String>::err(e.to_string()))).into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/rates", get(get_rates))
        .route("/calculate", post(post_calculate))
        .route("/export", post(post_export));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", args.addr, e))?;

    info!("🚀 IFTA server running on http://{}", args.addr);
    info!("   API: http://{}/api/calculate", args.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
