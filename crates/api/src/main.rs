use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use stockvision_core::chart::ChartPresenter;
use stockvision_core::notify::{Notification, NotificationCenter, NotificationKind};
use stockvision_core::predict::{self, PredictError, PredictionOutcome, PredictionRequest};

// Simulated round-trip before the pipeline runs, matching the demo page's
// fake API latency. Overridable via PREDICT_DELAY_MS.
const DEFAULT_PREDICT_DELAY_MS: u64 = 1500;

const DEFAULT_FRONTEND_DIR: &str = "frontend";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stockvision_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState {
        presenter: Arc::new(Mutex::new(ChartPresenter::default())),
        notifications: Arc::new(Mutex::new(NotificationCenter::new())),
        predict_delay: Duration::from_millis(
            settings.predict_delay_ms.unwrap_or(DEFAULT_PREDICT_DELAY_MS),
        ),
    };

    let frontend_dir = PathBuf::from(
        settings
            .frontend_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_FRONTEND_DIR.to_string()),
    );

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/predict", post(post_predict))
        .route("/chart.svg", get(get_chart))
        .route("/tickers", get(get_tickers))
        .route("/notifications", get(get_notifications))
        .route("/notifications/:id", delete(delete_notification))
        .with_state(state)
        .fallback_service(ServeDir::new(frontend_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    presenter: Arc<Mutex<ChartPresenter>>,
    notifications: Arc<Mutex<NotificationCenter>>,
    predict_delay: Duration,
}

impl AppState {
    async fn notify(&self, kind: NotificationKind, message: &str) {
        self.notifications
            .lock()
            .await
            .push(kind, message, Utc::now());
    }

    /// Turns a pipeline error into the HTTP reply and the matching banner.
    async fn reject(&self, err: PredictError) -> ApiError {
        let status = match &err {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::EmptyRange => StatusCode::NOT_FOUND,
        };
        let message = err.to_string();
        self.notify(NotificationKind::Error, &message).await;
        ApiError { status, message }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Raw form payload; every field is checked for presence so a half-filled
/// form gets the single "fill in all fields" banner instead of a serde error.
#[derive(Debug, Deserialize)]
struct PredictBody {
    ticker: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    prediction_days: Option<u32>,
}

fn parse_request(body: &PredictBody) -> Result<PredictionRequest, PredictError> {
    let (Some(ticker), Some(start), Some(end), Some(days)) = (
        body.ticker.as_deref(),
        body.start_date.as_deref(),
        body.end_date.as_deref(),
        body.prediction_days,
    ) else {
        return Err(PredictError::Validation(
            "Please fill in all fields".to_string(),
        ));
    };

    if ticker.trim().is_empty() || start.trim().is_empty() || end.trim().is_empty() {
        return Err(PredictError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }

    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .map_err(|_| PredictError::Validation(format!("Invalid start date: {start}")))?;
    let end_date = NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .map_err(|_| PredictError::Validation(format!("Invalid end date: {end}")))?;

    Ok(PredictionRequest {
        ticker: ticker.to_string(),
        start_date,
        end_date,
        horizon_days: days,
    })
}

async fn post_predict(
    State(state): State<AppState>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let req = match parse_request(&body) {
        Ok(req) => req,
        Err(err) => return Err(state.reject(err).await),
    };

    tokio::time::sleep(state.predict_delay).await;

    // ThreadRng is not Send; keep it out of scope before the next await.
    let result = {
        let mut rng = rand::thread_rng();
        predict::run(&req, &mut rng)
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => return Err(state.reject(err).await),
    };

    {
        let mut presenter = state.presenter.lock().await;
        if let Err(err) =
            presenter.render(&outcome.ticker, &outcome.historical, &outcome.predicted)
        {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "chart render failed");
            return Err(ApiError::internal());
        }
    }

    state
        .notify(NotificationKind::Success, "Prediction completed successfully!")
        .await;

    tracing::info!(
        ticker = %outcome.ticker,
        historical_len = outcome.historical.len(),
        predicted_len = outcome.predicted.len(),
        "prediction rendered"
    );

    Ok(Json(outcome))
}

async fn get_chart(State(state): State<AppState>) -> Response {
    let presenter = state.presenter.lock().await;
    match presenter.chart() {
        Some(chart) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            chart.svg.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "No chart has been rendered yet".to_string(),
            }),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
struct Ticker {
    symbol: &'static str,
    name: &'static str,
}

async fn get_tickers() -> Json<Vec<Ticker>> {
    let tickers = [
        ("AAPL", "Apple Inc."),
        ("MSFT", "Microsoft Corporation"),
        ("GOOGL", "Alphabet Inc."),
        ("AMZN", "Amazon.com Inc."),
        ("TSLA", "Tesla Inc."),
        ("META", "Meta Platforms Inc."),
        ("NVDA", "NVIDIA Corporation"),
        ("JPM", "JPMorgan Chase & Co."),
    ]
    .into_iter()
    .map(|(symbol, name)| Ticker { symbol, name })
    .collect();
    Json(tickers)
}

async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    let mut center = state.notifications.lock().await;
    Json(center.active(Utc::now()).to_vec())
}

async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.notifications.lock().await.dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(
    settings: &stockvision_core::config::Settings,
) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
