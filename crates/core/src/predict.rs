use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::series::PricePoint;
use crate::domain::summary::PredictionSummary;
use crate::generate;

/// A fully parsed prediction request, decoupled from whatever surface
/// (HTTP form, CLI flags) produced it.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Calendar days; weekend days inside the window count against it but
    /// produce no points.
    pub horizon_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub ticker: String,
    pub historical: Vec<PricePoint>,
    pub predicted: Vec<PricePoint>,
    pub summary: PredictionSummary,
}

#[derive(Debug, Error)]
pub enum PredictError {
    /// Rejected input; nothing was generated.
    #[error("{0}")]
    Validation(String),
    /// The requested range contains no trading days.
    #[error("No trading days in the requested date range")]
    EmptyRange,
}

pub fn validate(req: &PredictionRequest) -> Result<(), PredictError> {
    if req.ticker.trim().is_empty() {
        return Err(PredictError::Validation(
            "Ticker must be non-empty".to_string(),
        ));
    }
    if req.start_date >= req.end_date {
        return Err(PredictError::Validation(
            "Start date must be before end date".to_string(),
        ));
    }
    if req.horizon_days < 1 {
        return Err(PredictError::Validation(
            "Prediction horizon must be at least 1 day".to_string(),
        ));
    }
    Ok(())
}

/// Runs the whole mock pipeline for one request: validate, walk the
/// historical range, continue the walk over the horizon, derive the summary.
pub fn run(
    req: &PredictionRequest,
    rng: &mut impl Rng,
) -> Result<PredictionOutcome, PredictError> {
    validate(req)?;

    let historical = generate::historical(req.start_date, req.end_date, rng);
    let last = historical.last().cloned().ok_or(PredictError::EmptyRange)?;
    let predicted = generate::prediction(&last, req.horizon_days, rng);

    let confidence = generate::confidence(rng);
    let summary = PredictionSummary::derive(&historical, &predicted, confidence)
        .ok_or(PredictError::EmptyRange)?;

    tracing::debug!(
        ticker = %req.ticker,
        historical_len = historical.len(),
        predicted_len = predicted.len(),
        "generated mock prediction"
    );

    Ok(PredictionOutcome {
        ticker: req.ticker.trim().to_string(),
        historical,
        predicted,
        summary,
    })
}
