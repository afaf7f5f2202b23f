use crate::domain::series::PricePoint;
use serde::{Deserialize, Serialize};

/// Headline numbers shown next to the chart, derived once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub current_price: f64,
    pub predicted_price: f64,
    pub absolute_change: f64,
    pub percent_change: f64,
    /// Decorative: uniform in [70, 95], unrelated to the series.
    pub confidence: f64,
}

impl PredictionSummary {
    /// Derives the summary from the last historical and last predicted point.
    ///
    /// Returns `None` when there is no historical point to anchor on. A
    /// prediction window fully consumed by a weekend produces no points; the
    /// summary then reports the current price unchanged.
    pub fn derive(
        historical: &[PricePoint],
        predicted: &[PricePoint],
        confidence: f64,
    ) -> Option<Self> {
        let current_price = historical.last()?.price;
        let predicted_price = predicted.last().map_or(current_price, |p| p.price);
        let absolute_change = predicted_price - current_price;
        let percent_change = absolute_change / current_price * 100.0;
        Some(Self {
            current_price,
            predicted_price,
            absolute_change,
            percent_change,
            confidence,
        })
    }
}
