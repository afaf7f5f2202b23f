use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::domain::series::PricePoint;
use crate::time::business_days::is_weekend;

// Opening price is drawn uniformly from [MIN, MIN + SPAN).
const INITIAL_PRICE_MIN: f64 = 100.0;
const INITIAL_PRICE_SPAN: f64 = 100.0;

// Daily move is (U(0,1) - offset) * span. The prediction walk drifts upward
// harder than the historical walk so the demo skews optimistic.
const DAILY_MOVE_SPAN: f64 = 5.0;
const HISTORICAL_DRIFT_OFFSET: f64 = 0.48;
const PREDICTED_DRIFT_OFFSET: f64 = 0.45;

const CONFIDENCE_MIN: f64 = 70.0;
const CONFIDENCE_SPAN: f64 = 25.0;

/// Random-walk daily closes for every weekday in `[start, end]` inclusive.
///
/// A range with no weekdays yields an empty series; callers decide how to
/// surface that (`predict::run` turns it into an error).
pub fn historical(start: NaiveDate, end: NaiveDate, rng: &mut impl Rng) -> Vec<PricePoint> {
    let mut price = INITIAL_PRICE_MIN + rng.gen::<f64>() * INITIAL_PRICE_SPAN;
    let mut out = Vec::new();
    let mut day = start;
    while day <= end {
        if !is_weekend(day) {
            price += (rng.gen::<f64>() - HISTORICAL_DRIFT_OFFSET) * DAILY_MOVE_SPAN;
            out.push(PricePoint {
                date: day,
                price,
                predicted: false,
            });
        }
        day += Duration::days(1);
    }
    out
}

/// Continues the walk from the last historical point for `horizon_days`
/// calendar days. Weekend days consume the horizon but produce no point, so
/// the output length is at most `horizon_days`.
pub fn prediction(last: &PricePoint, horizon_days: u32, rng: &mut impl Rng) -> Vec<PricePoint> {
    let mut price = last.price;
    let mut out = Vec::new();
    for i in 1..=i64::from(horizon_days) {
        let day = last.date + Duration::days(i);
        if is_weekend(day) {
            continue;
        }
        price += (rng.gen::<f64>() - PREDICTED_DRIFT_OFFSET) * DAILY_MOVE_SPAN;
        out.push(PricePoint {
            date: day,
            price,
            predicted: true,
        });
    }
    out
}

/// Display-only confidence percentage, uniform in [70, 95].
pub fn confidence(rng: &mut impl Rng) -> f64 {
    CONFIDENCE_MIN + rng.gen::<f64>() * CONFIDENCE_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::business_days::weekdays_in_range;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn historical_covers_exactly_the_weekdays() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);
        let series = historical(start, end, &mut rng);

        let dates: Vec<_> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, weekdays_in_range(start, end));
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert!(series.iter().all(|p| !p.predicted));
    }

    #[test]
    fn historical_is_reproducible_for_a_fixed_seed() {
        let a = historical(date(2024, 1, 1), date(2024, 1, 12), &mut StdRng::seed_from_u64(42));
        let b = historical(date(2024, 1, 1), date(2024, 1, 12), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn historical_weekend_only_range_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(historical(date(2024, 1, 6), date(2024, 1, 7), &mut rng).is_empty());
    }

    #[test]
    fn prediction_stays_after_history_and_within_horizon() {
        let mut rng = StdRng::seed_from_u64(7);
        let history = historical(date(2024, 1, 1), date(2024, 1, 10), &mut rng);
        let last = history.last().unwrap();

        let predicted = prediction(last, 10, &mut rng);
        assert!(!predicted.is_empty());
        assert!(predicted.len() <= 10);
        assert!(predicted.iter().all(|p| p.date > last.date));
        assert!(predicted.iter().all(|p| p.predicted));
        assert!(predicted.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn weekend_days_consume_the_horizon_without_producing_points() {
        // History ends Friday 2024-01-05. A three-day horizon spends Saturday
        // and Sunday and yields a single point for Monday the 8th.
        let last = PricePoint {
            date: date(2024, 1, 5),
            price: 150.0,
            predicted: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let predicted = prediction(&last, 3, &mut rng);

        let dates: Vec<_> = predicted.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 8)]);
    }

    #[test]
    fn horizon_landing_entirely_on_a_weekend_yields_nothing() {
        let last = PricePoint {
            date: date(2024, 1, 5),
            price: 150.0,
            predicted: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert!(prediction(&last, 2, &mut rng).is_empty());
    }

    #[test]
    fn confidence_stays_in_display_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = confidence(&mut rng);
            assert!((70.0..=95.0).contains(&c), "confidence out of range: {c}");
        }
    }
}
