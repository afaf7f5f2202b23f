use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;

use crate::domain::series::PricePoint;

// The page's two fixed series colors: indigo for history, green for the
// predicted continuation.
const HISTORICAL_COLOR: RGBColor = RGBColor(94, 114, 228);
const PREDICTED_COLOR: RGBColor = RGBColor(45, 206, 137);

const DEFAULT_WIDTH: u32 = 960;
const DEFAULT_HEIGHT: u32 = 540;

/// The one visualization that is live at any given time.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub ticker: String,
    pub svg: String,
    pub rendered_at: DateTime<Utc>,
}

/// Owns the live chart. `render` always tears the previous chart down before
/// drawing its replacement, so at most one is ever live.
#[derive(Debug)]
pub struct ChartPresenter {
    width: u32,
    height: u32,
    rendered: Option<RenderedChart>,
}

impl Default for ChartPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartPresenter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rendered: None,
        }
    }

    pub fn chart(&self) -> Option<&RenderedChart> {
        self.rendered.as_ref()
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }

    /// Draws historical + predicted points as one ordered sequence and makes
    /// it the live chart. Correct only because predicted dates start after the
    /// last historical date.
    pub fn render(
        &mut self,
        ticker: &str,
        historical: &[PricePoint],
        predicted: &[PricePoint],
    ) -> anyhow::Result<&RenderedChart> {
        self.rendered = None;
        let svg = draw_svg(ticker, historical, predicted, self.width, self.height)?;
        Ok(self.rendered.insert(RenderedChart {
            ticker: ticker.to_string(),
            svg,
            rendered_at: Utc::now(),
        }))
    }
}

fn draw_svg(
    ticker: &str,
    historical: &[PricePoint],
    predicted: &[PricePoint],
    width: u32,
    height: u32,
) -> anyhow::Result<String> {
    let points: Vec<PricePoint> = historical.iter().chain(predicted).cloned().collect();
    anyhow::ensure!(!points.is_empty(), "cannot render a chart with no points");

    let min_price = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = points
        .iter()
        .map(|p| p.price)
        .fold(f64::NEG_INFINITY, f64::max);

    // Pad the price axis so the line does not hug the frame.
    let price_range = (max_price - min_price).max(1e-8);
    let padding = price_range * 0.1;
    let y_min = (min_price - padding).max(0.0);
    let y_max = max_price + padding;

    let x_min = points[0].date;
    let mut x_max = points[points.len() - 1].date;
    if x_min == x_max {
        // A single point needs a non-degenerate date axis.
        x_max += Duration::days(1);
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("failed to fill canvas: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{ticker} Stock Price"),
                ("sans-serif", 32.0).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("failed to build chart: {e}"))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price (USD)")
            .draw()
            .map_err(|e| anyhow!("failed to draw mesh: {e}"))?;

        // Per-point styling keyed on the predicted flag, so the forecast leg
        // changes color at the splice.
        for i in 0..points.len() {
            let color = point_color(&points[i]);
            if i > 0 {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![
                            (points[i - 1].date, points[i - 1].price),
                            (points[i].date, points[i].price),
                        ],
                        color,
                    )))
                    .map_err(|e| anyhow!("failed to draw line: {e}"))?;
            }
            chart
                .draw_series(std::iter::once(Circle::new(
                    (points[i].date, points[i].price),
                    3,
                    color.filled(),
                )))
                .map_err(|e| anyhow!("failed to draw point: {e}"))?;
        }

        root.present()
            .map_err(|e| anyhow!("failed to render chart: {e}"))?;
    }

    Ok(svg)
}

fn point_color(point: &PricePoint) -> RGBColor {
    if point.predicted {
        PREDICTED_COLOR
    } else {
        HISTORICAL_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, price: f64, predicted: bool) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            predicted,
        }
    }

    #[test]
    fn render_produces_a_live_svg_chart() {
        let mut presenter = ChartPresenter::default();
        assert!(!presenter.is_rendered());

        let historical = vec![point(1, 100.0, false), point(2, 102.0, false)];
        let predicted = vec![point(3, 104.0, true)];
        let chart = presenter.render("AAPL", &historical, &predicted).unwrap();

        assert_eq!(chart.ticker, "AAPL");
        assert!(chart.svg.contains("<svg"));
        assert!(presenter.is_rendered());
    }

    #[test]
    fn rendering_twice_replaces_the_previous_chart() {
        let mut presenter = ChartPresenter::default();
        let series = vec![point(1, 100.0, false), point(2, 102.0, false)];

        presenter.render("AAPL", &series, &[]).unwrap();
        presenter.render("TSLA", &series, &[]).unwrap();

        let live = presenter.chart().unwrap();
        assert_eq!(live.ticker, "TSLA");
    }

    #[test]
    fn a_single_point_still_renders() {
        let mut presenter = ChartPresenter::default();
        let historical = vec![point(5, 150.0, false)];
        assert!(presenter.render("NVDA", &historical, &[]).is_ok());
    }

    #[test]
    fn empty_series_is_an_error() {
        let mut presenter = ChartPresenter::default();
        assert!(presenter.render("AAPL", &[], &[]).is_err());
        assert!(!presenter.is_rendered());
    }
}
