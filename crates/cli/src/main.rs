use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockvision_core::chart::ChartPresenter;
use stockvision_core::predict::{self, PredictionRequest};
use stockvision_core::time::business_days::default_lookback_range;

#[derive(Debug, Parser)]
#[command(name = "stockvision_cli")]
struct Args {
    /// Ticker symbol to simulate.
    #[arg(long, default_value = "AAPL")]
    ticker: String,

    /// Range start (YYYY-MM-DD). Defaults to one month before today.
    #[arg(long)]
    start_date: Option<String>,

    /// Range end (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end_date: Option<String>,

    /// Prediction horizon in calendar days.
    #[arg(long, default_value_t = 7)]
    horizon_days: u32,

    /// Where the rendered chart is written.
    #[arg(long, default_value = "chart.svg")]
    out: std::path::PathBuf,

    /// Seed for the random source; omit for a fresh path each run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stockvision_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let (default_start, default_end) = default_lookback_range(chrono::Utc::now());
    let start_date = resolve_date(args.start_date.as_deref(), default_start)?;
    let end_date = resolve_date(args.end_date.as_deref(), default_end)?;

    let request = PredictionRequest {
        ticker: args.ticker.clone(),
        start_date,
        end_date,
        horizon_days: args.horizon_days,
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let outcome = match predict::run(&request, &mut rng) {
        Ok(outcome) => outcome,
        Err(err) => {
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "prediction request rejected");
            return Err(err);
        }
    };

    let mut presenter = ChartPresenter::default();
    let chart = presenter.render(&outcome.ticker, &outcome.historical, &outcome.predicted)?;
    std::fs::write(&args.out, chart.svg.as_bytes())
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    let summary = &outcome.summary;
    tracing::info!(
        ticker = %outcome.ticker,
        historical_len = outcome.historical.len(),
        predicted_len = outcome.predicted.len(),
        current_price = summary.current_price,
        predicted_price = summary.predicted_price,
        absolute_change = summary.absolute_change,
        percent_change = summary.percent_change,
        confidence = summary.confidence,
        chart = %args.out.display(),
        "prediction complete"
    );

    Ok(())
}

fn resolve_date(arg: Option<&str>, default: chrono::NaiveDate) -> anyhow::Result<chrono::NaiveDate> {
    match arg {
        Some(s) => Ok(chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?),
        None => Ok(default),
    }
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
