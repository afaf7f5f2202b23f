pub mod chart;
pub mod domain;
pub mod generate;
pub mod notify;
pub mod predict;
pub mod time;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub frontend_dir: Option<String>,
        pub predict_delay_ms: Option<u64>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                frontend_dir: std::env::var("FRONTEND_DIR").ok(),
                predict_delay_ms: std::env::var("PREDICT_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok()),
            })
        }
    }
}
