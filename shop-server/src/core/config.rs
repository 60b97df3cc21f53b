/// Server configuration: everything the shop backend reads at startup
///
/// # Environment variables
///
/// All settings can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/shop | Working directory (database, logs) |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Log verbosity |
/// | SCHEDULER_INTERVAL_SECS | 30 | Delivery scheduler tick interval |
/// | SCHEDULER_PAGE_SIZE | 20 | Orders advanced per batch page |
/// | MIN_STAGE_AGE_SECS | 3600 | Minimum time an order spends in PAID / IN_TRANSIT before the scheduler advances it |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/shop SCHEDULER_INTERVAL_SECS=10 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database file and logs
    pub work_dir: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log verbosity passed to the tracing subscriber
    pub log_level: String,
    /// Delivery scheduler tick interval in seconds
    pub scheduler_interval_secs: u64,
    /// Orders fetched and advanced per scheduler page
    pub scheduler_page_size: u32,
    /// Minimum age (seconds) in the current stage before advancement
    pub min_stage_age_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/shop".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            scheduler_interval_secs: std::env::var("SCHEDULER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            scheduler_page_size: std::env::var("SCHEDULER_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            min_stage_age_secs: std::env::var("MIN_STAGE_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    /// Path of the SQLite database file inside the working directory
    pub fn database_path(&self) -> String {
        format!("{}/shop.db", self.work_dir)
    }

    /// True when running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
