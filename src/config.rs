use std::env;

/// Signal pipeline settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Length of each aggregation window in calendar days.
    pub window_days: u32,
    /// Trailing observation count for moving average and volatility.
    pub rolling_window: usize,
    /// Number of trees in the random forest.
    pub n_trees: usize,
    /// Maximum tree depth (None = grow until pure).
    pub max_depth: Option<usize>,
    /// Fit each tree on a bootstrap sample of the training rows.
    pub bootstrap: bool,
    /// Seed for bootstrap sampling and feature selection.
    pub seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            rolling_window: 20,
            n_trees: 100,
            max_depth: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Yahoo Finance API base URL.
    pub yahoo_base_url: String,
    /// Timeout for market data requests in seconds (None = transport default).
    pub fetch_timeout_secs: Option<u64>,
    /// Symbol served by the index price endpoint.
    pub index_symbol: String,
    /// Signal pipeline configuration.
    pub signals: SignalConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = SignalConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(5000),
            yahoo_base_url: env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS"),
            index_symbol: env::var("INDEX_SYMBOL").unwrap_or_else(|_| "^NYA".to_string()),
            signals: SignalConfig {
                window_days: parse_var("SIGNAL_WINDOW_DAYS")
                    .filter(|&d| d > 0)
                    .unwrap_or(defaults.window_days),
                rolling_window: parse_var("SIGNAL_ROLLING_WINDOW")
                    .filter(|&w| w > 1)
                    .unwrap_or(defaults.rolling_window),
                n_trees: parse_var("SIGNAL_TREES")
                    .filter(|&n| n > 0)
                    .unwrap_or(defaults.n_trees),
                max_depth: parse_var("SIGNAL_MAX_DEPTH")
                    .filter(|&d| d > 0)
                    .or(defaults.max_depth),
                bootstrap: parse_var("SIGNAL_BOOTSTRAP").unwrap_or(defaults.bootstrap),
                seed: parse_var("SIGNAL_SEED").unwrap_or(defaults.seed),
            },
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            fetch_timeout_secs: None,
            index_symbol: "^NYA".to_string(),
            signals: SignalConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
