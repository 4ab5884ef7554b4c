//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream ===
    /// Gamma API base URL.
    #[serde(default = "default_gamma_url")]
    pub gamma_api_url: String,

    /// Markets requested per Gamma page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Scan client ===
    /// Base URL of the scan service used by `scan --server`.
    #[serde(default = "default_scanner_url")]
    pub scanner_url: String,

    // === Scan defaults ===
    /// Market category used when none is given.
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Minimum edge used when none is given.
    #[serde(default = "default_min_edge")]
    pub default_min_edge: Decimal,

    /// Stake per bundle used when none is given.
    #[serde(default = "default_stake")]
    pub default_stake: Decimal,

    /// Market cap used when none is given.
    #[serde(default = "default_max_markets")]
    pub default_max_markets: usize,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_page_size() -> usize {
    200
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_scanner_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_category() -> String {
    "sports".to_string()
}

fn default_min_edge() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_stake() -> Decimal {
    Decimal::new(100, 0)
}

fn default_max_markets() -> usize {
    200
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gamma_api_url: default_gamma_url(),
            page_size: default_page_size(),
            http_timeout_ms: default_http_timeout_ms(),
            scanner_url: default_scanner_url(),
            default_category: default_category(),
            default_min_edge: default_min_edge(),
            default_stake: default_stake(),
            default_max_markets: default_max_markets(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("PAGE_SIZE must be at least 1".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        for (name, value) in [
            ("GAMMA_API_URL", &self.gamma_api_url),
            ("SCANNER_URL", &self.scanner_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => return Err(format!("{name} must be an http(s) URL")),
            }
        }

        Ok(())
    }

    /// HTTP timeout as a duration.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.http_timeout_ms)
    }
}
