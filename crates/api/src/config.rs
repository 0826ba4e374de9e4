use salon_core::matrix::PageSizes;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Matrix window sizes (services per page, stations per view).
    pub page_sizes: PageSizes,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SERVICES_PER_PAGE`    | `10`                       |
    /// | `STATIONS_PER_VIEW`    | `5`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = PageSizes::default();
        let services_per_page: usize = std::env::var("SERVICES_PER_PAGE")
            .map(|v| v.parse().expect("SERVICES_PER_PAGE must be a valid usize"))
            .unwrap_or(defaults.services_per_page);
        let stations_per_view: usize = std::env::var("STATIONS_PER_VIEW")
            .map(|v| v.parse().expect("STATIONS_PER_VIEW must be a valid usize"))
            .unwrap_or(defaults.stations_per_view);
        let page_sizes = PageSizes::new(services_per_page, stations_per_view)
            .unwrap_or_else(|e| panic!("Invalid matrix page sizes: {e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            page_sizes,
        }
    }
}
