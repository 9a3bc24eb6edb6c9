/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool) -> Self {
        Self {
            environment: environment.into(),
            json_format,
            ..Self::default()
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_filter: "info,narrato=debug,tower_http=debug".to_string(),
        }
    }
}
