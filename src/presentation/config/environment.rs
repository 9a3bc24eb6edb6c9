use std::fmt;

/// Deployment environment, selected with `APP_ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("APP_ENVIRONMENT") {
            Ok(value) => Self::try_from(value),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Base name of the optional settings file layered over the defaults.
    pub fn settings_file(&self) -> String {
        format!("appsettings.{}", self.as_str())
    }

    pub fn prefers_json_logs(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "Invalid environment: {}. Expected: development, test, or production",
                other
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
