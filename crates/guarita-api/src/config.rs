//! Backend endpoint configuration.
//!
//! Built once at startup and handed to [`crate::ApiClient`]; nothing in this
//! crate reads ambient mutable state to decide which backend to talk to.

/// Which backend deployment the app targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => "https://api.guarita.app/ws/guarita.php",
            Environment::Staging => "https://staging.guarita.app/ws/guarita.php",
        }
    }
}

/// Everything the client needs to reach the backend.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub environment: Environment,
    pub base_url: String,
    pub auth_token: String,
}

impl ApiConfig {
    pub fn new(environment: Environment, auth_token: impl Into<String>) -> Self {
        Self {
            environment,
            base_url: environment.base_url().to_string(),
            auth_token: auth_token.into(),
        }
    }

    /// Point the client at a non-standard URL (local proxies in development).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_selects_base_url() {
        let config = ApiConfig::new(Environment::Staging, "token");
        assert_eq!(config.base_url, Environment::Staging.base_url());
        assert_ne!(
            Environment::Production.base_url(),
            Environment::Staging.base_url()
        );
    }

    #[test]
    fn test_base_url_override() {
        let config =
            ApiConfig::new(Environment::Production, "token").with_base_url("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.environment, Environment::Production);
    }
}
