//! App configuration, assembled once at startup.

use guarita_api::{ApiConfig, Environment};

/// Static routing credential for the invitation endpoints. The backend keys
/// real authorization on the invitation token itself.
const AUTH_TOKEN: &str = "Basic Z3Vhcml0YTpjb252aXRlLXdlYg==";

/// Pick the backend deployment from the page host: staging builds and local
/// development (trunk serve on port 3000) talk to staging, everything else
/// goes to production.
#[cfg(target_arch = "wasm32")]
pub fn detect_environment() -> Environment {
    use web_sys::window;

    let host = window()
        .and_then(|w| w.location().host().ok())
        .unwrap_or_default();

    if host.contains("staging") || host.contains("localhost") || host.contains("127.0.0.1") {
        Environment::Staging
    } else {
        Environment::Production
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn detect_environment() -> Environment {
    Environment::Staging
}

pub fn api_config() -> ApiConfig {
    ApiConfig::new(detect_environment(), AUTH_TOKEN)
}
