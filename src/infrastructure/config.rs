use std::env;
use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Runtime settings read from the environment once at startup.
///
/// An absent `JWT_SECRET` stays empty here; login reports the
/// misconfiguration instead of the process refusing to boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads through an injectable lookup so tests can supply values
    /// without touching process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => {
                    warn!(value = %raw, fallback = DEFAULT_PORT, "PORT is not a valid port number");
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_default();
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        Self {
            host,
            port,
            jwt_secret,
            frontend_url,
        }
    }
}
