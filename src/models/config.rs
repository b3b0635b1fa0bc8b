use serde::Deserialize;

/// Configuration options of the blog server.
///
/// Loaded from `config/default.yaml` and overridden by `APP_*` environment
/// variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Interface to bind the HTTP server to.
    pub address: String,
    pub port: u16,
    /// Secret used to sign session and flash cookies. At least 64 bytes.
    pub secret: String,
    /// Glob pattern of the tera templates.
    pub templates_dir: String,
    /// Whether cookies are only sent over HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}
