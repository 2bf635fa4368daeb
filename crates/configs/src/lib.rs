//! # configs
//!
//! Environment-driven configuration. Variables use `__` as the section
//! separator (`SERVER__PORT`, `GAME_DB__HOST`, `AUTH__ADMIN_EMAILS`, ...);
//! a `.env` file is honored for local development. Secrets are wrapped in
//! `SecretString` so they never land in debug output.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Fallback signing secret for local development only; the binary warns
/// loudly when it is still in use.
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub game_db: GameDbConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Loads configuration from the environment. The `.env` file is
    /// skipped under test so tests stay hermetic.
    pub fn load() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let cfg = config::Config::builder()
            .add_source(config::Environment::default().separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// `development` or `production`; controls error detail and log format.
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 4000,
            environment: "development".into(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameDbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub auth_db: String,
    pub characters_db: String,
    pub max_connections: u32,
    pub query_timeout_ms: u64,
}

impl Default for GameDbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "wowuser".into(),
            password: SecretString::from(String::new()),
            auth_db: "acore_auth".into(),
            characters_db: "characters".into(),
            max_connections: 10,
            query_timeout_ms: 5_000,
        }
    }
}

impl GameDbConfig {
    fn url(&self, database: &str) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            database
        )
    }

    pub fn auth_url(&self) -> String {
        self.url(&self.auth_db)
    }

    pub fn characters_url(&self) -> String {
        self.url(&self.characters_db)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    /// Comma-separated admin allow-list.
    pub admin_emails: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from(DEV_JWT_SECRET.to_string()),
            admin_emails: "admin@aethelgard.pt".into(),
        }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEV_JWT_SECRET
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login_max: u32,
    pub login_window_secs: u64,
    pub signup_max: u32,
    pub signup_window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max: 5,
            login_window_secs: 15 * 60,
            signup_max: 3,
            signup_window_secs: 60 * 60,
        }
    }
}

impl RateLimitConfig {
    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.login_window_secs)
    }

    pub fn signup_window(&self) -> Duration {
        Duration::from_secs(self.signup_window_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `*` or one concrete origin.
    pub origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { origin: "*".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub uploads_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            uploads_dir: PathBuf::from("./uploads"),
        }
    }
}

impl DataConfig {
    pub fn users_file(&self) -> PathBuf {
        self.dir.join("users.json")
    }

    pub fn forum_file(&self) -> PathBuf {
        self.dir.join("forum.json")
    }

    pub fn events_file(&self) -> PathBuf {
        self.dir.join("events.json")
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.uploads_dir.join("characters")
    }
}
