use std::env;
use std::path::PathBuf;

/// Public URL root the uploads directory is served under.
pub const UPLOADS_ROOT: &str = "/uploads/";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub uploads_dir: PathBuf,
    pub uploads_prefix: String,
    pub admin_email: String,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using default (insecure!)");
            "secret".to_string()
        });

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            uploads_dir: PathBuf::from(var_or("UPLOADS_DIR", "uploads/photos")),
            uploads_prefix: var_or("UPLOADS_PREFIX", "/uploads/photos"),
            admin_email: var_or("ADMIN_EMAIL", "admin@photoevents.com"),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
