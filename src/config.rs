use std::env;
use std::fmt;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_JWT_ISSUER: &str = "bookstore-api";
const DEFAULT_JWT_AUDIENCE: &str = "bookstore-clients";
const DEFAULT_JWT_LIFETIME_MINUTES: i64 = 5;
/// One year.
const MAX_JWT_LIFETIME_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_SEED_PASSWORD: &str = "P@ssword1";

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Token signing parameters.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub lifetime_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub seed_on_startup: bool,
    pub seed_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let lifetime_minutes = parse_or(&lookup, "JWT_LIFETIME_MINUTES", DEFAULT_JWT_LIFETIME_MINUTES)?;
        if !(1..=MAX_JWT_LIFETIME_MINUTES).contains(&lifetime_minutes) {
            return Err(ConfigError::Invalid {
                key: "JWT_LIFETIME_MINUTES",
                value: lifetime_minutes.to_string(),
            });
        }

        Ok(Self {
            database_url,
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            jwt: JwtSettings {
                secret: jwt_secret,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
                audience: lookup("JWT_AUDIENCE")
                    .unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_string()),
                lifetime_minutes,
            },
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            seed_on_startup: parse_or(&lookup, "SEED_ON_STARTUP", true)?,
            seed_password: lookup("SEED_USER_PASSWORD")
                .unwrap_or_else(|| DEFAULT_SEED_PASSWORD.to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
