use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub token_sweep_interval_secs: u64,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "notekeeper".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "notekeeper-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 15),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 30),
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            token_sweep_interval_secs: env_or("TOKEN_SWEEP_INTERVAL_SECS", 300),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Reads and parses an env var, falling back to `default` when unset or unparsable.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_garbage() {
        std::env::set_var("NOTEKEEPER_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or::<u64>("NOTEKEEPER_TEST_GARBAGE", 42), 42);
        assert_eq!(env_or::<u64>("NOTEKEEPER_TEST_UNSET_KEY", 7), 7);
    }

    #[test]
    fn bind_addr_parses_host_and_port() {
        let cfg = AppConfig {
            database_url: "postgres://localhost/test".into(),
            max_connections: 1,
            jwt: JwtConfig {
                secret: "s".into(),
                issuer: "i".into(),
                audience: "a".into(),
                ttl_minutes: 1,
                refresh_ttl_minutes: 2,
            },
            token_sweep_interval_secs: 60,
            host: "127.0.0.1".into(),
            port: 9090,
        };
        assert_eq!(cfg.bind_addr().unwrap().port(), 9090);
    }
}
