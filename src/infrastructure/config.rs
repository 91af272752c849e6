use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));
const DEFAULT_DB_PATH: &str = "/var/lib/kyc/submissions.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
// Camera captures arrive as base64 data URIs, so leave generous headroom.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Service configuration, read from `KYC_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    pub max_body_bytes: usize,
    /// Serve from a throwaway in-memory store when `db_path` cannot be opened.
    /// Off unless `KYC_ALLOW_IN_MEMORY` is set.
    pub allow_in_memory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_in_memory: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = parse_var(&lookup, "KYC_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?;
        let db_path = lookup("KYC_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let busy_timeout_ms = parse_var(&lookup, "KYC_DB_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS)?;
        let max_body_bytes = parse_var(&lookup, "KYC_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        let allow_in_memory = parse_var(&lookup, "KYC_ALLOW_IN_MEMORY", false)?;

        Ok(Self {
            listen_addr,
            db_path: PathBuf::from(db_path),
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            max_body_bytes,
            allow_in_memory,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
