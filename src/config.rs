use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CERT_DIR: &str = "/app/certificates";

const DEV_ORIGINS: &str = "http://localhost:8000,http://127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_lowercase).as_deref() {
            None | Some("development") => Environment::Development,
            Some(_) => Environment::Production,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(env::var("ENVIRONMENT").ok().as_deref())
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// `None` means any origin.
    pub allowed_origins: Option<Vec<String>>,
    pub fetch_timeout: Duration,
    /// Extra root certificate trusted for outbound fetches.
    pub ca_cert: Option<PathBuf>,
    /// Certificate and key for serving HTTPS.
    pub tls: Option<(PathBuf, PathBuf)>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = Environment::parse(lookup("ENVIRONMENT").as_deref());
        let dev = environment == Environment::Development;

        let host = lookup("HOST").unwrap_or_else(|| (if dev { "127.0.0.1" } else { "0.0.0.0" }).to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().with_context(|| format!("Invalid PORT '{}'", raw))?,
            None => 8000,
        };

        let origins = lookup("ALLOWED_ORIGINS").unwrap_or_else(|| (if dev { DEV_ORIGINS } else { "*" }).to_string());
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        let allowed_origins = if origins.iter().any(|o| o == "*") { None } else { Some(origins) };

        let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid FETCH_TIMEOUT_SECS '{}'", raw))?;
                if secs == 0 {
                    bail!("FETCH_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(10),
        };

        let cert_dir = Path::new(CERT_DIR);
        let ca_cert = lookup("TLS_CA_CERT").map(|name| cert_dir.join(name));
        let tls = match (lookup("TLS_HOST_CERT"), lookup("TLS_HOST_KEY")) {
            (Some(cert), Some(key)) => Some((cert_dir.join(cert), cert_dir.join(key))),
            (None, None) => None,
            _ => {
                tracing::warn!("TLS_HOST_CERT and TLS_HOST_KEY must both be set to enable inbound TLS. Falling back to HTTP.");
                None
            }
        };

        Ok(Self {
            environment,
            host,
            port,
            allowed_origins,
            fetch_timeout,
            ca_cert,
            tls,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
