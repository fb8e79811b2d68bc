use std::{env, fmt};

/// Minimum length of `SESSION_SECRET`; the cookie signing key is derived from it.
pub const MIN_SECRET_LEN: usize = 32;

/// Where session records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// In-process table, lost on restart.
    Memory,
    /// The `sessions` table in the application database.
    Postgres,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub session_secret: String,
    pub allowed_origin: String,
    pub session_backend: SessionBackend,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid { var, reason } => write!(f, "{} is invalid: {}", var, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let session_backend = match lookup("SESSION_BACKEND").as_deref() {
            None | Some("memory") => SessionBackend::Memory,
            Some("postgres") => SessionBackend::Postgres,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SESSION_BACKEND",
                    reason: format!("unknown backend `{}`", other),
                })
            }
        };

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                reason: "must be between 4 and 31".into(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "PORT", 4000)?,
            session_secret,
            allowed_origin: lookup("ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            session_backend,
            bcrypt_cost,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.allowed_origin, "http://localhost:3000");
        assert_eq!(config.session_backend, SessionBackend::Memory);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(!config.cookie_secure);
        assert_eq!(config.server_url(), "http://127.0.0.1:4000");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", SECRET),
            ("PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("ALLOWED_ORIGIN", "https://tasks.example.com"),
            ("SESSION_BACKEND", "postgres"),
            ("BCRYPT_COST", "10"),
            ("COOKIE_SECURE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.allowed_origin, "https://tasks.example.com");
        assert_eq!(config.session_backend, SessionBackend::Postgres);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let missing = Config::from_lookup(lookup_from(&[("SESSION_SECRET", SECRET)]));
        assert_eq!(missing.unwrap_err(), ConfigError::Missing("DATABASE_URL"));

        let short_secret = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", "too-short"),
        ]));
        assert!(matches!(
            short_secret,
            Err(ConfigError::Invalid { var: "SESSION_SECRET", .. })
        ));

        let bad_port = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", SECRET),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(bad_port, Err(ConfigError::Invalid { var: "PORT", .. })));

        let bad_backend = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", SECRET),
            ("SESSION_BACKEND", "redis"),
        ]));
        assert!(matches!(
            bad_backend,
            Err(ConfigError::Invalid { var: "SESSION_BACKEND", .. })
        ));

        let bad_cost = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SESSION_SECRET", SECRET),
            ("BCRYPT_COST", "2"),
        ]));
        assert!(matches!(bad_cost, Err(ConfigError::Invalid { var: "BCRYPT_COST", .. })));
    }
}
