use super::types::{LedgerBackend, ServerConfig};
use std::fs;
use std::path::{Path, PathBuf};

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl ServerConfig {
    /// Load configuration from a TOML file, apply `PAYSQL_*` environment
    /// overrides, then normalize and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        config.finalize()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without env overrides or validation.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Normalize local filesystem paths and validate configuration.
    ///
    /// Call this after applying environment overrides.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.storage.dataset_path = normalize_path(&self.storage.dataset_path);
        self.billing.ledger_path = normalize_path(&self.billing.ledger_path);
        self.logging.logs_path = normalize_path(&self.logging.logs_path);

        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LOG_LEVELS.join(", ")
                ));
            }
        }

        if self.billing.query_fee == 0 {
            return Err(anyhow::anyhow!("billing.query_fee must be greater than 0"));
        }

        match self.billing.backend() {
            Some(LedgerBackend::Sqlite) if self.billing.ledger_path.trim().is_empty() => {
                return Err(anyhow::anyhow!(
                    "billing.ledger_path is required for the sqlite ledger"
                ));
            },
            Some(_) => {},
            None => {
                return Err(anyhow::anyhow!(
                    "Invalid ledger backend '{}'. Must be one of: memory, sqlite",
                    self.billing.ledger_backend
                ));
            },
        }

        if self.storage.dataset_path.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.dataset_path cannot be empty"));
        }

        if self.storage.pool_size == 0 {
            return Err(anyhow::anyhow!("storage.pool_size cannot be 0"));
        }

        if self.storage.query_timeout_ms == 0 {
            return Err(anyhow::anyhow!("storage.query_timeout_ms cannot be 0"));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("auth.jwt_secret cannot be empty"));
        }

        if self.auth.jwt_trusted_issuers.is_empty() {
            return Err(anyhow::anyhow!(
                "auth.jwt_trusted_issuers cannot be empty (every token would be rejected)"
            ));
        }

        if self.security.max_request_body_size == 0 {
            return Err(anyhow::anyhow!("security.max_request_body_size cannot be 0"));
        }

        Ok(())
    }
}

/// Make a relative path absolute against the current working directory.
///
/// `:memory:` and already-absolute paths are returned unchanged.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == ":memory:" {
        return trimmed.to_string();
    }

    let p = PathBuf::from(trimmed);
    if p.is_absolute() {
        return trimmed.to_string();
    }

    match std::env::current_dir() {
        Ok(cwd) => cwd.join(p).to_string_lossy().into_owned(),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.billing.query_fee, 1);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_fee_rejected() {
        let mut config = ServerConfig::default();
        config.billing.query_fee = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_ledger_backend_rejected() {
        let mut config = ServerConfig::default();
        config.billing.ledger_backend = "postgres".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_trusted_issuers_rejected() {
        let mut config = ServerConfig::default();
        config.auth.jwt_trusted_issuers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [billing]
            query_fee = 25
            ledger_backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.billing.query_fee, 25);
        assert_eq!(config.billing.backend(), Some(LedgerBackend::Memory));
        assert_eq!(config.storage.pool_size, 4);
        assert!(config.security.expose_engine_errors);
    }

    #[test]
    fn test_from_file_normalizes_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [storage]
            dataset_path = "data/shared.db"
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert!(Path::new(&config.storage.dataset_path).is_absolute());
        assert!(config.storage.dataset_path.ends_with("shared.db"));
    }

    #[test]
    fn test_memory_path_kept() {
        assert_eq!(normalize_path(":memory:"), ":memory:");
    }
}
