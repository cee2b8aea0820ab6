use super::types::ServerConfig;

impl ServerConfig {
    /// Apply `PAYSQL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Split out from [`ServerConfig::apply_env_overrides`] so tests do not
    /// have to mutate the process environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PAYSQL_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port_str) = lookup("PAYSQL_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid PAYSQL_SERVER_PORT value: {}", port_str))?;
        }

        if let Some(path) = lookup("PAYSQL_DATASET_PATH") {
            self.storage.dataset_path = path;
        }

        if let Some(fee_str) = lookup("PAYSQL_QUERY_FEE") {
            self.billing.query_fee = fee_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid PAYSQL_QUERY_FEE value: {}", fee_str))?;
        }

        if let Some(backend) = lookup("PAYSQL_LEDGER_BACKEND") {
            self.billing.ledger_backend = backend;
        }

        if let Some(path) = lookup("PAYSQL_LEDGER_PATH") {
            self.billing.ledger_path = path;
        }

        if let Some(secret) = lookup("PAYSQL_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Some(issuers) = lookup("PAYSQL_JWT_TRUSTED_ISSUERS") {
            self.auth.jwt_trusted_issuers = issuers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(level) = lookup("PAYSQL_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Some(val) = lookup("PAYSQL_LOG_TO_CONSOLE") {
            let val = val.to_lowercase();
            self.logging.log_to_console = val == "true" || val == "1" || val == "yes";
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides_from(lookup(&[
                ("PAYSQL_SERVER_PORT", "9999"),
                ("PAYSQL_QUERY_FEE", "7"),
                ("PAYSQL_JWT_TRUSTED_ISSUERS", "a, b,,c"),
                ("PAYSQL_LOG_TO_CONSOLE", "no"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.billing.query_fee, 7);
        assert_eq!(config.auth.jwt_trusted_issuers, vec!["a", "b", "c"]);
        assert!(!config.logging.log_to_console);
    }

    #[test]
    fn test_invalid_port_override_rejected() {
        let mut config = ServerConfig::default();
        let result = config.apply_overrides_from(lookup(&[("PAYSQL_SERVER_PORT", "http")]));
        assert!(result.is_err());
    }
}
