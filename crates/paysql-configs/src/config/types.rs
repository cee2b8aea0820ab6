use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default, alias = "authentication")]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub security: SecuritySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Actix worker threads (0 = one per physical core)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

/// Shared dataset settings.
///
/// The dataset file is opened read-only by the query path. Schema creation is
/// owned by whoever publishes the dataset; `seed_sample_data` exists for demos
/// and local development only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    /// Maximum number of pooled read-only connections
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Per-statement execution timeout in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Create and populate `sample_data` when the dataset has no such table
    #[serde(default)]
    pub seed_sample_data: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            pool_size: default_pool_size(),
            query_timeout_ms: default_query_timeout_ms(),
            seed_sample_data: false,
        }
    }
}

/// Ledger backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    /// Process-local balances, lost on restart
    Memory,
    /// Balances persisted in a SQLite file
    Sqlite,
}

impl LedgerBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Some(LedgerBackend::Memory),
            "sqlite" => Some(LedgerBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Flat fee charged per successfully validated query, in the ledger's
    /// smallest currency subunit
    #[serde(default = "default_query_fee")]
    pub query_fee: u64,
    /// "memory" or "sqlite"
    #[serde(default = "default_ledger_backend")]
    pub ledger_backend: String,
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
}

impl BillingSettings {
    /// Parsed ledger backend. `validate()` guarantees this is `Some` after load.
    pub fn backend(&self) -> Option<LedgerBackend> {
        LedgerBackend::parse(&self.ledger_backend)
    }
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            query_fee: default_query_fee(),
            ledger_backend: default_ledger_backend(),
            ledger_path: default_ledger_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret used to verify bearer tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Accepted `iss` claims. Empty rejects every token.
    #[serde(default = "default_jwt_trusted_issuers")]
    pub jwt_trusted_issuers: Vec<String>,
    /// Lifetime of tokens minted by `issue-token`
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_trusted_issuers: default_jwt_trusted_issuers(),
            jwt_expiry_hours: default_jwt_expiry_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for server.log
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides:
    /// [logging.targets]
    /// paysql_core = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty or ["*"] allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
    /// Maximum JSON body size in bytes
    #[serde(default = "default_max_request_body_size")]
    pub max_request_body_size: usize,
    /// Include the storage engine's error text in 500 responses.
    /// Disable to return a fixed message instead.
    #[serde(default = "default_true")]
    pub expose_engine_errors: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            cors: CorsSettings::default(),
            max_request_body_size: default_max_request_body_size(),
            expose_engine_errors: true,
        }
    }
}
