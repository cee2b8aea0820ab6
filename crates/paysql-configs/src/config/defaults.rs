// Default value functions

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_workers() -> usize {
    0 // 0 = one worker per physical core, resolved at startup
}

pub fn resolved_workers(configured: usize) -> usize {
    if configured == 0 {
        num_cpus::get_physical().max(1)
    } else {
        configured
    }
}

pub fn default_true() -> bool {
    true
}

pub fn default_dataset_path() -> String {
    "./data/shared.db".to_string()
}

pub fn default_pool_size() -> usize {
    4
}

pub fn default_query_timeout_ms() -> u64 {
    5_000
}

pub fn default_query_fee() -> u64 {
    1
}

pub fn default_ledger_backend() -> String {
    "sqlite".to_string()
}

pub fn default_ledger_path() -> String {
    "./data/ledger.db".to_string()
}

pub fn default_jwt_secret() -> String {
    "paysql-dev-secret-change-in-production".to_string()
}

pub fn default_jwt_trusted_issuers() -> Vec<String> {
    vec!["paysql".to_string()]
}

pub fn default_jwt_expiry_hours() -> i64 {
    24
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_max_request_body_size() -> usize {
    256 * 1024 // SQL text plus params; no uploads on this surface
}

pub fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

pub fn default_cors_headers() -> Vec<String> {
    vec![
        "Authorization".to_string(),
        "Content-Type".to_string(),
        "Accept".to_string(),
    ]
}

pub fn default_cors_max_age() -> u64 {
    3600
}
