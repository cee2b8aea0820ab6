//! Constants shared across crates.

/// Authentication-related constants.
pub struct AuthConstants;

impl AuthConstants {
    /// Issuer written into tokens minted by `paysql-server issue-token`.
    pub const DEFAULT_ISSUER: &'static str = "paysql";

    /// HTTP header carrying the access credential.
    pub const AUTHORIZATION_HEADER: &'static str = "Authorization";

    /// Scheme prefix for bearer credentials.
    pub const BEARER_PREFIX: &'static str = "Bearer ";
}

/// Billing-related constants.
pub struct BillingConstants;

impl BillingConstants {
    /// Message returned by every ledger when a debit would overdraw the account.
    pub const INSUFFICIENT_BALANCE: &'static str = "insufficient balance";
}
