//! Issue-token command for paysql-server
//!
//! Mints a bearer token for a user and optionally credits their ledger
//! balance, so a fresh deployment can be exercised without an external
//! identity provider.

use anyhow::{Context, Result};
use log::info;
use paysql_auth::{create_and_sign_token, JwtSettings};
use paysql_commons::{Credits, UserId};
use paysql_configs::{LedgerBackend, ServerConfig};

use crate::lifecycle::open_ledger;

/// Result of `issue-token`.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: usize,
    /// Ledger balance after the optional credit
    pub balance: Credits,
}

/// Mint a token for `user_id`, crediting `credit` first when given.
///
/// Credits require the sqlite ledger: an in-memory ledger would forget them
/// as soon as this command exits.
pub async fn issue_token(
    config: &ServerConfig,
    user_id: &str,
    credit: Option<Credits>,
) -> Result<IssuedToken> {
    let user_id = UserId::try_new(user_id).context("Invalid user id")?;

    if credit.is_some() && config.billing.backend() == Some(LedgerBackend::Memory) {
        return Err(anyhow::anyhow!(
            "Cannot credit balances with the in-memory ledger; set billing.ledger_backend = \"sqlite\""
        ));
    }

    let ledger = open_ledger(&config.billing)?;
    let balance = match credit {
        Some(amount) => {
            let balance = ledger.credit(&user_id, amount).await.context("Failed to credit balance")?;
            info!("Credited {} to '{}', balance now {}", amount, user_id, balance);
            balance
        },
        None => ledger.balance(&user_id).await.context("Failed to read balance")?,
    };

    let settings = JwtSettings::from(&config.auth);
    let (token, claims) =
        create_and_sign_token(&user_id, None, &settings).context("Failed to sign token")?;
    info!("Issued token for '{}' (issuer {}, expires {})", user_id, claims.iss, claims.exp);

    Ok(IssuedToken {
        token,
        expires_at: claims.exp,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysql_auth::validate_jwt_token;

    fn sqlite_config(dir: &tempfile::TempDir) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.billing.ledger_backend = "sqlite".to_string();
        config.billing.ledger_path = dir.path().join("ledger.db").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_issue_token_with_credit() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        let issued = issue_token(&config, "alice", Some(25)).await.unwrap();
        assert_eq!(issued.balance, 25);

        let claims = validate_jwt_token(
            &issued.token,
            &config.auth.jwt_secret,
            &config.auth.jwt_trusted_issuers,
        )
        .unwrap();
        assert_eq!(claims.sub, "alice");

        let again = issue_token(&config, "alice", Some(5)).await.unwrap();
        assert_eq!(again.balance, 30);
    }

    #[tokio::test]
    async fn test_memory_ledger_refuses_credit() {
        let mut config = ServerConfig::default();
        config.billing.ledger_backend = "memory".to_string();
        assert!(issue_token(&config, "alice", Some(5)).await.is_err());
        assert!(issue_token(&config, "alice", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_user_id() {
        let dir = tempfile::tempdir().unwrap();
        assert!(issue_token(&sqlite_config(&dir), "   ", None).await.is_err());
    }
}
