//! Charge-then-execute ordering with counting collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use paysql_billing::{BillingError, ChargeGateway, InMemoryLedger, Ledger, LedgerReceipt};
use paysql_commons::{Credits, UserAccount, UserId};
use paysql_core::{PipelineError, PipelineStage, SharedQueryPipeline, SharedQueryRequest};
use paysql_store::{BindValue, QueryExecutor, QueryResult, SharedStore, StoreError};
use serde_json::json;

const FEE: Credits = 3;

/// Ledger wrapper that counts debit attempts.
struct CountingLedger {
    inner: InMemoryLedger,
    charges: AtomicUsize,
}

impl CountingLedger {
    fn with_balance(balance: Credits) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryLedger::with_balances([(UserId::new("alice"), balance)]),
            charges: AtomicUsize::new(0),
        })
    }

    fn charge_calls(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for CountingLedger {
    async fn balance(&self, user_id: &UserId) -> paysql_billing::Result<Credits> {
        self.inner.balance(user_id).await
    }

    async fn charge(&self, user_id: &UserId, amount: Credits) -> paysql_billing::Result<LedgerReceipt> {
        self.charges.fetch_add(1, Ordering::SeqCst);
        self.inner.charge(user_id, amount).await
    }

    async fn credit(&self, user_id: &UserId, amount: Credits) -> paysql_billing::Result<Credits> {
        self.inner.credit(user_id, amount).await
    }
}

struct BrokenLedger;

#[async_trait]
impl Ledger for BrokenLedger {
    async fn balance(&self, _user_id: &UserId) -> paysql_billing::Result<Credits> {
        Err(BillingError::Task("ledger offline".to_string()))
    }

    async fn charge(&self, _user_id: &UserId, _amount: Credits) -> paysql_billing::Result<LedgerReceipt> {
        Err(BillingError::Task("ledger offline".to_string()))
    }

    async fn credit(&self, _user_id: &UserId, _amount: Credits) -> paysql_billing::Result<Credits> {
        Err(BillingError::Task("ledger offline".to_string()))
    }
}

/// Store that records calls and returns a canned result or error.
struct ScriptedStore {
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedStore {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn exec_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SharedStore for ScriptedStore {
    async fn exec(&self, _sql: &str, params: &[BindValue]) -> paysql_store::Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::ParameterMismatch {
                expected: 1,
                actual: params.len(),
            });
        }
        Ok(QueryResult {
            columns: vec!["total".to_string()],
            rows: vec![vec![json!(5)]],
            rows_read: 5,
            rows_written: 0,
        })
    }
}

fn pipeline(ledger: Arc<dyn Ledger>, store: Arc<dyn SharedStore>) -> SharedQueryPipeline {
    SharedQueryPipeline::new(ChargeGateway::new(ledger), QueryExecutor::new(store), FEE)
}

fn alice() -> UserAccount {
    UserAccount::new(UserId::new("alice"), "token")
}

#[tokio::test]
async fn test_successful_query_charges_once() {
    let ledger = CountingLedger::with_balance(10);
    let store = ScriptedStore::ok();
    let envelope = pipeline(ledger.clone(), store.clone())
        .run(&alice(), SharedQueryRequest::new("SELECT COUNT(*) AS total FROM sample_data"))
        .await
        .unwrap();

    assert_eq!(envelope.rows, vec![vec![json!(5)]]);
    assert_eq!(envelope.meta.charge_applied, FEE);
    assert_eq!(envelope.meta.remaining_balance, 7);
    assert_eq!(ledger.charge_calls(), 1);
    assert_eq!(store.exec_calls(), 1);
}

#[tokio::test]
async fn test_rejected_statements_are_never_charged() {
    let ledger = CountingLedger::with_balance(10);
    let store = ScriptedStore::ok();
    let pipeline = pipeline(ledger.clone(), store.clone());

    for sql in [
        "DROP TABLE sample_data",
        "delete from sample_data",
        "SELECT load_extension('x')",
        "SELEC * FROM x",
        "SELECT 1; SELECT 2",
    ] {
        let err = pipeline.run(&alice(), SharedQueryRequest::new(sql)).await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }), "{sql}: {err}");
        assert_eq!(err.status_code(), 400);
    }

    assert_eq!(ledger.charge_calls(), 0);
    assert_eq!(store.exec_calls(), 0);
    assert_eq!(ledger.balance(&UserId::new("alice")).await.unwrap(), 10);
}

#[tokio::test]
async fn test_missing_sql_is_bad_request() {
    let ledger = CountingLedger::with_balance(10);
    let pipeline = pipeline(ledger.clone(), ScriptedStore::ok());

    for request in [SharedQueryRequest::default(), SharedQueryRequest::new("   ")] {
        let err = pipeline.run(&alice(), request).await.unwrap_err();
        assert_eq!(err.stage(), PipelineStage::BodyParse);
        assert_eq!(err.error_message(), "SQL query is required");
    }
    assert_eq!(ledger.charge_calls(), 0);
}

#[tokio::test]
async fn test_composite_params_rejected_before_billing() {
    let ledger = CountingLedger::with_balance(10);
    let pipeline = pipeline(ledger.clone(), ScriptedStore::ok());

    let request = SharedQueryRequest::new("SELECT * FROM sample_data WHERE id = ?")
        .with_params(vec![json!({"id": 1})]);
    let err = pipeline.run(&alice(), request).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.details().unwrap_or_default().contains("position 0"));
    assert_eq!(ledger.charge_calls(), 0);
}

#[tokio::test]
async fn test_insufficient_balance_is_402_and_skips_execution() {
    let ledger = CountingLedger::with_balance(2);
    let store = ScriptedStore::ok();
    let err = pipeline(ledger.clone(), store.clone())
        .run(&alice(), SharedQueryRequest::new("SELECT * FROM sample_data"))
        .await
        .unwrap_err();

    match &err {
        PipelineError::Payment { message, balance } => {
            assert_eq!(message, "insufficient balance");
            assert_eq!(*balance, 2);
        },
        other => panic!("expected payment error, got {other:?}"),
    }
    assert_eq!(err.status_code(), 402);
    assert_eq!(store.exec_calls(), 0);
    assert_eq!(ledger.balance(&UserId::new("alice")).await.unwrap(), 2);
}

#[tokio::test]
async fn test_execution_failure_keeps_the_debit() {
    let ledger = CountingLedger::with_balance(10);
    let store = ScriptedStore::failing();
    let err = pipeline(ledger.clone(), store.clone())
        .run(&alice(), SharedQueryRequest::new("SELECT * FROM sample_data WHERE id = ?"))
        .await
        .unwrap_err();

    match &err {
        PipelineError::Execution {
            charge_applied,
            balance,
            details,
        } => {
            assert_eq!(*charge_applied, FEE);
            assert_eq!(*balance, 7);
            assert!(details.contains("Parameter count mismatch"));
        },
        other => panic!("expected execution error, got {other:?}"),
    }
    assert_eq!(err.status_code(), 500);
    assert_eq!(ledger.balance(&UserId::new("alice")).await.unwrap(), 7);
}

#[tokio::test]
async fn test_engine_errors_can_be_hidden() {
    let ledger = CountingLedger::with_balance(10);
    let err = pipeline(ledger, ScriptedStore::failing())
        .with_engine_errors(false)
        .run(&alice(), SharedQueryRequest::new("SELECT 1"))
        .await
        .unwrap_err();

    let details = err.details().unwrap_or_default();
    assert!(!details.contains("Parameter"), "{details}");
}

#[tokio::test]
async fn test_ledger_fault_is_500_without_execution() {
    let store = ScriptedStore::ok();
    let err = pipeline(Arc::new(BrokenLedger), store.clone())
        .run(&alice(), SharedQueryRequest::new("SELECT 1"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Billing(_)));
    assert_eq!(err.status_code(), 500);
    assert_eq!(store.exec_calls(), 0);
}

#[tokio::test]
async fn test_unauthenticated_account_is_rejected_first() {
    let ledger = CountingLedger::with_balance(10);
    let anonymous = UserAccount::new(UserId::new("alice"), "");
    let err = pipeline(ledger.clone(), ScriptedStore::ok())
        .run(&anonymous, SharedQueryRequest::new("DROP TABLE sample_data"))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), PipelineStage::AuthCheck);
    assert_eq!(err.status_code(), 401);
    assert_eq!(ledger.charge_calls(), 0);
}
