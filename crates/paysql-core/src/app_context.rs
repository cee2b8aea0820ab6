//! Long-lived collaborators shared by every request.

use std::sync::Arc;

use paysql_billing::{ChargeGateway, Ledger};
use paysql_configs::ServerConfig;
use paysql_store::{QueryExecutor, SharedStore};

use crate::pipeline::SharedQueryPipeline;

/// Shared resources built once at startup and handed to the HTTP layer.
pub struct AppContext {
    config: Arc<ServerConfig>,
    ledger: Arc<dyn Ledger>,
    pipeline: SharedQueryPipeline,
}

impl AppContext {
    pub fn new(
        config: Arc<ServerConfig>,
        ledger: Arc<dyn Ledger>,
        store: Arc<dyn SharedStore>,
    ) -> Self {
        let pipeline = SharedQueryPipeline::new(
            ChargeGateway::new(Arc::clone(&ledger)),
            QueryExecutor::new(store),
            config.billing.query_fee,
        )
        .with_engine_errors(config.security.expose_engine_errors);

        Self {
            config,
            ledger,
            pipeline,
        }
    }

    pub fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn pipeline(&self) -> &SharedQueryPipeline {
        &self.pipeline
    }
}
