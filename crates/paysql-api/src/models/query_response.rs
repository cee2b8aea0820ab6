use paysql_core::ResponseEnvelope;
use serde::{Deserialize, Serialize};

/// Successful response of `POST /query/shared`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedQueryResponse {
    pub result: ResponseEnvelope,
}
