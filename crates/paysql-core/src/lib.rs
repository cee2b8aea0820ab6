//! paysql-core - shared query orchestration
//!
//! [`SharedQueryPipeline`] sequences validation, charging and execution for
//! one request. [`AppContext`] owns the long-lived collaborators the pipeline
//! borrows.

pub mod app_context;
pub mod pipeline;

pub use app_context::AppContext;
pub use pipeline::{
    PipelineError, PipelineStage, ResponseEnvelope, ResponseMeta, SharedQueryPipeline,
    SharedQueryRequest,
};
