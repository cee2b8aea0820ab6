use serde::Serialize;
use std::fmt;

/// Pipeline stages in execution order. A request only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    AuthCheck,
    BodyParse,
    Validate,
    Charge,
    Execute,
    Respond,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::AuthCheck => "auth_check",
            PipelineStage::BodyParse => "body_parse",
            PipelineStage::Validate => "validate",
            PipelineStage::Charge => "charge",
            PipelineStage::Execute => "execute",
            PipelineStage::Respond => "respond",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
