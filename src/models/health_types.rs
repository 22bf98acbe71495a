use serde::{Deserialize, Serialize};

/// Whatever the backend chose to say on `/health`. Only the status code
/// decides liveness, so every field is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Result of one health probe against the active base.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Healthy(HealthReport),
    Failed(String),
}
