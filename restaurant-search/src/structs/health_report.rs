use serde::{Deserialize, Serialize};

/// Body of a successful health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"`; failures are reported as errors instead.
    pub status: String,
    /// Store version string as reported by the cluster.
    pub opensearch: String,
}

impl HealthReport {
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            opensearch: version.into(),
        }
    }
}
