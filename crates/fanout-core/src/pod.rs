use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved, addressable pod. Ephemeral: produced fresh on every
/// resolution and discarded with the action result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodRef {
    pub name: String,
    pub namespace: String,
    /// Assigned pod IP. `None` for pods that have not been scheduled yet;
    /// such pods are kept in the resolved list and fail at invocation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Name of the target whose filter matched this pod.
    pub target: String,
}
