use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// The recorded result of one (pod, request) call attempt sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub pod: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub request: String,
    pub endpoint: String,
    pub status: OutcomeStatus,
    /// Total attempts consumed, including the initial one. Zero when the
    /// pod had no address to call.
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

// ---------------------------------------------------------------------------
// ActionResult
// ---------------------------------------------------------------------------

/// Outcomes of one action execution, in traversal order. An ActionResult
/// containing failed outcomes is still a successful execution — callers
/// inspect individual outcomes to detect partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action: String,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<Outcome>,
}

impl ActionResult {
    pub fn new(action: impl Into<String>, outcomes: Vec<Outcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        let failed = outcomes.len() - succeeded;
        Self {
            action: action.into(),
            succeeded,
            failed,
            outcomes,
        }
    }
}
