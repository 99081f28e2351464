//! Deliberation bounds from TOML (`[deliberation]` section)

use serde::{Deserialize, Serialize};

/// Phase timeouts and responder limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// User id recorded on queries from this machine
    pub user_id: String,
    pub collection_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    pub consensus_timeout_secs: u64,
    /// Per-call bound for debate, proposal and vote calls
    pub call_timeout_secs: u64,
    /// Overall bound; unset means 5 minutes up to 5 responders, 10 above
    pub session_timeout_secs: Option<u64>,
    pub min_responders: usize,
    pub max_responders: usize,
    pub min_successful_responses: usize,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            collection_timeout_secs: 30,
            analysis_timeout_secs: 10,
            consensus_timeout_secs: 60,
            call_timeout_secs: 30,
            session_timeout_secs: None,
            min_responders: 2,
            max_responders: 10,
            min_successful_responses: 2,
        }
    }
}
