use serde::{Deserialize, Serialize};

/// Acknowledgement returned by mutations that have no resource to echo back.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
