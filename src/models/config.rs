//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::controller::ListOptions;

fn default_debounce_ms() -> u64 {
    400
}

fn default_token_path() -> String {
    ".stock-client/token".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the API client and its list views.
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: String,
    /// File holding the bearer token between runs.
    #[serde(default = "default_token_path")]
    pub token_path: String,
    /// Quiet period after the last filter edit before a list is refetched.
    /// Applied to list views built from [`ClientConfig::list_options`]; the
    /// command line tool fetches each page once and never debounces.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// No timeout when absent.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub page_sizes: PageSizes,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Initial page size of each list view.
pub struct PageSizes {
    pub items: usize,
    pub history: usize,
    pub pending: usize,
    pub deleted: usize,
    pub users: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            items: 10,
            history: 10,
            pending: 10,
            deleted: 10,
            users: 20,
        }
    }
}

impl ClientConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Controller options for a list view starting at `page_size` rows.
    pub fn list_options(&self, page_size: usize) -> ListOptions {
        ListOptions::default()
            .page_size(page_size)
            .debounce(self.debounce())
    }
}
