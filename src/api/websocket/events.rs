//! WebSocket message types for reload notifications

use serde::{Deserialize, Serialize};

/// The only message the server ever sends: `{"reload": true}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadMessage {
    pub reload: bool,
}

impl ReloadMessage {
    /// Ask the browser to reload the page
    pub fn reload() -> Self {
        Self { reload: true }
    }
}

impl Default for ReloadMessage {
    fn default() -> Self {
        Self::reload()
    }
}
