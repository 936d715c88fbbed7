//! Per-buffer mute state.

use std::collections::BTreeSet;

/// Buffers for which sound notification is disabled.
///
/// Lives only as long as the plugin; nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct MuteRegistry {
    muted: BTreeSet<String>,
}

impl MuteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the buffer was not muted before.
    pub fn mute(&mut self, buffer: &str) -> bool {
        self.muted.insert(buffer.to_string())
    }

    /// Returns `true` if the buffer was muted before.
    pub fn unmute(&mut self, buffer: &str) -> bool {
        self.muted.remove(buffer)
    }

    pub fn is_muted(&self, buffer: &str) -> bool {
        self.muted.contains(buffer)
    }

    /// Muted buffer names in sorted order.
    pub fn list_muted(&self) -> Vec<&str> {
        self.muted.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.muted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muted.is_empty()
    }
}

/// Render the muted buffers the way `/psound list` shows them.
pub fn format_muted(names: &[&str]) -> String {
    match names {
        [] => "No muted buffer.".to_string(),
        [single] => format!("Muted buffer: {single}"),
        many => format!("Muted buffers: {}", many.join(", ")),
    }
}
