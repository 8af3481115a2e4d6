//! Store-wide "orders paused" setting.

use serde::{Deserialize, Serialize};

/// Away mode as supplied by the settings provider.
///
/// Pricing never consults this; checkout callers do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwayMode {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub reason: String,
}

impl AwayMode {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            enabled: true,
            reason: reason.into(),
        }
    }

    /// The message to show instead of checking out, if orders are paused.
    pub fn blocks_checkout(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        if self.reason.trim().is_empty() {
            Some("Orders are temporarily disabled")
        } else {
            Some(&self.reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        assert_eq!(AwayMode::default().blocks_checkout(), None);
    }

    #[test]
    fn test_reason_shown() {
        let away = AwayMode::new("Back on Monday");
        assert_eq!(away.blocks_checkout(), Some("Back on Monday"));

        let blank: AwayMode = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert_eq!(blank.blocks_checkout(), Some("Orders are temporarily disabled"));
    }
}
