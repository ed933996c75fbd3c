//! Configuration file contents

use serde::{Deserialize, Serialize};

/// Listen backlog used when the file does not set one
pub const DEFAULT_BACKLOG: u32 = 100;

/// Settings read from `config.toml`
///
/// Command-line flags win: `-a` turns `auto_accept` on and `-N` turns
/// `windowing` off regardless of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkConfig {
    /// Accept incoming requests without asking
    pub auto_accept: bool,

    /// Start the split-screen window
    pub windowing: bool,

    /// Listen backlog for the server socket
    pub backlog: u32,
}

impl Default for TalkConfig {
    fn default() -> Self {
        Self {
            auto_accept: false,
            windowing: true,
            backlog: DEFAULT_BACKLOG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TalkConfig::default();
        assert!(!config.auto_accept);
        assert!(config.windowing);
        assert_eq!(config.backlog, 100);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: TalkConfig = toml::from_str("").unwrap();
        assert_eq!(config, TalkConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config: TalkConfig = toml::from_str("windowing = false").unwrap();
        assert!(!config.windowing);
        assert!(!config.auto_accept);
        assert_eq!(config.backlog, DEFAULT_BACKLOG);
    }
}
