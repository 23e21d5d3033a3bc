//! Stream configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration for file-backed compression streams.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// Input buffer size (default: 64 KB).
    #[serde(default = "default_buffer_size")]
    pub input_buffer_size: usize,

    /// Output buffer size (default: 64 KB).
    #[serde(default = "default_buffer_size")]
    pub output_buffer_size: usize,

    /// Largest input accepted for two-pass compression (default: 1 GB).
    #[serde(default = "default_max_input_size")]
    pub max_input_size: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            input_buffer_size: default_buffer_size(),
            output_buffer_size: default_buffer_size(),
            max_input_size: default_max_input_size(),
            log_level: default_log_level(),
        }
    }
}

impl StreamConfig {
    /// Reject inputs that exceed `max_input_size`.
    pub fn check_input_size(&self, size: u64) -> Result<()> {
        if size > self.max_input_size {
            return Err(Error::InputTooLarge {
                size,
                limit: self.max_input_size,
            });
        }
        Ok(())
    }
}

fn default_buffer_size() -> usize {
    64 * 1024
}

fn default_max_input_size() -> u64 {
    1024 * 1024 * 1024 // 1GB
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StreamConfig =
            serde_json::from_str(r#"{ "max_input_size": 1024, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.max_input_size, 1024);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.input_buffer_size, 65536);
        assert_eq!(config.output_buffer_size, 65536);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: StreamConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StreamConfig::default());
    }

    #[test]
    fn test_input_size_limit() {
        let config = StreamConfig {
            max_input_size: 10,
            ..Default::default()
        };
        assert!(config.check_input_size(10).is_ok());
        assert!(matches!(
            config.check_input_size(11),
            Err(Error::InputTooLarge { size: 11, limit: 10 })
        ));
    }
}
