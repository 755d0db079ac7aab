//! Client configuration.
//!
//! Environment first, then command-line flags on top (see `main.rs`).
//!
//! | variable                   | default                        |
//! |----------------------------|--------------------------------|
//! | `CHESS_SERVER_URL`         | `ws://localhost:8080/socket/`  |
//! | `CHESS_EVENT_CAPACITY`     | `64`                           |
//! | `CHESS_CONNECT_TIMEOUT_MS` | `5000`                         |
//! | `CHESS_LOG_PATH`           | unset (logging disabled)       |
//! | `CHESS_LOG_LEVEL`          | `info`                         |

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::adapter::ConnectionConfig;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub connection: ConnectionConfig,
    /// File receiving log output; `None` disables logging.
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            log_path: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        use std::env;

        let log_path = env::var("CHESS_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let log_level = env::var("CHESS_LOG_LEVEL")
            .ok()
            .and_then(|s| LevelFilter::from_str(s.trim()).ok())
            .unwrap_or(LevelFilter::Info);

        Self {
            connection: ConnectionConfig::from_env(),
            log_path,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_from_env() {
        // This test just ensures it doesn't panic
        let _config = ClientConfig::from_env();
    }

    #[test]
    fn test_default_points_at_local_server() {
        let config = ClientConfig::default();
        assert_eq!(config.connection.url, crate::types::DEFAULT_SERVER_URL);
        assert!(config.log_path.is_none());
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
