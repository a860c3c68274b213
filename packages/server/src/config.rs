//! Command line / environment configuration.

use std::path::PathBuf;

use clap::Parser;
use hiroba_shared::logger::LogFormat;

use crate::domain::DEFAULT_HISTORY_LIMIT;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "hiroba-server")]
#[command(about = "Room-scoped WebSocket group chat server", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// JSON file the message history is persisted to
    #[arg(long, env = "HIROBA_DATA_FILE", default_value = "data/messages.json")]
    pub data_file: PathBuf,

    /// Number of messages kept per room
    #[arg(
        long,
        default_value_t = DEFAULT_HISTORY_LIMIT,
        value_parser = parse_history_limit
    )]
    pub history_limit: usize,

    /// Send an `error` event to the requester when a request is rejected
    #[arg(long)]
    pub notify_rejections: bool,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format: pretty or json
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

fn parse_history_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;
    if limit == 0 {
        return Err("history limit must be at least 1".to_string());
    }
    Ok(limit)
}
