//! Peer configuration, optionally loaded from a JSON file.
//!
//! Command-line flags are applied on top of whatever the file provides.

use std::net::TcpStream;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::executor::ShellExecutor;
use crate::framing::{DEFAULT_MAX_FRAME_LEN, FramedChannel};

pub const DEFAULT_PORT: u16 = 10000;

/// Settings shared by both peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub max_frame_len: usize,
    /// Read timeout in seconds. `None` blocks indefinitely.
    pub read_timeout_secs: Option<u64>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            read_timeout_secs: None,
        }
    }
}

impl ChannelConfig {
    /// Apply socket options and wrap the stream in a framed channel.
    pub fn open(&self, stream: TcpStream) -> std::io::Result<FramedChannel<TcpStream>> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.read_timeout_secs.map(Duration::from_secs))?;
        Ok(FramedChannel::new(stream).with_max_frame_len(self.max_frame_len))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub bind: String,
    pub port: u16,
    pub channel: ChannelConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            channel: ChannelConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn listen_addr(&self) -> String {
        format_addr(&self.bind, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    pub shell: String,
    pub shell_flag: String,
    pub channel: ChannelConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let executor = ShellExecutor::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            shell: executor.shell().to_string(),
            shell_flag: executor.flag().to_string(),
            channel: ChannelConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn server_addr(&self) -> String {
        format_addr(&self.host, self.port)
    }

    pub fn executor(&self) -> ShellExecutor {
        ShellExecutor::new(&self.shell, &self.shell_flag)
    }
}

/// `host:port`, bracketing bare IPv6 literals.
fn format_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Load a config file, or fall back to defaults when no path is given.
pub fn load_or_default<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
