//! Error types shared by the channel, executor and session loops.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of the framed transport.
///
/// `Closed` and `Io` are transport failures. `NegativeLength` and
/// `FrameTooLarge` are protocol violations: the peer sent a length prefix
/// that cannot be trusted, and the channel has already been closed.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("channel is closed")]
    Closed,

    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    #[error("protocol violation: negative frame length {0}")]
    NegativeLength(i32),

    #[error("protocol violation: frame length {len} exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },
}

impl ChannelError {
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            ChannelError::NegativeLength(_) | ChannelError::FrameTooLarge { .. }
        )
    }
}

/// The command executor could not run the requested shell text.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("could not start `{shell}`: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("error while waiting for command: {0}")]
    Wait(#[source] io::Error),
}

/// Terminal error of a session loop.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Reading commands from, or writing responses to, the local console failed.
    #[error("console error: {0}")]
    Console(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
