//! Two-peer remote command protocol over TCP.
//!
//! The controller sends command lines, the agent runs them through the
//! system shell and replies with the captured output. Both directions use
//! the same length-prefixed framing ([`framing`]).
//!
//! Vocabulary understood by the agent:
//!
//! - `exec <shell text>`: run the text, reply with its output
//! - `exit`: end the session, no reply
//! - anything else: reply `unknown command`

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod framing;
pub mod logging;
pub mod session;

pub use command::Command;
pub use error::{ChannelError, ExecutionError, SessionError};
pub use executor::{CommandExecutor, ExecutionResult, ShellExecutor};
pub use framing::{Connection, FramedChannel};
pub use session::{AgentSession, ControllerSession, SessionEnd};
