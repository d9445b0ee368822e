//! Command/response session loops for both peers.
//!
//! ```text
//! controller                          agent
//!   AwaitingInput                       AwaitingCommand
//!     │ next_command()                    │ receive()
//!   Sending ──── frame(command) ────▶   Dispatching ── executor.run()
//!     │ (exit: Closed)                    │ (exit: Closed, no reply)
//!   AwaitingResponse ◀── frame(response) ─┘
//!     │ sink.response()
//!   AwaitingInput
//! ```
//!
//! Both loops own their [`FramedChannel`](crate::framing::FramedChannel)
//! and close it on every exit path.

pub mod agent;
pub mod controller;

use std::io;

pub use agent::AgentSession;
pub use controller::ControllerSession;

/// How a session reached `Closed` without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The controller sent `exit`.
    ExitSent,
    /// The agent received `exit`.
    ExitReceived,
    /// The controller's command source ran dry.
    InputClosed,
    /// The peer closed the connection.
    PeerDisconnected,
}

/// Supplies command lines to the controller.
pub trait CommandSource {
    /// Next raw line, or `None` once no more input will arrive.
    fn next_command(&mut self) -> io::Result<Option<String>>;
}

/// Receives what the controller has to show the operator.
pub trait ResponseSink {
    fn response(&mut self, text: &str) -> io::Result<()>;

    /// Called when an empty or whitespace-only line was rejected.
    fn empty_command(&mut self) -> io::Result<()> {
        Ok(())
    }
}
