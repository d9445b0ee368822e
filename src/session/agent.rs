//! Agent side: receive a command, run it, reply with the result.

use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use super::SessionEnd;
use crate::command::{Command, UNKNOWN_COMMAND_RESPONSE};
use crate::error::SessionError;
use crate::executor::{CommandExecutor, error_response};
use crate::framing::{Connection, FramedChannel};

pub struct AgentSession<S: Connection, E: CommandExecutor> {
    id: Uuid,
    channel: FramedChannel<S>,
    executor: E,
}

impl<S: Connection, E: CommandExecutor> AgentSession<S, E> {
    pub fn new(channel: FramedChannel<S>, executor: E) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            executor,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serve commands until `exit`, disconnect or a transport error.
    /// The connection is closed before this returns.
    pub fn run(mut self) -> Result<SessionEnd, SessionError> {
        let span = info_span!("agent", session = %self.id);
        let _enter = span.enter();

        let outcome = self.serve();
        self.channel.close();

        match &outcome {
            Ok(end) => info!(?end, "session closed"),
            Err(e) => error!(error = %e, "session ended with error"),
        }
        outcome
    }

    fn serve(&mut self) -> Result<SessionEnd, SessionError> {
        loop {
            let Some(bytes) = self.channel.receive()? else {
                info!("controller disconnected");
                return Ok(SessionEnd::PeerDisconnected);
            };

            let line = String::from_utf8_lossy(&bytes);
            let response = match Command::parse(&line) {
                Command::Exit => {
                    info!("exit received");
                    return Ok(SessionEnd::ExitReceived);
                }
                Command::Exec(shell_text) => self.dispatch(&shell_text),
                Command::Unknown(text) => {
                    warn!(command = %text, "unknown command");
                    UNKNOWN_COMMAND_RESPONSE.to_string()
                }
            };

            let response = fit_response(response, self.channel.max_frame_len());
            self.channel.send(response.as_bytes())?;
        }
    }

    fn dispatch(&mut self, shell_text: &str) -> String {
        match self.executor.run(shell_text) {
            Ok(result) => result.into_response(),
            Err(e) => {
                warn!(error = %e, "command execution failed");
                error_response(&e)
            }
        }
    }
}

/// Replace a reply that cannot go out in one frame with a short notice.
fn fit_response(response: String, max_len: usize) -> String {
    if response.len() <= max_len {
        return response;
    }
    warn!(len = response.len(), max = max_len, "reply exceeds frame limit");
    let mut notice = format!("output too large ({} bytes, limit {max_len})", response.len());
    // the notice is ASCII, so any byte index is a char boundary
    notice.truncate(max_len);
    notice
}
