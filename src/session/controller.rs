//! Controller side: read a command, send it, show the response.

use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use super::{CommandSource, ResponseSink, SessionEnd};
use crate::command::is_exit;
use crate::error::SessionError;
use crate::framing::{Connection, FramedChannel};

#[derive(Debug)]
enum ControllerState {
    AwaitingInput,
    Sending(String),
    AwaitingResponse,
}

pub struct ControllerSession<S: Connection> {
    id: Uuid,
    channel: FramedChannel<S>,
}

impl<S: Connection> ControllerSession<S> {
    pub fn new(channel: FramedChannel<S>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run the session until `exit`, end of input, disconnect or error.
    /// The connection is closed before this returns.
    pub fn run<C>(mut self, console: &mut C) -> Result<SessionEnd, SessionError>
    where
        C: CommandSource + ResponseSink,
    {
        let span = info_span!("controller", session = %self.id);
        let _enter = span.enter();

        let outcome = self.drive(console);
        self.channel.close();

        match &outcome {
            Ok(end) => info!(?end, "session closed"),
            Err(e) => error!(error = %e, "session ended with error"),
        }
        outcome
    }

    fn drive<C>(&mut self, console: &mut C) -> Result<SessionEnd, SessionError>
    where
        C: CommandSource + ResponseSink,
    {
        let mut state = ControllerState::AwaitingInput;
        loop {
            debug!(?state, "controller step");
            state = match state {
                ControllerState::AwaitingInput => {
                    match console.next_command().map_err(SessionError::Console)? {
                        None => return Ok(SessionEnd::InputClosed),
                        Some(line) if line.trim().is_empty() => {
                            console.empty_command().map_err(SessionError::Console)?;
                            ControllerState::AwaitingInput
                        }
                        Some(line) => ControllerState::Sending(line.trim().to_string()),
                    }
                }
                ControllerState::Sending(command) => {
                    self.channel.send(command.as_bytes())?;
                    if is_exit(&command) {
                        info!("exit sent to agent");
                        return Ok(SessionEnd::ExitSent);
                    }
                    ControllerState::AwaitingResponse
                }
                ControllerState::AwaitingResponse => match self.channel.receive()? {
                    None => {
                        info!("agent disconnected while awaiting response");
                        return Ok(SessionEnd::PeerDisconnected);
                    }
                    Some(bytes) => {
                        console
                            .response(&String::from_utf8_lossy(&bytes))
                            .map_err(SessionError::Console)?;
                        ControllerState::AwaitingInput
                    }
                },
            };
        }
    }
}
