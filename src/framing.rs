//! Length-prefixed framing over a duplex byte stream.
//!
//! Every message travels as
//!
//! ```text
//! [i32 LE length] [payload: length bytes]
//! ```
//!
//! There is no magic number, version or checksum. The prefix is always
//! little-endian regardless of host byte order. A negative or oversized
//! length is a protocol violation and closes the channel.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::{debug, warn};

use crate::error::ChannelError;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound on a single frame payload (64 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// A byte stream that can be shut down in both directions.
pub trait Connection: Read + Write {
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Connection for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// One end of a framed connection.
///
/// Owns the underlying stream for its whole lifetime. The stream is shut
/// down when [`FramedChannel::close`] is called or the channel is dropped.
#[derive(Debug)]
pub struct FramedChannel<S: Connection> {
    stream: S,
    max_frame_len: usize,
    closed: bool,
}

impl<S: Connection> FramedChannel<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            closed: false,
        }
    }

    /// Override the largest payload accepted or sent. Clamped to `i32::MAX`.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len.min(i32::MAX as usize);
        self
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Access the underlying stream, e.g. to inspect what was written.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Send one message. Zero-length payloads are legal.
    ///
    /// # Errors
    ///
    /// Fails if the channel is closed, the payload exceeds the frame limit,
    /// or any write to the stream fails. Callers should end the session on
    /// any error.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        if payload.len() > self.max_frame_len {
            return Err(ChannelError::FrameTooLarge {
                len: payload.len(),
                max: self.max_frame_len,
            });
        }

        let prefix = (payload.len() as i32).to_le_bytes();
        self.stream.write_all(&prefix)?;
        if !payload.is_empty() {
            self.stream.write_all(payload)?;
        }
        self.stream.flush()?;

        debug!(len = payload.len(), "frame sent");
        Ok(())
    }

    /// Receive one message.
    ///
    /// Returns `Ok(None)` when the peer disconnected (cleanly or mid-frame)
    /// or the channel is already closed. A partially received frame is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Fails on read errors and on protocol violations. After a protocol
    /// violation the channel is closed.
    pub fn receive(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        if self.closed {
            return Ok(None);
        }

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        if !self.read_full(&mut prefix)? {
            debug!("end of stream while reading length prefix");
            return Ok(None);
        }

        let len = i32::from_le_bytes(prefix);
        if len < 0 {
            warn!(len, "negative frame length, closing channel");
            self.close();
            return Err(ChannelError::NegativeLength(len));
        }
        let len = len as usize;
        if len > self.max_frame_len {
            warn!(len, max = self.max_frame_len, "oversized frame, closing channel");
            self.close();
            return Err(ChannelError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }
        if len == 0 {
            return Ok(Some(Vec::new()));
        }

        let mut payload = vec![0u8; len];
        if !self.read_full(&mut payload)? {
            debug!(len, "end of stream while reading payload");
            return Ok(None);
        }

        debug!(len, "frame received");
        Ok(Some(payload))
    }

    /// Shut the stream down in both directions. Shutdown errors are
    /// tolerated; calling this more than once is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown() {
            debug!(error = %e, "shutdown failed while closing channel");
        }
    }

    /// Fill `buf` completely. Returns `false` if the stream ended first.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<bool, ChannelError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Ok(false),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }
}

impl<S: Connection> Drop for FramedChannel<S> {
    fn drop(&mut self) {
        self.close();
    }
}
