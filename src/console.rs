//! Terminal front end for the controller.

use std::io::{self, BufRead, Write};

use crate::session::{CommandSource, ResponseSink};

pub const PROMPT: &str = "Enter command (e.g. 'exec whoami' or 'exit'): ";
const RULE: &str = "--------------------";

/// Line-oriented console over any reader/writer pair, normally stdin/stdout.
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> CommandSource for Console<R, W> {
    fn next_command(&mut self) -> io::Result<Option<String>> {
        write!(self.writer, "{PROMPT}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> ResponseSink for Console<R, W> {
    fn response(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "Agent response:\n{RULE}\n{text}\n{RULE}")?;
        self.writer.flush()
    }

    fn empty_command(&mut self) -> io::Result<()> {
        writeln!(self.writer, "Command cannot be empty. Try again.")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_reads_lines_until_eof() {
        let mut console = Console::new(Cursor::new("exec ls\nexit\n"), Vec::new());
        assert_eq!(console.next_command().unwrap().as_deref(), Some("exec ls\n"));
        assert_eq!(console.next_command().unwrap().as_deref(), Some("exit\n"));
        assert_eq!(console.next_command().unwrap(), None);

        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out.matches(PROMPT).count(), 3);
    }

    #[test]
    fn test_response_is_framed_by_rules() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        console.response("hi").unwrap();
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out, format!("Agent response:\n{RULE}\nhi\n{RULE}\n"));
    }

    #[test]
    fn test_empty_command_notice() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        console.empty_command().unwrap();
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert!(out.contains("cannot be empty"));
    }
}
