//! Command vocabulary understood by the agent.

/// Response sent for anything that is neither `exit` nor `exec <text>`.
pub const UNKNOWN_COMMAND_RESPONSE: &str = "unknown command";

const EXEC_PREFIX: &str = "exec ";

/// A classified command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Shell text to run, case preserved.
    Exec(String),
    Unknown(String),
}

impl Command {
    /// Classify a command line. Keywords are matched case-insensitively
    /// after trimming surrounding whitespace.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if is_exit(line) {
            return Command::Exit;
        }
        match line.get(..EXEC_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(EXEC_PREFIX) => {
                Command::Exec(line[EXEC_PREFIX.len()..].to_string())
            }
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// True if `line` is the `exit` keyword, ignoring case and surrounding whitespace.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_is_case_insensitive() {
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("  EXIT \n"), Command::Exit);
        assert_eq!(Command::parse("Exit"), Command::Exit);
    }

    #[test]
    fn test_exec_keeps_shell_text_case() {
        assert_eq!(
            Command::parse("exec echo Hello"),
            Command::Exec("echo Hello".to_string())
        );
        assert_eq!(
            Command::parse("EXEC ls -la /Tmp"),
            Command::Exec("ls -la /Tmp".to_string())
        );
    }

    #[test]
    fn test_exec_without_text_is_unknown() {
        // trimming removes the separator, so the keyword alone does not match
        assert_eq!(Command::parse("exec"), Command::Unknown("exec".to_string()));
        assert_eq!(Command::parse("exec   "), Command::Unknown("exec".to_string()));
    }

    #[test]
    fn test_other_text_is_unknown() {
        assert_eq!(Command::parse("foobar"), Command::Unknown("foobar".to_string()));
        assert_eq!(Command::parse("exit now"), Command::Unknown("exit now".to_string()));
        assert_eq!(Command::parse("execute ls"), Command::Unknown("execute ls".to_string()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(Command::parse("ééé"), Command::Unknown("ééé".to_string()));
    }
}
