//! Friend Message Handling
//!
//! Stateless command dispatch on incoming message text.
//! Commands: /ping, /id. Anything else is echoed back.

/// Recognized message commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Liveness check, answered with "pong"
    Ping,

    /// Ask for the bot's Tox ID
    Id,

    /// Not a command, echoed back to the sender
    Echo,
}

/// Parse command from message text
///
/// Surrounding whitespace is ignored and matching is exact: "/ping now" or
/// "/PING" are plain text.
pub fn parse_command(text: &str) -> Command {
    match text.trim() {
        "/ping" => Command::Ping,
        "/id" => Command::Id,
        _ => Command::Echo,
    }
}

/// Build the reply for an incoming message
///
/// Echo replies carry the message exactly as received, untrimmed.
pub fn reply_for(text: &str, self_address: &str) -> String {
    match parse_command(text) {
        Command::Ping => "pong".to_string(),
        Command::Id => format!("my tox id: {}", self_address),
        Command::Echo => format!("echo: {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "56A1ADE4B65B86BCD51CC73E2CD4E542179F47959FE3E0E21B4B0ACDADE51855D34D34D37CB5";

    #[test]
    fn test_parse_ping() {
        assert_eq!(parse_command("/ping"), Command::Ping);
        assert_eq!(parse_command("  /ping\n"), Command::Ping);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_command("/id"), Command::Id);
        assert_eq!(parse_command("\t/id "), Command::Id);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(parse_command("/ping now"), Command::Echo);
        assert_eq!(parse_command("/PING"), Command::Echo);
        assert_eq!(parse_command("/identity"), Command::Echo);
        assert_eq!(parse_command("ping"), Command::Echo);
        assert_eq!(parse_command(""), Command::Echo);
    }

    #[test]
    fn test_reply_ping() {
        assert_eq!(reply_for("/ping", ADDRESS), "pong");
    }

    #[test]
    fn test_reply_id() {
        assert_eq!(reply_for("/id", ADDRESS), format!("my tox id: {ADDRESS}"));
    }

    #[test]
    fn test_reply_echo() {
        assert_eq!(reply_for("hello", ADDRESS), "echo: hello");
    }

    #[test]
    fn test_reply_echo_keeps_original_whitespace() {
        assert_eq!(reply_for("  hello  ", ADDRESS), "echo:   hello  ");
    }

    #[test]
    fn test_reply_echo_empty_message() {
        assert_eq!(reply_for("", ADDRESS), "echo: ");
    }
}
