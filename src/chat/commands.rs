//! Slash command parsing for the chat REPL.
//!
//! Commands control the session locally and are never sent to the
//! travel-planning service.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Log in with email and password.
    Login { email: String, password: String },

    /// Create an account. The full name is optional.
    Signup {
        email: String,
        password: String,
        fullname: Option<String>,
    },

    /// Log out and clear the stored session.
    Logout,

    /// Start a fresh chat, discarding the current transcript.
    NewChat,

    /// Switch to a different chat id.
    SelectChat(String),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if
/// it should be sent to the assistant as a regular message.
///
/// # Examples
///
/// ```
/// # use wayfarer::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/login ada@example.com hunter2").is_some());
/// assert!(parse_command("Plan me a week in Kyoto").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "login" => parse_login(argument),
        "signup" => parse_signup(argument),
        "logout" => ChatCommand::Logout,
        "new" => ChatCommand::NewChat,
        "chat" => match argument {
            Some(id) => ChatCommand::SelectChat(id.to_string()),
            None => ChatCommand::Invalid("/chat requires a chat id".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_login(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/login requires <email> <password>".to_string());
    };
    let mut parts = arg.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(email), Some(password), None) => ChatCommand::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        _ => ChatCommand::Invalid("/login requires <email> <password>".to_string()),
    }
}

fn parse_signup(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/signup requires <email> <password> [full name]".to_string());
    };
    let mut parts = arg.splitn(3, ' ');
    let email = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let password = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let fullname = parts.next().map(str::trim).filter(|s| !s.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => ChatCommand::Signup {
            email: email.to_string(),
            password: password.to_string(),
            fullname: fullname.map(|s| s.to_string()),
        },
        _ => ChatCommand::Invalid("/signup requires <email> <password> [full name]".to_string()),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /login <email> <password>            Log in to the service
  /signup <email> <password> [name]    Create an account
  /logout                              Log out and clear the session
  /new                                 Start a fresh chat
  /chat <id>                           Switch to another chat id
  /stats                               Show session statistics
  /help                                Show this help message
  /quit                                Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_login_command() {
        assert_eq!(
            parse_command("/login ada@example.com hunter2"),
            Some(ChatCommand::Login {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            })
        );
        assert!(matches!(
            parse_command("/login ada@example.com"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/login"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn parse_signup_command() {
        assert_eq!(
            parse_command("/signup ada@example.com hunter2 Ada Lovelace"),
            Some(ChatCommand::Signup {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
                fullname: Some("Ada Lovelace".to_string()),
            })
        );
        assert_eq!(
            parse_command("/signup ada@example.com hunter2"),
            Some(ChatCommand::Signup {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
                fullname: None,
            })
        );
    }

    #[test]
    fn parse_chat_selection() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::NewChat));
        assert_eq!(
            parse_command("/chat 1700000000000"),
            Some(ChatCommand::SelectChat("1700000000000".to_string()))
        );
        assert!(matches!(
            parse_command("/chat"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("chat id")
        ));
    }

    #[test]
    fn parse_stats_and_logout() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/logout"), Some(ChatCommand::Logout));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/teleport"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("/teleport")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Plan me a week in Kyoto"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/login"));
        assert!(help.contains("/new"));
        assert!(help.contains("/quit"));
    }
}
