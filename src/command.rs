//! Free-text command parsing
//!
//! Inbound messages are plain text such as `vote PROJ-12` or `user-vote 5`.
//! The keyword is matched case-insensitively; positional arguments keep
//! the casing the user typed.

/// Recognized command keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// `vote [story-id]`
    StartVote,
    /// `user-vote <points>`
    UserVote,
    /// `end-vote`
    EndVote,
    /// Anything else, carrying the lowercased keyword (empty for blank input)
    Unknown(String),
}

impl CommandKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "vote" => CommandKind::StartVote,
            "user-vote" => CommandKind::UserVote,
            "end-vote" => CommandKind::EndVote,
            other => CommandKind::Unknown(other.to_string()),
        }
    }

    /// The keyword as typed (lowercased)
    pub fn keyword(&self) -> &str {
        match self {
            CommandKind::StartVote => "vote",
            CommandKind::UserVote => "user-vote",
            CommandKind::EndVote => "end-vote",
            CommandKind::Unknown(keyword) => keyword.as_str(),
        }
    }
}

/// A parsed inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    /// Positional arguments following the keyword
    pub args: Vec<String>,
    /// Trimmed, lowercased input, echoed back for unknown commands
    pub normalized: String,
}

impl Command {
    /// First positional argument, if any
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Parse raw message text into a command. Never fails.
pub fn parse(text: &str) -> Command {
    let trimmed = text.trim();
    let normalized = trimmed.to_lowercase();

    if trimmed.is_empty() {
        return Command {
            kind: CommandKind::Unknown(String::new()),
            args: vec![],
            normalized,
        };
    }

    // Split on single spaces: repeated spaces produce empty tokens
    let mut tokens = trimmed.split(' ');
    let keyword = tokens.next().unwrap_or_default().to_lowercase();
    let args = tokens.map(str::to_string).collect();

    Command {
        kind: CommandKind::from_keyword(&keyword),
        args,
        normalized,
    }
}
