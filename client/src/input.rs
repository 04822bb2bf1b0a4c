//! Interpretation of user tokens typed at the console

/// Typed during a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "1"
    RotateLeft,
    /// "2"
    RotateRight,
    /// Anything else, lowercased
    Word(String),
}

impl Command {
    pub fn parse(token: &str) -> Self {
        match token {
            "1" => Command::RotateLeft,
            "2" => Command::RotateRight,
            word => Command::Word(word.to_lowercase()),
        }
    }
}

/// Answer to the play-again prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Continue,
    Stop,
}

impl Vote {
    /// `y`/`yes` or `n`/`no`, any case. `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Vote::Continue),
            "n" | "no" => Some(Vote::Stop),
            _ => None,
        }
    }
}

/// The name as the server will record it: the first word of the line.
/// `None` for a blank line.
pub fn player_name(line: &str) -> Option<String> {
    line.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name() {
        assert_eq!(player_name("  alice smith "), Some("alice".to_string()));
        assert_eq!(player_name("bob"), Some("bob".to_string()));
        assert_eq!(player_name(""), None);
        assert_eq!(player_name(" \t "), None);
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("1"), Command::RotateLeft);
        assert_eq!(Command::parse("2"), Command::RotateRight);
        assert_eq!(Command::parse("Quit"), Command::Word("quit".to_string()));
        assert_eq!(Command::parse("12"), Command::Word("12".to_string()));
    }

    #[test]
    fn test_vote_parsing() {
        assert_eq!(Vote::parse("y"), Some(Vote::Continue));
        assert_eq!(Vote::parse("YES"), Some(Vote::Continue));
        assert_eq!(Vote::parse("N"), Some(Vote::Stop));
        assert_eq!(Vote::parse("no"), Some(Vote::Stop));
        assert_eq!(Vote::parse("maybe"), None);
        assert_eq!(Vote::parse("continue"), None);
    }
}
