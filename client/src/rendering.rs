//! Plain-text console rendering
//!
//! Everything here returns a `String`; printing is left to the caller so the
//! output can be checked in tests.

use crate::game::InputOutcome;
use shared::{Board, RoundResults, Standing};
use std::fmt::Write;
use std::time::Duration;

pub const VOTE_PROMPT: &str = "Would you like to start a new round? (y/n)";

pub struct Renderer {
    own_name: String,
}

impl Renderer {
    pub fn new(own_name: impl Into<String>) -> Self {
        Self {
            own_name: own_name.into(),
        }
    }

    pub fn welcome(&self) -> String {
        [
            "_-_-_-_- WELCOME TO WORD GRID! -_-_-_-_",
            "When the board is displayed, type in your words and hit ENTER.",
            "To rotate the board to the left type \"1\", to the right type \"2\".",
        ]
        .join("\n")
    }

    pub fn round_start(&self, round: u32, length: Duration) -> String {
        format!(
            "Round {} starts now. You have {} seconds to get your words in!",
            round,
            length.as_secs()
        )
    }

    pub fn board(&self, board: &Board) -> String {
        board.to_string()
    }

    /// Feedback for one typed token. Accepted words and rotations print nothing
    /// here; rotations redraw the board instead.
    pub fn outcome(&self, outcome: &InputOutcome) -> Option<String> {
        match outcome {
            InputOutcome::NotInDictionary(word) => {
                Some(format!("{} is not a valid word.", word))
            }
            InputOutcome::NotOnBoard(word) => {
                Some(format!("{} cannot be spelled on this board.", word))
            }
            InputOutcome::AlreadyFound(word) => Some(format!("You already have {}.", word)),
            InputOutcome::Accepted(_) | InputOutcome::Rotated | InputOutcome::RoundOver => None,
        }
    }

    pub fn results(&self, results: &RoundResults) -> String {
        let mut text = String::from("Time up!\n");

        if !results.voided.is_empty() {
            let _ = writeln!(
                text,
                "Other players also had the following {} word(s), so no one scores them:",
                results.voided.len()
            );
            for word in &results.voided {
                let _ = writeln!(text, "  {}", word);
            }
        }

        text.push_str("The highest score goes to:\n");
        for standing in &results.standings.winners {
            let _ = writeln!(text, "  {} with {} points!", self.who(standing), standing.points);
        }

        if !results.standings.others.is_empty() {
            text.push_str("Here are the other scores:\n");
            for standing in &results.standings.others {
                let _ = writeln!(text, "  {} with {} points.", self.who(standing), standing.points);
            }
        }

        text.push_str(VOTE_PROMPT);
        text
    }

    fn who<'a>(&'a self, standing: &'a Standing) -> &'a str {
        if standing.name == self.own_name {
            "You"
        } else {
            &standing.name
        }
    }
}
