//! Server-side state and protocol for one connected player
//!
//! A [`PlayerSession`] wraps a single peer connection together with everything
//! the server tracks about that player across a match:
//! - the name chosen at handshake, fixed for the rest of the match
//! - the words submitted this round (a set, so repeats collapse)
//! - the words voided this round because another player found them too
//! - the cumulative score, which only ever grows
//!
//! All methods are driven sequentially by the owning match task; a session is
//! never shared between tasks.

use log::{debug, info};
use shared::{
    Board, Connection, ProtocolError, RoundResults, Standing, Standings, CONTINUE_TOKEN,
    DONE_TOKEN,
};
use std::collections::HashSet;
use tokio::io::{AsyncRead, AsyncWrite};

/// Points for a single non-voided word
pub fn score_word(word: &str) -> u32 {
    match word.chars().count() {
        0..=4 => 1,
        5 => 2,
        6 => 3,
        7 => 5,
        _ => 11,
    }
}

pub struct PlayerSession<S> {
    /// Position in the cohort, used for ordering and fallback names
    seat: usize,
    name: String,
    connection: Connection<S>,
    words: HashSet<String>,
    voided: Vec<String>,
    points: u32,
    closed: bool,
}

impl<S: AsyncRead + AsyncWrite> PlayerSession<S> {
    /// Performs the opening exchange: tells the peer the cohort size, then
    /// blocks for the name line.
    ///
    /// Only the first word of the line is kept so that names stay single
    /// tokens on the wire. A blank line gets a seat-based name.
    pub async fn handshake(stream: S, cohort_size: usize, seat: usize) -> Result<Self, ProtocolError> {
        let mut connection = Connection::new(stream);
        connection.send_line(&cohort_size.to_string()).await?;

        let line = connection.next_line().await?;
        let name = match line.split_whitespace().next() {
            Some(name) => name.to_string(),
            None => format!("player{}", seat + 1),
        };
        info!("Seat {} joined as {}", seat, name);

        Ok(Self {
            seat,
            name,
            connection,
            words: HashSet::new(),
            voided: Vec::new(),
            points: 0,
            closed: false,
        })
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn words(&self) -> &HashSet<String> {
        &self.words
    }

    pub fn voided(&self) -> &[String] {
        &self.voided
    }

    /// Everything this player submitted this round, voided or not
    pub fn all_words(&self) -> HashSet<String> {
        self.words.iter().chain(&self.voided).cloned().collect()
    }

    pub fn standing(&self) -> Standing {
        Standing::new(self.name.clone(), self.points)
    }

    /// Resets the per-round state and sends the new board
    pub async fn start_round(&mut self, board: &Board) -> Result<(), ProtocolError> {
        self.words.clear();
        self.voided.clear();
        self.connection
            .send_line(&format!("{} {}", CONTINUE_TOKEN, board.encode()))
            .await
    }

    /// Blocks until the player submits their word list. Returns how many
    /// distinct words were received.
    pub async fn collect_words(&mut self) -> Result<usize, ProtocolError> {
        let submitted = self.connection.next_word_list().await?;
        self.words
            .extend(submitted.into_iter().map(|word| word.to_lowercase()));
        debug!("{} submitted {} words", self.name, self.words.len());
        Ok(self.words.len())
    }

    /// Moves every word of `duplicates` this player submitted into the voided list
    pub fn void_words(&mut self, duplicates: &HashSet<String>) -> usize {
        let mut hits = Vec::new();
        for word in duplicates {
            if self.words.remove(word) {
                hits.push(word.clone());
            }
        }
        hits.sort();

        let count = hits.len();
        self.voided.extend(hits);
        count
    }

    /// Adds the value of every remaining word to the running total and
    /// returns what this round was worth
    pub fn score_round(&mut self) -> u32 {
        let earned: u32 = self.words.iter().map(|word| score_word(word)).sum();
        self.points += earned;
        earned
    }

    pub async fn send_results(&mut self, standings: &Standings) -> Result<(), ProtocolError> {
        let results = RoundResults {
            voided: self.voided.clone(),
            standings: standings.clone(),
        };
        self.connection.send_line(&results.encode()).await
    }

    /// Reads the player's vote. Anything other than the exact continue token
    /// counts as a refusal.
    pub async fn confirm_continue(&mut self) -> Result<bool, ProtocolError> {
        let vote = self.connection.next_token().await?;
        debug!("{} voted {}", self.name, vote);
        Ok(vote == CONTINUE_TOKEN)
    }

    /// Says goodbye and hangs up. Safe to call after a failed exchange and
    /// more than once; failures here are only logged.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.connection.send_line(DONE_TOKEN).await {
            debug!("Could not send final token to {}: {}", self.name, e);
        }
        if let Err(e) = self.connection.shutdown().await {
            debug!("Could not shut down connection to {}: {}", self.name, e);
        }
        info!("{} left with {} points", self.name, self.points);
    }
}
