//! Line- and token-oriented wire codec used by both ends of a match
//!
//! Every message is one newline-terminated line of whitespace-separated
//! tokens. Readers are token based, so a message may also be split across
//! several lines without changing its meaning.

use crate::error::ProtocolError;
use std::collections::VecDeque;
use tokio::io::{
    split, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
    ReadHalf, WriteHalf,
};

/// Sent by the server in front of every new board, and by a client voting to play on
pub const CONTINUE_TOKEN: &str = "continue";
/// Sent by a client declining another round
pub const STOP_TOKEN: &str = "stop";
/// Sent by the server when the match is over, right before it hangs up
pub const DONE_TOKEN: &str = "done";

/// Splits buffered lines into whitespace-separated tokens
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: AsyncBufRead + Unpin> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    async fn read_raw_line(&mut self) -> Result<String, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(ProtocolError::Closed);
        }
        Ok(line)
    }

    pub async fn next_token(&mut self) -> Result<String, ProtocolError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let line = self.read_raw_line().await?;
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Rest of the current line, or the next full line when nothing is pending.
    /// Surrounding whitespace is trimmed; the result may be empty.
    pub async fn next_line(&mut self) -> Result<String, ProtocolError> {
        if !self.pending.is_empty() {
            let rest: Vec<String> = self.pending.drain(..).collect();
            return Ok(rest.join(" "));
        }
        let line = self.read_raw_line().await?;
        Ok(line.trim().to_string())
    }

    pub async fn next_count(&mut self) -> Result<usize, ProtocolError> {
        let token = self.next_token().await?;
        token.parse().map_err(|_| ProtocolError::BadCount(token))
    }

    /// Reads a count followed by that many tokens.
    ///
    /// The count comes from the peer, so storage grows with the tokens that
    /// actually arrive rather than with the announced number.
    pub async fn next_word_list(&mut self) -> Result<Vec<String>, ProtocolError> {
        let count = self.next_count().await?;
        let mut words = Vec::new();
        for _ in 0..count {
            words.push(self.next_token().await?);
        }
        Ok(words)
    }

    pub async fn expect_token(&mut self, expected: &'static str) -> Result<(), ProtocolError> {
        let token = self.next_token().await?;
        if token == expected {
            Ok(())
        } else {
            Err(ProtocolError::Unexpected {
                expected,
                found: token,
            })
        }
    }

    /// Drops any buffered tokens that were not consumed yet
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }
}

/// A bidirectional peer connection: token reader on one half, line writer on the other
pub struct Connection<S> {
    reader: TokenReader<BufReader<ReadHalf<S>>>,
    writer: WriteHalf<S>,
}

impl<S: AsyncRead + AsyncWrite> Connection<S> {
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = split(stream);
        Self {
            reader: TokenReader::new(BufReader::new(read_half)),
            writer: write_half,
        }
    }

    /// Writes `line` followed by a newline and flushes it
    pub async fn send_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');
        self.writer.write_all(framed.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn next_token(&mut self) -> Result<String, ProtocolError> {
        self.reader.next_token().await
    }

    pub async fn next_line(&mut self) -> Result<String, ProtocolError> {
        self.reader.next_line().await
    }

    pub async fn next_count(&mut self) -> Result<usize, ProtocolError> {
        self.reader.next_count().await
    }

    pub async fn next_word_list(&mut self) -> Result<Vec<String>, ProtocolError> {
        self.reader.next_word_list().await
    }

    pub async fn expect_token(&mut self, expected: &'static str) -> Result<(), ProtocolError> {
        self.reader.expect_token(expected).await
    }

    /// Closes the write direction. The peer sees end-of-stream after any
    /// data already sent.
    pub async fn shutdown(&mut self) -> Result<(), ProtocolError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

/// `"<n> w1 w2 ..."`
pub fn encode_word_list<I, T>(words: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let words: Vec<T> = words.into_iter().collect();
    let mut encoded = words.len().to_string();
    for word in &words {
        encoded.push(' ');
        encoded.push_str(word.as_ref());
    }
    encoded
}

/// A player's name and cumulative score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub points: u32,
}

impl Standing {
    pub fn new(name: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Scoreboard after a round: every player sharing the top score, then everyone
/// else, both in seating order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Standings {
    pub winners: Vec<Standing>,
    pub others: Vec<Standing>,
}

impl Standings {
    /// `"<winner count> name points ... name points"`
    pub fn encode(&self) -> String {
        let mut encoded = self.winners.len().to_string();
        for standing in self.winners.iter().chain(&self.others) {
            encoded.push_str(&format!(" {} {}", standing.name, standing.points));
        }
        encoded
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.winners.iter().chain(&self.others)
    }
}

/// What each player learns when a round closes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundResults {
    /// This player's words that someone else also found
    pub voided: Vec<String>,
    pub standings: Standings,
}

impl RoundResults {
    pub fn encode(&self) -> String {
        format!(
            "{} {}",
            encode_word_list(&self.voided),
            self.standings.encode()
        )
    }

    /// Reads a results message. The sender does not say how many non-winners
    /// follow, so the cohort size is needed to know where the message ends.
    pub async fn read<S>(
        connection: &mut Connection<S>,
        cohort_size: usize,
    ) -> Result<Self, ProtocolError>
    where
        S: AsyncRead + AsyncWrite,
    {
        let voided = connection.next_word_list().await?;

        let winner_count = connection.next_count().await?;
        let mut winners = Vec::new();
        for _ in 0..winner_count {
            winners.push(read_standing(connection).await?);
        }

        let other_count = cohort_size.saturating_sub(winner_count);
        let mut others = Vec::new();
        for _ in 0..other_count {
            others.push(read_standing(connection).await?);
        }

        Ok(Self {
            voided,
            standings: Standings { winners, others },
        })
    }
}

async fn read_standing<S>(connection: &mut Connection<S>) -> Result<Standing, ProtocolError>
where
    S: AsyncRead + AsyncWrite,
{
    let name = connection.next_token().await?;
    let points = connection.next_token().await?;
    let points = points.parse().map_err(|_| ProtocolError::Unexpected {
        expected: "a score",
        found: points,
    })?;
    Ok(Standing { name, points })
}
