//! The per-match round coordinator
//!
//! One [`GameCoordinator`] owns a cohort of sessions and drives them through
//! the round cycle until somebody declines to play on:
//!
//! ```text
//! Dealing -> Collecting -> Resolving -> Reporting -> Voting -> Dealing | Ended
//! ```
//!
//! All session I/O happens sequentially on the coordinator's own task, so the
//! order of messages within a match is fixed. Nothing here is shared with
//! other matches apart from the read-only cube pool.

use crate::session::PlayerSession;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Board, CubePool, ProtocolError, Standing, Standings};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Dealing,
    Collecting,
    Resolving,
    Reporting,
    Voting,
    Ended,
}

/// How a match finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub match_id: u32,
    pub rounds: u32,
    pub standings: Standings,
}

/// Words that appear in at least two of the given sets
pub fn find_duplicates<'a, I>(word_sets: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a HashSet<String>>,
{
    let mut seen_by: HashMap<&str, usize> = HashMap::new();
    for words in word_sets {
        for word in words {
            *seen_by.entry(word.as_str()).or_insert(0) += 1;
        }
    }

    seen_by
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Splits standings into everyone tied on the top score and the rest,
/// keeping the given order inside both groups
pub fn compute_standings(standings: Vec<Standing>) -> Standings {
    let top = match standings.iter().map(|s| s.points).max() {
        Some(top) => top,
        None => return Standings::default(),
    };

    let (winners, others) = standings.into_iter().partition(|s| s.points == top);
    Standings { winners, others }
}

pub struct GameCoordinator<S, R = StdRng> {
    match_id: u32,
    sessions: Vec<PlayerSession<S>>,
    pool: Arc<CubePool>,
    board: Board,
    rng: R,
    phase: Phase,
    rounds: u32,
}

impl<S: AsyncRead + AsyncWrite> GameCoordinator<S, StdRng> {
    pub fn new(match_id: u32, sessions: Vec<PlayerSession<S>>, pool: Arc<CubePool>) -> Self {
        Self::with_rng(match_id, sessions, pool, StdRng::from_entropy())
    }
}

impl<S: AsyncRead + AsyncWrite, R: Rng> GameCoordinator<S, R> {
    /// Coordinator with a caller-supplied board RNG
    pub fn with_rng(
        match_id: u32,
        sessions: Vec<PlayerSession<S>>,
        pool: Arc<CubePool>,
        rng: R,
    ) -> Self {
        Self {
            match_id,
            sessions,
            pool,
            board: Board::default(),
            rng,
            phase: Phase::Dealing,
            rounds: 0,
        }
    }

    /// Plays rounds until a vote fails or a peer breaks the protocol.
    ///
    /// Every session is closed before this returns, whatever the outcome. An
    /// error ends this match only; the other players of the cohort are sent
    /// the final token rather than being left waiting.
    pub async fn run(mut self) -> Result<MatchSummary, ProtocolError> {
        info!(
            "Match {} starting with {} players",
            self.match_id,
            self.sessions.len()
        );

        let outcome = self.play().await;
        let failed_in = self.phase;

        for session in &mut self.sessions {
            session.close().await;
        }
        self.phase = Phase::Ended;

        match outcome {
            Ok(()) => {
                let summary = MatchSummary {
                    match_id: self.match_id,
                    rounds: self.rounds,
                    standings: self.standings(),
                };
                info!(
                    "Match {} finished after {} rounds",
                    self.match_id, self.rounds
                );
                Ok(summary)
            }
            Err(e) => {
                error!(
                    "Match {} aborted during {:?} of round {}: {}",
                    self.match_id, failed_in, self.rounds, e
                );
                Err(e)
            }
        }
    }

    async fn play(&mut self) -> Result<(), ProtocolError> {
        while self.phase != Phase::Ended {
            let next = self.step().await?;
            debug!("Match {}: {:?} -> {:?}", self.match_id, self.phase, next);
            self.phase = next;
        }
        Ok(())
    }

    /// Runs the current phase and returns the one that follows it
    async fn step(&mut self) -> Result<Phase, ProtocolError> {
        match self.phase {
            Phase::Dealing => {
                self.board.regenerate(&self.pool, &mut self.rng);
                self.rounds += 1;
                info!(
                    "Match {} round {} board {}",
                    self.match_id,
                    self.rounds,
                    self.board.encode()
                );
                for session in &mut self.sessions {
                    session.start_round(&self.board).await?;
                }
                Ok(Phase::Collecting)
            }

            Phase::Collecting => {
                for session in &mut self.sessions {
                    session.collect_words().await?;
                }
                Ok(Phase::Resolving)
            }

            Phase::Resolving => {
                let duplicates = find_duplicates(self.sessions.iter().map(|s| s.words()));
                if !duplicates.is_empty() {
                    debug!(
                        "Match {} voiding {} shared words",
                        self.match_id,
                        duplicates.len()
                    );
                }
                for session in &mut self.sessions {
                    session.void_words(&duplicates);
                }
                for session in &mut self.sessions {
                    let earned = session.score_round();
                    debug!("{} earned {} points", session.name(), earned);
                }
                Ok(Phase::Reporting)
            }

            Phase::Reporting => {
                let standings = self.standings();
                for session in &mut self.sessions {
                    session.send_results(&standings).await?;
                }
                Ok(Phase::Voting)
            }

            Phase::Voting => {
                // Every vote is read, even after a refusal, so no peer is left
                // with an unread line.
                let mut everyone_continues = true;
                for session in &mut self.sessions {
                    if !session.confirm_continue().await? {
                        info!("{} declined another round", session.name());
                        everyone_continues = false;
                    }
                }
                Ok(if everyone_continues {
                    Phase::Dealing
                } else {
                    Phase::Ended
                })
            }

            Phase::Ended => Ok(Phase::Ended),
        }
    }

    fn standings(&self) -> Standings {
        compute_standings(self.sessions.iter().map(|s| s.standing()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tokio_test::io::{Builder, Mock};

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    async fn seat(mock: Mock, cohort_size: usize, seat: usize) -> PlayerSession<Mock> {
        PlayerSession::handshake(mock, cohort_size, seat)
            .await
            .unwrap()
    }

    #[test]
    fn test_find_duplicates() {
        let a = set(&["apple", "banana", "fig"]);
        let b = set(&["apple", "cherry"]);
        let c = set(&["cherry", "fig", "apple", "kiwi"]);

        let duplicates = find_duplicates([&a, &b, &c]);
        assert_eq!(duplicates, set(&["apple", "cherry", "fig"]));

        assert!(find_duplicates([&a]).is_empty());
        assert!(find_duplicates(Vec::<&HashSet<String>>::new()).is_empty());
    }

    #[test]
    fn test_standings_single_winner() {
        let standings = compute_standings(vec![
            Standing::new("alice", 3),
            Standing::new("bob", 7),
            Standing::new("carol", 1),
        ]);
        assert_eq!(standings.winners, vec![Standing::new("bob", 7)]);
        assert_eq!(
            standings.others,
            vec![Standing::new("alice", 3), Standing::new("carol", 1)]
        );
    }

    #[test]
    fn test_standings_ties_keep_seat_order() {
        let standings = compute_standings(vec![
            Standing::new("alice", 2),
            Standing::new("bob", 5),
            Standing::new("carol", 5),
            Standing::new("dave", 0),
        ]);
        assert_eq!(standings.winners.len(), 2);
        assert_eq!(standings.winners[0].name, "bob");
        assert_eq!(standings.winners[1].name, "carol");
        assert_eq!(standings.encode(), "2 bob 5 carol 5 alice 2 dave 0");
    }

    #[test]
    fn test_standings_everyone_tied_at_zero() {
        let standings =
            compute_standings(vec![Standing::new("alice", 0), Standing::new("bob", 0)]);
        assert_eq!(standings.winners.len(), 2);
        assert!(standings.others.is_empty());
        assert_eq!(compute_standings(vec![]), Standings::default());
    }

    #[tokio::test]
    async fn test_single_round_with_shared_word() {
        let pool = Arc::new(CubePool::classic());
        let board = Board::generate(&pool, &mut StdRng::seed_from_u64(7));
        let deal = format!("continue {}\n", board.encode());

        let alice = Builder::new()
            .write(b"2\n")
            .read(b"alice\n")
            .write(deal.as_bytes())
            .read(b"2 apple banana\n")
            .write(b"1 apple 2 alice 3 bob 3\n")
            .read(b"continue\n")
            .write(b"done\n")
            .build();
        let bob = Builder::new()
            .write(b"2\n")
            .read(b"bob\n")
            .write(deal.as_bytes())
            .read(b"2 cherry apple\n")
            .write(b"1 apple 2 alice 3 bob 3\n")
            .read(b"stop\n")
            .write(b"done\n")
            .build();

        let sessions = vec![seat(alice, 2, 0).await, seat(bob, 2, 1).await];
        let coordinator =
            GameCoordinator::with_rng(1, sessions, pool, StdRng::seed_from_u64(7));
        let summary = coordinator.run().await.unwrap();

        assert_eq!(summary.match_id, 1);
        assert_eq!(summary.rounds, 1);
        assert_eq!(
            summary.standings.winners,
            vec![Standing::new("alice", 3), Standing::new("bob", 3)]
        );
    }

    #[tokio::test]
    async fn test_scores_accumulate_across_rounds() {
        let pool = Arc::new(CubePool::classic());
        let mut rng = StdRng::seed_from_u64(42);
        let first = format!("continue {}\n", Board::generate(&pool, &mut rng).encode());
        let second = format!("continue {}\n", Board::generate(&pool, &mut rng).encode());

        let alice = Builder::new()
            .write(b"2\n")
            .read(b"alice\n")
            .write(first.as_bytes())
            .read(b"1 aardvark\n")
            .write(b"0 1 alice 11 bob 1\n")
            .read(b"continue\n")
            .write(second.as_bytes())
            .read(b"0\n")
            .write(b"0 1 alice 11 bob 4\n")
            .read(b"stop\n")
            .write(b"done\n")
            .build();
        let bob = Builder::new()
            .write(b"2\n")
            .read(b"bob\n")
            .write(first.as_bytes())
            .read(b"1 cat\n")
            .write(b"0 1 alice 11 bob 1\n")
            .read(b"continue\n")
            .write(second.as_bytes())
            .read(b"1 banana\n")
            .write(b"0 1 alice 11 bob 4\n")
            .read(b"stop\n")
            .write(b"done\n")
            .build();

        let sessions = vec![seat(alice, 2, 0).await, seat(bob, 2, 1).await];
        let summary = GameCoordinator::with_rng(2, sessions, pool, StdRng::seed_from_u64(42))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.standings.winners, vec![Standing::new("alice", 11)]);
        assert_eq!(summary.standings.others, vec![Standing::new("bob", 4)]);
    }

    #[tokio::test]
    async fn test_disconnect_ends_match_and_closes_everyone() {
        let pool = Arc::new(CubePool::classic());
        let board = Board::generate(&pool, &mut StdRng::seed_from_u64(1));
        let deal = format!("continue {}\n", board.encode());

        let alice = Builder::new()
            .write(b"2\n")
            .read(b"alice\n")
            .write(deal.as_bytes())
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .write(b"done\n")
            .build();
        let bob = Builder::new()
            .write(b"2\n")
            .read(b"bob\n")
            .write(deal.as_bytes())
            .write(b"done\n")
            .build();

        let sessions = vec![seat(alice, 2, 0).await, seat(bob, 2, 1).await];
        let result = GameCoordinator::with_rng(3, sessions, pool, StdRng::seed_from_u64(1))
            .run()
            .await;

        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }
}
