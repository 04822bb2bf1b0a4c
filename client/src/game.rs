//! Client-side round control
//!
//! Each round runs two activities at once: the input loop reading the user's
//! words, and a timer task that closes the round when time runs out. They
//! share the round's word set behind a mutex. The timer is the only one that
//! talks to the server while a round is running; the input loop takes over
//! the connection again for the continuation vote once the timer is done.

use crate::dictionary::Dictionary;
use crate::error::ClientError;
use crate::input::{Command, Vote};
use crate::network::JoinedMatch;
use crate::rendering::{Renderer, VOTE_PROMPT};
use log::{debug, info, warn};
use shared::{
    encode_word_list, Board, Connection, ProtocolError, RoundResults, TokenReader,
    CONTINUE_TOKEN, DONE_TOKEN, STOP_TOKEN,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Default round length
pub const ROUND_LENGTH: Duration = Duration::from_secs(180);

/// State shared between the input loop and the round timer
#[derive(Debug, Default)]
pub struct RoundState {
    /// Cleared by the timer; once false no more words are accepted
    pub active: bool,
    /// Accepted words, lowercase
    pub words: HashSet<String>,
}

/// What became of one token typed during a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Rotated,
    Accepted(String),
    AlreadyFound(String),
    NotInDictionary(String),
    NotOnBoard(String),
    /// Time ran out before the token was looked at
    RoundOver,
}

pub struct RoundController<S, I> {
    connection: Arc<Mutex<Connection<S>>>,
    input: TokenReader<I>,
    state: Arc<Mutex<RoundState>>,
    board: Board,
    dictionary: Arc<Dictionary>,
    renderer: Arc<Renderer>,
    cohort_size: usize,
    round_length: Duration,
    rounds: u32,
}

impl<S, I> RoundController<S, I>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    I: AsyncBufRead + Unpin,
{
    pub fn new(
        joined: JoinedMatch<S>,
        input: TokenReader<I>,
        dictionary: Arc<Dictionary>,
        renderer: Renderer,
        round_length: Duration,
    ) -> Self {
        Self {
            connection: Arc::new(Mutex::new(joined.connection)),
            input,
            state: Arc::new(Mutex::new(RoundState::default())),
            board: Board::default(),
            dictionary,
            renderer: Arc::new(renderer),
            cohort_size: joined.cohort_size,
            round_length,
            rounds: 0,
        }
    }

    /// The board as the user currently sees it, rotations included
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays rounds until the match ends and returns how many were played
    pub async fn run(mut self) -> Result<u32, ClientError> {
        let mut next = self.await_deal().await?;

        while let Some(board) = next.take() {
            self.begin_round(board).await;
            let timer = self.start_timer();
            let vote = self.play_round(timer).await?;
            next = self.negotiate(vote).await?;
        }

        info!("Match over after {} rounds", self.rounds);
        Ok(self.rounds)
    }

    /// Reads `continue <board>` or `done` from the server
    async fn await_deal(&mut self) -> Result<Option<Board>, ProtocolError> {
        let mut connection = self.connection.lock().await;
        let token = connection.next_token().await?;
        match token.as_str() {
            CONTINUE_TOKEN => {
                let encoded = connection.next_token().await?;
                Ok(Some(Board::decode(&encoded)?))
            }
            DONE_TOKEN => Ok(None),
            _ => Err(ProtocolError::Unexpected {
                expected: "continue or done",
                found: token,
            }),
        }
    }

    async fn begin_round(&mut self, board: Board) {
        self.rounds += 1;
        self.board = board;
        {
            let mut state = self.state.lock().await;
            state.active = true;
            state.words.clear();
        }
        // Leftovers from the vote line are not words for this round
        self.input.discard_pending();

        debug!("Round {} board {}", self.rounds, board.encode());
        println!("{}", self.renderer.round_start(self.rounds, self.round_length));
        println!("{}", self.renderer.board(&self.board));
    }

    fn start_timer(&self) -> JoinHandle<Result<(), ProtocolError>> {
        let state = Arc::clone(&self.state);
        let connection = Arc::clone(&self.connection);
        let renderer = Arc::clone(&self.renderer);
        let cohort_size = self.cohort_size;
        let round_length = self.round_length;

        tokio::spawn(async move {
            sleep(round_length).await;
            let results = end_round(&state, &connection, cohort_size).await?;
            println!("{}", renderer.results(&results));
            Ok(())
        })
    }

    /// Feeds user tokens to the round until time is up, then collects the vote
    async fn play_round(
        &mut self,
        timer: JoinHandle<Result<(), ProtocolError>>,
    ) -> Result<Vote, ClientError> {
        loop {
            let token = match self.input.next_token().await {
                Ok(token) => token,
                Err(ProtocolError::Closed) => {
                    info!("Input closed, finishing the round and voting to stop");
                    timer.await??;
                    return Ok(Vote::Stop);
                }
                Err(e) => {
                    timer.abort();
                    return Err(e.into());
                }
            };

            match self.handle_token(&token).await {
                InputOutcome::RoundOver => {
                    timer.await??;
                    return self.read_vote(token).await;
                }
                InputOutcome::Rotated => println!("{}", self.renderer.board(&self.board)),
                outcome => {
                    if let Some(message) = self.renderer.outcome(&outcome) {
                        println!("{}", message);
                    }
                }
            }
        }
    }

    pub async fn handle_token(&mut self, token: &str) -> InputOutcome {
        let mut state = self.state.lock().await;
        if !state.active {
            return InputOutcome::RoundOver;
        }

        match Command::parse(token) {
            Command::RotateLeft => {
                self.board.rotate_counter_clockwise();
                InputOutcome::Rotated
            }
            Command::RotateRight => {
                self.board.rotate_clockwise();
                InputOutcome::Rotated
            }
            Command::Word(word) => {
                if state.words.contains(&word) {
                    InputOutcome::AlreadyFound(word)
                } else if !self.dictionary.contains(&word) {
                    InputOutcome::NotInDictionary(word)
                } else if !self.board.contains(&word) {
                    InputOutcome::NotOnBoard(word)
                } else {
                    state.words.insert(word.clone());
                    InputOutcome::Accepted(word)
                }
            }
        }
    }

    /// Interprets `first` as the vote, prompting again until it is y or n.
    /// Closed input counts as a stop.
    async fn read_vote(&mut self, first: String) -> Result<Vote, ClientError> {
        let mut token = first;
        loop {
            if let Some(vote) = Vote::parse(&token) {
                return Ok(vote);
            }
            println!("{}", VOTE_PROMPT);
            token = match self.input.next_token().await {
                Ok(token) => token,
                Err(ProtocolError::Closed) => return Ok(Vote::Stop),
                Err(e) => return Err(e.into()),
            };
        }
    }

    /// Sends the vote. Returns the next board when the whole cohort agreed
    /// to play on.
    async fn negotiate(&mut self, vote: Vote) -> Result<Option<Board>, ClientError> {
        match vote {
            Vote::Continue => {
                self.connection.lock().await.send_line(CONTINUE_TOKEN).await?;
                let next = self.await_deal().await?;
                if next.is_none() {
                    println!("Another player has quit, so the game is over.");
                }
                Ok(next)
            }
            Vote::Stop => {
                let mut connection = self.connection.lock().await;
                connection.send_line(STOP_TOKEN).await?;
                match connection.next_token().await {
                    Ok(token) if token == DONE_TOKEN => {}
                    Ok(token) => warn!("Expected {} after stopping, got {}", DONE_TOKEN, token),
                    Err(e) => debug!("Server hung up without a final token: {}", e),
                }
                Ok(None)
            }
        }
    }
}

/// Closes the round and exchanges the word list for the results.
///
/// The state lock is held only long enough to deactivate the round and copy
/// the words; the connection lock is taken before it is released so no vote
/// can slip in ahead of the submission.
pub async fn end_round<S>(
    state: &Mutex<RoundState>,
    connection: &Mutex<Connection<S>>,
    cohort_size: usize,
) -> Result<RoundResults, ProtocolError>
where
    S: AsyncRead + AsyncWrite,
{
    let mut round = state.lock().await;
    round.active = false;
    let mut words: Vec<String> = round.words.iter().cloned().collect();
    words.sort();

    let mut connection = connection.lock().await;
    drop(round);

    debug!("Submitting {} words", words.len());
    connection.send_line(&encode_word_list(&words)).await?;
    RoundResults::read(&mut *connection, cohort_size).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Standing;
    use std::io;
    use tokio::io::BufReader;
    use tokio_test::io::{Builder, Mock};

    const ROUND: Duration = Duration::from_millis(50);

    fn dictionary() -> Arc<Dictionary> {
        Arc::new(Dictionary::parse("abfe\nadij\nfab\n").unwrap())
    }

    fn controller(server: Mock, user: Mock) -> RoundController<Mock, BufReader<Mock>> {
        let joined = JoinedMatch {
            connection: Connection::new(server),
            cohort_size: 2,
        };
        RoundController::new(
            joined,
            TokenReader::new(BufReader::new(user)),
            dictionary(),
            Renderer::new("alice"),
            ROUND,
        )
    }

    async fn active_controller() -> RoundController<Mock, BufReader<Mock>> {
        let mut controller = controller(Builder::new().build(), Builder::new().build());
        let board = Board::decode("ABCDEFGHIJKLMNOP").unwrap();
        controller.begin_round(board).await;
        controller
    }

    #[tokio::test]
    async fn test_handle_token_outcomes() {
        let mut controller = active_controller().await;

        assert_eq!(
            controller.handle_token("ABFE").await,
            InputOutcome::Accepted("abfe".to_string())
        );
        assert_eq!(
            controller.handle_token("abfe").await,
            InputOutcome::AlreadyFound("abfe".to_string())
        );
        assert_eq!(
            controller.handle_token("adij").await,
            InputOutcome::NotOnBoard("adij".to_string())
        );
        assert_eq!(
            controller.handle_token("zzzz").await,
            InputOutcome::NotInDictionary("zzzz".to_string())
        );

        controller.state.lock().await.active = false;
        assert_eq!(controller.handle_token("fab").await, InputOutcome::RoundOver);
        assert_eq!(controller.state.lock().await.words.len(), 1);
    }

    #[tokio::test]
    async fn test_rotation_keeps_words_findable() {
        let mut controller = active_controller().await;

        assert_eq!(controller.handle_token("1").await, InputOutcome::Rotated);
        assert_eq!(controller.board().encode(), "DHLPCGKOBFJNAEIM");
        assert_eq!(controller.handle_token("2").await, InputOutcome::Rotated);
        assert_eq!(controller.handle_token("2").await, InputOutcome::Rotated);
        assert_eq!(controller.board().encode(), "MIEANJFBOKGCPLHD");

        assert_eq!(
            controller.handle_token("abfe").await,
            InputOutcome::Accepted("abfe".to_string())
        );
    }

    #[tokio::test]
    async fn test_end_round_submits_sorted_words() {
        let state = Mutex::new(RoundState {
            active: true,
            words: ["fab", "abfe"].iter().map(|w| w.to_string()).collect(),
        });
        let server = Builder::new()
            .write(b"2 abfe fab\n")
            .read(b"1 fab 1 bob 4 alice 1\n")
            .build();
        let connection = Mutex::new(Connection::new(server));

        let results = end_round(&state, &connection, 2).await.unwrap();

        assert!(!state.lock().await.active);
        assert_eq!(results.voided, vec!["fab".to_string()]);
        assert_eq!(results.standings.winners, vec![Standing::new("bob", 4)]);
        assert_eq!(results.standings.others, vec![Standing::new("alice", 1)]);
    }

    #[tokio::test]
    async fn test_single_round_then_stop() {
        let server = Builder::new()
            .read(b"continue ABCDEFGHIJKLMNOP\n")
            .write(b"1 abfe\n")
            .read(b"0 1 alice 1 bob 0\n")
            .write(b"stop\n")
            .read(b"done\n")
            .build();
        let user = Builder::new()
            .read(b"abfe adij\n")
            .wait(Duration::from_millis(300))
            .read(b"n\n")
            .build();

        let rounds = controller(server, user).run().await.unwrap();
        assert_eq!(rounds, 1);
    }

    #[tokio::test]
    async fn test_continue_vote_deals_next_round() {
        let server = Builder::new()
            .read(b"continue ABCDEFGHIJKLMNOP\n")
            .write(b"1 abfe\n")
            .read(b"0 1 alice 1 bob 0\n")
            .write(b"continue\n")
            .read(b"continue PONMLKJIHGFEDCBA\n")
            .write(b"0\n")
            .read(b"0 2 alice 1 bob 1\n")
            .write(b"stop\n")
            .read(b"done\n")
            .build();
        let user = Builder::new()
            .read(b"abfe\n")
            .wait(Duration::from_millis(200))
            .read(b"maybe\n")
            .read(b"Y\n")
            .wait(Duration::from_millis(200))
            .read(b"no\n")
            .build();

        let rounds = controller(server, user).run().await.unwrap();
        assert_eq!(rounds, 2);
    }

    #[tokio::test]
    async fn test_continue_vote_ends_when_another_player_stops() {
        let server = Builder::new()
            .read(b"continue ABCDEFGHIJKLMNOP\n")
            .write(b"0\n")
            .read(b"0 2 alice 0 bob 0\n")
            .write(b"continue\n")
            .read(b"done\n")
            .build();
        let user = Builder::new()
            .wait(Duration::from_millis(200))
            .read(b"yes\n")
            .build();

        let rounds = controller(server, user).run().await.unwrap();
        assert_eq!(rounds, 1);
    }

    #[tokio::test]
    async fn test_closed_input_finishes_round_and_stops() {
        let server = Builder::new()
            .read(b"continue ABCDEFGHIJKLMNOP\n")
            .write(b"1 abfe\n")
            .read(b"0 1 alice 1 bob 0\n")
            .write(b"stop\n")
            .read(b"done\n")
            .build();
        let user = Builder::new().read(b"abfe\n").build();

        let rounds = controller(server, user).run().await.unwrap();
        assert_eq!(rounds, 1);
    }

    #[tokio::test]
    async fn test_server_hangup_during_round_is_an_error() {
        let server = Builder::new()
            .read(b"continue ABCDEFGHIJKLMNOP\n")
            .write(b"0\n")
            .build();
        let user = Builder::new().build();

        match controller(server, user).run().await {
            Err(ClientError::Protocol(ProtocolError::Closed)) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_input_failure_stops_the_timer() {
        // Any write to this connection would be unexpected
        let user = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::Other, "terminal gone"))
            .build();
        let mut controller = controller(Builder::new().build(), user);
        let board = Board::decode("ABCDEFGHIJKLMNOP").unwrap();
        controller.begin_round(board).await;

        let timer = controller.start_timer();
        match controller.play_round(timer).await {
            Err(ClientError::Protocol(ProtocolError::Io(_))) => {}
            other => panic!("Unexpected result: {:?}", other),
        }

        sleep(ROUND * 3).await;
        assert!(controller.state.lock().await.active);
    }

    #[tokio::test]
    async fn test_done_before_first_round() {
        let server = Builder::new().read(b"done\n").build();
        let user = Builder::new().build();

        assert_eq!(controller(server, user).run().await.unwrap(), 0);
    }
}
