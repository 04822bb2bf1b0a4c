//! Server network layer: accepts connections, groups them into cohorts and
//! starts one independent match task per cohort

use crate::game::{GameCoordinator, MatchSummary};
use crate::session::PlayerSession;
use log::{error, info, warn};
use shared::{CubePool, ProtocolError};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Pause after a failed accept before trying again
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("a match needs at least one player")]
    EmptyCohort,
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// Listens for players and hands every full cohort to its own match task
pub struct MatchServer {
    listener: TcpListener,
    cohort_size: usize,
    pool: Arc<CubePool>,
    next_match_id: u32,
}

impl MatchServer {
    pub async fn bind(addr: &str, cohort_size: usize, pool: CubePool) -> Result<Self, ServerError> {
        if cohort_size == 0 {
            return Err(ServerError::EmptyCohort);
        }

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        info!("Server listening on {}", addr);

        Ok(Self {
            listener,
            cohort_size,
            pool: Arc::new(pool),
            next_match_id: 1,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn cohort_size(&self) -> usize {
        self.cohort_size
    }

    /// Waits for the next `cohort_size` connections, in arrival order.
    /// Failed accepts are logged and retried.
    pub async fn accept_cohort(&self) -> Vec<(TcpStream, SocketAddr)> {
        let mut cohort = Vec::with_capacity(self.cohort_size);

        while cohort.len() < self.cohort_size {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Could not disable Nagle for {}: {}", addr, e);
                    }
                    info!(
                        "Player connected from {} ({}/{})",
                        addr,
                        cohort.len() + 1,
                        self.cohort_size
                    );
                    cohort.push((stream, addr));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }

        cohort
    }

    /// Starts a match for `cohort` on its own task
    pub fn spawn_match(
        &mut self,
        cohort: Vec<(TcpStream, SocketAddr)>,
    ) -> JoinHandle<Result<MatchSummary, ProtocolError>> {
        let match_id = self.next_match_id;
        self.next_match_id += 1;

        let pool = Arc::clone(&self.pool);
        let streams: Vec<TcpStream> = cohort.into_iter().map(|(stream, _)| stream).collect();

        tokio::spawn(async move {
            let result = start_match(match_id, streams, pool).await;
            match &result {
                Ok(summary) => info!(
                    "Match {} closed after {} rounds",
                    summary.match_id, summary.rounds
                ),
                Err(e) => warn!("Match {} ended abnormally: {}", match_id, e),
            }
            result
        })
    }

    /// Accepts cohorts forever
    pub async fn run(mut self) {
        info!("Waiting for cohorts of {} players", self.cohort_size);
        loop {
            let cohort = self.accept_cohort().await;
            // Detached: each match reports its own outcome.
            let _ = self.spawn_match(cohort);
        }
    }
}

/// Greets every player of a cohort and plays the match to the end.
///
/// If a greeting fails, the players already greeted are closed and the rest
/// of the cohort is dropped with the error.
pub async fn start_match<S>(
    match_id: u32,
    streams: Vec<S>,
    pool: Arc<CubePool>,
) -> Result<MatchSummary, ProtocolError>
where
    S: AsyncRead + AsyncWrite,
{
    let cohort_size = streams.len();
    let mut sessions = Vec::with_capacity(cohort_size);

    for (seat, stream) in streams.into_iter().enumerate() {
        match PlayerSession::handshake(stream, cohort_size, seat).await {
            Ok(session) => sessions.push(session),
            Err(e) => {
                error!("Match {}: handshake with seat {} failed: {}", match_id, seat, e);
                for session in &mut sessions {
                    session.close().await;
                }
                return Err(e);
            }
        }
    }

    GameCoordinator::new(match_id, sessions, pool).run().await
}
