//! # Word Grid Server Library
//!
//! This library provides the authoritative server for the networked word-grid
//! game. It deals boards, collects each player's words, voids words found by
//! more than one player, keeps score and runs the vote on whether to play on.
//!
//! ## Architecture Design
//!
//! ### One Task Per Match
//! Connections are grouped into fixed-size cohorts in arrival order. Every
//! cohort gets its own match task owning its sessions, its board and its RNG.
//! Matches share nothing mutable (the cube pool is read-only behind an `Arc`),
//! so no locking is needed between them and a stalled or failed match never
//! affects another one.
//!
//! ### Sequential Session I/O
//! Inside a match the coordinator talks to its players one after the other.
//! Message order within a match is therefore total and deterministic; the
//! price is that one slow player holds up the whole round of that match.
//!
//! ### Line-Oriented Protocol
//! The wire format is plain text: newline-terminated lines of
//! whitespace-separated tokens, shared with the client through the `shared`
//! crate.
//!
//! ## Module Organization
//!
//! ### Session Module (`session`)
//! Per-connection player state and the player side of the protocol:
//! - Handshake (cohort size out, name in)
//! - Word collection, voiding and scoring
//! - Result delivery, vote reading and closing
//!
//! ### Game Module (`game`)
//! The per-match round coordinator and its pure helpers:
//! - Phase machine from dealing to voting
//! - Cross-player duplicate detection
//! - Standings with tie handling
//!
//! ### Network Module (`network`)
//! TCP listener, cohort grouping and match task spawning.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::MatchServer;
//! use shared::CubePool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Two players per match, classic cube set
//!     let server = MatchServer::bind("127.0.0.1:2983", 2, CubePool::classic()).await?;
//!
//!     // Accepts cohorts and spawns a match task for each one, forever
//!     server.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Model
//!
//! A player disconnecting or sending garbage ends that player's match: the
//! coordinator closes every session of the cohort and its task exits. Other
//! matches keep running. Startup failures (unreadable cube file, port in use)
//! are fatal to the process.

pub mod game;
pub mod network;
pub mod session;
