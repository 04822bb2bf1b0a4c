//! # Word Grid Client Library
//!
//! This library provides the console client for the networked word-grid game.
//! It joins a match, shows the dealt board, checks the words typed by the user
//! and submits them to the server when the round timer runs out.
//!
//! ## Architecture Overview
//!
//! ### Local Validation
//! Every typed word is checked before it is kept: it has to be in the
//! dictionary and it has to be spellable on the board. The server trusts the
//! submitted list, so only words that passed both checks are ever sent.
//!
//! ### Timer Versus Input
//! A round ends on a timer, not on user action. The timer runs as its own task
//! and shares the round state with the input loop through a mutex; whichever
//! of the two takes the lock first decides whether a word typed at the very
//! last moment still counts. The timer never holds that lock while talking to
//! the server.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The round controller:
//! - Board mirror with rotation
//! - Input loop and round timer
//! - Continuation vote
//!
//! ### Dictionary Module (`dictionary`)
//! Sorted word list loaded from disk with case-insensitive lookups.
//!
//! ### Input Module (`input`)
//! Maps typed tokens to rotations, words and votes.
//!
//! ### Network Module (`network`)
//! Connecting and the opening handshake.
//!
//! ### Rendering Module (`rendering`)
//! Text for the board, feedback, results and prompts.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::dictionary::Dictionary;
//! use client::game::{RoundController, ROUND_LENGTH};
//! use client::network::connect;
//! use client::rendering::Renderer;
//! use shared::TokenReader;
//! use std::sync::Arc;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dictionary = Arc::new(Dictionary::load("resources/words.txt")?);
//!     let joined = connect("127.0.0.1:2983", "alice").await?;
//!     let input = TokenReader::new(BufReader::new(tokio::io::stdin()));
//!
//!     let controller = RoundController::new(
//!         joined,
//!         input,
//!         dictionary,
//!         Renderer::new("alice"),
//!         ROUND_LENGTH,
//!     );
//!     let rounds = controller.run().await?;
//!     println!("Played {} rounds", rounds);
//!     Ok(())
//! }
//! ```

pub mod dictionary;
pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
