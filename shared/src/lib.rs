//! Types and codecs shared by the word-grid server and client.
//!
//! The board engine lives here because both sides need it: the server deals
//! boards from the cube pool, the client mirrors the dealt board and checks
//! candidate words against it before submitting them.

pub mod board;
pub mod cubes;
pub mod error;
pub mod protocol;

pub use board::{Board, Cell, QU_SENTINEL};
pub use cubes::{Cube, CubePool, CUBE_COUNT, CUBE_FACES};
pub use error::{BoardError, ProtocolError, ResourceError};
pub use protocol::{
    encode_word_list, Connection, RoundResults, Standing, Standings, TokenReader, CONTINUE_TOKEN,
    DONE_TOKEN, STOP_TOKEN,
};

/// Board side length
pub const BOARD_SIZE: usize = 4;

pub const DEFAULT_PORT: u16 = 2983;

/// Players per match unless configured otherwise
pub const DEFAULT_COHORT_SIZE: usize = 2;
