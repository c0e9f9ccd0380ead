//! Game rules on top of the core types: piece generation, gravity and
//! timers, challenge scoring, statistics, and session persistence.

pub use self::{
    challenge::*, config::*, game_session::*, game_stats::*, piece_generator::*, play_field::*,
    session_sink::*,
};

pub(crate) mod challenge;
pub(crate) mod config;
pub(crate) mod game_session;
pub(crate) mod game_stats;
pub(crate) mod piece_generator;
pub(crate) mod play_field;
pub(crate) mod session_sink;
