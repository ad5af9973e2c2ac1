pub mod board;
pub mod cache;
pub mod clock;
pub mod config;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod protocol;
pub mod rules;
pub mod validator;

pub use config::EngineConfig;
pub use engine::Engine;
pub use game::{GameState, MoveOutcome};
pub use validator::{Validator, Verdict};
