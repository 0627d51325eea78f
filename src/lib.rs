//! Goban-engine: a Go rules kernel.
//!
//! This crate implements the rules of Go for an N×N board: move legality,
//! stone capture via liberty analysis, suicide handling, positional
//! repetition rules (ko / superko), and a navigable history of board
//! states. It does no rendering, scoring, or move generation; front ends
//! read board state through the [`game::Game`] API and draw it themselves.
//!
//! ## Modules
//!
//! - [`position`] - Board snapshots (grid, turn, capture counters)
//! - [`game`] - The rules engine (move validation, capture, history)
//! - [`gtp`] - GTP front end over the engine
//!
//! ## Example
//!
//! ```
//! use goban_engine::game::Game;
//! use goban_engine::position::Color;
//!
//! // Create a new 19x19 game
//! let mut game = Game::new();
//!
//! // Black opens; the capture list of a quiet move is empty
//! let captured = game.play(3, 3, None).expect("legal move");
//! assert!(captured.is_empty());
//! assert_eq!(game.stone(3, 3), Some(Some(Color::Black)));
//!
//! // Probing legality never mutates the game
//! assert!(!game.is_valid(3, 3, None));
//! assert_eq!(game.history_len(), 2);
//! ```

pub mod game;
pub mod gtp;
pub mod position;
