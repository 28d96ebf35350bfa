//! Reference forward model: a pill maze with ghosts, power pills and line-of-sight
//! partial observability.
//!
//! Mazes are described as ASCII art:
//!
//! | tile | meaning |
//! |------|---------|
//! | `#`  | wall |
//! | `.`  | pill |
//! | `o`  | power pill |
//! | ` `  | empty floor |
//! | `P`  | agent start |
//! | `G`  | ghost lair (respawn node) |
//! | `1`–`4` | start of Blinky, Pinky, Inky, Sue |
//!
//! Ghosts without a start tile are not in play.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod game;
pub mod layout;

pub use error::MazeError;
pub use game::{MazeGame, MazeRules};
pub use layout::MazeLayout;
