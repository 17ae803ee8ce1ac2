//! Star Pusher: a Sokoban-style puzzle engine with click-to-target
//! movement and multi-push planning.
//!
//! `domain` holds the pure grid/search code, `sim` the stateful session
//! (engine, history, levels, persistence).

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod sim;
