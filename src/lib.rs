//! Agents on a square grid learning to agree on signals for events.
//!
//! Every round each cell speaks a signal for a random event to its eight
//! neighbors, which learn from what they hear. See [`engine::Engine`].

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod report;
pub mod stats;
pub mod table;

pub use agent::{Agent, Rule};
pub use config::Config;
pub use engine::Engine;
pub use error::Error;
pub use grid::Grid;
pub use table::SignalTable;
