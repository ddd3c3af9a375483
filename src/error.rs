use thiserror::Error;

/// Errors raised by the grid and its agents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cell ({x}, {y}) lies outside a grid of dimension {dimension}")]
    InvalidCoordinate { x: usize, y: usize, dimension: usize },

    #[error("event {event} is out of range 0..{n_events}")]
    InvalidEvent { event: usize, n_events: usize },

    #[error("signal {signal} is out of range 0..{n_signals}")]
    InvalidSignal { signal: usize, n_signals: usize },

    #[error("signal table must have at least one event and one signal")]
    EmptyTable,

    #[error("signal table row {row} holds {len} signals, but row 0 holds {expected}")]
    RaggedTable {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("signal table shapes differ: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
