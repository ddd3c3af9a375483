use crate::grid::Grid;
use crate::stats::Accumulator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Which picture of the board is printed at each report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Every agent's preferred signal per event.
    Agents,
    /// Every agent's mean similarity to its neighbors.
    Similarities,
    /// Every agent's preferred signal for a single event.
    Event,
    /// One symbol per agent for its whole convention, and how many changed.
    Languages,
}

/// Largest signal count the [`View::Languages`] symbols can spell.
pub const N_LETTERS: usize = 26;

/// Renders the current state of the board.
///
/// Reporters may remember earlier boards, so writing takes `&mut self`.
pub trait Report {
    fn write(&mut self, grid: &Grid, out: &mut dyn Write) -> Result<()>;
}

pub fn reporter(view: View, event: usize) -> Box<dyn Report> {
    match view {
        View::Agents => Box::new(AgentLabels),
        View::Similarities => Box::new(NeighborSimilarities),
        View::Event => Box::new(EventSignals { event }),
        View::Languages => Box::new(Languages::default()),
    }
}

/// Mean similarity of the agent at `(x, y)` to each of its neighbors.
///
/// NaN for a cell without neighbors.
pub fn neighbor_similarity(grid: &Grid, x: usize, y: usize) -> Result<f64> {
    let agent = grid.cell_at(x, y)?;
    let mut acc = Accumulator::new();
    for neighbor in grid.neighbors_of(x, y)? {
        acc.add(agent.similarity_to(neighbor)?);
    }
    Ok(acc.summary().mean)
}

pub struct AgentLabels;

impl Report for AgentLabels {
    fn write(&mut self, grid: &Grid, out: &mut dyn Write) -> Result<()> {
        for y in 0..grid.dimension() {
            for x in 0..grid.dimension() {
                write!(out, "{} ", grid.cell_at(x, y)?.describe())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

pub struct NeighborSimilarities;

impl Report for NeighborSimilarities {
    fn write(&mut self, grid: &Grid, out: &mut dyn Write) -> Result<()> {
        for y in 0..grid.dimension() {
            for x in 0..grid.dimension() {
                let similarity = neighbor_similarity(grid, x, y)
                    .with_context(|| format!("failed to compare cell ({x}, {y})"))?;
                write!(out, "{similarity:.4} ")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

pub struct EventSignals {
    event: usize,
}

impl Report for EventSignals {
    fn write(&mut self, grid: &Grid, out: &mut dyn Write) -> Result<()> {
        let event = self.event;

        write!(out, "    ")?;
        for x in 0..grid.dimension() {
            write!(out, " {:2} ", x + 1)?;
        }
        writeln!(out)?;

        for y in 0..grid.dimension() {
            write!(out, "{:2}: ", y + 1)?;
            for x in 0..grid.dimension() {
                let signal = grid.cell_at(x, y)?.preferred_signal(event)?;
                write!(out, "{event}:{signal} ")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Spells the agent at `(x, y)` as one letter per event, `A` for signal 0.
pub fn language_symbol(grid: &Grid, x: usize, y: usize) -> Result<String> {
    let agent = grid.cell_at(x, y)?;
    (0..agent.table().n_events())
        .map(|event| -> Result<char> {
            let signal = agent.preferred_signal(event)?;
            let letter = u8::try_from(signal)
                .ok()
                .filter(|&letter| usize::from(letter) < N_LETTERS)
                .with_context(|| format!("signal {signal} has no letter"))?;
            Ok(char::from(b'A' + letter))
        })
        .collect()
}

/// Board of language symbols, keeping the last one to count changes.
#[derive(Default)]
pub struct Languages {
    previous: Option<Vec<String>>,
}

impl Report for Languages {
    fn write(&mut self, grid: &Grid, out: &mut dyn Write) -> Result<()> {
        let dimension = grid.dimension();
        let mut status = Vec::with_capacity(dimension * dimension);
        for y in 0..dimension {
            for x in 0..dimension {
                let symbol = language_symbol(grid, x, y)
                    .with_context(|| format!("failed to spell cell ({x}, {y})"))?;
                status.push(symbol);
            }
        }

        // Every cell counts as changed on the first report.
        let n_changed = match &self.previous {
            Some(previous) => previous.iter().zip(&status).filter(|(a, b)| a != b).count(),
            None => status.len(),
        };
        let changes = 100.0 * n_changed as f64 / status.len() as f64;
        writeln!(out, "Changes: {changes:.2}%")?;

        for row in status.chunks(dimension) {
            for symbol in row {
                write!(out, "{symbol} ")?;
            }
            writeln!(out)?;
        }

        self.previous = Some(status);
        Ok(())
    }
}
