use crate::agent::Agent;
use crate::config::Config;
use crate::grid::{Broadcast, Grid};
use crate::report::{neighbor_similarity, reporter};
use crate::stats::{Accumulator, Summary};
use crate::table::SignalTable;
use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Simulation engine.
///
/// Holds the configuration, the grid of agents and the random number
/// generator that picks the event each speaker talks about.
pub struct Engine {
    cfg: Config,
    grid: Grid,
    rng: ChaCha12Rng,
    phase: Phase,
    n_rounds_done: usize,
}

impl Engine {
    /// Create a new `Engine` whose agents start from random signal counts.
    ///
    /// Every agent gets its own generator seeded from the engine's, so a
    /// configured seed reproduces the whole run.
    pub fn generate_initial_condition(cfg: Config) -> Result<Self> {
        let mut rng = match cfg.run.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };

        let n_events = cfg.model.n_events;
        let n_signals = cfg.model.n_signals;
        let rule = cfg.model.rule;
        let count_dist = Uniform::new(0, cfg.model.max_init_count)?;

        let grid = Grid::from_fn(cfg.grid.dimension, |_, _| {
            let table = SignalTable::random(n_events, n_signals, &count_dist, &mut rng)?;
            Ok(Agent::new(table, rule, ChaCha12Rng::from_rng(&mut rng)))
        })
        .context("failed to populate grid")?;

        Self::new(cfg, grid, rng)
    }

    /// Create a new `Engine` around an existing grid.
    pub fn new(cfg: Config, grid: Grid, rng: ChaCha12Rng) -> Result<Self> {
        if grid.dimension() != cfg.grid.dimension {
            bail!(
                "grid dimension is {}, but the config expects {}",
                grid.dimension(),
                cfg.grid.dimension
            );
        }
        Ok(Self {
            cfg,
            grid,
            rng,
            phase: Phase::Idle,
            n_rounds_done: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn n_rounds_done(&self) -> usize {
        self.n_rounds_done
    }

    /// Perform rounds `0..=rounds`, writing a report to `out` every print interval.
    pub fn perform_simulation(&mut self, out: &mut dyn Write) -> Result<()> {
        if self.phase != Phase::Idle {
            bail!("simulation can only be performed once (phase is {:?})", self.phase);
        }
        self.phase = Phase::Running;

        let rounds = self.cfg.run.rounds;
        let print_interval = self.cfg.print_interval();
        let mut report = reporter(self.cfg.output.view, self.cfg.output.event);
        let event_dist = Uniform::new(0, self.cfg.model.n_events)?;

        log::info!(
            "performing {} rounds on a {dim}x{dim} grid",
            rounds + 1,
            dim = self.grid.dimension()
        );

        let mut outcome = Broadcast::default();
        for round in 0..=rounds {
            let round_outcome = self
                .perform_round(&event_dist)
                .with_context(|| format!("failed to perform round {round}"))?;
            outcome.n_heard += round_outcome.n_heard;
            outcome.n_understood += round_outcome.n_understood;
            self.n_rounds_done += 1;

            log::debug!("round {round}: {round_outcome:?}");

            if round % print_interval == 0 {
                writeln!(out, "Round {round}/{rounds}")?;
                report
                    .write(&self.grid, out)
                    .context("failed to write report")?;
                writeln!(out)?;

                let similarity = self
                    .similarity_summary()
                    .context("failed to summarize similarities")?;
                log::info!(
                    "round {round}/{rounds}: understood {:.4}, neighbor similarity {similarity}",
                    understood_rate(outcome)
                );
                outcome = Broadcast::default();
            }
        }

        out.flush().context("failed to flush output stream")?;
        self.phase = Phase::Finished;
        log::info!("finished after {} rounds", self.n_rounds_done);

        Ok(())
    }

    /// Let every cell speak once, in scan order, to all of its neighbors.
    fn perform_round(&mut self, event_dist: &Uniform<usize>) -> Result<Broadcast> {
        let dimension = self.grid.dimension();
        let mut outcome = Broadcast::default();
        for x in 0..dimension {
            for y in 0..dimension {
                let event = event_dist.sample(&mut self.rng);
                let signal = self.grid.cell_at_mut(x, y)?.speak(event)?;
                let cell_outcome = self.grid.broadcast(x, y, event, signal)?;
                outcome.n_heard += cell_outcome.n_heard;
                outcome.n_understood += cell_outcome.n_understood;
            }
        }
        Ok(outcome)
    }

    /// Mean and spread over all cells of each cell's mean neighbor similarity.
    pub fn similarity_summary(&self) -> Result<Summary> {
        let mut acc = Accumulator::new();
        for x in 0..self.grid.dimension() {
            for y in 0..self.grid.dimension() {
                let similarity = neighbor_similarity(&self.grid, x, y)?;
                if !similarity.is_nan() {
                    acc.add(similarity);
                }
            }
        }
        Ok(acc.summary())
    }
}

fn understood_rate(outcome: Broadcast) -> f64 {
    if outcome.n_heard == 0 {
        return f64::NAN;
    }
    outcome.n_understood as f64 / outcome.n_heard as f64
}
