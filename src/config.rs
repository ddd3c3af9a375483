use crate::agent::Rule;
use crate::report::{N_LETTERS, View};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub grid: GridConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

/// Agent model parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of events.
    pub n_events: usize,
    /// Number of signals.
    pub n_signals: usize,
    /// Exclusive upper bound of the initial signal counts.
    pub max_init_count: u64,
    /// Signal selection rule shared by all agents.
    pub rule: Rule,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid.
    pub dimension: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Index of the last round (rounds `0..=rounds` are performed).
    pub rounds: usize,
    /// Seed of the random number generator (drawn from the OS if absent).
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of reports spread over the run.
    pub n_prints: usize,
    /// What each report shows.
    pub view: View,
    /// Event shown by [`View::Event`].
    #[serde(default)]
    pub event: usize,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.model.n_events, 1..1_000).context("invalid number of events")?;
        check_num(self.model.n_signals, 1..1_000).context("invalid number of signals")?;
        check_num(self.model.max_init_count, 1..1_000_000)
            .context("invalid maximum initial count")?;

        check_num(self.grid.dimension, 1..1_000).context("invalid grid dimension")?;

        check_num(self.run.rounds, 0..100_000_000).context("invalid number of rounds")?;

        check_num(self.output.n_prints, 1..100_000).context("invalid number of prints")?;
        if self.output.view == View::Event {
            check_num(self.output.event, 0..self.model.n_events)
                .context("invalid reported event")?;
        }
        if self.output.view == View::Languages {
            check_num(self.model.n_signals, 1..=N_LETTERS)
                .context("too many signals to spell languages")?;
        }

        Ok(())
    }

    /// Number of rounds between two reports.
    pub fn print_interval(&self) -> usize {
        (self.run.rounds / self.output.n_prints).max(1)
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
