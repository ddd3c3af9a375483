use crate::error::{Error, Result};
use crate::table::SignalTable;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Rule an agent follows to pick a signal for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// The most frequently heard signal.
    Max,
    /// The signal with the largest count scaled by a fresh uniform factor.
    Randomized,
    /// A uniformly random signal, ignoring the table.
    PureRandom,
}

/// Agent of the simulation.
///
/// Speaks and hears event/signal pairs, learning from every pair it hears.
#[derive(Debug, Clone)]
pub struct Agent {
    table: SignalTable,
    rule: Rule,
    rng: ChaCha12Rng,
}

impl Agent {
    pub fn new(table: SignalTable, rule: Rule, rng: ChaCha12Rng) -> Self {
        Self { table, rule, rng }
    }

    pub fn table(&self) -> &SignalTable {
        &self.table
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Pick a signal for `event` according to the agent's own rule.
    pub fn speak(&mut self, event: usize) -> Result<usize> {
        self.signal_for(event, self.rule)
    }

    /// Pick a signal for `event` according to `rule`.
    pub fn signal_for(&mut self, event: usize, rule: Rule) -> Result<usize> {
        self.check_event(event)?;
        let signal = match rule {
            Rule::Max => self.preferred_signal(event)?,
            Rule::Randomized => self.randomized_signal(event),
            Rule::PureRandom => self.rng.random_range(0..self.table.n_signals()),
        };
        Ok(signal)
    }

    /// Most frequently heard signal for `event`, without consuming randomness.
    pub fn preferred_signal(&self, event: usize) -> Result<usize> {
        self.check_event(event)?;
        Ok(self.table.max_signal(event))
    }

    /// Learn from a heard pair.
    ///
    /// Returns whether this agent would have spoken the same signal. The check
    /// runs before the table is updated, and the update happens either way.
    pub fn hear(&mut self, event: usize, signal: usize) -> Result<bool> {
        self.check_event(event)?;
        let n_signals = self.table.n_signals();
        if signal >= n_signals {
            return Err(Error::InvalidSignal { signal, n_signals });
        }
        let understood = self.speak(event)? == signal;
        self.table.increment(event, signal);
        Ok(understood)
    }

    /// Product over events of the cosine similarity between normalized rows.
    ///
    /// An event for which either row is empty contributes 0.
    pub fn similarity_to(&self, other: &Agent) -> Result<f64> {
        let left = self.table.shape();
        let right = other.table.shape();
        if left != right {
            return Err(Error::DimensionMismatch { left, right });
        }

        let similarity = (0..self.table.n_events())
            .map(|event| {
                cosine(
                    self.table.probability_row(event),
                    other.table.probability_row(event),
                )
            })
            .product();
        Ok(similarity)
    }

    /// Compact label with the most frequent signal per event, e.g. `[0:2, 1:0]`.
    pub fn describe(&self) -> String {
        let pairs: Vec<_> = (0..self.table.n_events())
            .map(|event| format!("{event}:{}", self.table.max_signal(event)))
            .collect();
        format!("[{}]", pairs.join(", "))
    }

    fn randomized_signal(&mut self, event: usize) -> usize {
        let mut max_val = -1.0;
        let mut max_arg = 0;
        for (signal, &count) in self.table.counts_row(event).iter().enumerate() {
            let val = count as f64 * self.rng.random::<f64>();
            if val > max_val {
                max_val = val;
                max_arg = signal;
            }
        }
        max_arg
    }

    fn check_event(&self, event: usize) -> Result<()> {
        let n_events = self.table.n_events();
        if event >= n_events {
            return Err(Error::InvalidEvent { event, n_events });
        }
        Ok(())
    }
}

fn cosine(p: &[f64], q: &[f64]) -> f64 {
    let dot: f64 = p.iter().zip(q).map(|(a, b)| a * b).sum();
    let norm_p = p.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_q = q.iter().map(|b| b * b).sum::<f64>().sqrt();
    if norm_p == 0.0 || norm_q == 0.0 {
        return 0.0;
    }
    dot / (norm_p * norm_q)
}
