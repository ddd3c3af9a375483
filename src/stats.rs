use std::fmt;

/// Streaming mean and sample standard deviation (Welford's method).
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn summary(&self) -> Summary {
        Summary {
            n_vals: self.n_vals,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals - 1) as f64).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} ± {:.4}", self.mean, self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_two_pass_estimate() {
        let vals = [0.2, 0.9, 0.4, 0.4, 0.75];
        let mut acc = Accumulator::new();
        vals.iter().for_each(|&val| acc.add(val));

        let mean = vals.iter().sum::<f64>() / vals.len() as f64;
        let var = vals.iter().map(|val| (val - mean).powi(2)).sum::<f64>() / 4.0;

        let summary = acc.summary();
        assert_eq!(summary.n_vals, 5);
        assert!((summary.mean - mean).abs() < 1e-12);
        assert!((summary.std_dev - var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn small_samples_are_undefined() {
        let mut acc = Accumulator::new();
        assert!(acc.summary().mean.is_nan());

        acc.add(3.0);
        assert_eq!(acc.summary().mean, 3.0);
        assert!(acc.summary().std_dev.is_nan());
    }
}
