use std::fmt;
use serde::{Serialize, Deserialize};

use crate::Trajectory;
use crate::TrajectoryError;

/// Accumulates trajectories that share a time axis.
///
/// Stochastic simulations are repeated many times; the ensemble keeps the
/// running sum of every sample and the number of trajectories added, so
/// partial ensembles can be merged (e.g. one per worker thread) or stored
/// and extended later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    name: String,
    labels: Vec<String>,
    times: Vec<f64>,
    sums: Vec<Vec<f64>>,
    counter: usize,
}

impl Ensemble {
    /// Build an empty ensemble for the given output times.
    pub fn new<S: AsRef<str>>(name: &str, labels: &[S], times: &[f64]) -> Self {
        let dim = labels.len();
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            times: times.to_vec(),
            sums: vec![vec![0.0; dim]; times.len()],
            counter: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of trajectories accumulated so far.
    pub fn counter(&self) -> usize {
        self.counter
    }

    fn check_shape(&self, labels: &[String], times: &[f64]) -> Result<(), TrajectoryError> {
        if labels != self.labels.as_slice() {
            return Err(TrajectoryError::LabelMismatch {
                found: labels.to_vec(),
                expected: self.labels.clone(),
            });
        }
        if times.len() != self.times.len() {
            return Err(TrajectoryError::TimepointCountMismatch {
                found: times.len(),
                expected: self.times.len(),
            });
        }
        for (&t, &expected) in times.iter().zip(&self.times) {
            if (t - expected).abs() >= 1e-9 {
                return Err(TrajectoryError::TimeMismatch {
                    file_time: t,
                    expected_time: expected,
                });
            }
        }
        Ok(())
    }

    /// Add one trajectory sampled on the ensemble's time axis.
    pub fn add(&mut self, trajectory: &Trajectory) -> Result<(), TrajectoryError> {
        self.check_shape(trajectory.labels(), trajectory.times())?;
        for (sum, state) in self.sums.iter_mut().zip(trajectory.states()) {
            for (s, x) in sum.iter_mut().zip(state) {
                *s += x;
            }
        }
        self.counter += 1;
        Ok(())
    }

    /// Fold another ensemble with the same shape into this one.
    pub fn merge(&mut self, other: Ensemble) -> Result<(), TrajectoryError> {
        self.check_shape(&other.labels, &other.times)?;
        for (sum, other_sum) in self.sums.iter_mut().zip(other.sums) {
            for (s, x) in sum.iter_mut().zip(other_sum) {
                *s += x;
            }
        }
        self.counter += other.counter;
        Ok(())
    }

    /// The sample mean over all accumulated trajectories.
    /// An empty ensemble yields zeros.
    pub fn mean(&self) -> Trajectory {
        let norm = self.counter.max(1) as f64;
        let mut mean = Trajectory::with_capacity(&self.name, &self.labels, self.times.len());
        for (t, sum) in self.times.iter().zip(&self.sums) {
            let row: Vec<f64> = sum.iter().map(|s| s / norm).collect();
            mean.push(*t, &row);
        }
        mean
    }
}

impl fmt::Display for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean of {} trajectories:", self.counter)?;
        write!(f, "{}", self.mean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constant(value: f64) -> Trajectory {
        let mut traj = Trajectory::new("c", &["A", "B"]);
        for t in [0.0, 0.5, 1.0] {
            traj.push(t, &[value, 2.0 * value]);
        }
        traj
    }

    #[test]
    fn test_ensemble_mean() {
        let mut ens = Ensemble::new("c", &["A", "B"], &[0.0, 0.5, 1.0]);
        ens.add(&constant(1.0)).unwrap();
        ens.add(&constant(3.0)).unwrap();
        assert_eq!(ens.counter(), 2);
        let mean = ens.mean();
        assert_eq!(mean.len(), 3);
        assert_relative_eq!(mean.state(1)[0], 2.0);
        assert_relative_eq!(mean.state(2)[1], 4.0);
    }

    #[test]
    fn test_ensemble_merge() {
        let times = [0.0, 0.5, 1.0];
        let mut a = Ensemble::new("c", &["A", "B"], &times);
        let mut b = Ensemble::new("c", &["A", "B"], &times);
        a.add(&constant(1.0)).unwrap();
        b.add(&constant(2.0)).unwrap();
        b.add(&constant(6.0)).unwrap();
        a.merge(b).unwrap();
        assert_eq!(a.counter(), 3);
        assert_relative_eq!(a.mean().state(0)[0], 3.0);
    }

    #[test]
    fn test_ensemble_shape_errors() {
        let mut ens = Ensemble::new("c", &["A", "B"], &[0.0, 0.5]);
        assert!(matches!(
            ens.add(&constant(1.0)),
            Err(TrajectoryError::TimepointCountMismatch { found: 3, expected: 2 })
        ));

        let mut ens = Ensemble::new("c", &["A", "B"], &[0.0, 0.6, 1.0]);
        assert!(matches!(ens.add(&constant(1.0)), Err(TrajectoryError::TimeMismatch { .. })));

        let mut ens = Ensemble::new("c", &["X", "B"], &[0.0, 0.5, 1.0]);
        assert!(matches!(ens.add(&constant(1.0)), Err(TrajectoryError::LabelMismatch { .. })));
        assert_eq!(ens.counter(), 0);
    }

    #[test]
    fn test_empty_ensemble_mean_is_zero() {
        let ens = Ensemble::new("c", &["A"], &[0.0, 1.0]);
        assert_eq!(ens.mean().column(0), vec![0.0, 0.0]);
    }
}
