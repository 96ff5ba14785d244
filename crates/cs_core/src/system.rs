use log::debug;

use crate::ModelError;
use crate::Trajectory;

/// A model that evolves by a recurrence relation `x[t] = f(x[t-1])`.
pub trait DiscreteSystem {
    /// Name used for titles and file names.
    fn name(&self) -> &str;

    /// One label per state variable.
    fn labels(&self) -> &[&'static str];

    /// Write the successor of `prev` into `next`.
    fn step(&self, prev: &[f64], next: &mut [f64]);

    fn dimension(&self) -> usize {
        self.labels().len()
    }

    /// Iterate the recurrence from `initial` and return `t_max` samples,
    /// the first one being `initial` itself.
    ///
    /// Parameters are not checked for stability: divergent choices simply
    /// produce divergent (or NaN) values.
    fn evolve(&self, initial: &[f64], t_max: usize) -> Result<Trajectory, ModelError> {
        if initial.len() != self.dimension() {
            return Err(ModelError::DimensionMismatch {
                found: initial.len(),
                expected: self.dimension(),
            });
        }
        if t_max == 0 {
            return Err(ModelError::EmptyHorizon);
        }

        let mut trajectory = Trajectory::with_capacity(self.name(), self.labels(), t_max);
        let mut prev = initial.to_vec();
        let mut next = vec![0.0; initial.len()];
        trajectory.push(0.0, &prev);
        for t in 1..t_max {
            self.step(&prev, &mut next);
            trajectory.push(t as f64, &next);
            std::mem::swap(&mut prev, &mut next);
        }
        debug!("{}: {} discrete steps", self.name(), t_max - 1);
        Ok(trajectory)
    }
}

/// Right-hand side of an ODE system `dy/dt = f(y, t)`.
///
/// Integration lives in `cs_solvers`; implementors only describe the
/// derivatives.
pub trait OdeSystem {
    /// Name used for titles and file names.
    fn name(&self) -> &str;

    /// One label per state variable.
    fn labels(&self) -> &[&'static str];

    /// Evaluate the derivatives at `(t, y)` and write them into `dydt`.
    /// Both slices have length `dimension()`.
    fn deltas(&self, t: f64, y: &[f64], dydt: &mut [f64]);

    fn dimension(&self) -> usize {
        self.labels().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubling;

    impl DiscreteSystem for Doubling {
        fn name(&self) -> &str { "doubling" }
        fn labels(&self) -> &[&'static str] { &["x"] }
        fn step(&self, prev: &[f64], next: &mut [f64]) {
            next[0] = 2.0 * prev[0];
        }
    }

    #[test]
    fn test_discrete_evolve() {
        let traj = Doubling.evolve(&[1.0], 5).unwrap();
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.column(0), vec![1.0, 2.0, 4.0, 8.0, 16.0]);
        assert_eq!(traj.times(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_discrete_evolve_single_sample() {
        let traj = Doubling.evolve(&[3.0], 1).unwrap();
        assert_eq!(traj.column(0), vec![3.0]);
    }

    #[test]
    fn test_discrete_evolve_errors() {
        assert_eq!(Doubling.evolve(&[1.0], 0), Err(ModelError::EmptyHorizon));
        assert_eq!(
            Doubling.evolve(&[1.0, 2.0], 3),
            Err(ModelError::DimensionMismatch { found: 2, expected: 1 })
        );
    }
}
