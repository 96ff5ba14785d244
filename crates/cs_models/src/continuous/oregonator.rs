use cs_core::OdeSystem;

/// The Oregonator, the simplest realistic model of the oscillating
/// Belousov-Zhabotinsky reaction.
///
/// ```text
/// dA/dt = scale · s (A - A B + B - q A²)
/// dB/dt = scale · (C - B - A B) / s
/// dC/dt = scale · w (A - C)
/// ```
///
/// The system is stiff: integrate it with `Method::Bdf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OregonatorModel {
    pub s: f64,
    pub q: f64,
    pub w: f64,
    /// Time scaling factor applied to all three derivatives.
    pub scale: f64,
}

impl Default for OregonatorModel {
    fn default() -> Self {
        Self {
            s: 77.27,
            q: 8.375e-6,
            w: 0.161,
            scale: 320.0,
        }
    }
}

impl OdeSystem for OregonatorModel {
    fn name(&self) -> &str {
        "OregonatorModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["A", "B", "C"]
    }

    fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (a, b, c) = (y[0], y[1], y[2]);
        dydt[0] = self.scale * self.s * (a - a * b + b - self.q * a * a);
        dydt[1] = self.scale * (c - b - a * b) / self.s;
        dydt[2] = self.scale * self.w * (a - c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cs_solvers::{EvolveOde, Method, SolverOptions};

    #[test]
    fn test_oregonator_deltas() {
        let model = OregonatorModel::default();
        let mut d = [0.0; 3];
        model.deltas(0.0, &[1.0, 2.0, 3.0], &mut d);
        let q = 8.375e-6;
        assert_relative_eq!(d[0], 320.0 * 77.27 * (1.0 - 2.0 + 2.0 - q), max_relative = 1e-12);
        assert_relative_eq!(d[1], 320.0 * (3.0 - 2.0 - 2.0) / 77.27, max_relative = 1e-12);
        assert_relative_eq!(d[2], 320.0 * 0.161 * (1.0 - 3.0), max_relative = 1e-12);
    }

    #[test]
    fn test_oregonator_near_zero_span() {
        let model = OregonatorModel::default();
        for method in [Method::Bdf, Method::Tsit45] {
            let traj = model
                .evolve(&[1.0, 2.0, 3.0], &[0.0, 1e-12], &SolverOptions::with_method(method))
                .unwrap();
            assert_relative_eq!(traj.state(1)[0], 1.0, max_relative = 1e-6);
            assert_relative_eq!(traj.state(1)[1], 2.0, max_relative = 1e-6);
            assert_relative_eq!(traj.state(1)[2], 3.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_oregonator_methods_agree() {
        let model = OregonatorModel::default();
        let times = [0.0, 5e-4, 1e-3];
        let opts = |method| SolverOptions { method, rtol: 1e-7, atol: 1e-9, ..SolverOptions::default() };
        let explicit = model.evolve(&[1.0, 2.0, 3.0], &times, &opts(Method::Tsit45)).unwrap();
        let implicit = model.evolve(&[1.0, 2.0, 3.0], &times, &opts(Method::Bdf)).unwrap();
        for var in 0..3 {
            assert_relative_eq!(
                explicit.state(2)[var],
                implicit.state(2)[var],
                max_relative = 1e-3
            );
        }
    }

    #[test]
    fn test_oregonator_stays_positive() {
        let model = OregonatorModel::default();
        let times: Vec<f64> = (0..=20).map(|i| i as f64 * 0.005).collect();
        let opts = SolverOptions {
            method: Method::Bdf,
            rtol: 1e-4,
            atol: 1e-6,
            ..SolverOptions::default()
        };
        let traj = model.evolve(&[1.0, 2.0, 3.0], &times, &opts).unwrap();
        assert_eq!(traj.len(), 21);
        for (_, y) in traj.iter() {
            assert!(y.iter().all(|x| x.is_finite() && *x > 0.0));
        }
    }

    #[test]
    fn test_oregonator_oscillates_with_default_options() {
        // One period of the scaled Oregonator lasts a little under one time unit.
        let model = OregonatorModel::default();
        let n = 120_000;
        let t_end = 12.0;
        let times: Vec<f64> = (0..n).map(|i| t_end * i as f64 / (n - 1) as f64).collect();
        let traj = model
            .evolve(&[1.0, 2.0, 3.0], &times, &SolverOptions::default())
            .unwrap();
        assert_eq!(traj.len(), n);
        assert_eq!(traj.last().map(|(t, _)| t), Some(t_end));
        for (_, y) in traj.iter() {
            assert!(y.iter().all(|x| x.is_finite() && *x > 0.0));
        }

        let b = traj.column(1);
        let mean = b.iter().sum::<f64>() / b.len() as f64;
        let crossings = b.windows(2)
            .filter(|w| (w[0] - mean) * (w[1] - mean) < 0.0)
            .count();
        assert!(crossings >= 10, "B crossed its mean only {} times", crossings);
    }
}
