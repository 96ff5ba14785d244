use cs_core::OdeSystem;

/// Susceptible-Infected-Recovered model with vital dynamics and
/// vaccination of newborns. The variables are population fractions.
///
/// ```text
/// dS/dt = (1 - p) μ - β S I - μ S
/// dI/dt = β S I - γ I - μ I
/// dR/dt = p μ + γ I - μ R
/// ```
///
/// Births and deaths balance, so `S + I + R` relaxes to 1 and stays
/// there when it starts there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SIRModel {
    /// Infection coefficient.
    pub beta: f64,
    /// Recovery rate.
    pub gamma: f64,
    /// Birth (and death) rate.
    pub mu: f64,
    /// Fraction of vaccinated newborns.
    pub p: f64,
}

impl Default for SIRModel {
    fn default() -> Self {
        Self { beta: 6.0, gamma: 2.0, mu: 2.0, p: 0.1 }
    }
}

impl SIRModel {
    /// Smallest vaccinated fraction that prevents an epidemic,
    /// `1 - (μ + γ) / β`. Not validated: `β == 0` yields `-∞`.
    pub fn vaccination_threshold(&self) -> f64 {
        1.0 - (self.mu + self.gamma) / self.beta
    }

    /// Basic reproduction number `β / (μ + γ)`.
    pub fn r0(&self) -> f64 {
        self.beta / (self.mu + self.gamma)
    }
}

impl OdeSystem for SIRModel {
    fn name(&self) -> &str {
        "SIRModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["S", "I", "R"]
    }

    fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (s, i, r) = (y[0], y[1], y[2]);
        dydt[0] = (1.0 - self.p) * self.mu - self.beta * s * i - self.mu * s;
        dydt[1] = self.beta * s * i - self.gamma * i - self.mu * i;
        dydt[2] = self.p * self.mu + self.gamma * i - self.mu * r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cs_solvers::{EvolveOde, Method, SolverOptions};

    #[test]
    fn test_vaccination_threshold() {
        let measles = SIRModel { beta: 1800.0, gamma: 100.0, mu: 0.02, p: 0.0 };
        assert_relative_eq!(measles.vaccination_threshold(), 0.9444, epsilon = 1e-4);
        assert_relative_eq!(SIRModel::default().vaccination_threshold(), 1.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(SIRModel::default().r0(), 1.5);
    }

    #[test]
    fn test_threshold_not_validated() {
        let model = SIRModel { beta: 0.0, ..SIRModel::default() };
        assert_eq!(model.vaccination_threshold(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_population_is_conserved() {
        let model = SIRModel::default();
        let times: Vec<f64> = (0..=100).map(|i| i as f64 * 0.1).collect();
        for method in [Method::Bdf, Method::Tsit45] {
            let opts = SolverOptions::with_method(method);
            let traj = model.evolve(&[0.9, 0.1, 0.0], &times, &opts).unwrap();
            assert_eq!(traj.len(), times.len());
            for (_, y) in traj.iter() {
                assert_relative_eq!(y[0] + y[1] + y[2], 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_endemic_equilibrium() {
        // Above the threshold the infection settles at S* = 1 / R0.
        let model = SIRModel::default();
        let times = [0.0, 50.0];
        let traj = model.evolve(&[0.9, 0.1, 0.0], &times, &SolverOptions::default()).unwrap();
        let (_, y) = traj.last().unwrap();
        assert_relative_eq!(y[0], 1.0 / model.r0(), epsilon = 1e-5);
    }

    #[test]
    fn test_full_vaccination_clears_infection() {
        let model = SIRModel { p: 0.5, ..SIRModel::default() };
        assert!(model.p > model.vaccination_threshold());
        let traj = model.evolve(&[0.5, 0.01, 0.49], &[0.0, 30.0], &SolverOptions::default()).unwrap();
        assert!(traj.state(1)[1] < 1e-6);
    }
}
