use cs_core::OdeSystem;

/// Lotka-Volterra predator-prey model.
///
/// ```text
/// dV/dt =  r V - a V P
/// dP/dt = -s P + a b V P
/// ```
///
/// `V` are the preys, `P` the predators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotkaVolterraModel {
    /// Growth rate of the preys.
    pub r: f64,
    /// Death rate of the predators.
    pub s: f64,
    /// Rate of predator-prey meetings.
    pub a: f64,
    /// Offspring produced by a predator for each hunted prey.
    pub b: f64,
}

impl Default for LotkaVolterraModel {
    fn default() -> Self {
        Self { r: 10.0, s: 10.0, a: 0.01, b: 1.0 }
    }
}

impl LotkaVolterraModel {
    /// The first integral `a b V - s ln V + a P - r ln P`, constant along
    /// every trajectory with `V, P > 0`.
    pub fn invariant(&self, v: f64, p: f64) -> f64 {
        self.a * self.b * v - self.s * v.ln() + self.a * p - self.r * p.ln()
    }

    /// The coexistence equilibrium `(s / (a b), r / a)`.
    pub fn equilibrium(&self) -> (f64, f64) {
        (self.s / (self.a * self.b), self.r / self.a)
    }
}

impl OdeSystem for LotkaVolterraModel {
    fn name(&self) -> &str {
        "LotkaVolterraModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["V", "P"]
    }

    fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (v, p) = (y[0], y[1]);
        dydt[0] = self.r * v - self.a * v * p;
        dydt[1] = -self.s * p + self.a * self.b * v * p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use cs_solvers::{EvolveOde, Method, SolverOptions};

    #[test]
    fn test_near_zero_span() {
        let model = LotkaVolterraModel::default();
        let traj = model.evolve(&[1200.0, 800.0], &[0.0, 1e-12], &SolverOptions::default()).unwrap();
        assert_relative_eq!(traj.state(1)[0], 1200.0, max_relative = 1e-9);
        assert_relative_eq!(traj.state(1)[1], 800.0, max_relative = 1e-9);
    }

    #[test]
    fn test_equilibrium_is_stationary() {
        let model = LotkaVolterraModel::default();
        let (v, p) = model.equilibrium();
        assert_relative_eq!(v, 1000.0);
        assert_relative_eq!(p, 1000.0);
        let mut d = [1.0; 2];
        model.deltas(0.0, &[v, p], &mut d);
        assert_abs_diff_eq!(d[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_integral_is_conserved() {
        let model = LotkaVolterraModel::default();
        let times: Vec<f64> = (0..=200).map(|i| i as f64 * 0.01).collect();
        let opts = SolverOptions::with_method(Method::Tsit45);
        let traj = model.evolve(&[1200.0, 800.0], &times, &opts).unwrap();
        let h0 = model.invariant(1200.0, 800.0);
        for (_, y) in traj.iter() {
            assert_relative_eq!(model.invariant(y[0], y[1]), h0, max_relative = 1e-6);
        }
    }
}
