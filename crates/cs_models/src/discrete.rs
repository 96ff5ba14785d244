use cs_core::DiscreteSystem;

/// Linear growth with constant migration.
///
/// `N[t] = α N[t-1] + β` with the net growth rate `α = rd - sd`.
///
/// # Fields
/// - `rd`: birth rate. Each individual has λ children every σ time units,
///   so `rd = 1 + λ Δt / σ`.
/// - `sd`: death rate, `0 ≤ sd ≤ 1`.
/// - `beta`: number of individuals migrating into the population every
///   time step, `β ≥ 0`.
///
/// # Example
/// ```rust
/// use cs_core::DiscreteSystem;
/// use cs_models::LinearModel;
///
/// let model = LinearModel::new(1.5, 0.9, 10.0);
/// let traj = model.evolve(&[20.0], 3).unwrap();
/// assert!((traj.state(2)[0] - 23.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub rd: f64,
    pub sd: f64,
    pub beta: f64,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::new(1.5, 0.9, 10.0)
    }
}

impl LinearModel {
    pub fn new(rd: f64, sd: f64, beta: f64) -> Self {
        Self { rd, sd, beta }
    }

    /// The net growth rate `α = rd - sd`.
    pub fn alpha(&self) -> f64 {
        self.rd - self.sd
    }

    /// Closed form `N(t) = α^t N0 + β Σ_{i=0}^{t-2} α^i`.
    ///
    /// The migration sum stops at `t - 2`, so for `t ≥ 1` the result is one
    /// migration term (`β α^{t-1}`) short of the recurrence.
    pub fn evolution_at_t(&self, n0: f64, t: u32) -> f64 {
        let alpha = self.alpha();
        let migration: f64 = (0..t.saturating_sub(1))
            .map(|i| alpha.powi(i as i32) * self.beta)
            .sum();
        alpha.powi(t as i32) * n0 + migration
    }

    /// Fixed point `β / (1 - α)`. Infinite (or NaN) when `α = 1`.
    pub fn equilibrium(&self) -> f64 {
        self.beta / (1.0 - self.alpha())
    }
}

impl DiscreteSystem for LinearModel {
    fn name(&self) -> &str {
        "LinearModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["N"]
    }

    fn step(&self, prev: &[f64], next: &mut [f64]) {
        next[0] = self.alpha() * prev[0] + self.beta;
    }
}

/// Logistic growth `N[t] = rd N[t-1] (1 - N[t-1] / k)`.
///
/// `rd` is the birth rate (see [`LinearModel`]) and `k` the carrying
/// capacity of the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonLinearModel {
    pub rd: f64,
    pub k: f64,
}

impl Default for NonLinearModel {
    fn default() -> Self {
        Self { rd: 2.0, k: 50.0 }
    }
}

impl NonLinearModel {
    pub fn new(rd: f64, k: f64) -> Self {
        Self { rd, k }
    }
}

impl DiscreteSystem for NonLinearModel {
    fn name(&self) -> &str {
        "NonLinearModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["N"]
    }

    fn step(&self, prev: &[f64], next: &mut [f64]) {
        next[0] = self.rd * prev[0] * (1.0 - prev[0] / self.k);
    }
}

/// Adults and children.
///
/// Every year the adults grow by the net rate α, each adult generates β
/// children, and a third of the children become adults (children take
/// three years to grow up and never die):
///
/// ```text
/// A[t] = α A[t-1] + C[t-1] / 3
/// C[t] = β A[t-1] - C[t-1] · 2/3
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ACModel {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for ACModel {
    fn default() -> Self {
        Self { alpha: 0.5, beta: 0.6 }
    }
}

impl ACModel {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

impl DiscreteSystem for ACModel {
    fn name(&self) -> &str {
        "ACModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["Adults", "Children"]
    }

    fn step(&self, prev: &[f64], next: &mut [f64]) {
        let (a, c) = (prev[0], prev[1]);
        next[0] = self.alpha * a + c * (1.0 / 3.0);
        next[1] = self.beta * a - c * (1.0 - 1.0 / 3.0);
    }
}
