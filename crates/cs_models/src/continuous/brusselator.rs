use cs_core::OdeSystem;

/// The Brusselator, a model of an autocatalytic reaction.
///
/// ```text
/// dX/dt = a + X² Y - (b + 1) X
/// dY/dt = b X - X² Y
/// ```
///
/// The fixed point `(a, b / a)` loses stability for `b > 1 + a²`,
/// after which trajectories approach a limit cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrusselatorModel {
    pub a: f64,
    pub b: f64,
}

impl Default for BrusselatorModel {
    fn default() -> Self {
        Self { a: 1.0, b: 3.0 }
    }
}

impl BrusselatorModel {
    pub fn fixed_point(&self) -> (f64, f64) {
        (self.a, self.b / self.a)
    }

    pub fn is_oscillating(&self) -> bool {
        self.b > 1.0 + self.a * self.a
    }
}

impl OdeSystem for BrusselatorModel {
    fn name(&self) -> &str {
        "BrusselatorModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["X", "Y"]
    }

    fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (x, y) = (y[0], y[1]);
        let x2y = x * x * y;
        dydt[0] = self.a + x2y - (self.b + 1.0) * x;
        dydt[1] = self.b * x - x2y;
    }
}
