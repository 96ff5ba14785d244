use cs_core::OdeSystem;

/// Predator-prey-vegetation variant of the Lotka-Volterra model.
///
/// ```text
/// dV/dt =  r V - a V P
/// dP/dt = -s P + a b V P
/// dF/dt =  F^v - V
/// ```
///
/// The vegetation term is used exactly as written; it is not the
/// logistic growth one might expect, and grows without bound once `F`
/// outpaces the preys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PPVModel {
    pub r: f64,
    pub s: f64,
    pub a: f64,
    pub b: f64,
    /// Vegetation growth exponent.
    pub v: f64,
}

impl Default for PPVModel {
    fn default() -> Self {
        Self { r: 10.0, s: 10.0, a: 0.01, b: 1.0, v: 2.0 }
    }
}

impl OdeSystem for PPVModel {
    fn name(&self) -> &str {
        "PPVModel"
    }

    fn labels(&self) -> &[&'static str] {
        &["V", "P", "F"]
    }

    fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (v, p, f) = (y[0], y[1], y[2]);
        dydt[0] = self.r * v - self.a * v * p;
        dydt[1] = -self.s * p + self.a * self.b * v * p;
        dydt[2] = f.powf(self.v) - v;
    }
}
