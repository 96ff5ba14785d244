use std::fmt;
use cs_core::ModelError;

/// Integration scheme used by [`crate::integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Variable order BDF. Handles stiff systems such as the Oregonator
    /// and is the safe choice when stiffness is unknown.
    #[default]
    Bdf,
    /// Explicit Tsitouras 5(4) Runge-Kutta. Cheaper on non-stiff systems.
    Tsit45,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Bdf => write!(f, "bdf"),
            Method::Tsit45 => write!(f, "tsit45"),
        }
    }
}

/// Settings of the adaptive ODE integrators.
///
/// The default tolerances are those of LSODA as exposed by `odeint`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub method: Method,
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Initial step size, 0.0 leaves the choice to the solver.
    pub h0: f64,
    /// Maximum number of internal steps per integration.
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            h0: 0.0,
            max_steps: 500_000,
        }
    }
}

impl SolverOptions {
    pub fn with_method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(ModelError::InvalidOptions("rtol must be finite and > 0".into()));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(ModelError::InvalidOptions("atol must be finite and > 0".into()));
        }
        if !self.h0.is_finite() || self.h0 < 0.0 {
            return Err(ModelError::InvalidOptions("h0 must be finite and >= 0".into()));
        }
        if self.max_steps == 0 {
            return Err(ModelError::InvalidOptions("max_steps must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let opts = SolverOptions::default();
        assert_eq!(opts.method, Method::Bdf);
        assert!(opts.validate().is_ok());
        assert_eq!(SolverOptions::with_method(Method::Tsit45).method, Method::Tsit45);
    }

    #[test]
    fn test_invalid_options() {
        let opts = SolverOptions { rtol: 0.0, ..SolverOptions::default() };
        assert!(matches!(opts.validate(), Err(ModelError::InvalidOptions(_))));
        let opts = SolverOptions { atol: f64::NAN, ..SolverOptions::default() };
        assert!(opts.validate().is_err());
        let opts = SolverOptions { max_steps: 0, ..SolverOptions::default() };
        assert!(opts.validate().is_err());
        let opts = SolverOptions { h0: -1.0, ..SolverOptions::default() };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Bdf.to_string(), "bdf");
        assert_eq!(Method::Tsit45.to_string(), "tsit45");
    }
}
