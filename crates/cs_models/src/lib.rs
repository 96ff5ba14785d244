//! Population dynamics and chemical kinetics models.
//!
//! Discrete models implement [`cs_core::DiscreteSystem`], continuous ones
//! [`cs_core::OdeSystem`] (and thereby [`cs_solvers::EvolveOde`]). The
//! stochastic [`EnzymaticActivityModel`] runs a Gillespie simulation. No
//! model keeps simulation output: every `evolve` returns a
//! [`cs_core::Trajectory`].

/// Recurrence relations: linear, logistic and adults/children.
mod discrete;

/// ODE systems: Oregonator, Lotka-Volterra, SIR, PPV and Brusselator.
mod continuous;

/// The enzyme-substrate-product reaction network.
mod stochastic;

pub use discrete::*;
pub use continuous::*;
pub use stochastic::*;
