//! # complexsys
//!
//! Discrete, continuous and stochastic models of population dynamics and
//! chemical kinetics, plus the argument groups shared by the `cs-*`
//! command line tools.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod input_parsers;
pub mod cli_parsers;

pub mod common {
    pub use ::cs_core::*;
}

pub mod solvers {
    pub use ::cs_solvers::*;
}

pub mod models {
    pub use ::cs_models::*;
}
