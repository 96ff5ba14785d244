//! Numerical engines behind the continuous and stochastic models.
//!
//! - [`integrate`]: adaptive ODE integration sampled on a caller-supplied
//!   time axis. The stepping is done by `diffsol`, with a BDF method for
//!   stiff systems and an explicit Tsitouras 5(4) pair for non-stiff ones.
//! - [`ReactionNetwork`] and [`GillespieSSA`]: mass-action reaction networks
//!   and their exact stochastic simulation.

mod options;
mod integrate;
mod reaction;
mod gillespie;

pub use options::*;
pub use integrate::*;
pub use reaction::*;
pub use gillespie::*;
