//! Shared data types of the complex systems models.
//!
//! Every model in `cs_models` produces a [`Trajectory`]: a time axis and one
//! state row per time point. Stochastic models average several trajectories
//! into an [`Ensemble`].

mod error;
mod system;
mod trajectory;
mod ensemble;

pub mod trajectory_io;
pub mod trajectory_plotting;

pub use error::*;
pub use system::*;
pub use trajectory::*;
pub use ensemble::*;
