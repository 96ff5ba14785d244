use log::debug;
use rand::Rng;
use cs_core::ModelError;
use cs_core::Trajectory;
use cs_solvers::{ReactionNetwork, simulate_on_grid};

/// Michaelis-Menten enzyme kinetics in molecule counts.
pub const ENZYME_NETWORK: &str = "\
# enzyme-substrate binding and release
binding:   E + S -> ES; 0.01
unbinding: ES -> E + S; 0.1
# catalysis
catalysis: ES -> E + P; 0.1

E = 50
S = 500
ES = 0
P = 0
";

/// Enzymatic activity simulated with Gillespie's direct method.
///
/// [`EnzymaticActivityModel::new`] loads [`ENZYME_NETWORK`]; any other
/// [`ReactionNetwork`] can be plugged in with
/// [`EnzymaticActivityModel::from_network`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnzymaticActivityModel {
    network: ReactionNetwork,
}

impl EnzymaticActivityModel {
    pub fn new() -> Result<Self, ModelError> {
        Ok(Self { network: ENZYME_NETWORK.parse()? })
    }

    pub fn from_network(network: ReactionNetwork) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn name(&self) -> &str {
        "EnzymaticActivityModel"
    }

    /// One stochastic realization sampled at `times`.
    pub fn evolve<R: Rng + ?Sized>(&self, rng: &mut R, times: &[f64]) -> Result<Trajectory, ModelError> {
        debug!("{}: {} species, {} reactions, {} output times",
            self.name(), self.network.species().len(), self.network.reactions().len(), times.len());
        simulate_on_grid(self.name(), &self.network, rng, times)
    }
}
