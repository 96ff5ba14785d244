use std::fmt;
use log::{debug, warn};
use rand::Rng;
use cs_core::ModelError;
use cs_core::Trajectory;

use crate::ReactionNetwork;

/// Gillespie's direct method on a [`ReactionNetwork`].
pub struct GillespieSSA<'a> {
    network: &'a ReactionNetwork,
    counts: Vec<u64>,
    propensities: Vec<f64>,
}

impl<'a> fmt::Debug for GillespieSSA<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GillespieSSA")
            .field("species", &self.network.species())
            .field("counts", &self.counts)
            .finish()
    }
}

impl<'a> From<&'a ReactionNetwork> for GillespieSSA<'a> {
    fn from(network: &'a ReactionNetwork) -> Self {
        Self {
            network,
            counts: network.initial_counts().to_vec(),
            propensities: vec![0.0; network.reactions().len()],
        }
    }
}

impl<'a> GillespieSSA<'a> {
    /// Start from custom molecule counts instead of the network's initial ones.
    pub fn with_counts(network: &'a ReactionNetwork, counts: &[u64]) -> Result<Self, ModelError> {
        if counts.len() != network.species().len() {
            return Err(ModelError::DimensionMismatch {
                found: counts.len(),
                expected: network.species().len(),
            });
        }
        let mut ssa = Self::from(network);
        ssa.counts.copy_from_slice(counts);
        Ok(ssa)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    fn update_propensities(&mut self) -> f64 {
        for (a, rxn) in self.propensities.iter_mut().zip(self.network.reactions()) {
            *a = rxn.propensity(&self.counts);
        }
        self.propensities.iter().sum()
    }

    /// Run until `t_max` (starting at time zero).
    ///
    /// Before each event `callback(t, tinc, flux, counts)` reports the
    /// current time, the sampled waiting time, the total propensity and the
    /// molecule counts that hold during `[t, t + tinc)`. When no reaction can
    /// fire, the callback gets an infinite waiting time and the run ends.
    pub fn simulate<R, F>(&mut self, rng: &mut R, t_max: f64, mut callback: F)
    where
        R: Rng + ?Sized,
        F: FnMut(f64, f64, f64, &[u64]),
    {
        let mut t = 0.;
        let mut events = 0usize;

        while t < t_max {
            let flux = self.update_propensities();
            if !(flux > 0.0) {
                debug!("No reaction can fire after {} events at t = {}", events, t);
                callback(t, f64::INFINITY, 0.0, &self.counts);
                break;
            }

            // waiting time ~ Exp(flux); 1 - u lies in (0, 1]
            let tinc = -(1.0 - rng.random::<f64>()).ln() / flux;
            callback(t, tinc, flux, &self.counts);
            t += tinc;
            if t >= t_max {
                break;
            }

            let threshold = rng.random::<f64>() * flux;
            let mut acc = 0.0;
            let mut chosen = None;
            for (r, &a) in self.propensities.iter().enumerate() {
                if a <= 0.0 {
                    continue;
                }
                acc += a;
                chosen = Some(r);
                if acc > threshold {
                    break;
                }
            }
            if let Some(r) = chosen {
                self.network.reactions()[r].fire(&mut self.counts);
            }
            events += 1;
        }
        debug!("SSA finished with {} events", events);
    }
}

/// One stochastic trajectory recorded at the given output times.
///
/// Each sample holds the molecule counts in effect at that time. The run
/// starts at time zero and ends at the last output time.
pub fn simulate_on_grid<R: Rng + ?Sized>(
    name: &str,
    network: &ReactionNetwork,
    rng: &mut R,
    times: &[f64],
) -> Result<Trajectory, ModelError> {
    if times.is_empty() {
        return Err(ModelError::EmptyTimeAxis);
    }
    if let Some(i) = times.windows(2).position(|w| !(w[1] >= w[0])) {
        return Err(ModelError::UnorderedTimeAxis(i + 1));
    }

    let mut trajectory = Trajectory::with_capacity(name, network.species(), times.len());
    let mut state = vec![0.0; network.species().len()];
    let mut t_idx = 0;
    let mut exhausted = false;

    let mut ssa = GillespieSSA::from(network);
    ssa.simulate(rng, times[times.len() - 1], |t, tinc, _, counts| {
        if tinc.is_infinite() {
            exhausted = true;
        }
        while t_idx < times.len() && t + tinc >= times[t_idx] {
            for (x, &c) in state.iter_mut().zip(counts) {
                *x = c as f64;
            }
            trajectory.push(times[t_idx], &state);
            t_idx += 1;
        }
    });

    // Only reached if the run never started, i.e. all times are <= 0.
    for &t in &times[t_idx..] {
        for (x, &c) in state.iter_mut().zip(ssa.counts()) {
            *x = c as f64;
        }
        trajectory.push(t, &state);
    }
    if exhausted {
        warn!("{}: no reaction can fire any more, counts stay constant", name);
    }
    Ok(trajectory)
}
