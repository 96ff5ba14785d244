use std::fmt;
use log::{debug, info};
use diffsol::{NalgebraLU, NalgebraMat, OdeBuilder, OdeSolverMethod};
use cs_core::ModelError;
use cs_core::OdeSystem;
use cs_core::Trajectory;

use crate::Method;
use crate::SolverOptions;

type M = NalgebraMat<f64>;
type LS = NalgebraLU<f64>;

fn solver_failure<E: fmt::Display>(time: f64, err: E) -> ModelError {
    ModelError::SolverFailure { time, reason: err.to_string() }
}

/// J(y)·v by a central difference along `v`.
fn jacobian_times<S: OdeSystem + ?Sized>(system: &S, t: f64, y: &[f64], v: &[f64]) -> Vec<f64> {
    let n = y.len();
    let v_norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if v_norm == 0.0 {
        return vec![0.0; n];
    }
    let y_norm = y.iter().map(|x| x * x).sum::<f64>().sqrt();
    let eps = f64::EPSILON.cbrt() * (1.0 + y_norm) / v_norm;

    let plus: Vec<f64> = y.iter().zip(v).map(|(a, b)| a + eps * b).collect();
    let minus: Vec<f64> = y.iter().zip(v).map(|(a, b)| a - eps * b).collect();
    let mut f_plus = vec![0.0; n];
    let mut f_minus = vec![0.0; n];
    system.deltas(t, &plus, &mut f_plus);
    system.deltas(t, &minus, &mut f_minus);
    f_plus.iter().zip(&f_minus).map(|(p, m)| (p - m) / (2.0 * eps)).collect()
}

// Steps `$solver` just past each output time and reads the sample off its
// dense output. Expands inside `integrate` so every solver type gets its
// own copy.
macro_rules! sample_onto_axis {
    ($solver:expr, $system:expr, $y0:expr, $times:expr, $options:expr) => {{
        let t0 = $times[0];
        let mut solver = $solver.map_err(|e| solver_failure(t0, e))?;
        let mut trajectory = Trajectory::with_capacity($system.name(), $system.labels(), $times.len());
        let mut sample = vec![0.0; $y0.len()];
        let mut steps = 0;

        for &t_out in $times {
            if t_out <= t0 {
                trajectory.push(t_out, $y0);
                continue;
            }
            while solver.state().t < t_out {
                if steps >= $options.max_steps {
                    return Err(ModelError::StepLimitExceeded { time: solver.state().t, steps });
                }
                if let Err(e) = solver.step() {
                    return Err(solver_failure(solver.state().t, e));
                }
                steps += 1;
            }
            let y = solver.interpolate(t_out).map_err(|e| solver_failure(t_out, e))?;
            for (i, x) in sample.iter_mut().enumerate() {
                *x = y[i];
            }
            if sample.iter().any(|x| !x.is_finite()) {
                return Err(solver_failure(t_out, "non-finite state"));
            }
            trajectory.push(t_out, &sample);
        }
        debug!("{} ({}): {} steps", $system.name(), $options.method, steps);
        trajectory
    }};
}

/// Integrate `system` from `y0` and sample the solution at `times`.
///
/// `times[0]` is the initial time and receives `y0` unchanged; the result
/// has exactly one sample per entry of `times`, read from the dense output
/// of the solver. Output times must not decrease. The stepping itself is
/// delegated to `diffsol`, the Jacobian needed by [`Method::Bdf`] is
/// approximated by finite differences of [`OdeSystem::deltas`].
///
/// # Example
/// ```rust
/// use cs_core::OdeSystem;
/// use cs_solvers::{integrate, SolverOptions};
///
/// struct Decay;
/// impl OdeSystem for Decay {
///     fn name(&self) -> &str { "decay" }
///     fn labels(&self) -> &[&'static str] { &["y"] }
///     fn deltas(&self, _t: f64, y: &[f64], dydt: &mut [f64]) { dydt[0] = -y[0]; }
/// }
///
/// let traj = integrate(&Decay, &[1.0], &[0.0, 1.0], &SolverOptions::default()).unwrap();
/// assert!((traj.state(1)[0] - (-1.0f64).exp()).abs() < 1e-6);
/// ```
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    y0: &[f64],
    times: &[f64],
    options: &SolverOptions,
) -> Result<Trajectory, ModelError> {
    options.validate()?;
    let n = system.dimension();
    if y0.len() != n {
        return Err(ModelError::DimensionMismatch { found: y0.len(), expected: n });
    }
    if times.is_empty() {
        return Err(ModelError::EmptyTimeAxis);
    }
    if let Some(i) = times.windows(2).position(|w| !(w[1] >= w[0])) {
        return Err(ModelError::UnorderedTimeAxis(i + 1));
    }

    let mut builder = OdeBuilder::<M>::new()
        .t0(times[0])
        .rtol(options.rtol)
        .atol(vec![options.atol; n]);
    if options.h0 > 0.0 {
        builder = builder.h0(options.h0);
    }
    let start = y0.to_vec();
    let problem = builder
        .rhs_implicit(
            |x, _p, t, dxdt| {
                let y: Vec<f64> = (0..n).map(|i| x[i]).collect();
                let mut dydt = vec![0.0; n];
                system.deltas(t, &y, &mut dydt);
                for (i, d) in dydt.into_iter().enumerate() {
                    dxdt[i] = d;
                }
            },
            |x, _p, t, v, jv| {
                let y: Vec<f64> = (0..n).map(|i| x[i]).collect();
                let dir: Vec<f64> = (0..n).map(|i| v[i]).collect();
                for (i, d) in jacobian_times(system, t, &y, &dir).into_iter().enumerate() {
                    jv[i] = d;
                }
            },
        )
        .init(
            move |_p, _t, y| {
                for (i, v) in start.iter().enumerate() {
                    y[i] = *v;
                }
            },
            n,
        )
        .build()
        .map_err(|e| solver_failure(times[0], e))?;

    let trajectory = match options.method {
        Method::Bdf => sample_onto_axis!(problem.bdf::<LS>(), system, y0, times, options),
        Method::Tsit45 => sample_onto_axis!(problem.tsit45(), system, y0, times, options),
    };

    info!("Integrated {} over [{}, {}] with {} samples",
        system.name(), times[0], times[times.len() - 1], trajectory.len());
    Ok(trajectory)
}

/// Gives every [`OdeSystem`] an `evolve` operation.
pub trait EvolveOde: OdeSystem {
    /// Integrate from `y0` and sample at `times`, see [`integrate`].
    fn evolve(
        &self,
        y0: &[f64],
        times: &[f64],
        options: &SolverOptions,
    ) -> Result<Trajectory, ModelError> {
        integrate(self, y0, times, options)
    }
}

impl<S: OdeSystem + ?Sized> EvolveOde for S {}
