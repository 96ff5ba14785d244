use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};
use anyhow::Result;
use anyhow::bail;
use colored::*;
use env_logger::Builder;
use log::info;

use cs_core::Trajectory;
use cs_core::trajectory_plotting::plot_trajectory;
use cs_solvers::{Method, SolverOptions};

#[derive(Debug, Args)]
pub struct TimeGridParameters {
    /// First output time.
    #[arg(long, global = true, default_value_t = 0.0)]
    pub t_start: f64,

    /// Last output time [default: t-start plus the model's time span].
    #[arg(long, global = true)]
    pub t_end: Option<f64>,

    /// Number of evenly spaced output times in [t-start, t-end].
    #[arg(long, global = true, default_value_t = 101)]
    pub n_points: usize,
}

impl TimeGridParameters {
    /// The last output time, `t_start + default_span` unless given.
    pub fn end(&self, default_span: f64) -> f64 {
        self.t_end.unwrap_or(self.t_start + default_span)
    }

    /// Validate that all parameters make sense.
    pub fn validate(&self, default_span: f64) -> Result<()> {
        let t_end = self.end(default_span);
        if !self.t_start.is_finite() || !t_end.is_finite() {
            bail!("t_start ({}) and t_end ({}) must be finite", self.t_start, t_end);
        }
        if t_end <= self.t_start {
            bail!("t_end ({}) must be greater than t_start ({})", t_end, self.t_start);
        }
        if self.n_points < 2 {
            bail!("n_points must be at least 2 (got {})", self.n_points);
        }
        Ok(())
    }

    /// `n_points` evenly spaced times from `t_start` to the end, both
    /// included.
    pub fn get_output_times(&self, default_span: f64) -> Vec<f64> {
        let t_end = self.end(default_span);
        let n = self.n_points.max(2);
        let step = (t_end - self.t_start) / (n - 1) as f64;
        let mut times: Vec<f64> = (0..n - 1)
            .map(|i| self.t_start + i as f64 * step)
            .collect();
        times.push(t_end);
        times
    }
}

#[derive(Debug, Args)]
pub struct EnsembleArguments {
    /// Number of independent simulations.
    #[arg(short, long, default_value_t = 1)]
    pub num_sims: usize,

    /// Seed of the first simulation; simulation i uses seed + i.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Backup/Store the accumulated ensemble in this file.
    #[arg(long, value_name = "FILE")]
    pub ensemble: Option<PathBuf>,
}

impl EnsembleArguments {
    pub fn validate(&self) -> Result<()> {
        if self.num_sims == 0 {
            bail!("num_sims must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Variable order BDF, for stiff systems.
    Bdf,
    /// Explicit Tsitouras 5(4) Runge-Kutta.
    Tsit45,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Bdf => Method::Bdf,
            MethodArg::Tsit45 => Method::Tsit45,
        }
    }
}

#[derive(Debug, Args)]
pub struct SolverArguments {
    /// Integration method [default: depends on the model].
    #[arg(long, global = true, value_enum)]
    pub method: Option<MethodArg>,

    /// Relative tolerance [default: depends on the model].
    #[arg(long, global = true)]
    pub rtol: Option<f64>,

    /// Absolute tolerance [default: depends on the model].
    #[arg(long, global = true)]
    pub atol: Option<f64>,

    /// Maximum number of integration steps.
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,
}

impl SolverArguments {
    /// Override the model's preferred settings with the given flags.
    pub fn build_options(&self, defaults: SolverOptions) -> Result<SolverOptions> {
        let mut options = defaults;
        if let Some(method) = self.method {
            options.method = method.into();
        }
        if let Some(rtol) = self.rtol {
            options.rtol = rtol;
        }
        if let Some(atol) = self.atol {
            options.atol = atol;
        }
        if let Some(max_steps) = self.max_steps {
            options.max_steps = max_steps;
        }
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Args)]
pub struct OutputArguments {
    /// Render the trajectory as SVG line chart into this file.
    #[arg(long, global = true, value_name = "FILE")]
    pub plot: Option<PathBuf>,

    /// Store the trajectory as JSON in this file.
    #[arg(long, global = true, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Do not print the trajectory table.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl OutputArguments {
    /// Print, plot and store a trajectory as requested.
    pub fn emit(&self, trajectory: &Trajectory) -> Result<()> {
        if !self.quiet {
            println!("{}", trajectory.name().yellow());
            println!("{}", trajectory);
        }
        if let Some(path) = &self.plot {
            plot_trajectory(trajectory, path)?;
            info!("Plot written to {}", path.display());
        }
        if let Some(path) = &self.json {
            trajectory.to_file(path)?;
            info!("Trajectory written to {}", path.display());
        }
        Ok(())
    }
}

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            // no prefix, just the message
            writeln!(buf, "{}", record.args())
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        grid: TimeGridParameters,
        #[command(flatten)]
        solver: SolverArguments,
        #[command(flatten)]
        output: OutputArguments,
        #[command(flatten)]
        ensemble: EnsembleArguments,
    }

    #[test]
    fn test_output_times() {
        let cli = TestCli::try_parse_from(["test", "--t-end", "2", "--n-points", "5"]).unwrap();
        cli.grid.validate(10.0).unwrap();
        assert_eq!(cli.grid.get_output_times(10.0), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_output_times_model_default() {
        let cli = TestCli::try_parse_from(["test", "--t-start", "1", "--n-points", "3"]).unwrap();
        assert_eq!(cli.grid.get_output_times(2.0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_resumed_grid_extends_past_start() {
        let mut cli = TestCli::try_parse_from(["test", "--n-points", "3"]).unwrap();
        // A resumed run starts where the stored trajectory ended.
        cli.grid.t_start = 10.0;
        cli.grid.validate(10.0).unwrap();
        assert_eq!(cli.grid.get_output_times(10.0), vec![10.0, 15.0, 20.0]);

        let mut cli = TestCli::try_parse_from(["test", "--t-end", "4"]).unwrap();
        cli.grid.t_start = 10.0;
        assert!(cli.grid.validate(10.0).is_err());
    }

    #[test]
    fn test_ensemble_needs_simulations() {
        let cli = TestCli::try_parse_from(["test", "--num-sims", "0"]).unwrap();
        assert!(cli.ensemble.validate().is_err());
        let cli = TestCli::try_parse_from(["test", "-n", "8", "--seed", "3"]).unwrap();
        cli.ensemble.validate().unwrap();
        assert_eq!(cli.ensemble.num_sims, 8);
        assert_eq!(cli.ensemble.seed, Some(3));
        assert!(cli.ensemble.ensemble.is_none());
    }

    #[test]
    fn test_invalid_grid() {
        let cli = TestCli::try_parse_from(["test", "--t-end", "0"]).unwrap();
        assert!(cli.grid.validate(10.0).is_err());
        let cli = TestCli::try_parse_from(["test", "--n-points", "1"]).unwrap();
        assert!(cli.grid.validate(10.0).is_err());
    }

    #[test]
    fn test_solver_overrides() {
        let cli = TestCli::try_parse_from(["test", "--rtol", "1e-4"]).unwrap();
        let defaults = SolverOptions::with_method(Method::Tsit45);
        let options = cli.solver.build_options(defaults.clone()).unwrap();
        assert_eq!(options.method, Method::Tsit45);
        assert_eq!(options.rtol, 1e-4);
        assert_eq!(options.atol, defaults.atol);

        let cli = TestCli::try_parse_from(["test", "--method", "bdf", "--max-steps", "10"]).unwrap();
        let options = cli.solver.build_options(defaults).unwrap();
        assert_eq!(options.method, Method::Bdf);
        assert_eq!(options.max_steps, 10);
    }

    #[test]
    fn test_solver_rejects_bad_tolerance() {
        let cli = TestCli::try_parse_from(["test", "--atol=-1"]).unwrap();
        assert!(cli.solver.build_options(SolverOptions::default()).is_err());
    }

    #[test]
    fn test_verbosity_count() {
        let cli = TestCli::try_parse_from(["test", "-vv", "--json", "out.json"]).unwrap();
        assert_eq!(cli.output.verbose, 2);
        assert_eq!(cli.output.json, Some(PathBuf::from("out.json")));
        assert!(cli.output.plot.is_none());
    }
}
