use clap::{Args, Parser, Subcommand};
use anyhow::Result;
use anyhow::bail;
use colored::*;
use log::info;

use cs_core::DiscreteSystem;
use cs_models::{ACModel, LinearModel, NonLinearModel};

use complexsys::cli_parsers::OutputArguments;
use complexsys::cli_parsers::init_logging;

#[derive(Debug, Args)]
pub struct LinearArgs {
    /// Birth rate.
    #[arg(long, default_value_t = 1.5)]
    rd: f64,

    /// Death rate.
    #[arg(long, default_value_t = 0.9)]
    sd: f64,

    /// Migration per time step.
    #[arg(long, default_value_t = 10.0)]
    beta: f64,

    /// Initial population.
    #[arg(long, default_value_t = 20.0)]
    n0: f64,

    /// Time step at which to print the closed form solution.
    #[arg(long, default_value_t = 5)]
    at: u32,
}

#[derive(Debug, Args)]
pub struct NonLinearArgs {
    /// Birth rate.
    #[arg(long, default_value_t = 2.0)]
    rd: f64,

    /// Carrying capacity.
    #[arg(long, default_value_t = 50.0)]
    k: f64,

    /// Initial population.
    #[arg(long, default_value_t = 20.0)]
    n0: f64,
}

#[derive(Debug, Args)]
pub struct ACArgs {
    /// Fraction of adults surviving a time step.
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,

    /// Children per adult and time step.
    #[arg(long, default_value_t = 0.6)]
    beta: f64,

    /// Initial number of adults.
    #[arg(long, default_value_t = 50.0)]
    adults: f64,

    /// Initial number of children.
    #[arg(long, default_value_t = 5.0)]
    children: f64,
}

#[derive(Debug, Subcommand)]
pub enum Model {
    /// Linear growth with migration: N[t] = (rd - sd) N[t-1] + beta.
    Linear(LinearArgs),
    /// Logistic growth: N[t] = rd N[t-1] (1 - N[t-1] / k).
    Nonlinear(NonLinearArgs),
    /// Coupled adults and children populations.
    Ac(ACArgs),
}

#[derive(Debug, Parser)]
#[command(name = "cs-discrete")]
#[command(version, about = "Iterate discrete population models")]
pub struct Cli {
    #[command(subcommand)]
    model: Model,

    /// Number of time points, including the initial one.
    #[arg(long, global = true, default_value_t = 20)]
    t_max: usize,

    #[command(flatten, next_help_heading = "Output")]
    output: OutputArguments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.output.verbose);

    if cli.t_max == 0 {
        bail!("t_max must be > 0");
    }

    let trajectory = match &cli.model {
        Model::Linear(args) => {
            let model = LinearModel::new(args.rd, args.sd, args.beta);
            info!("{:?}", model);
            println!("{} evolution at time {}: {}",
                model.name().yellow(), args.at,
                format!("{:.6}", model.evolution_at_t(args.n0, args.at)).green());
            println!("{} equilibrium: {}",
                model.name().yellow(),
                format!("{:.6}", model.equilibrium()).green());
            model.evolve(&[args.n0], cli.t_max)?
        }
        Model::Nonlinear(args) => {
            let model = NonLinearModel::new(args.rd, args.k);
            info!("{:?}", model);
            model.evolve(&[args.n0], cli.t_max)?
        }
        Model::Ac(args) => {
            let model = ACModel::new(args.alpha, args.beta);
            info!("{:?}", model);
            model.evolve(&[args.adults, args.children], cli.t_max)?
        }
    };

    cli.output.emit(&trajectory)?;
    Ok(())
}
