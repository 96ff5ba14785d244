use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use anyhow::Result;
use anyhow::bail;
use colored::*;
use log::info;

use cs_core::OdeSystem;
use cs_solvers::{integrate, SolverOptions};
use cs_models::{
    BrusselatorModel, LotkaVolterraModel, OregonatorModel, PPVModel, SIRModel,
};

use complexsys::cli_parsers::OutputArguments;
use complexsys::cli_parsers::SolverArguments;
use complexsys::cli_parsers::TimeGridParameters;
use complexsys::cli_parsers::init_logging;
use complexsys::input_parsers::last_state_of;
use complexsys::input_parsers::read_state_input;

#[derive(Debug, Args)]
pub struct OregonatorArgs {
    #[arg(long, default_value_t = 77.27)]
    s: f64,
    #[arg(long, default_value_t = 8.375e-6)]
    q: f64,
    #[arg(long, default_value_t = 0.161)]
    w: f64,
    /// Time scaling factor.
    #[arg(long, default_value_t = 320.0)]
    scale: f64,
    /// Initial values of A, B, C.
    #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
    init: Vec<f64>,
}

#[derive(Debug, Args)]
pub struct LotkaVolterraArgs {
    /// Growth rate of the preys.
    #[arg(long, default_value_t = 10.0)]
    r: f64,
    /// Death rate of the predators.
    #[arg(long, default_value_t = 10.0)]
    s: f64,
    /// Predator-prey meeting rate.
    #[arg(long, default_value_t = 0.01)]
    a: f64,
    /// Offspring per hunted prey.
    #[arg(long, default_value_t = 1.0)]
    b: f64,
    /// Initial values of V, P.
    #[arg(long, value_delimiter = ',', default_value = "1200,800")]
    init: Vec<f64>,
}

#[derive(Debug, Args)]
pub struct SIRArgs {
    /// Infection coefficient.
    #[arg(long, default_value_t = 6.0)]
    beta: f64,
    /// Recovery rate.
    #[arg(long, default_value_t = 2.0)]
    gamma: f64,
    /// Birth and death rate.
    #[arg(long, default_value_t = 2.0)]
    mu: f64,
    /// Vaccinated fraction of newborns.
    #[arg(long, default_value_t = 0.1)]
    p: f64,
    /// Initial fractions S, I, R.
    #[arg(long, value_delimiter = ',', default_value = "0.9,0.1,0")]
    init: Vec<f64>,
}

#[derive(Debug, Args)]
pub struct PPVArgs {
    #[arg(long, default_value_t = 10.0)]
    r: f64,
    #[arg(long, default_value_t = 10.0)]
    s: f64,
    #[arg(long, default_value_t = 0.01)]
    a: f64,
    #[arg(long, default_value_t = 1.0)]
    b: f64,
    /// Vegetation growth exponent.
    #[arg(long, default_value_t = 2.0)]
    v: f64,
    /// Initial values of V, P, F.
    #[arg(long, value_delimiter = ',', default_value = "1000,1000,30")]
    init: Vec<f64>,
}

#[derive(Debug, Args)]
pub struct BrusselatorArgs {
    #[arg(long, default_value_t = 1.0)]
    a: f64,
    #[arg(long, default_value_t = 3.0)]
    b: f64,
    /// Initial values of X, Y.
    #[arg(long, value_delimiter = ',', default_value = "1,1")]
    init: Vec<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Model {
    /// Oregonator model of the Belousov-Zhabotinsky reaction (stiff).
    Oregonator(OregonatorArgs),
    /// Lotka-Volterra predator-prey model.
    LotkaVolterra(LotkaVolterraArgs),
    /// SIR epidemic model with vital dynamics and vaccination.
    Sir(SIRArgs),
    /// Predator-prey-vegetation model.
    Ppv(PPVArgs),
    /// Brusselator autocatalytic reaction.
    Brusselator(BrusselatorArgs),
}

/// A model ready for integration, with the length of its preferred time
/// horizon and its solver settings.
struct Setup {
    system: Box<dyn OdeSystem>,
    init: Vec<f64>,
    t_span: f64,
    options: SolverOptions,
}

impl Model {
    fn setup(&self) -> Setup {
        let odeint = SolverOptions::default();
        match self {
            Model::Oregonator(args) => Setup {
                system: Box::new(OregonatorModel { s: args.s, q: args.q, w: args.w, scale: args.scale }),
                init: args.init.clone(),
                t_span: 10.0,
                options: odeint,
            },
            Model::LotkaVolterra(args) => Setup {
                system: Box::new(LotkaVolterraModel { r: args.r, s: args.s, a: args.a, b: args.b }),
                init: args.init.clone(),
                t_span: 10.0,
                options: odeint,
            },
            Model::Sir(args) => Setup {
                system: Box::new(SIRModel { beta: args.beta, gamma: args.gamma, mu: args.mu, p: args.p }),
                init: args.init.clone(),
                t_span: 10.0,
                options: odeint,
            },
            Model::Ppv(args) => Setup {
                system: Box::new(PPVModel { r: args.r, s: args.s, a: args.a, b: args.b, v: args.v }),
                init: args.init.clone(),
                t_span: 1.0,
                options: odeint,
            },
            Model::Brusselator(args) => Setup {
                system: Box::new(BrusselatorModel { a: args.a, b: args.b }),
                init: args.init.clone(),
                t_span: 50.0,
                options: odeint,
            },
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cs-continuous")]
#[command(version, about = "Integrate continuous complex systems")]
pub struct Cli {
    #[command(subcommand)]
    model: Model,

    /// Read the initial values from a file, or "-" for stdin.
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "resume")]
    init_file: Option<String>,

    /// Continue from the last sample of a stored trajectory. Without
    /// --t-end the run covers the model's usual time span past that sample.
    #[arg(long, global = true, value_name = "FILE")]
    resume: Option<PathBuf>,

    #[command(flatten, next_help_heading = "Time grid")]
    grid: TimeGridParameters,

    #[command(flatten, next_help_heading = "Solver")]
    solver: SolverArguments,

    #[command(flatten, next_help_heading = "Output")]
    output: OutputArguments,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(cli.output.verbose);

    let Setup { system, mut init, t_span, options } = cli.model.setup();

    if let Some(input) = &cli.init_file {
        init = read_state_input(input)?;
    }
    if let Some(path) = &cli.resume {
        let (t, state) = last_state_of(path)?;
        info!("Resuming from t = {} in {}", t, path.display());
        cli.grid.t_start = t;
        init = state;
    }
    if init.len() != system.dimension() {
        bail!("{} needs {} initial values ({}), got {}",
            system.name(), system.dimension(), system.labels().join(", "), init.len());
    }

    cli.grid.validate(t_span)?;
    let times = cli.grid.get_output_times(t_span);
    let options = cli.solver.build_options(options)?;
    info!("{:?}", options);

    println!("{} with {} from t = {} to t = {} ({} points)",
        system.name().yellow(), options.method,
        times[0], times[times.len() - 1], times.len());
    if let Model::Sir(args) = &cli.model {
        let sir = SIRModel { beta: args.beta, gamma: args.gamma, mu: args.mu, p: args.p };
        println!("Vaccination threshold: {}",
            format!("{:.4}", sir.vaccination_threshold()).green());
    }

    let trajectory = integrate(&*system, &init, &times, &options)?;
    cli.output.emit(&trajectory)?;
    Ok(())
}
