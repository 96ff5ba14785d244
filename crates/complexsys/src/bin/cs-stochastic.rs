use clap::Parser;
use anyhow::Result;
use colored::*;
use std::path::Path;
use rayon::prelude::*;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use rand::SeedableRng;
use rand::rngs::StdRng;
use log::info;

use cs_core::Ensemble;
use cs_core::Trajectory;
use cs_models::EnzymaticActivityModel;

use complexsys::cli_parsers::EnsembleArguments;
use complexsys::cli_parsers::OutputArguments;
use complexsys::cli_parsers::TimeGridParameters;
use complexsys::cli_parsers::init_logging;
use complexsys::input_parsers::read_network_input;

#[derive(Debug, Parser)]
#[command(name = "cs-stochastic")]
#[command(version, about = "Stochastic simulation of reaction networks")]
pub struct Cli {
    /// Reaction network file, or "-" for stdin [default: enzymatic activity].
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    #[command(flatten, next_help_heading = "Ensemble")]
    sims: EnsembleArguments,

    #[command(flatten, next_help_heading = "Time grid")]
    grid: TimeGridParameters,

    #[command(flatten, next_help_heading = "Output")]
    output: OutputArguments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.output.verbose);

    let default_span = 100.0;
    cli.sims.validate()?;
    cli.grid.validate(default_span)?;
    let times = cli.grid.get_output_times(default_span);

    // --- Build model ---
    let model = match &cli.input {
        Some(input) => EnzymaticActivityModel::from_network(read_network_input(input)?),
        None => EnzymaticActivityModel::new()?,
    };
    println!("{}", format!(">{}", model.name()).yellow());
    print!("{}", model.network());

    // If the ensemble file exists, reload instead of starting empty
    let species = model.network().species();
    let mut master = if let Some(path) = &cli.sims.ensemble {
        if Path::new(path).exists() {
            println!("Loading existing ensemble from: {}", path.display());
            Ensemble::from_file(path, species, &times)?
        } else {
            println!("A new ensemble file will be created: {}", path.display());
            Ensemble::new(model.name(), species, &times)
        }
    } else {
        Ensemble::new(model.name(), species, &times)
    };

    println!("Simulation progress:");
    let pb = ProgressBar::new(cli.sims.num_sims as u64);
    pb.set_style(
        ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
        .progress_chars("#>-"),
    );

    let runs: Vec<Result<Trajectory, _>> = (0..cli.sims.num_sims)
        .into_par_iter()
        .map_init(
            || pb.clone(), // each thread gets a clone
            |pb, i| {
                let mut rng = match cli.sims.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                    None => StdRng::from_os_rng(),
                };
                let run = model.evolve(&mut rng, &times);
                pb.inc(1);
                run
            },
        ).collect();
    pb.finish_with_message("All simulations complete!");

    let mut batch = Ensemble::new(model.name(), species, &times);
    let mut last = None;
    for run in runs {
        let trajectory = run?;
        batch.add(&trajectory)?;
        last = Some(trajectory);
    }
    master.merge(batch)?;
    info!("Ensemble holds {} trajectories", master.counter());

    if cli.sims.num_sims == 1 && master.counter() == 1 {
        if let Some(trajectory) = &last {
            cli.output.emit(trajectory)?;
        }
    } else {
        println!("Mean over {} simulations:", master.counter());
        cli.output.emit(&master.mean())?;
    }

    if let Some(path) = &cli.sims.ensemble {
        master.to_file(path)?;
    }

    Ok(())
}
