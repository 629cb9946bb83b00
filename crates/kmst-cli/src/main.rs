use clap::Parser;
use kmst_cli::cli::{Cli, Commands};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{bench, generate, solve, stats};

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    let result = match &cli.command {
        Some(Commands::Solve {
            instance,
            k,
            formulation,
            results_file,
            solution_file,
            limits,
        }) => solve::handle(
            instance,
            *k,
            *formulation,
            results_file.as_deref(),
            solution_file.as_deref(),
            limits,
        ),
        Some(Commands::Generate {
            nodes,
            edges,
            seed,
            out,
        }) => generate::handle(*nodes, *edges, *seed, out),
        Some(Commands::Bench {
            data_dir,
            output_csv,
            formulations,
            jobs,
            limits,
        }) => bench::handle(data_dir, output_csv, formulations, *jobs, limits),
        Some(Commands::Stats { instance }) => stats::handle(instance),
        None => {
            info!("No subcommand provided. Use `kmst --help` for more information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
