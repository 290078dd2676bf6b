//! kolosal-curves - Main Entry Point

use clap::Parser;
use kolosal_curves::cli::{cmd_curve, cmd_info, cmd_run, Cli, Commands, CurveArgs};
use kolosal_curves::config::OutputPaths;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_curves=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Curve {
            data,
            target,
            features,
            models,
            sizes,
            fractions,
            folds,
            shuffle,
            seed,
            metric,
            jobs,
            title,
            svg,
            csv,
            json,
        } => {
            cmd_curve(CurveArgs {
                data,
                target,
                features,
                models,
                sizes,
                fractions,
                folds,
                shuffle,
                seed,
                metric,
                jobs,
                title,
                outputs: OutputPaths { svg, csv, json },
            })?;
        }
        Commands::Run { config } => {
            cmd_run(&config)?;
        }
        Commands::Info { data, target } => {
            cmd_info(&data, target.as_deref())?;
        }
    }

    Ok(())
}
