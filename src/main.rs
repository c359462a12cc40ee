mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_accept_command, run_audit_command, run_baselines_command};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    match args.command {
        Commands::Audit {
            captures,
            baseline_dir,
            design_spec,
            route,
            viewport,
            max_diff_ratio,
            diff_threshold,
            artifacts_dir,
            format,
            output,
        } => {
            run_audit_command(
                &raw_args,
                args.config,
                args.verbose,
                captures,
                baseline_dir,
                design_spec,
                route,
                viewport,
                max_diff_ratio,
                diff_threshold,
                artifacts_dir,
                format,
                output,
            )
            .await
        }
        Commands::Accept {
            captures,
            baseline_dir,
            surface,
            all,
            format,
            output,
        } => {
            run_accept_command(
                args.config,
                args.verbose,
                captures,
                baseline_dir,
                surface,
                all,
                format,
                output,
            )
            .await
        }
        Commands::Baselines {
            baseline_dir,
            format,
            output,
        } => {
            run_baselines_command(args.config, args.verbose, baseline_dir, format, output).await
        }
    }
}
