use anyhow::Context;
use clap::error::ErrorKind;
use log::{error, info};
use neiss_tf::cli::{Cli, execute};

/// Exit status for usage errors (255 on Unix)
const USAGE_EXIT_CODE: i32 = -1;
const FAILURE_EXIT_CODE: i32 = 1;

fn main() {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE_EXIT_CODE,
            };
            if let Err(io_err) = e.print() {
                error!("Failed to print usage: {io_err}");
            }
            std::process::exit(code);
        }
    };

    let config = cli.config();
    let result = execute(&cli.command, &config)
        .with_context(|| format!("{} failed", cli.command.name()));
    let reports = match result {
        Ok(reports) => reports,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    for report in &reports {
        report.log_counters();
        info!(
            "{}: {} records in {} part files ({:?})",
            report.name,
            report.output_records,
            report.output_files.len(),
            report.elapsed
        );
    }
}
