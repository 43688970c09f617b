mod cli;

use clap::Parser;
use cli::Cli;
use schoolbase_provision::{ProvisionConfig, ProvisionReport, Provisioner, Result};
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, warn};

fn init_tracing(cli: &Cli) {
    // --quiet: nothing; --verbose: RUST_LOG or info; default: warnings only
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(e) => {
            error!(error = %e, "provisioning aborted");
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ProvisionReport> {
    let mut config = match &cli.config {
        Some(path) => ProvisionConfig::load(path)?,
        None => ProvisionConfig::default(),
    };
    config.apply_env();
    cli.apply(&mut config);

    let catalog = config.load_catalog()?;
    for problem in catalog.validate() {
        warn!(%problem, "catalog problem");
    }

    let store = config.open_store()?;
    let stdout = std::io::stdout();
    let mut provisioner = Provisioner::new(&*store, &catalog, stdout.lock())
        .with_wait_policy(config.wait)
        .with_preview_width(config.preview_width);

    let mut report = ProvisionReport::default();
    if config.reset {
        report.tables = provisioner.reset()?;
    }
    let run = provisioner.run()?;
    report.tables.extend(run.tables);
    report.items = run.items;
    report.existing_tables = run.existing_tables;
    report.dumped = run.dumped;

    provisioner.into_output().flush()?;
    Ok(report)
}
