use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod output;
mod progress;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("crs-mirror error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match &cli.command {
        Some(cli::Command::Extract(args)) => run_extract(&cli, args),
        None => run_mirror(&cli).await,
    }
}

async fn run_mirror(cli: &cli::Cli) -> anyhow::Result<()> {
    let config = bootstrap::load_config(cli)?;
    let options = bootstrap::walk_options(&config, cli.dry_run);
    let client = bootstrap::client(&config)?;

    tracing::info!(
        api = client.base_url(),
        group = %options.root_group,
        output = %options.local_root.display(),
        dry_run = options.dry_run,
        "starting mirror"
    );

    let mut sink = progress::ConsoleSink::new(!cli.quiet);
    let result = crs_walker::mirror(&client, &options, &mut sink).await;
    sink.finish();
    let summary = result.context("mirror aborted")?;

    output::output(&output::Report::new(&summary, cli.dry_run), cli.format)
}

fn run_extract(cli: &cli::Cli, args: &cli::ExtractArgs) -> anyhow::Result<()> {
    let config = bootstrap::load_unvalidated(cli)?;
    let options = bootstrap::extract_options(&config, args);

    tracing::info!(
        input = %options.input_dir.display(),
        output = %options.output_dir.display(),
        "starting score extraction"
    );

    let progress = progress::Progress::spinner(!cli.quiet, "extracting scores");
    let result = crs_scores::extract_tree(&options);
    progress.finish_clear();
    let report = result.context("score extraction failed")?;

    output::output(&report, cli.format)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CRS_MIRROR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
