use proposal_sim::chain::InMemoryChain;
use proposal_sim::cli::{Cli, CliCommand};
use proposal_sim::config::SimConfig;
use proposal_sim::lifecycle::{check_consistency, Environment, LifecycleRunner};
use proposal_sim::output;
use proposal_sim::proposals::{self, ProposalEntry};
use proposal_sim::telemetry;

use clap::Parser;
use eyre::eyre;

/// Main entry point for the proposal simulator
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.quiet);
    let config = SimConfig::from_cli(&cli);

    let passed = match &cli.command {
        CliCommand::List => {
            output::print_proposal_list(&proposals::all());
            true
        }
        CliCommand::Describe { proposal, json } => describe(&config, proposal, *json)?,
        CliCommand::Check { proposal } => check(&config, proposal).await?,
        CliCommand::Run { proposal } => run(&config, proposal).await?,
        CliCommand::Guardian => guardian(&config)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn lookup(key: &str) -> eyre::Result<ProposalEntry> {
    proposals::find(key).ok_or_else(|| eyre!("unknown proposal '{key}' (see `proposal-sim list`)"))
}

fn describe(config: &SimConfig, key: &str, json: bool) -> eyre::Result<bool> {
    let entry = lookup(key)?;
    let registry = config.load_registry()?;
    let rendered = entry.module.description().render(&registry)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        output::print_description(&rendered);
    }
    Ok(true)
}

async fn check(config: &SimConfig, key: &str) -> eyre::Result<bool> {
    let entry = lookup(key)?;
    let registry = config.load_registry()?;
    let invariants = config.load_invariants()?;
    let executor = config.executor_address(&registry)?;
    let chain = InMemoryChain::from_registry(&registry, executor);
    let env = Environment::new(&registry, &chain, &invariants, executor);

    entry.module.description().validate_shape()?;
    let divergences = check_consistency(entry.module.as_ref(), &env).await?;
    if config.logging {
        output::print_divergences(entry.module.description().title(), &divergences);
    }
    Ok(divergences.is_empty())
}

async fn run(config: &SimConfig, key: &str) -> eyre::Result<bool> {
    let entry = lookup(key)?;
    let registry = config.load_registry()?;
    let invariants = config.load_invariants()?;
    let executor = config.executor_address(&registry)?;
    let chain = InMemoryChain::from_registry(&registry, executor);
    let env =
        Environment::new(&registry, &chain, &invariants, executor).with_logging(config.logging);

    if config.logging {
        output::print_banner(registry.network(), &config.executor, registry.len());
    }

    match LifecycleRunner::new(env).run(entry.module.as_ref()).await {
        Ok(report) => {
            if config.logging {
                output::print_summary(&report);
            }
            Ok(report.passed())
        }
        Err(error) => {
            if config.logging {
                output::print_aborted(&error);
            }
            Ok(false)
        }
    }
}

fn guardian(config: &SimConfig) -> eyre::Result<bool> {
    let registry = config.load_registry()?;
    let invariants = config.load_invariants()?;
    let safe = &invariants.safe_addresses;

    output::print_guardian(&safe.guardian_targets(&registry), &safe.exempt(&registry));
    for name in safe.iter().filter(|name| registry.handle(name).is_none()) {
        output::print_info(&format!(
            "safe address '{name}' is not in the {} deployment",
            registry.network()
        ));
    }
    Ok(true)
}
