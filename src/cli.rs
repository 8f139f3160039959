use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the proposal simulator
#[derive(Parser, Debug)]
#[command(name = "proposal-sim", about = "Governance proposal simulator", version)]
pub struct Cli {
    /// Deployment record (JSON). Defaults to the built-in dev deployment.
    #[arg(long, global = true, env = "PROPOSAL_SIM_DEPLOYMENT")]
    pub deployment: Option<PathBuf>,

    /// Invariant config (JSON). Defaults to the bundled config.
    #[arg(long, global = true, env = "PROPOSAL_SIM_INVARIANTS")]
    pub invariants: Option<PathBuf>,

    /// Registry name of the governance executor RUN commands are sent from
    #[arg(long, global = true, default_value = "timelock")]
    pub executor: String,

    /// Suppress human-readable progress output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// List shipped proposals
    List,
    /// Print a proposal's declarative description
    Describe {
        /// Proposal key or title
        proposal: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Dry-run RUN and compare its calls with the description
    Check {
        /// Proposal key or title
        proposal: String,
    },
    /// Simulate the full SETUP → RUN → TEARDOWN → VALIDATE lifecycle
    Run {
        /// Proposal key or title
        proposal: String,
    },
    /// Show which registry entries a guardian sweep may touch
    Guardian,
}
