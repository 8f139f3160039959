//! Simulator configuration: where the deployment and invariants come from,
//! who sends RUN's commands, and whether progress is printed.

use alloy_primitives::Address;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::chain::dev_registry;
use crate::cli::Cli;
use crate::invariants::{InvariantConfig, InvariantConfigError};
use crate::proposal::ProposalError;
use crate::registry::{AddressRegistry, RegistryError};

/// Default registry name of the governance executor
pub const DEFAULT_EXECUTOR: &str = "timelock";

/// Errors loading the simulator's inputs
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Deployment record could not be loaded
    #[error("deployment: {0}")]
    Deployment(#[from] RegistryError),
    /// Invariant config could not be loaded
    #[error("invariants: {0}")]
    Invariants(#[from] InvariantConfigError),
}

/// Resolved simulator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Deployment record; `None` selects the built-in dev deployment
    pub deployment: Option<PathBuf>,
    /// Invariant config; `None` selects the bundled config
    pub invariants: Option<PathBuf>,
    /// Registry name of the governance executor
    pub executor: String,
    /// Print human-readable progress
    pub logging: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            deployment: None,
            invariants: None,
            executor: DEFAULT_EXECUTOR.to_string(),
            logging: true,
        }
    }
}

impl SimConfig {
    /// Settings from parsed command-line arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            deployment: cli.deployment.clone(),
            invariants: cli.invariants.clone(),
            executor: cli.executor.clone(),
            logging: !cli.quiet,
        }
    }

    /// Load the address registry.
    pub fn load_registry(&self) -> Result<AddressRegistry, ConfigError> {
        let registry = match &self.deployment {
            Some(path) => AddressRegistry::load(path)?,
            None => dev_registry(),
        };
        info!(
            target: "proposal_sim::config",
            network = registry.network(),
            contracts = registry.len(),
            old = registry.old_contracts().len(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Load the invariant config.
    pub fn load_invariants(&self) -> Result<InvariantConfig, ConfigError> {
        let config = match &self.invariants {
            Some(path) => InvariantConfig::load(path)?,
            None => InvariantConfig::bundled()?,
        };
        info!(
            target: "proposal_sim::config",
            managed = config.pause_state.len(),
            safe = config.safe_addresses.len(),
            "invariants loaded"
        );
        Ok(config)
    }

    /// Address of the executor in `registry`.
    pub fn executor_address(&self, registry: &AddressRegistry) -> Result<Address, ProposalError> {
        registry
            .address(&self.executor)
            .ok_or_else(|| ProposalError::MissingAddress {
                name: self.executor.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliCommand;
    use std::io::Write;

    #[test]
    fn test_defaults_use_builtins() {
        let config = SimConfig::default();
        assert_eq!(config.load_registry().unwrap().network(), "dev");
        assert_eq!(config.load_invariants().unwrap(), InvariantConfig::bundled().unwrap());
    }

    #[test]
    fn test_from_cli_quiet_disables_logging() {
        let cli = Cli {
            deployment: None,
            invariants: None,
            executor: "governor".into(),
            quiet: true,
            command: CliCommand::List,
        };
        let config = SimConfig::from_cli(&cli);
        assert!(!config.logging);
        assert_eq!(config.executor, "governor");
    }

    #[test]
    fn test_loads_files() {
        let mut deployment = tempfile::NamedTempFile::new().unwrap();
        let timelock = "0x00000000000000000000000000000000714e4c00";
        write!(
            deployment,
            r#"{{"network": "fork", "contracts": {{"timelock": "{timelock}"}}}}"#
        )
        .unwrap();
        let mut invariants = tempfile::NamedTempFile::new().unwrap();
        write!(invariants, r#"{{"version": 1, "safeAddresses": ["timelock"]}}"#).unwrap();

        let config = SimConfig {
            deployment: Some(deployment.path().to_path_buf()),
            invariants: Some(invariants.path().to_path_buf()),
            ..SimConfig::default()
        };
        assert_eq!(config.load_registry().unwrap().network(), "fork");
        let loaded = config.load_invariants().unwrap();
        assert!(loaded.safe_addresses.contains("timelock"));
        assert!(loaded.pause_state.is_empty());
    }

    #[test]
    fn test_missing_executor_is_configuration_error() {
        let config = SimConfig {
            executor: "governor".into(),
            ..SimConfig::default()
        };
        let registry = config.load_registry().unwrap();
        let err = config.executor_address(&registry).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");

        let timelock = SimConfig::default().executor_address(&registry).unwrap();
        assert_eq!(Some(timelock), registry.address(DEFAULT_EXECUTOR));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let config = SimConfig {
            invariants: Some(PathBuf::from("/nonexistent/invariants.json")),
            ..SimConfig::default()
        };
        assert!(matches!(config.load_invariants(), Err(ConfigError::Invariants(_))));
    }
}
