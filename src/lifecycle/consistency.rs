use std::fmt;
use tracing::info;

use super::{Environment, LifecycleModule};
use crate::executor::{ContractCall, RecordingCaller};
use crate::proposal::{resolve_all, ProposalError};

/// A position where RUN's calls differ from the declared commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    /// Position in the call sequence
    pub index: usize,
    /// Call implied by the description, if any at this position
    pub expected: Option<ContractCall>,
    /// Call RUN actually made, if any at this position
    pub actual: Option<ContractCall>,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => {
                write!(f, "#{}: declared {expected}, run sent {actual}", self.index)
            }
            (Some(expected), None) => {
                write!(f, "#{}: declared {expected}, run sent nothing", self.index)
            }
            (None, Some(actual)) => write!(f, "#{}: undeclared call {actual}", self.index),
            (None, None) => write!(f, "#{}: no difference", self.index),
        }
    }
}

/// Dry-run RUN and compare what it sends with the declared commands.
///
/// The description resolved against the environment's registry gives the
/// expected sequence (sender = governance executor). RUN is then invoked with
/// a recording caller that dispatches nothing. Target, method, arguments,
/// value, sender and order must all match; an empty result means the two
/// representations agree.
pub async fn check_consistency(
    module: &dyn LifecycleModule,
    env: &Environment<'_>,
) -> Result<Vec<Divergence>, ProposalError> {
    let expected: Vec<ContractCall> = resolve_all(module.description(), env.addresses())?
        .iter()
        .map(|command| command.to_call(env.executor()))
        .collect();

    let recorder = RecordingCaller::dry_run();
    let dry_env = env.with_caller(&recorder).with_logging(false);
    module.run(&dry_env).await?;
    let actual = recorder.calls().await;

    let divergences: Vec<Divergence> = (0..expected.len().max(actual.len()))
        .filter_map(|index| {
            let e = expected.get(index);
            let a = actual.get(index);
            (e != a).then(|| Divergence {
                index,
                expected: e.cloned(),
                actual: a.cloned(),
            })
        })
        .collect();

    info!(
        target: "proposal_sim::consistency",
        title = module.description().title(),
        declared = expected.len(),
        sent = actual.len(),
        divergences = divergences.len(),
        "consistency check finished"
    );
    Ok(divergences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::InvariantConfig;
    use crate::proposal::{Command, ProposalDescription};
    use crate::registry::{
        AddressRegistry, ContractHandle, DEV_GUARDIAN_MULTISIG_ADDRESS, DEV_TIMELOCK_ADDRESS,
    };
    use async_trait::async_trait;

    fn registry() -> AddressRegistry {
        let mut registry = AddressRegistry::new("test");
        registry.insert(
            ContractHandle::new("timelock", DEV_TIMELOCK_ADDRESS)
                .with_methods(["acceptAdmin()", "setPendingAdmin(address)"]),
        );
        registry.insert(ContractHandle::new("guardian", DEV_GUARDIAN_MULTISIG_ADDRESS));
        registry
    }

    fn description() -> ProposalDescription {
        ProposalDescription::new(
            "Rotate admin",
            vec![
                Command::new("timelock", "setPendingAdmin(address)").args(["{guardian}"]),
                Command::new("timelock", "acceptAdmin()"),
            ],
            "",
        )
    }

    struct Faithful(ProposalDescription);

    impl LifecycleModule for Faithful {
        fn description(&self) -> &ProposalDescription {
            &self.0
        }
    }

    /// RUN hand-written to match the description.
    struct HandWritten(ProposalDescription);

    #[async_trait]
    impl LifecycleModule for HandWritten {
        fn description(&self) -> &ProposalDescription {
            &self.0
        }

        async fn run(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
            env.execute(&Command::new("timelock", "setPendingAdmin(address)").args(["{guardian}"]))
                .await?;
            env.execute(&Command::new("timelock", "acceptAdmin()")).await?;
            Ok(())
        }
    }

    /// RUN that drifted: wrong argument and a missing second call.
    struct Drifted(ProposalDescription);

    #[async_trait]
    impl LifecycleModule for Drifted {
        fn description(&self) -> &ProposalDescription {
            &self.0
        }

        async fn run(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
            env.execute(&Command::new("timelock", "setPendingAdmin(address)").args(["{timelock}"]))
                .await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_run_is_consistent() {
        let registry = registry();
        let invariants = InvariantConfig::default();
        let caller = RecordingCaller::dry_run();
        let env = Environment::new(&registry, &caller, &invariants, DEV_TIMELOCK_ADDRESS);

        let divergences = check_consistency(&Faithful(description()), &env).await.unwrap();
        assert!(divergences.is_empty());
        // the environment's own caller is never touched
        assert!(caller.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_hand_written_run_matching_description() {
        let registry = registry();
        let invariants = InvariantConfig::default();
        let caller = RecordingCaller::dry_run();
        let env = Environment::new(&registry, &caller, &invariants, DEV_TIMELOCK_ADDRESS);

        let divergences = check_consistency(&HandWritten(description()), &env).await.unwrap();
        assert!(divergences.is_empty());
    }

    #[tokio::test]
    async fn test_drifted_run_is_reported() {
        let registry = registry();
        let invariants = InvariantConfig::default();
        let caller = RecordingCaller::dry_run();
        let env = Environment::new(&registry, &caller, &invariants, DEV_TIMELOCK_ADDRESS);

        let divergences = check_consistency(&Drifted(description()), &env).await.unwrap();
        assert_eq!(divergences.len(), 2);
        assert_eq!(divergences[0].index, 0);
        assert!(divergences[0].expected.is_some() && divergences[0].actual.is_some());
        assert_eq!(divergences[1].index, 1);
        assert!(divergences[1].actual.is_none());
        assert!(divergences[1].to_string().contains("run sent nothing"));
    }
}
