use serde::Serialize;

use super::command::{Arguments, Command};
use super::errors::ProposalError;
use super::signature::MethodSignature;
use super::templater::substitute_placeholders;
use crate::registry::AddressRegistry;

/// Declarative record of a governance proposal.
///
/// The command list is fixed at construction; replaying a proposal always
/// replays the same sequence.
#[derive(Debug, Clone)]
pub struct ProposalDescription {
    title: String,
    commands: Vec<Command>,
    description: String,
}

impl ProposalDescription {
    /// Create a description. The command order is the execution order.
    pub fn new(
        title: impl Into<String>,
        commands: Vec<Command>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            commands,
            description: description.into(),
        }
    }

    /// Unique human identifier
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Commands in execution order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Free-text rationale
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Authoring-time checks that need no registry: at least one command,
    /// non-empty targets, parsable signatures, and literal argument counts
    /// matching the declared parameter lists.
    pub fn validate_shape(&self) -> Result<(), ProposalError> {
        if self.commands.is_empty() {
            return Err(ProposalError::Configuration(format!(
                "proposal '{}' declares no commands",
                self.title
            )));
        }
        for command in &self.commands {
            if command.target.is_empty() {
                return Err(ProposalError::Configuration(format!(
                    "command {} has an empty target",
                    command.label()
                )));
            }
            let method = MethodSignature::parse(&command.method)?;
            if let Arguments::Literal(args) = &command.arguments {
                if args.len() != method.params().len() {
                    return Err(ProposalError::ArgumentCount {
                        method: method.canonical().to_string(),
                        expected: method.params().len(),
                        got: args.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Render the description for documentation output, with placeholders and
    /// templated arguments filled in from `registry`.
    pub fn render(&self, registry: &AddressRegistry) -> Result<RenderedDescription, ProposalError> {
        let commands = self
            .commands
            .iter()
            .map(|command| {
                let arguments = super::templater::literal_arguments(command, registry)?
                    .iter()
                    .map(|arg| substitute_placeholders(arg, registry, command))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RenderedCommand {
                    target: command.target.clone(),
                    values: command.values.clone(),
                    method: command.method.clone(),
                    arguments,
                    templated: command.arguments.is_templated(),
                    description: command.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, ProposalError>>()?;

        Ok(RenderedDescription {
            title: self.title.clone(),
            commands,
            description: self.description.clone(),
        })
    }
}

/// Serializable form of a description, consumed by documentation generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDescription {
    /// Proposal title
    pub title: String,
    /// Commands with concrete arguments
    pub commands: Vec<RenderedCommand>,
    /// Free-text rationale
    pub description: String,
}

/// One rendered command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCommand {
    /// Symbolic target name
    pub target: String,
    /// Payable amount as written
    pub values: String,
    /// Method signature as written
    pub method: String,
    /// Arguments after placeholder substitution
    pub arguments: Vec<String>,
    /// Whether the arguments came from a template closure
    pub templated: bool,
    /// Audit trail
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ContractHandle, DEV_GUARDIAN_MULTISIG_ADDRESS, DEV_TIMELOCK_ADDRESS};

    fn registry() -> AddressRegistry {
        let mut registry = AddressRegistry::new("test");
        registry.insert(ContractHandle::new("timelock", DEV_TIMELOCK_ADDRESS));
        registry.insert(ContractHandle::new("guardian", DEV_GUARDIAN_MULTISIG_ADDRESS));
        registry
    }

    #[test]
    fn test_validate_shape_accepts_well_formed() {
        let desc = ProposalDescription::new(
            "Accept admin",
            vec![Command::new("timelock", "acceptAdmin()")],
            "",
        );
        assert!(desc.validate_shape().is_ok());
    }

    #[test]
    fn test_validate_shape_rejects_empty_commands() {
        let desc = ProposalDescription::new("Empty", vec![], "");
        assert!(matches!(desc.validate_shape(), Err(ProposalError::Configuration(_))));
    }

    #[test]
    fn test_validate_shape_rejects_empty_target() {
        let desc = ProposalDescription::new("Bad", vec![Command::new("", "acceptAdmin()")], "");
        assert!(matches!(desc.validate_shape(), Err(ProposalError::Configuration(_))));
    }

    #[test]
    fn test_validate_shape_rejects_literal_arity_mismatch() {
        let desc = ProposalDescription::new(
            "Bad arity",
            vec![Command::new("timelock", "setPendingAdmin(address)")],
            "",
        );
        assert!(matches!(
            desc.validate_shape(),
            Err(ProposalError::ArgumentCount { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_render_substitutes_placeholders_and_templates() {
        let desc = ProposalDescription::new(
            "Nominate",
            vec![
                Command::new("timelock", "setPendingAdmin(address)").args(["{guardian}"]),
                Command::new("timelock", "setPendingAdmin(address)")
                    .templated(|scope| Ok(vec![scope.address_arg("timelock")?])),
            ],
            "rationale",
        );
        let rendered = desc.render(&registry()).unwrap();
        assert_eq!(rendered.commands.len(), 2);
        assert_eq!(
            rendered.commands[0].arguments,
            vec![format!("{DEV_GUARDIAN_MULTISIG_ADDRESS:#x}")]
        );
        assert!(!rendered.commands[0].templated);
        assert_eq!(rendered.commands[1].arguments, vec![format!("{DEV_TIMELOCK_ADDRESS:#x}")]);
        assert!(rendered.commands[1].templated);

        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["title"], "Nominate");
        assert_eq!(json["commands"][0]["method"], "setPendingAdmin(address)");
    }
}
