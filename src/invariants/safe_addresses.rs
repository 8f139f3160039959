use serde::Serialize;

use super::errors::InvariantConfigError;
use crate::registry::AddressRegistry;

/// Ordered set of symbolic names exempt from guardian sweep/pause actions.
///
/// Entries are unique; order only matters for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeAddressSet(Vec<String>);

impl SafeAddressSet {
    /// Build a set, rejecting duplicate names.
    pub fn new<I, S>(entries: I) -> Result<Self, InvariantConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for entry in entries {
            let name = entry.into();
            if names.contains(&name) {
                return Err(InvariantConfigError::DuplicateSafeAddress(name));
            }
            names.push(name);
        }
        Ok(Self(names))
    }

    /// Whether `name` is exempt from guardian actions.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Registry names subject to a guardian sweep, i.e. not listed here.
    pub fn guardian_targets(&self, registry: &AddressRegistry) -> Vec<String> {
        registry.names().filter(|n| !self.contains(n)).map(str::to_string).collect()
    }

    /// Registry names exempt from a guardian sweep.
    pub fn exempt(&self, registry: &AddressRegistry) -> Vec<String> {
        registry.names().filter(|n| self.contains(n)).map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ContractHandle, DEV_CORE_ADDRESS, DEV_PSM_ADDRESS, DEV_TIMELOCK_ADDRESS};

    #[test]
    fn test_duplicates_rejected() {
        let err = SafeAddressSet::new(["timelock", "core", "timelock"]).unwrap_err();
        assert!(matches!(
            err,
            InvariantConfigError::DuplicateSafeAddress(ref n) if n == "timelock"
        ));
    }

    #[test]
    fn test_membership_and_order() {
        let set = SafeAddressSet::new(["timelock", "core"]).unwrap();
        assert!(set.contains("core"));
        assert!(!set.contains("psm"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["timelock", "core"]);
    }

    #[test]
    fn test_unlisted_names_are_guardian_targets() {
        let mut registry = AddressRegistry::new("test");
        registry.insert(ContractHandle::new("timelock", DEV_TIMELOCK_ADDRESS));
        registry.insert(ContractHandle::new("core", DEV_CORE_ADDRESS));
        registry.insert(ContractHandle::new("psm", DEV_PSM_ADDRESS));

        let set = SafeAddressSet::new(["timelock", "core", "notDeployed"]).unwrap();
        assert_eq!(set.guardian_targets(&registry), vec!["psm"]);
        assert_eq!(set.exempt(&registry), vec!["core", "timelock"]);
    }
}
