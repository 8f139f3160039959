use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::{collections::BTreeMap, fmt};

use crate::lifecycle::ValidationReport;

/// Expected pause flags of one module.
///
/// `mint_paused` / `redeem_paused` are only present for modules with
/// independent mint and redeem switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseFlags {
    /// Whole-module pause
    pub paused: bool,
    /// Redemption pause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_paused: Option<bool>,
    /// Minting pause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_paused: Option<bool>,
}

/// Result of looking a module up in [`PauseState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseLookup<'a> {
    /// The module has no managed pause state. Not the same as unpaused.
    Unmanaged,
    /// The module's expected flags
    Managed(&'a PauseFlags),
}

/// Expected pause flags per module name.
///
/// This is desired configuration, not a live read; VALIDATE phases and
/// guardian tooling compare observed flags against it. A module listed
/// twice is rejected on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PauseState(BTreeMap<String, PauseFlags>);

impl PauseState {
    /// Empty pause state
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the expected flags of `module`.
    pub fn insert(&mut self, module: impl Into<String>, flags: PauseFlags) {
        self.0.insert(module.into(), flags);
    }

    /// Look up `module`; absence means "unmanaged".
    pub fn lookup(&self, module: &str) -> PauseLookup<'_> {
        match self.0.get(module) {
            Some(flags) => PauseLookup::Managed(flags),
            None => PauseLookup::Unmanaged,
        }
    }

    /// Managed modules, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PauseFlags)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of managed modules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no module is managed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare `observed` with the expected flags of `module`, recording one
    /// failure per differing flag. Optional flags are only compared when the
    /// config declares them.
    ///
    /// Returns `false` without recording anything when `module` is unmanaged.
    pub fn check(
        &self,
        module: &str,
        observed: &PauseFlags,
        report: &mut ValidationReport,
    ) -> bool {
        let PauseLookup::Managed(expected) = self.lookup(module) else {
            return false;
        };

        report.expect_eq(format!("{module}.paused"), expected.paused, observed.paused);
        if let Some(mint) = expected.mint_paused {
            report.expect_eq(
                format!("{module}.mintPaused"),
                mint,
                observed.mint_paused.unwrap_or(false),
            );
        }
        if let Some(redeem) = expected.redeem_paused {
            report.expect_eq(
                format!("{module}.redeemPaused"),
                redeem,
                observed.redeem_paused.unwrap_or(false),
            );
        }
        true
    }
}

impl<'de> Deserialize<'de> for PauseState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PauseStateVisitor;

        impl<'de> Visitor<'de> for PauseStateVisitor {
            type Value = PauseState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of module name to pause flags")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PauseState, A::Error> {
                let mut modules = BTreeMap::new();
                while let Some((module, flags)) = map.next_entry::<String, PauseFlags>()? {
                    if modules.contains_key(&module) {
                        return Err(de::Error::custom(format!(
                            "duplicate pauseState entry '{module}'"
                        )));
                    }
                    modules.insert(module, flags);
                }
                Ok(PauseState(modules))
            }
        }

        deserializer.deserialize_map(PauseStateVisitor)
    }
}
