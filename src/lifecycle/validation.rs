use serde::Serialize;
use std::fmt;
use tracing::warn;

/// One post-state assertion that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantFailure {
    /// What was being checked (`timelock.admin`)
    pub invariant: String,
    /// Expected value, rendered
    pub expected: String,
    /// Observed value, rendered
    pub actual: String,
}

impl fmt::Display for InvariantFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, got {}", self.invariant, self.expected, self.actual)
    }
}

/// Collects the outcome of every VALIDATE assertion.
///
/// Assertions never short-circuit: a run reports all broken invariants, not
/// only the first one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    checks: usize,
    failures: Vec<InvariantFailure>,
}

impl ValidationReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert `actual == expected`. Returns whether the check passed.
    pub fn expect_eq<T>(&mut self, invariant: impl Into<String>, expected: T, actual: T) -> bool
    where
        T: PartialEq + fmt::Display,
    {
        self.checks += 1;
        if expected == actual {
            return true;
        }
        self.record(InvariantFailure {
            invariant: invariant.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
        false
    }

    fn record(&mut self, failure: InvariantFailure) {
        warn!(target: "proposal_sim::validate", %failure, "invariant failed");
        self.failures.push(failure);
    }

    /// Number of assertions evaluated
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Failed assertions in evaluation order
    pub fn failures(&self) -> &[InvariantFailure] {
        &self.failures
    }

    /// Whether every assertion held
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}
