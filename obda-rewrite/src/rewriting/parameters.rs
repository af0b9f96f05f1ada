//! This module defines [RewritingParameters].

use serde::{Deserialize, Serialize};

/// Reaction to recursive definitions reachable from the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Report the cycle without unfolding
    #[default]
    Abort,
    /// Unfold up to the depth bound and report the cycle
    /// together with the rules obtained so far
    Partial,
}

/// External parameters bounding rewriting and unfolding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewritingParameters {
    /// Maximal number of resolution steps applied to a single rule
    pub(crate) max_depth: usize,
    /// Maximal number of rules produced by a single rewriting or unfolding
    pub(crate) max_rules: usize,
    /// Prefix of generated variable names
    pub(crate) fresh_prefix: String,
    /// Reaction to recursive definitions
    pub(crate) cycle_policy: CyclePolicy,
    /// Whether the query plan is optimized after unfolding
    pub(crate) optimize_plan: bool,
    /// Maximal number of applied optimization proposals
    pub(crate) max_optimization_steps: usize,
}

impl Default for RewritingParameters {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_rules: 10_000,
            fresh_prefix: "v".to_string(),
            cycle_policy: CyclePolicy::default(),
            optimize_plan: true,
            max_optimization_steps: 1_000,
        }
    }
}

impl RewritingParameters {
    /// Set the maximal number of resolution steps applied to a single rule.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Set the maximal number of produced rules.
    pub fn set_max_rules(&mut self, max_rules: usize) {
        self.max_rules = max_rules;
    }

    /// Set the prefix of generated variable names.
    pub fn set_fresh_prefix(&mut self, prefix: &str) {
        self.fresh_prefix = prefix.to_string();
    }

    /// Set the reaction to recursive definitions.
    pub fn set_cycle_policy(&mut self, policy: CyclePolicy) {
        self.cycle_policy = policy;
    }

    /// Enable or disable the optimization of the query plan.
    pub fn set_optimize_plan(&mut self, optimize: bool) {
        self.optimize_plan = optimize;
    }

    /// Set the maximal number of applied optimization proposals.
    pub fn set_max_optimization_steps(&mut self, steps: usize) {
        self.max_optimization_steps = steps;
    }

    /// Return the maximal number of resolution steps applied to a single rule.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the maximal number of produced rules.
    pub fn max_rules(&self) -> usize {
        self.max_rules
    }

    /// Return the prefix of generated variable names.
    pub fn fresh_prefix(&self) -> &str {
        &self.fresh_prefix
    }

    /// Return the reaction to recursive definitions.
    pub fn cycle_policy(&self) -> CyclePolicy {
        self.cycle_policy
    }

    /// Return whether the query plan is optimized.
    pub fn optimize_plan(&self) -> bool {
        self.optimize_plan
    }

    /// Return the maximal number of applied optimization proposals.
    pub fn max_optimization_steps(&self) -> usize {
        self.max_optimization_steps
    }
}

#[cfg(test)]
mod test {
    use super::{CyclePolicy, RewritingParameters};

    #[test]
    fn parameters_from_json() {
        let parameters: RewritingParameters =
            serde_json::from_str(r#"{ "max_depth": 4, "cycle_policy": "partial" }"#).unwrap();

        assert_eq!(parameters.max_depth(), 4);
        assert_eq!(parameters.cycle_policy(), CyclePolicy::Partial);
        assert_eq!(parameters.max_rules(), RewritingParameters::default().max_rules());
        assert_eq!(parameters.fresh_prefix(), "v");
    }

    #[test]
    fn parameters_json_roundtrip() {
        let mut parameters = RewritingParameters::default();
        parameters.set_optimize_plan(false);
        parameters.set_fresh_prefix("w");

        let json = serde_json::to_string(&parameters).unwrap();
        let parsed: RewritingParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, parameters);
    }
}
