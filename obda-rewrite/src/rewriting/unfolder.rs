//! This module defines [Unfolder].

use std::collections::{HashMap, HashSet};

use crate::rule_model::{
    components::{predicate::Predicate, rule::Rule, IterableVariables},
    generator::VariableGenerator,
    program::DatalogProgram,
};

use super::{
    canonical_form,
    dependency::PredicateDependencyGraph,
    error::{RewritingBound, RewritingError},
    parameters::{CyclePolicy, RewritingParameters},
    resolve,
};

/// Replaces defined atoms of a query by their definitions
/// until only source and built-in atoms remain
///
/// Definitions are the mapping rules together with
/// the rules of the query that do not define the target predicate.
#[derive(Debug, Clone)]
pub struct Unfolder {
    /// Rules relating ontology predicates to source predicates
    mappings: Vec<Rule>,
    /// Bounds
    parameters: RewritingParameters,
}

/// Reason for leaving the unfolding loop early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interruption {
    Depth,
    Rules,
}

impl Unfolder {
    /// Create a new [Unfolder].
    pub fn new(mappings: Vec<Rule>, parameters: RewritingParameters) -> Self {
        Self {
            mappings,
            parameters,
        }
    }

    /// Return the mapping rules.
    pub fn mappings(&self) -> &[Rule] {
        &self.mappings
    }

    /// Unfold the rules of `query` defining `target`.
    ///
    /// The result contains one rule for each way
    /// of resolving all defined atoms of a target rule.
    /// Rules that only differ in the names of their variables are kept once.
    ///
    /// Source atoms are the atoms in mapping bodies whose predicate is not defined.
    /// Candidates left with an atom that is neither defined nor a source atom are dropped.
    /// Atoms resolved with facts disappear from the body.
    pub fn unfold(
        &self,
        query: &DatalogProgram,
        target: &Predicate,
    ) -> Result<DatalogProgram, RewritingError> {
        let target_rules = query.rules_with_head(target).collect::<Vec<_>>();
        if target_rules.is_empty() {
            return Err(RewritingError::TargetNotDefined(target.to_string()));
        }

        let definitions = query
            .rules()
            .iter()
            .filter(|rule| rule.head().map(|head| head.predicate()) != Some(target))
            .chain(self.mappings.iter())
            .collect::<Vec<_>>();

        let mut index = HashMap::<&Predicate, Vec<&Rule>>::new();
        for &definition in &definitions {
            if let Some(head) = definition.head() {
                index.entry(head.predicate()).or_default().push(definition);
            }
        }

        let sources = self
            .mappings
            .iter()
            .flat_map(|mapping| mapping.body_atoms())
            .filter(|atom| !atom.is_builtin() && !index.contains_key(atom.predicate()))
            .map(|atom| atom.predicate())
            .collect::<HashSet<_>>();

        let graph = PredicateDependencyGraph::from_rules(
            target_rules.iter().copied().chain(definitions.iter().copied()),
        );
        let cycles = graph.cycles_reachable_from(std::slice::from_ref(target));
        let cyclic_predicates = cycles.into_iter().flatten().collect::<Vec<_>>();

        if !cyclic_predicates.is_empty() {
            log::warn!(
                "recursive definitions reachable from {target}: {}",
                cyclic_predicates
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            if self.parameters.cycle_policy() == CyclePolicy::Abort {
                return Err(RewritingError::CycleDetected {
                    predicates: cyclic_predicates,
                    partial: None,
                });
            }
        }

        let mut generator = VariableGenerator::new(self.parameters.fresh_prefix());
        for rule in target_rules.iter().chain(definitions.iter()) {
            generator.reserve(rule.variables());
        }

        let mut seen = HashSet::<Rule>::new();
        let mut result = DatalogProgram::default();
        let mut interruption = None;

        let mut stack = target_rules
            .iter()
            .rev()
            .map(|rule| ((*rule).clone(), 0))
            .collect::<Vec<_>>();

        while let Some((rule, depth)) = stack.pop() {
            let position = rule.body_atoms().position(|atom| {
                !atom.is_builtin() && index.contains_key(atom.predicate())
            });

            let Some(position) = position else {
                if let Some(atom) = rule
                    .body_atoms()
                    .find(|atom| !atom.is_builtin() && !sources.contains(atom.predicate()))
                {
                    log::trace!("dropped {rule}: {atom} is neither defined nor a source atom");
                    continue;
                }

                if !seen.insert(canonical_form(&rule)) {
                    continue;
                }

                if result.len() >= self.parameters.max_rules() {
                    interruption = Some(Interruption::Rules);
                    break;
                }

                log::trace!("unfolded rule {rule}");
                result.push(rule);

                continue;
            };

            if depth >= self.parameters.max_depth() {
                interruption = Some(Interruption::Depth);

                if self.parameters.cycle_policy() == CyclePolicy::Abort {
                    break;
                }

                continue;
            }

            let atom_predicate = rule
                .body()
                .and_then(|body| body.get(position))
                .map(|atom| atom.predicate());
            let candidates = atom_predicate
                .and_then(|predicate| index.get(predicate))
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut resolved = candidates
                .iter()
                .filter_map(|definition| resolve(&rule, position, definition, &mut generator))
                .map(|rule| (rule, depth + 1))
                .collect::<Vec<_>>();

            if resolved.is_empty() {
                log::trace!("dropped {rule}: no definition unifies with atom {position}");
            }

            resolved.reverse();
            stack.extend(resolved);
        }

        log::debug!(
            "unfolding {target} produced {} rules from {} target rules",
            result.len(),
            target_rules.len()
        );

        let partial = || {
            (self.parameters.cycle_policy() == CyclePolicy::Partial)
                .then(|| Box::new(result.clone()))
        };

        if !cyclic_predicates.is_empty() {
            return Err(RewritingError::CycleDetected {
                predicates: cyclic_predicates,
                partial: partial(),
            });
        }

        match interruption {
            None => Ok(result),
            Some(Interruption::Depth) => Err(RewritingError::BoundExceeded {
                bound: RewritingBound::Depth,
                limit: self.parameters.max_depth(),
                partial: partial(),
            }),
            Some(Interruption::Rules) => Err(RewritingError::BoundExceeded {
                bound: RewritingBound::Rules,
                limit: self.parameters.max_rules(),
                partial: partial(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        rewriting::{
            error::{RewritingBound, RewritingError},
            parameters::{CyclePolicy, RewritingParameters},
        },
        rule_model::{
            components::{predicate::Predicate, rule::Rule},
            program::DatalogProgram,
        },
    };

    use super::Unfolder;

    fn mapping(head: &str, source: &str) -> Rule {
        Rule::builder()
            .head(atom!(head; ?a))
            .add_body_atom(atom!(source; ?a))
            .finalize()
    }

    fn query() -> DatalogProgram {
        DatalogProgram::new(vec![Rule::builder()
            .head(atom!("p"; ?x, ?y))
            .add_body_atom(atom!("q"; ?x))
            .add_body_atom(atom!("r"; ?y))
            .finalize()])
    }

    #[test]
    fn unfold_all_combinations() {
        let unfolder = Unfolder::new(
            vec![
                mapping("q", "src_q1"),
                mapping("q", "src_q2"),
                mapping("r", "src_r"),
            ],
            RewritingParameters::default(),
        );

        let result = unfolder.unfold(&query(), &Predicate::new("p", 2)).unwrap();
        assert_eq!(
            result.rules(),
            &[
                Rule::builder()
                    .head(atom!("p"; ?x, ?y))
                    .add_body_atom(atom!("src_q1"; ?x))
                    .add_body_atom(atom!("src_r"; ?y))
                    .finalize(),
                Rule::builder()
                    .head(atom!("p"; ?x, ?y))
                    .add_body_atom(atom!("src_q2"; ?x))
                    .add_body_atom(atom!("src_r"; ?y))
                    .finalize(),
            ]
        );
    }

    #[test]
    fn unfold_uses_auxiliary_query_rules() {
        let mut program = query();
        program.push(
            Rule::builder()
                .head(atom!("r"; ?z))
                .add_body_atom(atom!("s"; ?z, "Student"))
                .finalize(),
        );

        let unfolder = Unfolder::new(
            vec![
                mapping("q", "src_q"),
                Rule::builder()
                    .head(atom!("s"; ?b, ?c))
                    .add_body_atom(atom!("src_s"; ?b, ?c))
                    .add_body_atom(atom!("IS_NOT_NULL"; ?c))
                    .finalize(),
            ],
            RewritingParameters::default(),
        );

        let result = unfolder.unfold(&program, &Predicate::new("p", 2)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.rules()[0],
            Rule::builder()
                .head(atom!("p"; ?x, ?y))
                .add_body_atom(atom!("src_q"; ?x))
                .add_body_atom(atom!("src_s"; ?y, "Student"))
                .add_body_atom(atom!("IS_NOT_NULL"; "Student"))
                .finalize()
        );
    }

    #[test]
    fn unfold_drops_rules_without_matching_definition() {
        let unfolder = Unfolder::new(
            vec![
                Rule::builder()
                    .head(atom!("q"; "a"))
                    .add_body_atom(atom!("src_q"; "a"))
                    .finalize(),
                mapping("r", "src_r"),
            ],
            RewritingParameters::default(),
        );

        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("p"; ?y))
            .add_body_atom(atom!("q"; "b"))
            .add_body_atom(atom!("r"; ?y))
            .finalize()]);

        let result = unfolder.unfold(&query, &Predicate::new("p", 1)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn unfold_drops_rules_with_unmapped_atoms() {
        let unfolder = Unfolder::new(
            vec![mapping("GradStudent", "src_grad")],
            RewritingParameters::default(),
        );

        let query = DatalogProgram::new(vec![
            Rule::builder()
                .head(atom!("ans"; ?x))
                .add_body_atom(atom!("Student"; ?x))
                .finalize(),
            Rule::builder()
                .head(atom!("ans"; ?x))
                .add_body_atom(atom!("GradStudent"; ?x))
                .finalize(),
        ]);

        let result = unfolder.unfold(&query, &Predicate::new("ans", 1)).unwrap();
        assert_eq!(
            result.rules(),
            &[Rule::builder()
                .head(atom!("ans"; ?x))
                .add_body_atom(atom!("src_grad"; ?x))
                .finalize()]
        );
    }

    #[test]
    fn unfold_duplicates_do_not_count_towards_rule_bound() {
        let mut parameters = RewritingParameters::default();
        parameters.set_max_rules(1);

        let unfolder = Unfolder::new(
            vec![mapping("q", "src_q"), mapping("q", "src_q")],
            parameters,
        );
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("p"; ?x))
            .add_body_atom(atom!("q"; ?x))
            .finalize()]);

        let result = unfolder.unfold(&query, &Predicate::new("p", 1)).unwrap();
        assert_eq!(result.len(), 1);

        let unfolder = Unfolder::new(
            vec![mapping("q", "src_q1"), mapping("q", "src_q2")],
            unfolder.parameters.clone(),
        );
        assert!(matches!(
            unfolder.unfold(&query, &Predicate::new("p", 1)),
            Err(RewritingError::BoundExceeded {
                bound: RewritingBound::Rules,
                limit: 1,
                partial: None,
            })
        ));
    }

    #[test]
    fn unfold_with_facts_removes_atoms() {
        let unfolder = Unfolder::new(
            vec![Rule::fact(atom!("q"; "a")), mapping("r", "src_r")],
            RewritingParameters::default(),
        );

        let result = unfolder.unfold(&query(), &Predicate::new("p", 2)).unwrap();
        assert_eq!(
            result.rules(),
            &[Rule::builder()
                .head(atom!("p"; "a", ?y))
                .add_body_atom(atom!("src_r"; ?y))
                .finalize()]
        );
    }

    #[test]
    fn unfold_reports_cycle() {
        let unfolder = Unfolder::new(
            vec![
                Rule::builder()
                    .head(atom!("q"; ?a))
                    .add_body_atom(atom!("q"; ?a))
                    .finalize(),
                mapping("q", "src_q"),
                mapping("r", "src_r"),
            ],
            RewritingParameters::default(),
        );

        let error = unfolder
            .unfold(&query(), &Predicate::new("p", 2))
            .unwrap_err();
        assert_eq!(
            error,
            RewritingError::CycleDetected {
                predicates: vec![Predicate::new("q", 1)],
                partial: None,
            }
        );
        assert_eq!(error.code(), 302);
    }

    #[test]
    fn unfold_cycle_with_partial_results() {
        let mut parameters = RewritingParameters::default();
        parameters.set_cycle_policy(CyclePolicy::Partial);
        parameters.set_max_depth(4);

        let unfolder = Unfolder::new(
            vec![
                Rule::builder()
                    .head(atom!("q"; ?a))
                    .add_body_atom(atom!("q"; ?a))
                    .finalize(),
                mapping("q", "src_q"),
                mapping("r", "src_r"),
            ],
            parameters,
        );

        let error = unfolder
            .unfold(&query(), &Predicate::new("p", 2))
            .unwrap_err();
        assert!(matches!(error, RewritingError::CycleDetected { .. }));

        let partial = error.partial().unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(
            partial.rules()[0],
            Rule::builder()
                .head(atom!("p"; ?x, ?y))
                .add_body_atom(atom!("src_q"; ?x))
                .add_body_atom(atom!("src_r"; ?y))
                .finalize()
        );
    }

    #[test]
    fn unfold_depth_bound_without_cycle() {
        let mut parameters = RewritingParameters::default();
        parameters.set_max_depth(1);

        let unfolder = Unfolder::new(
            vec![mapping("q", "src_q"), mapping("r", "src_r")],
            parameters,
        );

        let error = unfolder
            .unfold(&query(), &Predicate::new("p", 2))
            .unwrap_err();
        assert_eq!(
            error,
            RewritingError::BoundExceeded {
                bound: RewritingBound::Depth,
                limit: 1,
                partial: None,
            }
        );
    }

    #[test]
    fn unfold_unknown_target() {
        let unfolder = Unfolder::new(Vec::new(), RewritingParameters::default());

        assert_eq!(
            unfolder.unfold(&query(), &Predicate::new("t", 1)),
            Err(RewritingError::TargetNotDefined("t".to_string()))
        );
    }
}
