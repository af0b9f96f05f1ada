//! This module defines [OntologyRewriter].

use std::collections::{HashMap, HashSet, VecDeque};

use crate::rule_model::{
    components::{predicate::Predicate, rule::Rule, IterableVariables},
    generator::VariableGenerator,
    program::DatalogProgram,
};

use super::{
    canonical_form,
    error::{RewritingBound, RewritingError},
    parameters::{CyclePolicy, RewritingParameters},
    resolve,
};

/// Expands queries with the rules of an ontology
///
/// Each body atom matching the head of an ontology rule
/// gives rise to an alternative rule in which the atom
/// is replaced by the body of the ontology rule.
/// The result contains the input rules together with all alternatives.
#[derive(Debug, Clone)]
pub struct OntologyRewriter {
    /// Ontology rules indexed by their head predicate
    sigma: HashMap<Predicate, Vec<Rule>>,
    /// Bounds
    parameters: RewritingParameters,
}

impl OntologyRewriter {
    /// Create a new [OntologyRewriter].
    ///
    /// Rules without a head are ignored.
    pub fn new<Rules>(sigma_rules: Rules, parameters: RewritingParameters) -> Self
    where
        Rules: IntoIterator<Item = Rule>,
    {
        let mut sigma = HashMap::<Predicate, Vec<Rule>>::new();
        for rule in sigma_rules {
            if let Some(head) = rule.head() {
                sigma.entry(head.predicate().clone()).or_default().push(rule);
            }
        }

        Self { sigma, parameters }
    }

    /// Return the number of ontology rules.
    pub fn len(&self) -> usize {
        self.sigma.values().map(Vec::len).sum()
    }

    /// Return whether there are no ontology rules.
    pub fn is_empty(&self) -> bool {
        self.sigma.is_empty()
    }

    /// Saturate the given program with the ontology rules.
    ///
    /// Rules that only differ in the names of their variables are kept once.
    pub fn rewrite(&self, program: &DatalogProgram) -> Result<DatalogProgram, RewritingError> {
        if self.sigma.is_empty() {
            return Ok(program.clone());
        }

        let mut generator = VariableGenerator::new(self.parameters.fresh_prefix());
        for rule in program {
            generator.reserve(rule.variables());
        }
        for rule in self.sigma.values().flatten() {
            generator.reserve(rule.variables());
        }

        let mut seen = HashSet::<Rule>::new();
        let mut result = DatalogProgram::default();
        let mut queue = VecDeque::<(Rule, usize)>::new();

        for rule in program {
            if seen.insert(canonical_form(rule)) {
                result.push(rule.clone());
                queue.push_back((rule.clone(), 0));
            }
        }

        while let Some((rule, depth)) = queue.pop_front() {
            for (index, atom) in rule.body_atoms().enumerate() {
                let Some(definitions) = self.sigma.get(atom.predicate()) else {
                    continue;
                };

                for definition in definitions {
                    let Some(alternative) = resolve(&rule, index, definition, &mut generator)
                    else {
                        continue;
                    };

                    if !seen.insert(canonical_form(&alternative)) {
                        continue;
                    }

                    if depth + 1 > self.parameters.max_depth() {
                        return Err(self.bound_exceeded(
                            RewritingBound::Depth,
                            self.parameters.max_depth(),
                            result,
                        ));
                    }

                    if result.len() >= self.parameters.max_rules() {
                        return Err(self.bound_exceeded(
                            RewritingBound::Rules,
                            self.parameters.max_rules(),
                            result,
                        ));
                    }

                    log::trace!("rewrote {rule} into {alternative}");

                    result.push(alternative.clone());
                    queue.push_back((alternative, depth + 1));
                }
            }
        }

        log::debug!(
            "rewriting produced {} rules from {} query rules",
            result.len(),
            program.len()
        );

        Ok(result)
    }

    fn bound_exceeded(
        &self,
        bound: RewritingBound,
        limit: usize,
        result: DatalogProgram,
    ) -> RewritingError {
        log::warn!("rewriting stopped: {bound} bound of {limit} exceeded");

        RewritingError::BoundExceeded {
            bound,
            limit,
            partial: (self.parameters.cycle_policy() == CyclePolicy::Partial)
                .then(|| Box::new(result)),
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
        rule_model::{components::rule::Rule, program::DatalogProgram},
    };

    use super::OntologyRewriter;

    fn subclass(sub: &str, sup: &str) -> Rule {
        Rule::builder()
            .head(atom!(sup; ?a))
            .add_body_atom(atom!(sub; ?a))
            .finalize()
    }

    fn query() -> DatalogProgram {
        DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("Person"; ?x))
            .add_body_atom(atom!("worksFor"; ?x, "FUB"))
            .finalize()])
    }

    #[test]
    fn rewrite_subclass_hierarchy() {
        let rewriter = OntologyRewriter::new(
            vec![subclass("Student", "Person"), subclass("Professor", "Person")],
            RewritingParameters::default(),
        );

        let result = rewriter.rewrite(&query()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.rules()[0], query().rules()[0]);

        let first_atoms = result
            .rules()
            .iter()
            .filter_map(|rule| rule.body().map(|body| body[0].predicate().name().to_string()))
            .collect::<Vec<_>>();
        assert_eq!(first_atoms, vec!["Person", "Student", "Professor"]);
        assert!(result
            .rules()
            .iter()
            .all(|rule| rule.head() == Some(&atom!("ans"; ?x))));
    }

    #[test]
    fn rewrite_terminates_on_equivalent_classes() {
        let rewriter = OntologyRewriter::new(
            vec![subclass("Person", "Human"), subclass("Human", "Person")],
            RewritingParameters::default(),
        );

        let result = rewriter.rewrite(&query()).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn rewrite_depth_bound() {
        let chain = (0..5)
            .map(|index| subclass(&format!("C{}", index + 1), &format!("C{index}")))
            .collect::<Vec<_>>();
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("C0"; ?x))
            .finalize()]);

        let mut parameters = RewritingParameters::default();
        parameters.set_max_depth(2);
        parameters.set_cycle_policy(CyclePolicy::Partial);

        let error = OntologyRewriter::new(chain.clone(), parameters)
            .rewrite(&query)
            .unwrap_err();
        assert!(matches!(
            error,
            RewritingError::BoundExceeded {
                bound: RewritingBound::Depth,
                limit: 2,
                ..
            }
        ));
        assert_eq!(error.partial().map(DatalogProgram::len), Some(3));

        let result = OntologyRewriter::new(chain, RewritingParameters::default())
            .rewrite(&query)
            .unwrap();
        assert_eq!(result.len(), 6);
    }
}
