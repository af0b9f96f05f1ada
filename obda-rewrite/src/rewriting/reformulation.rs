//! This module defines [QueryReformulator].

use crate::{
    error::Error,
    query_plan::{
        optimizer::{default_optimizers, QueryNodeOptimizer},
        query::IntermediateQuery,
    },
    rule_model::{components::rule::Rule, program::DatalogProgram},
};

use super::{
    error::RewritingError, parameters::RewritingParameters, rewriter::OntologyRewriter,
    unfolder::Unfolder,
};

/// Turns a query over the ontology vocabulary into a query plan over the sources
///
/// The query is expanded with the ontology rules,
/// unfolded against the mappings and translated into an [IntermediateQuery],
/// which is optimized unless disabled in the [RewritingParameters].
#[derive(Debug, Clone)]
pub struct QueryReformulator {
    rewriter: OntologyRewriter,
    unfolder: Unfolder,
    parameters: RewritingParameters,
}

impl QueryReformulator {
    /// Create a new [QueryReformulator].
    pub fn new(
        sigma_rules: Vec<Rule>,
        mapping_rules: Vec<Rule>,
        parameters: RewritingParameters,
    ) -> Self {
        Self {
            rewriter: OntologyRewriter::new(sigma_rules, parameters.clone()),
            unfolder: Unfolder::new(mapping_rules, parameters.clone()),
            parameters,
        }
    }

    /// Return the parameters of this reformulator.
    pub fn parameters(&self) -> &RewritingParameters {
        &self.parameters
    }

    /// Compute the query plan for the predicate named `target`.
    pub fn reformulate(
        &self,
        query: &DatalogProgram,
        target: &str,
    ) -> Result<IntermediateQuery, Error> {
        log::info!("reformulating query for {target}");

        let expanded = query
            .rules()
            .iter()
            .map(Rule::expand_select_all)
            .collect::<DatalogProgram>();
        expanded.validate()?;

        let target_predicate = expanded
            .head_predicates()
            .into_iter()
            .find(|predicate| predicate.name() == target)
            .cloned()
            .ok_or_else(|| RewritingError::TargetNotDefined(target.to_string()))?;

        let rewritten = self.rewriter.rewrite(&expanded)?;
        log::info!(
            "rewriting with {} ontology rules: {} rules",
            self.rewriter.len(),
            rewritten.len()
        );

        let unfolded = self.unfolder.unfold(&rewritten, &target_predicate)?;
        log::info!(
            "unfolding with {} mappings: {} rules",
            self.unfolder.mappings().len(),
            unfolded.len()
        );
        log::debug!("unfolded program:\n{unfolded}");

        let mut plan = IntermediateQuery::from_rules(unfolded.rules())?;

        if self.parameters.optimize_plan() {
            let optimizers = default_optimizers();
            let optimizers = optimizers
                .iter()
                .map(|optimizer| optimizer.as_ref())
                .collect::<Vec<&dyn QueryNodeOptimizer>>();

            let steps = plan.optimize(&optimizers, self.parameters.max_optimization_steps())?;
            log::info!("query plan optimization: {steps} steps");
        }

        log::debug!("query plan:\n{plan}");

        Ok(plan)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        error::Error,
        query_plan::{
            error::QueryTreeError,
            node::{QueryNode, QueryNodeKind},
        },
        rewriting::{error::RewritingError, parameters::RewritingParameters},
        rule_model::{
            components::{atom::Atom, rule::Rule},
            error::ModelError,
            program::DatalogProgram,
        },
    };

    use super::QueryReformulator;

    fn reformulator(parameters: RewritingParameters) -> QueryReformulator {
        QueryReformulator::new(
            vec![Rule::builder()
                .head(atom!("Person"; ?a))
                .add_body_atom(atom!("Student"; ?a))
                .finalize()],
            vec![
                Rule::builder()
                    .head(atom!("Person"; ?b))
                    .add_body_atom(atom!("src_person"; ?b))
                    .finalize(),
                Rule::builder()
                    .head(atom!("Student"; ?c))
                    .add_body_atom(atom!("src_enrolled"; ?c, ?d))
                    .finalize(),
            ],
            parameters,
        )
    }

    #[test]
    fn reformulate_select_all_query() {
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(Atom::select_all("ans"))
            .add_body_atom(atom!("Person"; ?x))
            .finalize()]);

        let plan = reformulator(RewritingParameters::default())
            .reformulate(&query, "ans")
            .unwrap();

        assert_eq!(plan.validate(), Ok(()));
        assert_eq!(plan.get(plan.root()), Some(&QueryNode::union(1)));
        assert_eq!(plan.leaf_atoms().len(), 2);
        assert_eq!(plan.leaf_atoms()[0], &atom!("src_person"; ?x));
        assert_eq!(
            plan.leaf_atoms()[1].predicate().name(),
            "src_enrolled"
        );
    }

    #[test]
    fn reformulate_without_optimization() {
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("Student"; ?x))
            .finalize()]);

        let mut parameters = RewritingParameters::default();
        parameters.set_optimize_plan(false);
        let plan = reformulator(parameters).reformulate(&query, "ans").unwrap();
        assert_eq!(plan.get(plan.root()).map(QueryNode::kind), Some(QueryNodeKind::Union));

        let plan = reformulator(RewritingParameters::default())
            .reformulate(&query, "ans")
            .unwrap();
        assert_eq!(
            plan.get(plan.root()).map(QueryNode::kind),
            Some(QueryNodeKind::Projection)
        );
    }

    #[test]
    fn reformulate_keeps_only_source_leaves() {
        let reformulator = QueryReformulator::new(
            vec![Rule::builder()
                .head(atom!("Student"; ?a))
                .add_body_atom(atom!("GradStudent"; ?a))
                .finalize()],
            vec![Rule::builder()
                .head(atom!("GradStudent"; ?b))
                .add_body_atom(atom!("src_grad"; ?b))
                .finalize()],
            RewritingParameters::default(),
        );
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("Student"; ?x))
            .finalize()]);

        let plan = reformulator.reformulate(&query, "ans").unwrap();
        assert_eq!(plan.leaf_atoms(), vec![&atom!("src_grad"; ?x)]);
    }

    #[test]
    fn reformulate_with_facts_only() {
        let reformulator = QueryReformulator::new(
            Vec::new(),
            vec![Rule::fact(atom!("q"; "a"))],
            RewritingParameters::default(),
        );
        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("q"; ?x))
            .finalize()]);

        assert!(matches!(
            reformulator.reformulate(&query, "ans"),
            Err(Error::QueryTree(QueryTreeError::UnsupportedRule(_)))
        ));
    }

    #[test]
    fn reformulate_errors() {
        let unsafe_query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x, ?y))
            .add_body_atom(atom!("Person"; ?x))
            .finalize()]);
        let result = reformulator(RewritingParameters::default()).reformulate(&unsafe_query, "ans");
        assert!(matches!(
            result,
            Err(Error::Model(ModelError::UnsafeHeadVariable(_)))
        ));

        let query = DatalogProgram::new(vec![Rule::builder()
            .head(atom!("ans"; ?x))
            .add_body_atom(atom!("Person"; ?x))
            .finalize()]);
        let result = reformulator(RewritingParameters::default()).reformulate(&query, "other");
        assert!(matches!(
            result,
            Err(Error::Rewriting(RewritingError::TargetNotDefined(_)))
        ));
    }
}
