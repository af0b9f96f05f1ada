use obda_rewrite::{
    atom, function,
    query_plan::node::{QueryNode, QueryNodeKind},
    rewriting::{
        error::RewritingError,
        parameters::{CyclePolicy, RewritingParameters},
        reformulation::QueryReformulator,
        unfolder::Unfolder,
    },
    rule_model::{
        components::{predicate::Predicate, rule::Rule, term::Term},
        program::DatalogProgram,
        substitution::Substitution,
    },
    Error,
};
use test_log::test;

fn mapping(head: &str, source: &str) -> Rule {
    Rule::builder()
        .head(atom!(head; ?a))
        .add_body_atom(atom!(source; ?a))
        .finalize()
}

#[test]
fn unfold_into_source_atoms() {
    let query = DatalogProgram::new(vec![Rule::builder()
        .head(atom!("p"; ?x, ?y))
        .add_body_atom(atom!("q"; ?x))
        .add_body_atom(atom!("r"; ?y))
        .finalize()]);

    let unfolder = Unfolder::new(
        vec![mapping("q", "src_q"), mapping("r", "src_r")],
        RewritingParameters::default(),
    );
    let result = unfolder.unfold(&query, &Predicate::new("p", 2)).unwrap();

    assert_eq!(
        result.rules(),
        &[Rule::builder()
            .head(atom!("p"; ?x, ?y))
            .add_body_atom(atom!("src_q"; ?x))
            .add_body_atom(atom!("src_r"; ?y))
            .finalize()]
    );
    assert!(result
        .rules()
        .iter()
        .flat_map(Rule::body_atoms)
        .all(|atom| atom.predicate().name().starts_with("src_")));
}

#[test]
fn empty_substitution_keeps_nested_terms() {
    let term = Term::from(function!("s"; (Term::uri("Occupation")), (Term::string("Student"))));
    let atom = atom!("r"; (Term::uri("FUB")), (term.clone()));

    let substitution = Substitution::empty();

    assert_eq!(substitution.apply_term(&term).as_ref(), &term);
    assert_eq!(substitution.apply(&atom), atom);
}

#[test]
fn direct_cycle_is_reported() {
    let query = DatalogProgram::new(vec![Rule::builder()
        .head(atom!("ans"; ?x))
        .add_body_atom(atom!("q"; ?x))
        .finalize()]);
    let mappings = vec![
        Rule::builder()
            .head(atom!("q"; ?a))
            .add_body_atom(atom!("q"; ?a))
            .finalize(),
        mapping("q", "src_q"),
    ];

    let reformulator =
        QueryReformulator::new(Vec::new(), mappings.clone(), RewritingParameters::default());
    let result = reformulator.reformulate(&query, "ans");
    assert!(matches!(
        result,
        Err(Error::Rewriting(RewritingError::CycleDetected { ref predicates, partial: None }))
            if predicates == &vec![Predicate::new("q", 1)]
    ));

    let parameters: RewritingParameters =
        serde_json::from_str(r#"{ "max_depth": 4, "cycle_policy": "partial" }"#).unwrap();
    assert_eq!(parameters.cycle_policy(), CyclePolicy::Partial);
    assert_eq!(parameters.max_rules(), RewritingParameters::default().max_rules());

    let reformulator = QueryReformulator::new(Vec::new(), mappings, parameters);
    let Err(Error::Rewriting(error)) = reformulator.reformulate(&query, "ans") else {
        panic!("expected a rewriting error");
    };
    assert_eq!(error.code(), 302);
    assert_eq!(
        error.partial().map(DatalogProgram::rules),
        Some(
            &[Rule::builder()
                .head(atom!("ans"; ?x))
                .add_body_atom(atom!("src_q"; ?x))
                .finalize()][..]
        )
    );
}

#[test]
fn reformulate_into_query_plan() {
    let sigma = vec![Rule::builder()
        .head(atom!("Student"; ?a))
        .add_body_atom(atom!("GradStudent"; ?a))
        .finalize()];
    let mappings = vec![
        Rule::builder()
            .head(atom!("Student"; ?b))
            .add_body_atom(atom!("src_student"; ?b, ?c))
            .finalize(),
        mapping("GradStudent", "src_grad"),
        Rule::builder()
            .head(atom!("name"; ?e, ?f))
            .add_body_atom(atom!("src_person"; ?e, ?f))
            .add_body_atom(atom!("IS_NOT_NULL"; ?f))
            .finalize(),
    ];
    let query = DatalogProgram::new(vec![Rule::builder()
        .head(atom!("ans"; ?x, ?n))
        .add_body_atom(atom!("Student"; ?x))
        .add_body_atom(atom!("name"; ?x, ?n))
        .finalize()]);

    let reformulator = QueryReformulator::new(sigma, mappings, RewritingParameters::default());
    let plan = reformulator.reformulate(&query, "ans").unwrap();

    assert_eq!(plan.validate(), Ok(()));
    assert_eq!(plan.get(plan.root()), Some(&QueryNode::union(2)));

    let kinds = plan
        .pre_order()
        .into_iter()
        .filter_map(|id| plan.get(id).map(QueryNode::kind))
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            QueryNodeKind::Union,
            QueryNodeKind::Projection,
            QueryNodeKind::Filter,
            QueryNodeKind::Join,
            QueryNodeKind::Data,
            QueryNodeKind::Data,
            QueryNodeKind::Projection,
            QueryNodeKind::Filter,
            QueryNodeKind::Join,
            QueryNodeKind::Data,
            QueryNodeKind::Data,
        ]
    );

    let sources = plan
        .data_atoms()
        .unwrap()
        .iter()
        .map(|atom| atom.predicate().name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec!["src_student", "src_person", "src_grad", "src_person"]
    );

    let rendered = plan.to_string();
    assert!(rendered.contains("UNION/2"));
    assert!(rendered.contains("PROJECTION ans(?x, ?n)"));
    assert!(rendered.contains("FILTER IS_NOT_NULL(?n)"));
}
