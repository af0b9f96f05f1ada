//! This module rewrites queries with ontology rules,
//! unfolds them against mappings
//! and turns the result into a query plan.

pub mod dependency;
pub mod error;
pub mod parameters;
pub mod reformulation;
pub mod rewriter;
pub mod unfolder;

use std::collections::HashMap;

use crate::rule_model::{
    components::{rule::Rule, term::variable::Variable, IterableVariables},
    generator::VariableGenerator,
    substitution::{injective::InjectiveVar2VarSubstitution, unifier::unify_atoms},
};

/// Resolve the body atom at position `index` of `rule` with `definition`.
///
/// The definition is renamed apart with fresh variables from `generator`,
/// its head is unified with the atom,
/// and the atom is replaced by the renamed body of the definition.
/// Returns `None` if the head does not unify with the atom.
pub(crate) fn resolve(
    rule: &Rule,
    index: usize,
    definition: &Rule,
    generator: &mut VariableGenerator,
) -> Option<Rule> {
    let body = rule.body()?;
    let atom = body.get(index)?;

    let renamed = generator.renaming_for(definition).apply(definition);
    let unifier = unify_atoms(renamed.head()?, atom)?;

    let mut new_body = Vec::with_capacity(body.len() + renamed.body_atoms().count());
    new_body.extend_from_slice(&body[..index]);
    new_body.extend(renamed.body_atoms().cloned());
    new_body.extend_from_slice(&body[index + 1..]);

    Some(unifier.apply(&Rule::new(rule.head().cloned(), Some(new_body))))
}

/// Return a representative of the given rule that is equal
/// for all rules that only differ in the names of their variables.
pub(crate) fn canonical_form(rule: &Rule) -> Rule {
    let renaming = rule
        .distinct_variables()
        .into_iter()
        .enumerate()
        .map(|(index, variable)| (variable, Variable::new(&format!("_c{index}"))))
        .collect::<HashMap<_, _>>();

    InjectiveVar2VarSubstitution::new_unchecked(renaming).apply(rule)
}

#[cfg(test)]
mod test {
    use crate::rule_model::{components::rule::Rule, generator::VariableGenerator};

    use super::{canonical_form, resolve};

    #[test]
    fn resolve_replaces_atom() {
        let rule = Rule::builder()
            .head(atom!("p"; ?x, ?y))
            .add_body_atom(atom!("q"; ?x))
            .add_body_atom(atom!("r"; ?y))
            .finalize();
        let mapping = Rule::builder()
            .head(atom!("q"; ?a))
            .add_body_atom(atom!("src_q"; ?a))
            .finalize();

        let mut generator = VariableGenerator::new("v");
        let resolved = resolve(&rule, 0, &mapping, &mut generator).unwrap();

        assert_eq!(
            resolved,
            Rule::builder()
                .head(atom!("p"; ?x, ?y))
                .add_body_atom(atom!("src_q"; ?x))
                .add_body_atom(atom!("r"; ?y))
                .finalize()
        );

        let constant_mapping = Rule::builder()
            .head(atom!("r"; "a"))
            .add_body_atom(atom!("src_r"; "b"))
            .finalize();
        let resolved = resolve(&rule, 1, &constant_mapping, &mut generator).unwrap();
        assert_eq!(resolved.head(), Some(&atom!("p"; ?x, "a")));

        assert!(resolve(&rule, 0, &constant_mapping, &mut generator).is_none());
    }

    #[test]
    fn canonical_form_ignores_variable_names() {
        let first = Rule::builder()
            .head(atom!("p"; ?x))
            .add_body_atom(atom!("q"; ?x, ?y))
            .finalize();
        let second = Rule::builder()
            .head(atom!("p"; ?u))
            .add_body_atom(atom!("q"; ?u, ?w))
            .finalize();
        let third = Rule::builder()
            .head(atom!("p"; ?u))
            .add_body_atom(atom!("q"; ?w, ?u))
            .finalize();

        assert_eq!(canonical_form(&first), canonical_form(&second));
        assert_ne!(canonical_form(&first), canonical_form(&third));
    }
}
