//! Computation of most general unifiers.

use crate::rule_model::components::{atom::Atom, term::Term};

use super::Substitution;

/// Compute the most general unifier of two terms.
///
/// Returns `None` if the terms do not unify.
pub fn unify_terms(left: &Term, right: &Term) -> Option<Substitution> {
    unify_pairs(vec![(left.clone(), right.clone())])
}

/// Compute the most general unifier of two atoms.
///
/// Returns `None` if the predicates differ or some pair of terms does not unify.
pub fn unify_atoms(left: &Atom, right: &Atom) -> Option<Substitution> {
    if left.predicate() != right.predicate() {
        return None;
    }

    unify_pairs(
        left.terms()
            .iter()
            .cloned()
            .zip(right.terms().iter().cloned())
            .collect(),
    )
}

fn unify_pairs(mut pending: Vec<(Term, Term)>) -> Option<Substitution> {
    let mut unifier = Substitution::empty();

    while let Some((left, right)) = pending.pop() {
        let left = unifier.apply_term(&left).into_owned();
        let right = unifier.apply_term(&right).into_owned();

        match (&left, &right) {
            (left, right) if left == right => {}
            (Term::Variable(variable), other) | (other, Term::Variable(variable)) => {
                // occurs check
                if other.contains_variable(variable) {
                    return None;
                }

                unifier =
                    Substitution::singleton(variable.clone(), other.clone()).compose(&unifier);
            }
            (Term::Function(left), Term::Function(right)) => {
                if left.symbol() != right.symbol() {
                    return None;
                }

                pending.extend(
                    left.arguments()
                        .iter()
                        .cloned()
                        .zip(right.arguments().iter().cloned()),
                );
            }
            _ => return None,
        }
    }

    Some(unifier)
}
