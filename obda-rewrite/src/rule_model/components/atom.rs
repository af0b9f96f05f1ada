//! This module defines [Atom].

use std::fmt::Display;

use crate::rule_model::error::ModelError;

use super::{
    predicate::Predicate,
    term::{variable::Variable, Term},
    IterableVariables, ProgramComponentKind,
};

/// Atom
///
/// A [Predicate] applied to a list of [Term]s.
///
/// The select-all marker `p(*)` is represented as an arity-0 atom
/// flagged as wildcard; it may only occur in rule heads,
/// where [Rule::expand_select_all][super::rule::Rule::expand_select_all] resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    /// Predicate of the atom
    predicate: Predicate,
    /// Subterms of the atom
    terms: Vec<Term>,
    /// Whether this atom stands for all variables of a rule body
    select_all: bool,
}

impl Atom {
    /// Create a new [Atom].
    ///
    /// Returns an error if the number of terms
    /// does not match the arity of the predicate.
    pub fn new<Terms: IntoIterator<Item = Term>>(
        predicate: Predicate,
        terms: Terms,
    ) -> Result<Self, ModelError> {
        let terms = terms.into_iter().collect::<Vec<_>>();

        if terms.len() != predicate.arity() {
            return Err(ModelError::ArityMismatch {
                kind: ProgramComponentKind::Atom,
                symbol: predicate.name().to_string(),
                expected: predicate.arity(),
                found: terms.len(),
            });
        }

        Ok(Self {
            predicate,
            terms,
            select_all: false,
        })
    }

    /// Create a new [Atom] whose predicate arity is the number of given terms.
    pub fn with_name<Terms: IntoIterator<Item = Term>>(name: &str, terms: Terms) -> Self {
        let terms = terms.into_iter().collect::<Vec<_>>();

        Self {
            predicate: Predicate::new(name, terms.len()),
            terms,
            select_all: false,
        }
    }

    /// Create the select-all marker atom `name(*)`.
    pub fn select_all(name: &str) -> Self {
        Self {
            predicate: Predicate::new(name, 0),
            terms: Vec::new(),
            select_all: true,
        }
    }

    /// Return the predicate of this atom.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Return the terms of this atom.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Return the number of terms in this atom.
    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// Return whether this is the select-all marker.
    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    /// Return whether this atom is over a built-in predicate.
    pub fn is_builtin(&self) -> bool {
        self.predicate.is_builtin()
    }

    /// Return `true` if no variable occurs in this atom.
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_ground)
    }

    /// Return a new atom with the same predicate but different terms.
    ///
    /// The number of terms must not change.
    pub(crate) fn with_terms(&self, terms: Vec<Term>) -> Self {
        debug_assert_eq!(terms.len(), self.terms.len());

        Self {
            predicate: self.predicate.clone(),
            terms,
            select_all: self.select_all,
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.select_all {
            return write!(f, "{}(*)", self.predicate);
        }

        write!(f, "{}(", self.predicate)?;

        for (term_index, term) in self.terms.iter().enumerate() {
            write!(f, "{}", term)?;

            if term_index < self.terms.len() - 1 {
                f.write_str(", ")?;
            }
        }

        f.write_str(")")
    }
}

impl IterableVariables for Atom {
    fn variables<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Variable> + 'a> {
        Box::new(self.terms.iter().flat_map(|term| term.variables()))
    }
}

#[cfg(test)]
mod test {
    use crate::rule_model::{
        components::{predicate::Predicate, term::Term},
        error::ModelError,
    };

    use super::Atom;

    #[test]
    fn atom_arity() {
        let atom = Atom::new(
            Predicate::new("q", 2),
            vec![Term::variable("x"), Term::from("Person")],
        )
        .unwrap();
        assert_eq!(atom.arity(), 2);
        assert_eq!(atom, atom!("q"; ?x, "Person"));

        let error = Atom::new(Predicate::new("q", 2), vec![Term::variable("x")]).unwrap_err();
        assert_eq!(error.code(), 101);
        assert!(matches!(error, ModelError::ArityMismatch { found: 1, .. }));
    }

    #[test]
    fn atom_empty_and_select_all() {
        let empty = atom!("p");
        assert_eq!(empty.arity(), 0);
        assert!(!empty.is_select_all());
        assert_eq!(empty.to_string(), "p()");

        let select_all = Atom::select_all("p");
        assert!(select_all.is_select_all());
        assert_ne!(empty, select_all);
        assert_eq!(select_all.to_string(), "p(*)");
    }
}
