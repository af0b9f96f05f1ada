//! This module defines [Rule] and [RuleBuilder]

use std::{collections::HashSet, fmt::Display};

use crate::rule_model::error::ModelError;

use super::{
    atom::Atom,
    term::{variable::Variable, Term},
    IterableVariables,
};

/// Rule
///
/// A conjunctive query with an optional head atom
/// and an optional conjunction of body atoms.
///
/// A missing head denotes a query-only rule,
/// a missing body denotes a fact, which differs from an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule {
    /// Head of the rule
    head: Option<Atom>,
    /// Body of the rule
    body: Option<Vec<Atom>>,
}

impl Rule {
    /// Return a [RuleBuilder].
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Create a new [Rule].
    pub fn new(head: Option<Atom>, body: Option<Vec<Atom>>) -> Self {
        Self { head, body }
    }

    /// Create a rule without a head.
    pub fn query(body: Vec<Atom>) -> Self {
        Self {
            head: None,
            body: Some(body),
        }
    }

    /// Create a rule without a body.
    pub fn fact(head: Atom) -> Self {
        Self {
            head: Some(head),
            body: None,
        }
    }

    /// Return a reference to the head of the rule.
    pub fn head(&self) -> Option<&Atom> {
        self.head.as_ref()
    }

    /// Return a reference to the body of the rule.
    pub fn body(&self) -> Option<&[Atom]> {
        self.body.as_deref()
    }

    /// Return an iterator over the body atoms.
    ///
    /// Empty if the rule has no body.
    pub fn body_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.body.iter().flatten()
    }

    /// Return whether this rule is a fact.
    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }

    /// Return an iterator over all variables in the body of this rule.
    pub fn body_variables(&self) -> impl Iterator<Item = &Variable> {
        self.body_atoms().flat_map(|atom| atom.variables())
    }

    /// Return an iterator over all variables in the head of this rule.
    pub fn head_variables(&self) -> impl Iterator<Item = &Variable> {
        self.head.iter().flat_map(|atom| atom.variables())
    }

    /// Check that every head variable occurs in the body
    /// and that facts are ground.
    ///
    /// Select-all heads are exempt, because they are defined by the body.
    pub fn validate(&self) -> Result<(), ModelError> {
        let Some(head) = &self.head else {
            return Ok(());
        };

        if head.is_select_all() {
            return Ok(());
        }

        if self.is_fact() {
            if let Some(variable) = head.variables().next() {
                return Err(ModelError::FactNonGround(variable.clone()));
            }

            return Ok(());
        }

        let safe_variables = self.body_variables().collect::<HashSet<_>>();
        for variable in head.variables() {
            if !safe_variables.contains(variable) {
                return Err(ModelError::UnsafeHeadVariable(variable.clone()));
            }
        }

        Ok(())
    }

    /// Replace a select-all head `p(*)` by `p(x1, ..., xn)`,
    /// where `x1, ..., xn` are the distinct body variables in order of their first occurrence.
    ///
    /// Rules without a select-all head are returned unchanged.
    pub fn expand_select_all(&self) -> Rule {
        match &self.head {
            Some(head) if head.is_select_all() => {
                let mut seen = HashSet::new();
                let terms = self
                    .body_variables()
                    .filter(|variable| seen.insert(*variable))
                    .cloned()
                    .map(Term::from)
                    .collect::<Vec<_>>();

                Rule {
                    head: Some(Atom::with_name(head.predicate().name(), terms)),
                    body: self.body.clone(),
                }
            }
            _ => self.clone(),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(head) = &self.head {
            write!(f, "{}", head)?;
        }

        f.write_str(" :- ")?;

        if let Some(body) = &self.body {
            for (body_index, body_atom) in body.iter().enumerate() {
                write!(f, "{}", body_atom)?;

                if body_index < body.len() - 1 {
                    f.write_str(", ")?;
                }
            }
        }

        f.write_str(" .")
    }
}

impl IterableVariables for Rule {
    fn variables<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Variable> + 'a> {
        Box::new(self.head_variables().chain(self.body_variables()))
    }
}

/// Builder for a rule
#[derive(Debug, Default)]
pub struct RuleBuilder {
    /// Head of the rule
    head: Option<Atom>,
    /// Body of the rule
    body: Option<Vec<Atom>>,
}

impl RuleBuilder {
    /// Set the head of the rule.
    pub fn head(mut self, atom: Atom) -> Self {
        self.head = Some(atom);
        self
    }

    /// Add an atom to the body of the rule.
    pub fn add_body_atom(mut self, atom: Atom) -> Self {
        self.body.get_or_insert_with(Vec::new).push(atom);
        self
    }

    /// Add an atom to the body of the rule.
    pub fn add_body_atom_mut(&mut self, atom: Atom) -> &mut Self {
        self.body.get_or_insert_with(Vec::new).push(atom);
        self
    }

    /// Mark the rule as having a body, even if no atom is added to it.
    pub fn empty_body(mut self) -> Self {
        self.body.get_or_insert_with(Vec::new);
        self
    }

    /// Finish building and return a [Rule].
    pub fn finalize(self) -> Rule {
        Rule::new(self.head, self.body)
    }
}
