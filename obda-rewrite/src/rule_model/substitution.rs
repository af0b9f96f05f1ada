//! This module defines [Substitution].

pub mod injective;
pub mod unifier;

use std::{
    borrow::Cow,
    collections::{hash_map::Iter, HashMap},
    fmt::Display,
};

use super::{
    components::{
        atom::Atom,
        rule::Rule,
        term::{function::FunctionTerm, variable::Variable, Term},
        IterableVariables,
    },
    program::DatalogProgram,
};

/// Immutable map from [Variable]s to [Term]s
/// that is used to uniformly replace variables.
///
/// Applying a substitution never modifies its input.
/// Terms that are not affected are returned as borrowed references,
/// so callers can detect unchanged subtrees with [Cow::Borrowed].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Substitution {
    map: HashMap<Variable, Term>,
}

impl Substitution {
    /// Create a new [Substitution].
    ///
    /// If a variable is given more than once, the last binding is kept.
    pub fn new<From, To, Iterator>(iter: Iterator) -> Self
    where
        From: Into<Variable>,
        To: Into<Term>,
        Iterator: IntoIterator<Item = (From, To)>,
    {
        Self {
            map: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }

    /// Create the empty substitution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a substitution with a single binding.
    pub fn singleton(variable: Variable, term: Term) -> Self {
        Self {
            map: HashMap::from([(variable, term)]),
        }
    }

    /// Return the term the given variable is mapped to.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.map.get(variable)
    }

    /// Return whether the given variable is mapped by this substitution.
    pub fn contains(&self, variable: &Variable) -> bool {
        self.map.contains_key(variable)
    }

    /// Return an iterator over the mapped variables.
    pub fn domain(&self) -> impl Iterator<Item = &Variable> {
        self.map.keys()
    }

    /// Return an iterator over all variables occurring in the image of this substitution.
    pub fn range_variables(&self) -> impl Iterator<Item = &Variable> {
        self.map.values().flat_map(|term| term.variables())
    }

    /// Return the number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Return whether this is the empty substitution.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Return an iterator over all bindings.
    pub fn iter(&self) -> Iter<'_, Variable, Term> {
        self.map.iter()
    }

    /// Return the substitution restricted to the given variables.
    pub fn restrict<'a, Variables>(&self, variables: Variables) -> Self
    where
        Variables: IntoIterator<Item = &'a Variable>,
    {
        Self {
            map: variables
                .into_iter()
                .filter_map(|variable| {
                    self.map
                        .get(variable)
                        .map(|term| (variable.clone(), term.clone()))
                })
                .collect(),
        }
    }

    /// Apply this substitution to a [Term].
    ///
    /// Returns the input reference if no variable of the term is mapped.
    pub fn apply_term<'a>(&self, term: &'a Term) -> Cow<'a, Term> {
        if self.map.is_empty() {
            return Cow::Borrowed(term);
        }

        match term {
            Term::Variable(variable) => match self.map.get(variable) {
                Some(image) => Cow::Owned(image.clone()),
                None => Cow::Borrowed(term),
            },
            Term::Uri(_) | Term::Value(_) => Cow::Borrowed(term),
            Term::Function(function) => match self.apply_function(function) {
                Some(function) => Cow::Owned(Term::Function(function)),
                None => Cow::Borrowed(term),
            },
        }
    }

    /// Apply this substitution to the arguments of a [FunctionTerm].
    ///
    /// Returns `None` if no argument changed.
    fn apply_function(&self, function: &FunctionTerm) -> Option<FunctionTerm> {
        let rebuilt = self.apply_terms(function.arguments())?;
        Some(function.with_arguments(rebuilt))
    }

    /// Apply this substitution to a list of terms.
    ///
    /// Returns `None` if no term changed.
    fn apply_terms(&self, terms: &[Term]) -> Option<Vec<Term>> {
        let mut rebuilt: Option<Vec<Term>> = None;

        for (index, term) in terms.iter().enumerate() {
            let applied = self.apply_term(term);

            if let Some(result) = rebuilt.as_mut() {
                result.push(applied.into_owned());
            } else if let Cow::Owned(new_term) = applied {
                let mut result = Vec::with_capacity(terms.len());
                result.extend_from_slice(&terms[..index]);
                result.push(new_term);

                rebuilt = Some(result);
            }
        }

        rebuilt
    }

    /// Apply this substitution to an [Atom].
    ///
    /// Returns the input reference if no variable of the atom is mapped.
    pub fn apply_atom<'a>(&self, atom: &'a Atom) -> Cow<'a, Atom> {
        if self.map.is_empty() {
            return Cow::Borrowed(atom);
        }

        match self.apply_terms(atom.terms()) {
            Some(terms) => Cow::Owned(atom.with_terms(terms)),
            None => Cow::Borrowed(atom),
        }
    }

    /// Apply this substitution to a program component.
    pub fn apply<Component: Substitutable>(&self, component: &Component) -> Component {
        component.substitute(self)
    }

    /// Return the composition of `self` after `inner`.
    ///
    /// Applying the result is equivalent to applying `inner` first
    /// and then applying `self`.
    /// The domain of the result is the union of both domains.
    pub fn compose(&self, inner: &Substitution) -> Substitution {
        let mut map = HashMap::with_capacity(self.map.len() + inner.map.len());

        for (variable, term) in &inner.map {
            map.insert(variable.clone(), self.apply_term(term).into_owned());
        }

        for (variable, term) in &self.map {
            if !inner.map.contains_key(variable) {
                map.insert(variable.clone(), term.clone());
            }
        }

        Substitution { map }
    }
}

/// Trait implemented by program components a [Substitution] can be applied to
pub trait Substitutable: Sized {
    /// Return a copy of this component with the substitution applied.
    fn substitute(&self, substitution: &Substitution) -> Self;
}

impl Substitutable for Term {
    fn substitute(&self, substitution: &Substitution) -> Self {
        substitution.apply_term(self).into_owned()
    }
}

impl Substitutable for Atom {
    fn substitute(&self, substitution: &Substitution) -> Self {
        substitution.apply_atom(self).into_owned()
    }
}

impl Substitutable for Vec<Atom> {
    fn substitute(&self, substitution: &Substitution) -> Self {
        self.iter()
            .map(|atom| substitution.apply_atom(atom).into_owned())
            .collect()
    }
}

impl Substitutable for Rule {
    fn substitute(&self, substitution: &Substitution) -> Self {
        Rule::new(
            self.head().map(|head| head.substitute(substitution)),
            self.body().map(|body| {
                body.iter()
                    .map(|atom| atom.substitute(substitution))
                    .collect()
            }),
        )
    }
}

impl Substitutable for DatalogProgram {
    fn substitute(&self, substitution: &Substitution) -> Self {
        self.rules()
            .iter()
            .map(|rule| rule.substitute(substitution))
            .collect()
    }
}

impl<TypeFrom, TypeTo> From<HashMap<TypeFrom, TypeTo>> for Substitution
where
    TypeFrom: Into<Variable>,
    TypeTo: Into<Term>,
{
    fn from(value: HashMap<TypeFrom, TypeTo>) -> Self {
        Self::new(value)
    }
}

impl IntoIterator for Substitution {
    type Item = (Variable, Term);
    type IntoIter = std::collections::hash_map::IntoIter<Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a Substitution {
    type Item = (&'a Variable, &'a Term);
    type IntoIter = Iter<'a, Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bindings = self.map.iter().collect::<Vec<_>>();
        bindings.sort();

        f.write_str("{")?;
        for (index, (variable, term)) in bindings.iter().enumerate() {
            write!(f, "{variable}/{term}")?;

            if index < bindings.len() - 1 {
                f.write_str(", ")?;
            }
        }
        f.write_str("}")
    }
}
