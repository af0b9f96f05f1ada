//! This module defines [InjectiveVar2VarSubstitution].

use std::{borrow::Cow, collections::HashMap, fmt::Display};

use crate::rule_model::{
    components::term::{variable::Variable, Term},
    error::ModelError,
};

use super::{Substitutable, Substitution};

/// Renaming of variables
///
/// Maps variables to variables such that
/// no two distinct variables are mapped to the same one.
/// Injectivity is established on construction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InjectiveVar2VarSubstitution {
    /// Renaming as an ordinary substitution
    substitution: Substitution,
    /// Variable to variable map
    map: HashMap<Variable, Variable>,
}

impl InjectiveVar2VarSubstitution {
    /// Create a new [InjectiveVar2VarSubstitution].
    ///
    /// Returns an error if two variables are mapped to the same variable.
    pub fn new<Iterator>(iter: Iterator) -> Result<Self, ModelError>
    where
        Iterator: IntoIterator<Item = (Variable, Variable)>,
    {
        let map = iter.into_iter().collect::<HashMap<_, _>>();

        let mut targets = HashMap::<&Variable, &Variable>::with_capacity(map.len());
        for (source, target) in &map {
            if let Some(other) = targets.insert(target, source) {
                let (first, second) = if other < source {
                    (other, source)
                } else {
                    (source, other)
                };

                return Err(ModelError::IllegalSubstitution {
                    first: first.clone(),
                    second: second.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(Self::new_unchecked(map))
    }

    /// Create a new [InjectiveVar2VarSubstitution] from a map
    /// that is known to be injective.
    pub(crate) fn new_unchecked(map: HashMap<Variable, Variable>) -> Self {
        let substitution = Substitution::new(
            map.iter()
                .map(|(source, target)| (source.clone(), Term::from(target.clone()))),
        );

        Self { substitution, map }
    }

    /// Return the empty renaming.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return the number of renamed variables.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Return whether this renaming is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Return the variable the given variable is renamed to.
    ///
    /// Variables outside the domain are returned unchanged.
    pub fn apply_to_variable(&self, variable: &Variable) -> Variable {
        self.map
            .get(variable)
            .unwrap_or(variable)
            .clone()
    }

    /// Apply this renaming to a [Term].
    pub fn apply_term<'a>(&self, term: &'a Term) -> Cow<'a, Term> {
        self.substitution.apply_term(term)
    }

    /// Apply this renaming to a program component.
    pub fn apply<Component: Substitutable>(&self, component: &Component) -> Component {
        self.substitution.apply(component)
    }

    /// Rename both the keys and the values of the given substitution.
    ///
    /// The key `x` of the input becomes the key `self(x)`
    /// and its image `t` becomes `self(t)`.
    /// Returns the input if this renaming is empty.
    ///
    /// Returns an error if two keys of the input are renamed to the same variable,
    /// as in `{x/y}` applied to `{x/a, y/b}`.
    pub fn apply_renaming<'a>(
        &self,
        substitution: &'a Substitution,
    ) -> Result<Cow<'a, Substitution>, ModelError> {
        if self.is_empty() {
            return Ok(Cow::Borrowed(substitution));
        }

        let mut keys = HashMap::<Variable, &Variable>::with_capacity(substitution.len());
        let mut bindings = Vec::with_capacity(substitution.len());

        for (variable, term) in substitution {
            let renamed = self.apply_to_variable(variable);

            if let Some(other) = keys.insert(renamed.clone(), variable) {
                let (first, second) = if other < variable {
                    (other, variable)
                } else {
                    (variable, other)
                };

                return Err(ModelError::IllegalSubstitution {
                    first: first.clone(),
                    second: second.clone(),
                    target: renamed,
                });
            }

            bindings.push((renamed, self.apply_term(term).into_owned()));
        }

        Ok(Cow::Owned(Substitution::new(bindings)))
    }

    /// Return this renaming as an ordinary [Substitution].
    pub fn as_substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Return the inverse renaming.
    pub fn inverse(&self) -> Self {
        Self::new_unchecked(
            self.map
                .iter()
                .map(|(source, target)| (target.clone(), source.clone()))
                .collect(),
        )
    }

    /// Return an iterator over all renamed variables and their new names.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Variable)> {
        self.map.iter()
    }
}

impl Display for InjectiveVar2VarSubstitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.substitution, f)
    }
}
