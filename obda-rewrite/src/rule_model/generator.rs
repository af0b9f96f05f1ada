//! This module defines [VariableGenerator].

use std::collections::{HashMap, HashSet};

use super::{
    components::{term::variable::Variable, IterableVariables},
    substitution::injective::InjectiveVar2VarSubstitution,
};

/// Generates variables that are distinct from each other
/// and from a set of reserved variables
#[derive(Debug, Clone)]
pub struct VariableGenerator {
    /// Prefix of every generated name
    prefix: String,
    /// Counter used for the next variable
    next: usize,
    /// Variables that must not be generated
    reserved: HashSet<Variable>,
}

impl Default for VariableGenerator {
    fn default() -> Self {
        Self::new("v")
    }
}

impl VariableGenerator {
    /// Create a new [VariableGenerator].
    ///
    /// Generated variables are named `_{prefix}{n}`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 0,
            reserved: HashSet::new(),
        }
    }

    /// Mark the given variables as used.
    pub fn reserve<'a, Variables>(&mut self, variables: Variables)
    where
        Variables: IntoIterator<Item = &'a Variable>,
    {
        self.reserved.extend(variables.into_iter().cloned());
    }

    /// Return a variable that was neither reserved nor generated before.
    pub fn fresh(&mut self) -> Variable {
        loop {
            let variable = Variable::new(&format!("_{}{}", self.prefix, self.next));
            self.next += 1;

            if self.reserved.insert(variable.clone()) {
                return variable;
            }
        }
    }

    /// Return a renaming mapping every variable of the given component
    /// to a fresh variable.
    pub fn renaming_for<Component: IterableVariables>(
        &mut self,
        component: &Component,
    ) -> InjectiveVar2VarSubstitution {
        let mut map = HashMap::new();

        for variable in component.distinct_variables() {
            let fresh = self.fresh();
            map.insert(variable, fresh);
        }

        InjectiveVar2VarSubstitution::new_unchecked(map)
    }

    /// Return the number of variables generated so far.
    pub fn generated(&self) -> usize {
        self.next
    }
}
