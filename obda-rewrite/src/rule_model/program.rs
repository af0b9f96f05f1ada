//! This module defines [DatalogProgram].

use std::fmt::Display;

use super::{
    components::{predicate::Predicate, rule::Rule},
    error::ModelError,
};

/// Datalog program
///
/// Ordered sequence of [Rule]s.
/// The order is kept to make rewriting results reproducible;
/// it carries no meaning for evaluation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DatalogProgram {
    /// Rules of the program
    rules: Vec<Rule>,
}

impl DatalogProgram {
    /// Create a new [DatalogProgram].
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Return the rules of this program.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Return the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return whether this program contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Replace the rule at the given position, returning the old one.
    ///
    /// Returns `None` and leaves the program untouched if the index is out of bounds.
    pub fn replace(&mut self, index: usize, rule: Rule) -> Option<Rule> {
        let slot = self.rules.get_mut(index)?;
        Some(std::mem::replace(slot, rule))
    }

    /// Remove the rule at the given position.
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Keep only the rules that satisfy the predicate.
    pub fn retain<F: FnMut(&Rule) -> bool>(&mut self, f: F) {
        self.rules.retain(f);
    }

    /// Return an iterator over the rules whose head uses the given predicate.
    pub fn rules_with_head<'a>(
        &'a self,
        predicate: &'a Predicate,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.head().map(|head| head.predicate()) == Some(predicate))
    }

    /// Return the distinct head predicates in order of their first occurrence.
    pub fn head_predicates(&self) -> Vec<&Predicate> {
        let mut result = Vec::new();

        for predicate in self
            .rules
            .iter()
            .filter_map(|rule| rule.head().map(|head| head.predicate()))
        {
            if !result.contains(&predicate) {
                result.push(predicate);
            }
        }

        result
    }

    /// Validate every rule of the program.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.rules.iter().try_for_each(Rule::validate)
    }
}

impl From<Vec<Rule>> for DatalogProgram {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<Rule> for DatalogProgram {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Rule> for DatalogProgram {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl IntoIterator for DatalogProgram {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a DatalogProgram {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Display for DatalogProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::rule_model::components::{predicate::Predicate, rule::Rule};

    use super::DatalogProgram;

    fn multiple_rules() -> DatalogProgram {
        DatalogProgram::new(vec![
            Rule::builder()
                .head(atom!("p"; ?x))
                .add_body_atom(atom!("q"; ?x, "Person"))
                .finalize(),
            Rule::builder()
                .head(atom!("r"; ?y))
                .add_body_atom(atom!("s"; ?y, "FUB"))
                .finalize(),
            Rule::builder()
                .head(atom!("p"; ?z))
                .add_body_atom(atom!("u"; ?z, (function!("f"; "Occupation", "Student"))))
                .finalize(),
        ])
    }

    #[test]
    fn program_heads() {
        let program = multiple_rules();
        let p = Predicate::new("p", 1);

        assert_eq!(program.rules_with_head(&p).count(), 2);
        assert_eq!(
            program.head_predicates(),
            vec![&Predicate::new("p", 1), &Predicate::new("r", 1)]
        );
        assert_eq!(program.validate(), Ok(()));
    }

    #[test]
    fn program_mutation_keeps_order() {
        let mut program = multiple_rules();
        let replacement = Rule::fact(atom!("t"; "a"));

        let old = program.replace(1, replacement.clone());
        assert_eq!(old.map(|rule| rule.head().cloned()), Some(Some(atom!("r"; ?y))));
        assert_eq!(program.rules()[1], replacement);

        assert!(program.remove(7).is_none());
        let removed = program.remove(0);
        assert!(removed.is_some());
        assert_eq!(program.len(), 2);
        assert_eq!(program.rules()[0], replacement);

        program.retain(|rule| !rule.is_fact());
        assert_eq!(program.len(), 1);
    }
}
