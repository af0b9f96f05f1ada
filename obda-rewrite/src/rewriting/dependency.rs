//! This module defines [PredicateDependencyGraph].

use std::collections::{hash_map::Entry, HashMap, HashSet};

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};

use crate::rule_model::components::{predicate::Predicate, rule::Rule};

/// Graph with an edge from the head predicate of each rule
/// to each predicate used in its body
///
/// Built-in predicates are not part of the graph.
#[derive(Debug, Default, Clone)]
pub struct PredicateDependencyGraph {
    graph: DiGraph<Predicate, ()>,
    label_map: HashMap<Predicate, NodeIndex>,
}

impl PredicateDependencyGraph {
    /// Build the dependency graph of the given rules.
    pub fn from_rules<'a, Rules>(rules: Rules) -> Self
    where
        Rules: IntoIterator<Item = &'a Rule>,
    {
        let mut result = Self::default();
        for rule in rules {
            result.add_rule(rule);
        }

        result
    }

    /// Add the dependencies of a single rule.
    pub fn add_rule(&mut self, rule: &Rule) {
        let Some(head) = rule.head() else {
            return;
        };

        let head_node = self.add_node(head.predicate());

        for atom in rule.body_atoms().filter(|atom| !atom.is_builtin()) {
            let body_node = self.add_node(atom.predicate());

            if !self.graph.contains_edge(head_node, body_node) {
                self.graph.add_edge(head_node, body_node, ());
            }
        }
    }

    fn add_node(&mut self, predicate: &Predicate) -> NodeIndex {
        match self.label_map.entry(predicate.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let new_index = self.graph.add_node(entry.key().clone());
                entry.insert(new_index);

                new_index
            }
        }
    }

    /// Return all predicates that can be reached from the given ones,
    /// including the given ones that occur in the graph.
    pub fn reachable_from(&self, predicates: &[Predicate]) -> HashSet<Predicate> {
        let mut result = HashSet::new();

        for start in predicates {
            let Some(&start) = self.label_map.get(start) else {
                continue;
            };

            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(node) = dfs.next(&self.graph) {
                result.insert(self.graph[node].clone());
            }
        }

        result
    }

    /// Return the recursive components reachable from the given predicates.
    ///
    /// A component is either a strongly connected set of several predicates
    /// or a single predicate depending on itself.
    /// Predicates within a component are sorted.
    pub fn cycles_reachable_from(&self, predicates: &[Predicate]) -> Vec<Vec<Predicate>> {
        let reachable = self.reachable_from(predicates);

        let mut result = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [node] => self.graph.contains_edge(*node, *node),
                _ => true,
            })
            .filter(|component| {
                component
                    .iter()
                    .any(|node| reachable.contains(&self.graph[*node]))
            })
            .map(|component| {
                let mut predicates = component
                    .into_iter()
                    .map(|node| self.graph[node].clone())
                    .collect::<Vec<_>>();
                predicates.sort();
                predicates
            })
            .collect::<Vec<_>>();

        result.sort();
        result
    }

    /// Return whether the given predicate depends on itself.
    pub fn is_recursive(&self, predicate: &Predicate) -> bool {
        self.cycles_reachable_from(std::slice::from_ref(predicate))
            .iter()
            .any(|component| component.contains(predicate))
    }
}
