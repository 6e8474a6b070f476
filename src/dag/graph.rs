// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::debug;

use crate::targets::TargetDescriptor;
use crate::types::TargetName;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("target '{target}' depends on undefined target '{missing}'")]
    UndefinedDependency {
        target: TargetName,
        missing: TargetName,
    },

    #[error("target '{0}' does not exist in the build script")]
    UndefinedTarget(TargetName),

    #[error("circular dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<TargetName>),

    #[error("no targets specified and the build script has no default target")]
    NoTargetsSpecified,

    #[error("duplicate target name '{0}'")]
    DuplicateTarget(TargetName),

    #[error("target '{target}' has no parameter named '{param}'")]
    UnknownParameter { target: TargetName, param: String },

    #[error("target '{target}' requires a value for parameter '{param}'")]
    MissingArgument { target: TargetName, param: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Validated dependency graph over target descriptors.
///
/// Node `i` holds descriptor `i`. An edge `A -> B` means A depends on B, so B
/// must run first. Construction guarantees that every dependency resolves,
/// names are unique and the graph is acyclic (self-edges included).
#[derive(Debug)]
pub struct TargetGraph {
    descriptors: Vec<TargetDescriptor>,
    index: HashMap<TargetName, NodeIndex>,
    graph: DiGraph<TargetName, ()>,
}

impl TargetGraph {
    /// Build and validate the graph from the full descriptor set.
    ///
    /// The cycle check covers every descriptor, so a cycle between targets
    /// that no request can reach still fails the build. This is intentional:
    /// a script is either a valid DAG or it is rejected as a whole.
    pub fn build(descriptors: Vec<TargetDescriptor>) -> Result<Self, GraphError> {
        let mut graph: DiGraph<TargetName, ()> = DiGraph::new();
        let mut index = HashMap::new();

        for descriptor in &descriptors {
            let name = descriptor.name().to_string();
            if index.contains_key(&name) {
                return Err(GraphError::DuplicateTarget(name));
            }
            let node = graph.add_node(name.clone());
            index.insert(name, node);
        }

        for descriptor in &descriptors {
            let from = index[descriptor.name()];
            for dep in descriptor.dependencies() {
                let Some(&to) = index.get(dep) else {
                    return Err(GraphError::UndefinedDependency {
                        target: descriptor.name().to_string(),
                        missing: dep.clone(),
                    });
                };
                graph.add_edge(from, to, ());
            }
        }

        let target_graph = Self {
            descriptors,
            index,
            graph,
        };

        // A topological sort fails iff there is a cycle; walk from the
        // reported node to recover the full path for the error.
        if let Err(cycle) = toposort(&target_graph.graph, None) {
            let start = cycle.node_id().index();
            let mut marks = vec![Mark::Unvisited; target_graph.descriptors.len()];
            let mut order = Vec::new();
            return Err(
                match target_graph.visit(start, &mut marks, &mut Vec::new(), &mut order) {
                    Err(err) => err,
                    Ok(()) => GraphError::CyclicDependency(vec![
                        target_graph.descriptors[start].name().to_string(),
                    ]),
                },
            );
        }

        debug!(
            targets = target_graph.descriptors.len(),
            edges = target_graph.graph.edge_count(),
            "built target graph"
        );

        Ok(target_graph)
    }

    /// All descriptors, in the order they were supplied.
    pub fn descriptors(&self) -> &[TargetDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&TargetDescriptor> {
        self.index
            .get(name)
            .map(|node| &self.descriptors[node.index()])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Immediate dependencies of a target, in declaration order.
    pub fn dependencies_of(&self, name: &str) -> &[TargetName] {
        self.get(name)
            .map(TargetDescriptor::dependencies)
            .unwrap_or(&[])
    }

    /// Immediate dependents of a target (targets that depend on it).
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        let Some(&node) = self.index.get(name) else {
            return Vec::new();
        };
        let mut dependents: Vec<&str> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect();
        dependents.sort_unstable();
        dependents.dedup();
        dependents
    }

    /// Linear execution order for the requested targets.
    ///
    /// With no requested names the `default_target` is used; with neither the
    /// request is rejected. Each request is resolved by a post-order
    /// depth-first walk over dependencies in declaration order, so every
    /// dependency precedes its dependents and each target appears once.
    pub fn execution_order<S: AsRef<str>>(
        &self,
        requested: &[S],
        default_target: Option<&str>,
    ) -> Result<Vec<&TargetDescriptor>, GraphError> {
        let roots: Vec<&str> = if requested.is_empty() {
            match default_target {
                Some(name) => vec![name],
                None => return Err(GraphError::NoTargetsSpecified),
            }
        } else {
            requested.iter().map(AsRef::as_ref).collect()
        };

        let mut nodes = Vec::with_capacity(roots.len());
        for root in &roots {
            match self.index.get(*root) {
                Some(node) => nodes.push(node.index()),
                None => return Err(GraphError::UndefinedTarget(root.to_string())),
            }
        }

        let mut marks = vec![Mark::Unvisited; self.descriptors.len()];
        let mut order = Vec::new();
        for node in nodes {
            self.visit(node, &mut marks, &mut Vec::new(), &mut order)?;
        }

        Ok(order.into_iter().map(|i| &self.descriptors[i]).collect())
    }

    fn visit(
        &self,
        node: usize,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<(), GraphError> {
        match marks[node] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = stack.iter().position(|&n| n == node).unwrap_or(0);
                let mut cycle: Vec<TargetName> = stack[start..]
                    .iter()
                    .map(|&n| self.descriptors[n].name().to_string())
                    .collect();
                cycle.push(self.descriptors[node].name().to_string());
                return Err(GraphError::CyclicDependency(cycle));
            }
            Mark::Unvisited => {}
        }

        marks[node] = Mark::Visiting;
        stack.push(node);
        for dep in self.descriptors[node].dependencies() {
            if let Some(dep_node) = self.index.get(dep) {
                self.visit(dep_node.index(), marks, stack, order)?;
            }
        }
        stack.pop();
        marks[node] = Mark::Done;
        order.push(node);
        Ok(())
    }
}
