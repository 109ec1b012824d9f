//! Dependency graph between properties.
//!
//! `DependsOn("X")` on member `M` means "when X changes, M changes too":
//! an edge `X -> M`. `AlsoNotify("Y")` on `M` is the reverse: `M -> Y`.
//! Each property's notified set is the reflexive-transitive closure over
//! these edges, in first-visit depth-first order.

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::diagnostics::Diagnostic;
use super::naming::NamedMember;
use super::policy::Outcome;
use crate::base::Location;
use crate::model::{AnnotatedKind, TypeDescriptor, TypeId};

// ============================================================================
// GRAPH TYPES
// ============================================================================

/// Where a property named in the graph comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeOrigin {
    /// Emitted by the generator for this type.
    Generated,
    /// Declared in source on this type or an ancestor.
    Existing { declaring_type: TypeId, explicit: bool },
    /// Not declared anywhere visible. Notifications for it are still raised
    /// from the raise method.
    External,
}

impl NodeOrigin {
    pub fn is_generated(&self) -> bool {
        matches!(self, NodeOrigin::Generated)
    }
}

/// Which annotation produced an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    DependsOn,
    AlsoNotify,
}

/// "When `source` changes, also notify `target`."
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source: SmolStr,
    pub target: SmolStr,
    pub kind: EdgeKind,
    /// The annotation declaring the edge.
    pub annotation: Location,
}

/// The dependency graph of one type.
///
/// Cycles are reported per strongly connected component: cycles sharing a
/// property (`A <-> B` and `B <-> C`) form one component and get one
/// diagnostic. Every edge inside a component is left out of closures.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<SmolStr, NodeOrigin>,
    /// Edges in declaration order, without duplicates or self-loops.
    edges: Vec<DependencyEdge>,
    /// Successors of each node, in canonical order.
    successors: FxHashMap<SmolStr, Vec<SmolStr>>,
    /// Edges inside a dependency cycle. Ignored by closures.
    cycle_edges: FxHashSet<(SmolStr, SmolStr)>,
}

impl DependencyGraph {
    /// Build the graph for `ty` from its named annotated members.
    ///
    /// `chain` is the type's ancestors, root first.
    pub fn build(
        ty: &TypeDescriptor,
        chain: &[&TypeDescriptor],
        members: &[NamedMember<'_>],
    ) -> (DependencyGraph, Vec<Diagnostic>) {
        let mut builder = Builder::new(ty, chain, members);
        builder.collect_edges();
        builder.finish()
    }

    pub fn origin(&self, name: &str) -> Option<&NodeOrigin> {
        self.nodes.get(name)
    }

    /// Nodes in the order they were first seen.
    pub fn nodes(&self) -> impl Iterator<Item = (&SmolStr, &NodeOrigin)> + '_ {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Successors of `name`, canonical order, cycle edges included.
    pub fn successors(&self, name: &str) -> &[SmolStr] {
        self.successors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_cycle_edge(&self, source: &str, target: &str) -> bool {
        self.cycle_edges
            .contains(&(SmolStr::new(source), SmolStr::new(target)))
    }

    /// Reflexive-transitive notified set of `source`, first-visit order.
    pub fn closure(&self, source: &str) -> Vec<SmolStr> {
        let mut seen: IndexSet<SmolStr> = IndexSet::new();
        let mut stack = vec![SmolStr::new(source)];

        while let Some(node) = stack.pop() {
            if !seen.insert(node.clone()) {
                continue;
            }
            for next in self.successors(&node).iter().rev() {
                if !seen.contains(next) && !self.is_cycle_edge(&node, next) {
                    stack.push(next.clone());
                }
            }
        }

        seen.into_iter().collect()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct Builder<'a, 'm> {
    ty: &'a TypeDescriptor,
    chain: &'a [&'a TypeDescriptor],
    members: &'a [NamedMember<'m>],
    /// Declaration index of the member standing for each property.
    member_index: FxHashMap<SmolStr, usize>,
    graph: DependencyGraph,
    seen_edges: FxHashSet<(SmolStr, SmolStr)>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, 'm> Builder<'a, 'm> {
    fn new(
        ty: &'a TypeDescriptor,
        chain: &'a [&'a TypeDescriptor],
        members: &'a [NamedMember<'m>],
    ) -> Self {
        let mut member_index = FxHashMap::default();
        for named in members {
            member_index.entry(named.property.clone()).or_insert(named.index);
        }
        Self {
            ty,
            chain,
            members,
            member_index,
            graph: DependencyGraph::default(),
            seen_edges: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    fn collect_edges(&mut self) {
        for named in self.members {
            self.add_node(&named.property);
        }

        for named in self.members {
            let member = named.member;

            for annotation in &member.depends_on {
                let mut names = annotation.usable_names().peekable();
                if names.peek().is_some()
                    && member.kind == AnnotatedKind::Field
                    && !member.has_notify()
                {
                    self.diagnostics.push(
                        Outcome::DependsOnWithoutNotify {
                            annotation: annotation.location,
                        }
                        .diagnostic(),
                    );
                }
                for name in names {
                    self.add_edge(name, &named.property, EdgeKind::DependsOn, annotation.location);
                }
            }

            for annotation in &member.also_notify {
                for name in annotation.usable_names() {
                    self.add_edge(&named.property, name, EdgeKind::AlsoNotify, annotation.location);
                }
            }
        }
    }

    fn add_node(&mut self, name: &SmolStr) {
        if self.graph.nodes.contains_key(name) {
            return;
        }
        let origin = self.resolve_origin(name);
        tracing::trace!(%name, ?origin, "dependency node");
        self.graph.nodes.insert(name.clone(), origin);
    }

    fn resolve_origin(&self, name: &str) -> NodeOrigin {
        if let Some(named) = self.members.iter().find(|m| m.property == name) {
            if named.generated {
                return NodeOrigin::Generated;
            }
            if named.member.kind == AnnotatedKind::Property {
                return NodeOrigin::Existing {
                    declaring_type: self.ty.id.clone(),
                    explicit: named.member.explicit_interface.is_some(),
                };
            }
        }

        let declared = std::iter::once(self.ty).chain(self.chain.iter().rev().copied());
        for owner in declared {
            if let Some(property) = owner.declared_properties(name).first() {
                return NodeOrigin::Existing {
                    declaring_type: owner.id.clone(),
                    explicit: property.is_explicit(),
                };
            }
        }

        NodeOrigin::External
    }

    fn add_edge(
        &mut self,
        source: &SmolStr,
        target: &SmolStr,
        kind: EdgeKind,
        annotation: Location,
    ) {
        if source == target {
            self.diagnostics
                .push(Outcome::DependsOnSelf { annotation }.diagnostic());
            return;
        }
        if !self.seen_edges.insert((source.clone(), target.clone())) {
            return;
        }

        self.add_node(source);
        self.add_node(target);
        self.graph.edges.push(DependencyEdge {
            source: source.clone(),
            target: target.clone(),
            kind,
            annotation,
        });
    }

    fn finish(mut self) -> (DependencyGraph, Vec<Diagnostic>) {
        // Canonical successor order: by the target's member declaration,
        // then by name. Annotation order never shows in a closure.
        let mut successors: FxHashMap<SmolStr, Vec<SmolStr>> = FxHashMap::default();
        for edge in &self.graph.edges {
            successors
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
        }
        for targets in successors.values_mut() {
            targets.sort_by(|a, b| {
                let ia = self.member_index.get(a).copied().unwrap_or(usize::MAX);
                let ib = self.member_index.get(b).copied().unwrap_or(usize::MAX);
                ia.cmp(&ib).then_with(|| a.cmp(b))
            });
        }
        self.graph.successors = successors;

        self.detect_cycles();
        (self.graph, self.diagnostics)
    }

    /// Report each cycle once and exclude its edges from closures.
    fn detect_cycles(&mut self) {
        let mut graph: DiGraph<SmolStr, ()> = DiGraph::new();
        let mut index: FxHashMap<&SmolStr, NodeIndex> = FxHashMap::default();
        for name in self.graph.nodes.keys() {
            index.insert(name, graph.add_node(name.clone()));
        }
        for edge in &self.graph.edges {
            if let (Some(&from), Some(&to)) = (index.get(&edge.source), index.get(&edge.target)) {
                graph.add_edge(from, to, ());
            }
        }

        let mut cycle_edges = FxHashSet::default();
        for component in tarjan_scc(&graph) {
            if component.len() < 2 {
                continue;
            }
            let members: FxHashSet<&SmolStr> = component.iter().map(|&n| &graph[n]).collect();
            let inside: Vec<&DependencyEdge> = self
                .graph
                .edges
                .iter()
                .filter(|e| members.contains(&e.source) && members.contains(&e.target))
                .collect();

            if let Some(first) = inside.first() {
                tracing::debug!(size = component.len(), source = %first.source, "dependency cycle");
                self.diagnostics.push(
                    Outcome::DependencyCycle {
                        edge: first.annotation,
                    }
                    .diagnostic(),
                );
            }
            for edge in inside {
                cycle_edges.insert((edge.source.clone(), edge.target.clone()));
            }
        }
        self.graph.cycle_edges = cycle_edges;
    }
}
