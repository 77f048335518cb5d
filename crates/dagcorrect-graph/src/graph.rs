//! Alignment graph construction, node merging and consensus.
//!
//! The graph starts as a linear backbone holding one node per template base between an enter
//! and an exit node. Each added [`Alignment`] walks the backbone: matching bases add weight to
//! backbone nodes, inserted or substituted bases become new nodes, and deletions create edges
//! that skip backbone nodes. Every alignment also adds one to the coverage of each template
//! position it spans.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by [`NodeId`]. Merged nodes are
//! flagged as removed rather than deleted so that ids stay stable.
//!
//! # Consensus
//!
//! Each node scores `2 * weight - coverage`, so a node supported by more than half of the
//! alignments spanning its position scores positive. The best-scoring path from enter to exit is
//! split into maximal runs of nodes whose weight reaches the requested minimum; runs at least
//! `min_len` bases long are reported with the template range they cover.

use std::collections::{BTreeMap, VecDeque};

use log::trace;

use crate::alignment::{Alignment, GAP};

/// Index of a node within an [`AlignmentGraph`].
pub type NodeId = usize;

const ENTER_BASE: u8 = b'^';
const EXIT_BASE: u8 = b'$';

/// The role a node plays in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NodeKind {
    /// Enter or exit node.
    Terminal,
    /// A template base.
    Backbone,
    /// A query base replacing the template base at its position.
    Substitution,
    /// A query base inserted before the template base at its position.
    Insertion,
}

impl NodeKind {
    fn is_mergeable(self) -> bool {
        matches!(self, Self::Substitution | Self::Insertion)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    base: u8,
    kind: NodeKind,
    /// Number of alignments passing through this node.
    weight: u32,
    /// Template position the node is anchored to.
    position: usize,
    removed: bool,
    in_edges: Vec<NodeId>,
    out_edges: Vec<NodeId>,
}

impl Node {
    fn new(base: u8, kind: NodeKind, position: usize) -> Self {
        Self {
            base,
            kind,
            weight: 0,
            position,
            removed: false,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }
}

/// A corrected subsequence and the half-open template range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusResult {
    /// Template range `[start, end)` covered by the consensus.
    pub range: (usize, usize),
    /// Consensus bases.
    pub sequence: Vec<u8>,
}

/// A directed acyclic graph of alignments overlaid on a template backbone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentGraph {
    nodes: Vec<Node>,
    backbone: Vec<NodeId>,
    coverage: Vec<u32>,
    enter: NodeId,
    exit: NodeId,
}

impl AlignmentGraph {
    /// Creates a graph whose backbone spells `template`.
    #[must_use]
    pub fn new(template: &[u8]) -> Self {
        let len = template.len();
        let mut graph = Self {
            nodes: Vec::with_capacity(len + 2),
            backbone: Vec::with_capacity(len),
            coverage: vec![0; len],
            enter: 0,
            exit: 0,
        };

        graph.enter = graph.push_node(ENTER_BASE, NodeKind::Terminal, 0);
        let mut prev = graph.enter;
        for (position, &base) in template.iter().enumerate() {
            let id = graph.push_node(base, NodeKind::Backbone, position);
            graph.backbone.push(id);
            graph.add_edge(prev, id);
            prev = id;
        }
        let exit = graph.push_node(EXIT_BASE, NodeKind::Terminal, len);
        graph.exit = exit;
        graph.add_edge(prev, exit);
        graph
    }

    /// Length of the template backbone.
    #[must_use]
    pub fn template_len(&self) -> usize {
        self.backbone.len()
    }

    /// Number of nodes that have not been merged away, enter and exit included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.removed).count()
    }

    /// Number of added alignments spanning each template position.
    #[must_use]
    pub fn coverage(&self) -> &[u32] {
        &self.coverage
    }

    /// Overlays a normalized alignment onto the graph.
    ///
    /// Columns past the end of the template are ignored, and alignments starting beyond the
    /// template are not added.
    pub fn add_alignment(&mut self, aln: &Alignment) {
        let len = self.template_len();
        if aln.template_start >= len {
            trace!("Ignoring alignment {} starting past the template end", aln.id);
            return;
        }

        let mut position = aln.template_start;
        let mut prev = if position == 0 { self.enter } else { self.backbone[position - 1] };

        for (&q, &t) in aln.query_aligned.iter().zip(&aln.template_aligned) {
            if t == GAP {
                if q != GAP {
                    let node = self.push_node(q, NodeKind::Insertion, position);
                    self.nodes[node].weight += 1;
                    self.add_edge(prev, node);
                    prev = node;
                }
                continue;
            }
            if position >= len {
                break;
            }
            if q != GAP {
                let backbone = self.backbone[position];
                let node = if self.nodes[backbone].base.eq_ignore_ascii_case(&q) {
                    backbone
                } else {
                    self.push_node(q, NodeKind::Substitution, position)
                };
                self.nodes[node].weight += 1;
                self.add_edge(prev, node);
                prev = node;
            }
            position += 1;
        }

        let next = if position >= len { self.exit } else { self.backbone[position] };
        self.add_edge(prev, next);
        for depth in &mut self.coverage[aln.template_start..position] {
            *depth += 1;
        }
    }

    /// Collapses equivalent non-backbone nodes, summing their weights.
    ///
    /// Two nodes are equivalent when they share kind, base and template position, and either
    /// both have the same single predecessor or both have the same single successor. Merging is
    /// repeated until no equivalent pair remains, so calling this again is a no-op.
    pub fn merge_nodes(&mut self) {
        loop {
            let mut merged = false;
            for id in self.topological_order() {
                if self.nodes[id].removed {
                    continue;
                }
                merged |= self.merge_out_nodes(id);
                merged |= self.merge_in_nodes(id);
            }
            if !merged {
                break;
            }
        }
    }

    /// Calls consensus over the best path through the graph.
    ///
    /// Returns every maximal run of path nodes with weight at least `min_weight` whose sequence
    /// is at least `min_len` bases long, in template order.
    #[must_use]
    pub fn consensus(&self, min_weight: u32, min_len: usize) -> Vec<ConsensusResult> {
        let mut results = Vec::new();
        let mut window: Option<Window> = None;

        for id in self.best_path() {
            let node = &self.nodes[id];
            if node.weight >= min_weight {
                window.get_or_insert_with(|| Window::new(node.position)).push(node);
            } else if let Some(done) = window.take() {
                results.extend(done.finish(min_len));
            }
        }
        if let Some(done) = window.take() {
            results.extend(done.finish(min_len));
        }

        results
    }

    fn push_node(&mut self, base: u8, kind: NodeKind, position: usize) -> NodeId {
        self.nodes.push(Node::new(base.to_ascii_uppercase(), kind, position));
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        if !self.nodes[from].out_edges.contains(&to) {
            self.nodes[from].out_edges.push(to);
            self.nodes[to].in_edges.push(from);
        }
    }

    fn remove_edge(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from].out_edges.retain(|&n| n != to);
        self.nodes[to].in_edges.retain(|&n| n != from);
    }

    /// Merges successors of `id` whose only predecessor is `id`.
    fn merge_out_nodes(&mut self, id: NodeId) -> bool {
        let mut groups: BTreeMap<(NodeKind, u8, usize), Vec<NodeId>> = BTreeMap::new();
        for &child in &self.nodes[id].out_edges {
            let node = &self.nodes[child];
            if node.kind.is_mergeable() && node.in_edges.len() == 1 {
                groups.entry((node.kind, node.base, node.position)).or_default().push(child);
            }
        }

        let mut merged = false;
        for mut group in groups.into_values().filter(|g| g.len() > 1) {
            group.sort_unstable();
            let keep = group[0];
            for &other in &group[1..] {
                self.nodes[keep].weight += self.nodes[other].weight;
                for succ in std::mem::take(&mut self.nodes[other].out_edges) {
                    self.nodes[succ].in_edges.retain(|&n| n != other);
                    self.add_edge(keep, succ);
                }
                self.remove_edge(id, other);
                self.nodes[other].removed = true;
            }
            merged = true;
        }
        merged
    }

    /// Merges predecessors of `id` whose only successor is `id`.
    fn merge_in_nodes(&mut self, id: NodeId) -> bool {
        let mut groups: BTreeMap<(NodeKind, u8, usize), Vec<NodeId>> = BTreeMap::new();
        for &parent in &self.nodes[id].in_edges {
            let node = &self.nodes[parent];
            if node.kind.is_mergeable() && node.out_edges.len() == 1 {
                groups.entry((node.kind, node.base, node.position)).or_default().push(parent);
            }
        }

        let mut merged = false;
        for mut group in groups.into_values().filter(|g| g.len() > 1) {
            group.sort_unstable();
            let keep = group[0];
            for &other in &group[1..] {
                self.nodes[keep].weight += self.nodes[other].weight;
                for pred in std::mem::take(&mut self.nodes[other].in_edges) {
                    self.nodes[pred].out_edges.retain(|&n| n != other);
                    self.add_edge(pred, keep);
                }
                self.remove_edge(other, id);
                self.nodes[other].removed = true;
            }
            merged = true;
        }
        merged
    }

    /// Kahn's algorithm over the live nodes.
    fn topological_order(&self) -> Vec<NodeId> {
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|n| n.in_edges.len()).collect();
        let mut ready: VecDeque<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.removed && n.in_edges.is_empty())
            .map(|(id, _)| id)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_front() {
            order.push(id);
            for &next in &self.nodes[id].out_edges {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }
        order
    }

    /// Coverage of the template position a node is anchored to.
    fn node_coverage(&self, node: &Node) -> u32 {
        let Some(last) = self.coverage.len().checked_sub(1) else {
            return 0;
        };
        let position = match node.kind {
            NodeKind::Insertion => node.position.saturating_sub(1),
            _ => node.position,
        };
        self.coverage[position.min(last)]
    }

    fn score(&self, id: NodeId) -> i64 {
        let node = &self.nodes[id];
        if node.kind == NodeKind::Terminal {
            return 0;
        }
        2 * i64::from(node.weight) - i64::from(self.node_coverage(node))
    }

    /// Highest scoring path from enter to exit, terminals excluded.
    ///
    /// Ties are broken towards the lower node id, which favours the backbone.
    fn best_path(&self) -> Vec<NodeId> {
        let mut best: Vec<Option<i64>> = vec![None; self.nodes.len()];
        let mut next: Vec<Option<NodeId>> = vec![None; self.nodes.len()];

        for id in self.topological_order().into_iter().rev() {
            if id == self.exit {
                best[id] = Some(0);
                continue;
            }
            let mut choice: Option<(i64, NodeId)> = None;
            for &succ in &self.nodes[id].out_edges {
                let Some(candidate) = best[succ] else { continue };
                match choice {
                    Some((score, chosen)) if score > candidate || (score == candidate && chosen < succ) => {}
                    _ => choice = Some((candidate, succ)),
                }
            }
            if let Some((score, succ)) = choice {
                best[id] = Some(score + self.score(id));
                next[id] = Some(succ);
            }
        }

        let mut path = Vec::new();
        let mut current = next[self.enter];
        while let Some(id) = current {
            if id == self.exit {
                break;
            }
            path.push(id);
            current = next[id];
        }
        path
    }
}

/// A consensus run being accumulated along the best path.
struct Window {
    start: usize,
    end: usize,
    sequence: Vec<u8>,
}

impl Window {
    fn new(start: usize) -> Self {
        Self { start, end: start, sequence: Vec::new() }
    }

    fn push(&mut self, node: &Node) {
        self.sequence.push(node.base);
        let end = match node.kind {
            NodeKind::Insertion => node.position,
            _ => node.position + 1,
        };
        self.end = self.end.max(end);
    }

    fn finish(self, min_len: usize) -> Option<ConsensusResult> {
        (self.sequence.len() >= min_len)
            .then(|| ConsensusResult { range: (self.start, self.end), sequence: self.sequence })
    }
}
