use crate::{Node, NodeId, NodeType, Relation, Result, Triple};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// The recipe knowledge graph.
///
/// A petgraph directed multigraph whose nodes are typed entities and whose
/// edges carry a [`Relation`]. Nodes are deduplicated by [`NodeId`]; edges
/// and triples are appended in insertion order.
///
/// # Example
///
/// ```rust
/// use larder_core::{NodeId, NodeType, RecipeGraph, Relation};
///
/// let mut g = RecipeGraph::new();
/// let dinner = NodeId::new(NodeType::MealType, "dinner");
///
/// g.add_fact(NodeId::recipe(1), Relation::IsForMealType, dinner.clone(), "dinner");
/// g.add_fact(NodeId::recipe(2), Relation::IsForMealType, dinner, "dinner");
///
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.triple_count(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeGraph {
    graph: DiGraph<Node, Relation>,

    /// All triples, in edge insertion order.
    triples: Vec<Triple>,

    #[serde(skip, default)]
    node_index: HashMap<NodeId, NodeIndex>,
}

impl Default for RecipeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            triples: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    /// Create a graph with estimated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            triples: Vec::with_capacity(edges),
            node_index: HashMap::with_capacity(nodes),
        }
    }

    /// Rebuild the node index after deserialization.
    fn rebuild_index(&mut self) {
        self.node_index = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].id.clone(), idx))
            .collect();
    }

    /// Load from a binary file written by [`Self::to_binary_file`].
    pub fn from_binary_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut graph: Self = bincode::deserialize_from(reader)?;
        graph.rebuild_index();
        Ok(graph)
    }

    /// Save the full node/edge structure (bincode).
    pub fn to_binary_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        Ok(())
    }

    /// Ensure a node exists, returning its index.
    ///
    /// The label is only used when the node is created.
    pub fn ensure_node(&mut self, id: NodeId, label: impl Into<String>) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(Node::new(id.clone(), label));
        self.node_index.insert(id, idx);
        idx
    }

    /// Add an edge between two nodes (creating them as needed) and record
    /// its triple.
    pub fn add_fact(
        &mut self,
        head: NodeId,
        relation: Relation,
        tail: NodeId,
        tail_label: impl Into<String>,
    ) {
        let head_label = head.value.clone();
        let h = self.ensure_node(head.clone(), head_label);
        let t = self.ensure_node(tail.clone(), tail_label);
        self.graph.add_edge(h, t, relation);
        self.triples.push(Triple::new(head, relation, tail));
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Outgoing facts of a node, as (relation, target) pairs.
    pub fn facts_from(&self, id: &NodeId) -> Vec<(Relation, &Node)> {
        let Some(&idx) = self.node_index.get(id) else {
            return vec![];
        };
        let mut facts: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), *e.weight(), &self.graph[e.target()]))
            .collect();
        // petgraph walks edges newest first
        facts.sort_by_key(|(edge, _, _)| *edge);
        facts.into_iter().map(|(_, r, n)| (r, n)).collect()
    }

    /// Recipes pointing at a node, in ascending order, without repeats.
    pub fn recipes_with(&self, id: &NodeId) -> Vec<&NodeId> {
        let Some(&idx) = self.node_index.get(id) else {
            return vec![];
        };
        let recipes: BTreeSet<&NodeId> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n].id)
            .filter(|n| n.is_recipe())
            .collect();
        recipes.into_iter().collect()
    }

    /// Distinct values of one node type, sorted.
    pub fn values_of(&self, node_type: NodeType) -> Vec<&str> {
        let values: BTreeSet<&str> = self
            .nodes()
            .filter(|n| n.node_type() == node_type)
            .map(|n| n.id.value.as_str())
            .collect();
        values.into_iter().collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// The underlying petgraph.
    pub fn as_petgraph(&self) -> &DiGraph<Node, Relation> {
        &self.graph
    }
}

/// Statistics about a recipe graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeGraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub recipe_count: usize,
    /// Node count per type, in [`NodeType::ALL`] order.
    pub nodes_by_type: Vec<(NodeType, usize)>,
    /// Edge count per relation, in [`Relation::ALL`] order, zeros omitted.
    pub edges_by_relation: Vec<(Relation, usize)>,
    /// Average attribute edges per recipe.
    pub avg_facts_per_recipe: f64,
}

impl RecipeGraph {
    pub fn stats(&self) -> RecipeGraphStats {
        let mut by_type: HashMap<NodeType, usize> = HashMap::new();
        for node in self.nodes() {
            *by_type.entry(node.node_type()).or_default() += 1;
        }
        let mut by_relation: HashMap<Relation, usize> = HashMap::new();
        for relation in self.graph.edge_weights() {
            *by_relation.entry(*relation).or_default() += 1;
        }

        let recipe_count = by_type.get(&NodeType::Recipe).copied().unwrap_or(0);
        let avg_facts_per_recipe = if recipe_count > 0 {
            self.edge_count() as f64 / recipe_count as f64
        } else {
            0.0
        };

        RecipeGraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            recipe_count,
            nodes_by_type: NodeType::ALL
                .into_iter()
                .map(|t| (t, by_type.get(&t).copied().unwrap_or(0)))
                .collect(),
            edges_by_relation: Relation::ALL
                .into_iter()
                .filter_map(|r| by_relation.get(&r).map(|&n| (r, n)))
                .collect(),
            avg_facts_per_recipe,
        }
    }
}
