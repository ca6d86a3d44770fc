use std::collections::{BTreeMap, BTreeSet};

use crate::error::{StepreelError, StepreelResult};

/// A weighted edge between two vertex ids. Weight defaults to 1 when deserialized from
/// problem files that omit it (Kosaraju and Kahn ignore weights entirely).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

fn default_weight() -> i64 {
    1
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: i64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }

    pub fn unweighted(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, 1)
    }
}

/// The problem instance for graph runners: a vertex set (string ids) plus an edge list.
///
/// Edge interpretation is per-algorithm: Dijkstra and Prim mirror every edge (undirected),
/// Bellman-Ford/Kosaraju/Kahn follow edge direction. Adjacency lists preserve edge
/// insertion order, which the emission order of the runners relies on.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Graph {
    pub vertices: Vec<String>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(vertices: Vec<String>, edges: Vec<Edge>) -> StepreelResult<Self> {
        let graph = Self { vertices, edges };
        graph.validate()?;
        Ok(graph)
    }

    pub fn validate(&self) -> StepreelResult<()> {
        if self.vertices.is_empty() {
            return Err(StepreelError::validation("graph must have at least one vertex"));
        }

        let mut seen = BTreeSet::new();
        for id in &self.vertices {
            if id.trim().is_empty() {
                return Err(StepreelError::validation("vertex id must be non-empty"));
            }
            if !seen.insert(id.as_str()) {
                return Err(StepreelError::validation(format!(
                    "duplicate vertex id '{id}'"
                )));
            }
        }

        for edge in &self.edges {
            if !seen.contains(edge.from.as_str()) {
                return Err(StepreelError::validation(format!(
                    "edge references unknown vertex '{}'",
                    edge.from
                )));
            }
            if !seen.contains(edge.to.as_str()) {
                return Err(StepreelError::validation(format!(
                    "edge references unknown vertex '{}'",
                    edge.to
                )));
            }
            if edge.from == edge.to {
                return Err(StepreelError::validation(format!(
                    "self-loop on vertex '{}'",
                    edge.from
                )));
            }
        }

        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vertices.iter().any(|v| v == id)
    }

    /// Vertex ids in ascending order (the deterministic scan order for DFS roots and
    /// Kahn's initial queue).
    pub fn sorted_vertices(&self) -> Vec<String> {
        let mut ids = self.vertices.clone();
        ids.sort();
        ids
    }

    /// Out-neighbors per vertex, following edge direction, in edge insertion order.
    pub fn directed_adjacency(&self) -> BTreeMap<String, Vec<(String, i64)>> {
        let mut adj: BTreeMap<String, Vec<(String, i64)>> = self
            .vertices
            .iter()
            .map(|v| (v.clone(), Vec::new()))
            .collect();
        for edge in &self.edges {
            if let Some(list) = adj.get_mut(&edge.from) {
                list.push((edge.to.clone(), edge.weight));
            }
        }
        adj
    }

    /// Neighbors per vertex with every edge mirrored, in edge insertion order.
    pub fn undirected_adjacency(&self) -> BTreeMap<String, Vec<(String, i64)>> {
        let mut adj: BTreeMap<String, Vec<(String, i64)>> = self
            .vertices
            .iter()
            .map(|v| (v.clone(), Vec::new()))
            .collect();
        for edge in &self.edges {
            if let Some(list) = adj.get_mut(&edge.from) {
                list.push((edge.to.clone(), edge.weight));
            }
            if let Some(list) = adj.get_mut(&edge.to) {
                list.push((edge.from.clone(), edge.weight));
            }
        }
        adj
    }

    /// Out-neighbors on the transposed graph (every edge reversed).
    pub fn transposed_adjacency(&self) -> BTreeMap<String, Vec<(String, i64)>> {
        let mut adj: BTreeMap<String, Vec<(String, i64)>> = self
            .vertices
            .iter()
            .map(|v| (v.clone(), Vec::new()))
            .collect();
        for edge in &self.edges {
            if let Some(list) = adj.get_mut(&edge.to) {
                list.push((edge.from.clone(), edge.weight));
            }
        }
        adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        Graph::new(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![
                Edge::new("A", "B", 4),
                Edge::new("A", "C", 2),
                Edge::new("B", "D", 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn validate_rejects_empty_vertex_set() {
        let g = Graph {
            vertices: vec![],
            edges: vec![],
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let g = Graph {
            vertices: vec!["A".into(), "A".into()],
            edges: vec![],
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_endpoint() {
        let g = Graph {
            vertices: vec!["A".into()],
            edges: vec![Edge::new("A", "Z", 1)],
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn validate_rejects_self_loop() {
        let g = Graph {
            vertices: vec!["A".into(), "B".into()],
            edges: vec![Edge::new("A", "A", 1)],
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn undirected_adjacency_mirrors_edges() {
        let g = diamond();
        let adj = g.undirected_adjacency();
        assert_eq!(adj["A"], vec![("B".to_string(), 4), ("C".to_string(), 2)]);
        assert_eq!(adj["B"], vec![("A".to_string(), 4), ("D".to_string(), 1)]);
        assert_eq!(adj["D"], vec![("B".to_string(), 1)]);
    }

    #[test]
    fn directed_adjacency_follows_direction() {
        let g = diamond();
        let adj = g.directed_adjacency();
        assert_eq!(adj["A"].len(), 2);
        assert!(adj["D"].is_empty());
    }

    #[test]
    fn transposed_adjacency_reverses_edges() {
        let g = diamond();
        let adj = g.transposed_adjacency();
        assert!(adj["A"].is_empty());
        assert_eq!(adj["D"], vec![("B".to_string(), 1)]);
    }

    #[test]
    fn edge_weight_defaults_to_one_in_json() {
        let edge: Edge = serde_json::from_str(r#"{"from":"A","to":"B"}"#).unwrap();
        assert_eq!(edge.weight, 1);
    }
}
