//! Display-side shaping of graph query results
//!
//! Coloring is a pure presentation step layered over the Graph Query
//! Service: it takes node ids and returns a color mapping, nothing
//! else. The node-link widget colors each edge after its target node.

use rand::Rng;
use scholarlens_common::models::{CollaborationEdge, GraphNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback for edges whose endpoint is somehow absent from the node set.
const NEUTRAL_EDGE_COLOR: &str = "#999999";

/// A node with its assigned display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoredNode {
    pub id: String,
    pub label: String,
    pub image: Option<String>,
    pub color: String,
}

/// An edge labeled with its weight and colored after its target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoredEdge {
    pub source: String,
    pub target: String,
    pub weight: i64,
    pub label: String,
    pub color: String,
}

/// Node-link elements ready for the collaboration widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkElements {
    pub nodes: Vec<ColoredNode>,
    pub edges: Vec<ColoredEdge>,
}

/// Assign a random `#rrggbb` color to each node id.
pub fn assign_colors<'a>(node_ids: impl IntoIterator<Item = &'a str>) -> HashMap<String, String> {
    let mut rng = rand::thread_rng();
    node_ids
        .into_iter()
        .map(|id| (id.to_string(), format!("#{:06x}", rng.gen_range(0..=0xFFFFFF_u32))))
        .collect()
}

/// Merge deduplicated nodes and collaboration edges into one colored
/// element set.
pub fn build_network(nodes: Vec<GraphNode>, edges: Vec<CollaborationEdge>) -> NetworkElements {
    let colors = assign_colors(nodes.iter().map(|n| n.id.as_str()));

    let colored_nodes = nodes
        .into_iter()
        .map(|node| {
            let color = colors
                .get(&node.id)
                .cloned()
                .unwrap_or_else(|| NEUTRAL_EDGE_COLOR.to_string());
            ColoredNode {
                id: node.id,
                label: node.label,
                image: node.image,
                color,
            }
        })
        .collect();

    let colored_edges = edges
        .into_iter()
        .map(|edge| {
            let color = colors
                .get(&edge.target)
                .cloned()
                .unwrap_or_else(|| NEUTRAL_EDGE_COLOR.to_string());
            ColoredEdge {
                source: edge.source,
                target: edge.target,
                weight: edge.weight,
                label: edge.weight.to_string(),
                color,
            }
        })
        .collect();

    NetworkElements {
        nodes: colored_nodes,
        edges: colored_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> GraphNode {
        GraphNode {
            id: name.to_string(),
            label: name.to_string(),
            image: None,
        }
    }

    #[test]
    fn test_every_node_gets_a_hex_color() {
        let colors = assign_colors(["Ada", "Grace", "Edsger"]);
        assert_eq!(colors.len(), 3);
        for color in colors.values() {
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(u32::from_str_radix(&color[1..], 16).is_ok());
        }
    }

    #[test]
    fn test_edges_colored_after_target_node() {
        let nodes = vec![node("Ada"), node("Grace")];
        let edges = vec![CollaborationEdge {
            source: "Ada".to_string(),
            target: "Grace".to_string(),
            weight: 3,
        }];

        let network = build_network(nodes, edges);

        let grace = network.nodes.iter().find(|n| n.id == "Grace").unwrap();
        assert_eq!(network.edges[0].color, grace.color);
        assert_eq!(network.edges[0].label, "3");
    }

    #[test]
    fn test_unknown_edge_target_falls_back_to_neutral() {
        let network = build_network(
            vec![node("Ada")],
            vec![CollaborationEdge {
                source: "Ada".to_string(),
                target: "Nobody".to_string(),
                weight: 1,
            }],
        );
        assert_eq!(network.edges[0].color, NEUTRAL_EDGE_COLOR);
    }
}
