//! Synthetic graph generation.
//!
//! Builds the node and edge collections the analysis run operates on.
//! Callers pass the rng so tests can seed generation deterministically.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use pulse_core::{Edge, EdgeKind, Node, NodeId, NodeType, Position};

use crate::catalog::{catalog_size, Region, TypeSpec, CATALOG};

/// Generate `node_count` nodes distributed over the catalog types
/// (proportionally to each type's element share) plus randomized edges
/// following the fixed relation rules.
pub fn generate_graph<R: Rng>(node_count: usize, rng: &mut R) -> (Vec<Node>, Vec<Edge>) {
    let counts = allocate_counts(node_count);

    let mut nodes = Vec::with_capacity(node_count);
    let mut next_id = 0u32;
    for (spec, count) in CATALOG.iter().zip(counts) {
        for i in 0..count {
            let position = grid_position(spec.region, i, count);
            nodes.push(Node::new(
                NodeId(next_id),
                element_name(spec, i),
                spec.node_type,
                position,
            ));
            next_id += 1;
        }
    }

    let edges = generate_edges(&nodes, rng);
    debug!(nodes = nodes.len(), edges = edges.len(), "graph generated");
    (nodes, edges)
}

/// Split a requested total over the catalog types, proportional to each
/// type's element count; leftover slots go to the earliest types.
fn allocate_counts(node_count: usize) -> Vec<usize> {
    let total = catalog_size();
    let mut counts: Vec<usize> = CATALOG
        .iter()
        .map(|spec| node_count * spec.elements.len() / total)
        .collect();
    let mut assigned: usize = counts.iter().sum();
    let mut i = 0;
    let len = counts.len();
    while assigned < node_count {
        counts[i % len] += 1;
        assigned += 1;
        i += 1;
    }
    counts
}

/// Catalog names cycle with a numeric suffix once exhausted.
fn element_name(spec: &TypeSpec, index: usize) -> String {
    let base = spec.elements[index % spec.elements.len()];
    let cycle = index / spec.elements.len();
    if cycle == 0 {
        base.to_string()
    } else {
        format!("{base}#{}", cycle + 1)
    }
}

/// Grid layout inside the type's fixed region.
fn grid_position(region: Region, index: usize, total: usize) -> Position {
    let cols = (total.max(1) as f32).sqrt().ceil() as usize;
    let rows = total.div_ceil(cols);
    let cell_w = region.w / (cols + 1) as f32;
    let cell_h = region.h / (rows + 1) as f32;
    let row = index / cols;
    let col = index % cols;
    Position {
        x: region.x + cell_w * (col + 1) as f32,
        y: region.y + cell_h * (row + 1) as f32,
    }
}

fn generate_edges<R: Rng>(nodes: &[Node], rng: &mut R) -> Vec<Edge> {
    let by_type = |t: NodeType| -> Vec<&Node> { nodes.iter().filter(|n| n.node_type == t).collect() };
    let functions = by_type(NodeType::Function);
    let variables = by_type(NodeType::Variable);
    let classes = by_type(NodeType::Class);
    let typedefs = by_type(NodeType::Typedef);
    let macros = by_type(NodeType::Macro);
    let apis = by_type(NodeType::Api);

    let mut edges = Vec::new();

    // Functions call 1-2 other functions (no self-loops).
    for source in &functions {
        for _ in 0..rng.gen_range(1..=2) {
            if let Some(target) = functions.choose(rng) {
                if target.id != source.id {
                    edges.push(Edge::new(source.id, target.id, EdgeKind::Calls));
                }
            }
        }
    }

    // Functions read 0-2 variables.
    for source in &functions {
        if variables.is_empty() {
            break;
        }
        for _ in 0..rng.gen_range(0..=2) {
            if let Some(target) = variables.choose(rng) {
                edges.push(Edge::new(source.id, target.id, EdgeKind::Reads));
            }
        }
    }

    // Classes contain 1-4 functions.
    for source in &classes {
        if functions.is_empty() {
            break;
        }
        for _ in 0..rng.gen_range(1..=4) {
            if let Some(target) = functions.choose(rng) {
                edges.push(Edge::new(source.id, target.id, EdgeKind::Contains));
            }
        }
    }

    // Classes use 1-2 typedefs.
    for source in &classes {
        if typedefs.is_empty() {
            break;
        }
        for _ in 0..rng.gen_range(1..=2) {
            if let Some(target) = typedefs.choose(rng) {
                edges.push(Edge::new(source.id, target.id, EdgeKind::UsesType));
            }
        }
    }

    // A function expands a macro with p = 0.3 and invokes an API with p = 0.4.
    for source in &functions {
        if rng.gen_bool(0.3) {
            if let Some(target) = macros.choose(rng) {
                edges.push(Edge::new(source.id, target.id, EdgeKind::Expands));
            }
        }
        if rng.gen_bool(0.4) {
            if let Some(target) = apis.choose(rng) {
                edges.push(Edge::new(source.id, target.id, EdgeKind::Invokes));
            }
        }
    }

    edges
}
