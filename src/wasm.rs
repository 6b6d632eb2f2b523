use std::num::NonZero;

use js_sys::{Array, Uint32Array};
use wasm_bindgen::prelude::*;

use crate::backend::VarisatBackend;
use crate::coloring::ColoringProblem;
use crate::graph::Graph;

/// Edges arrive flattened as `[u0, v0, u1, v1, ...]`.
fn graph_from_js(node_count: u32, edges: &[u32], colors: u32) -> Result<(Graph, NonZero<usize>), JsError> {
    let colors = NonZero::new(colors as usize).ok_or_else(|| JsError::new("at least one color is required"))?;
    if edges.len() % 2 != 0 {
        return Err(JsError::new("edge list must hold an even number of node ids"));
    }
    if let Some(bad) = edges.iter().find(|node| **node >= node_count) {
        return Err(JsError::new(&format!("node {bad} is outside 0..{node_count}")));
    }
    if let Some(pair) = edges.chunks_exact(2).find(|pair| pair[0] == pair[1]) {
        return Err(JsError::new(&format!("self-loop on node {}", pair[0])));
    }

    let graph = Graph::from_edges(
        node_count as usize,
        edges.chunks_exact(2).map(|pair| (pair[0] as usize, pair[1] as usize)),
    );
    Ok((graph, colors))
}

/// Whether the graph can be colored with `colors` colors.
#[wasm_bindgen(js_name = isColorable)]
pub fn is_colorable(node_count: u32, edges: &[u32], colors: u32) -> Result<bool, JsError> {
    let (graph, colors) = graph_from_js(node_count, edges, colors)?;
    ColoringProblem::new(&graph, colors)
        .is_colorable(&mut VarisatBackend::new())
        .map_err(|err| JsError::new(&err.to_string()))
}

/// Every coloring of the graph with `colors` colors, each as a `Uint32Array` indexed by node.
#[wasm_bindgen(js_name = allColorings)]
pub fn all_colorings(node_count: u32, edges: &[u32], colors: u32) -> Result<Array, JsError> {
    let (graph, colors) = graph_from_js(node_count, edges, colors)?;
    let colorings = ColoringProblem::new(&graph, colors)
        .all_colorings(&mut VarisatBackend::new())
        .map_err(|err| JsError::new(&err.to_string()))?;

    let out = Array::new();
    for coloring in colorings {
        let colors = coloring.as_slice().iter().map(|color| *color as u32).collect::<Vec<_>>();
        out.push(&Uint32Array::from(colors.as_slice()));
    }
    Ok(out)
}
