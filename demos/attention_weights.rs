//! Inspect attention weights
//!
//! Runs a multi-head layer over a random graph and prints, for each target
//! node, how its attention is distributed across incoming edges.
//!
//! Run with: cargo run --example attention_weights

use anyhow::Result;
use graph_attention::prelude::*;
use graph_attention::ops::scatter_add;
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() -> Result<()> {
    println!("=== Attention Weights Demo ===\n");

    let n_nodes = 6;
    let n_features = 5;
    let num_heads = 2;

    let edges = EdgeIndexBuilder::random(n_nodes, Some(11)).with_self_loops(n_nodes);
    println!("Graph: {} nodes, {} edges", n_nodes, edges.num_edges());
    println!("In-degrees: {:?}", edges.in_degrees(n_nodes));

    let layer = EdgeIndexLayer::new(
        LayerConfig::new(n_features, 4, num_heads)
            .log_attention_weights(true)
            .seed(Some(3)),
    )?;
    println!("Layer parameters: {}", layer.num_parameters());

    let features = Array2::random((n_nodes, n_features), Uniform::new(-1.0, 1.0));
    let out = layer.forward(&features, &edges, &mut ForwardContext::inference())?;
    let attention = out
        .attention_weights
        .ok_or_else(|| anyhow::anyhow!("layer did not return attention weights"))?;

    for target in 0..n_nodes {
        println!("\nNode {} attends to:", target);
        for (e, (src, tgt)) in edges.iter().enumerate() {
            if tgt != target {
                continue;
            }
            let per_head: Vec<String> = attention.row(e).iter().map(|w| format!("{:.3}", w)).collect();
            println!("   {} -> {}: [{}]", src, tgt, per_head.join(", "));
        }
    }

    // Every target's incoming weights sum to one per head
    let sums = scatter_add(&attention, edges.targets(), n_nodes);
    println!("\nPer-target sums (should be 1.0):");
    for (i, row) in sums.outer_iter().enumerate() {
        println!("   node {}: {:.6}", i, row);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
