//! Graph Attention Network on small graphs
//!
//! Builds a GAT model and runs it over a directed cycle and a random graph
//! with self-loops, in inference and training mode.
//!
//! Run with: cargo run --example cycle_graph

use anyhow::Result;
use graph_attention::prelude::*;
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() -> Result<()> {
    println!("=== Graph Attention Network Demo ===\n");

    // Configuration
    let n_nodes = 8;
    let config = ModelConfig {
        num_of_layers: 3,
        num_heads_per_layer: vec![1, 1, 1],
        num_features_per_layer: vec![6, 16, 4],
        dropout: 0.6,
        seed: Some(42),
        ..ModelConfig::default()
    };

    println!("Configuration:");
    println!("  Nodes: {}", n_nodes);
    println!("  Features per layer: {:?}", config.num_features_per_layer);
    println!("  Heads per layer: {:?}", config.num_heads_per_layer);

    // Create model
    println!("\n1. Creating Graph Attention Network...");
    let model = GatModel::new(config)?;
    println!("   Layers built: {}", model.num_layers());
    println!("   Parameters: {}", model.num_parameters());

    // Create sample features
    println!("\n2. Generating sample features...");
    let features = Array2::random((n_nodes, model.input_dim()), Uniform::new(-1.0, 1.0));
    println!("   Feature matrix shape: {:?}", features.dim());

    // Directed cycle
    println!("\n3. Running on a directed cycle...");
    let cycle = EdgeIndexBuilder::cycle(n_nodes);
    let output = model.forward(&features, &cycle, &mut ForwardContext::inference())?;
    print_predictions(&output);

    // Random graph with self-loops
    println!("\n4. Running on a random graph with self-loops...");
    let graph = EdgeIndexBuilder::random(n_nodes, Some(7)).with_self_loops(n_nodes);
    println!("   Graph: {} nodes, {} edges", n_nodes, graph.num_edges());
    let output = model.forward(&features, &graph, &mut ForwardContext::inference())?;
    print_predictions(&output);

    // Training mode applies dropout
    println!("\n5. Same graph in training mode (dropout active)...");
    let output = model.forward(&features, &graph, &mut ForwardContext::training(1))?;
    print_predictions(&output);

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_predictions(output: &Array2<f64>) {
    for (i, row) in output.outer_iter().enumerate() {
        let (class, prob) = row
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (c, &p)| if p > best.1 { (c, p) } else { best });
        println!("   node {}: class {} (p = {:.3})", i, class, prob);
    }
}
