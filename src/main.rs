//! Graph Attention Network CLI
//!
//! Command-line interface for running GAT models on edge-index graphs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graph_attention::prelude::*;

#[derive(Parser)]
#[command(name = "gat")]
#[command(about = "Graph Attention Networks over edge-index graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration to a TOML file
    InitConfig {
        /// Output config path
        #[arg(short, long, default_value = "gat.toml")]
        output: PathBuf,
    },

    /// Run a model over a graph read from JSON
    Run {
        /// Model config (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Input graph: {"features": [[..]], "edge_index": [[..], [..]]}
        #[arg(short, long)]
        input: PathBuf,

        /// Add a self-loop to every node before running
        #[arg(long)]
        self_loops: bool,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a single layer on a 4-node directed cycle
    Demo {
        /// Initialisation seed
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

/// Graph file accepted by `run`
#[derive(Debug, Deserialize)]
struct GraphInput {
    features: Vec<Vec<f64>>,
    edge_index: [Vec<usize>; 2],
}

/// Result file written by `run`
#[derive(Debug, Serialize)]
struct RunOutput {
    output: Vec<Vec<f64>>,
    attention_weights: Vec<Option<Vec<Vec<f64>>>>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig { output } => {
            Config::default()
                .to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("Wrote default config to {}", output.display());
        }

        Commands::Run {
            config,
            input,
            self_loops,
            output,
        } => {
            let config = Config::from_file(&config)
                .with_context(|| format!("loading config {}", config.display()))?;
            let graph: GraphInput = serde_json::from_str(
                &std::fs::read_to_string(&input)
                    .with_context(|| format!("reading {}", input.display()))?,
            )?;

            let features = rows_to_array(&graph.features)?;
            let [sources, targets] = graph.edge_index;
            let mut edges = EdgeIndex::from_vecs(sources, targets)?;
            edges.check_bounds(features.nrows())?;
            if self_loops {
                edges = edges.with_self_loops(features.nrows());
            }
            info!(
                "Graph: {} nodes, {} features, {} edges",
                features.nrows(),
                features.ncols(),
                edges.num_edges()
            );

            let model = GatModel::new(config.model)?;
            let mut ctx = config.run.context();
            info!(mode = ?ctx.mode(), "Running model");
            let result = model.forward_with_attention(&features, &edges, &mut ctx)?;

            let run_output = RunOutput {
                output: array_to_rows(&result.output),
                attention_weights: result
                    .attention_weights
                    .iter()
                    .map(|w| w.as_ref().map(array_to_rows))
                    .collect(),
            };
            let json = serde_json::to_string_pretty(&run_output)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("Results saved to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Demo { seed } => run_demo(seed)?,
    }

    Ok(())
}

fn run_demo(seed: u64) -> Result<()> {
    info!("Running edge-index attention on a directed 4-cycle...");

    let edges = EdgeIndexBuilder::cycle(4);
    let layer = EdgeIndexLayer::new(
        LayerConfig::new(2, 3, 1)
            .log_attention_weights(true)
            .seed(Some(seed)),
    )?;

    let features = Array2::from_shape_vec((4, 2), vec![1.0, 0.0, 0.0, 1.0, -1.0, 0.5, 0.25, -0.75])?;
    let out = layer.forward(&features, &edges, &mut ForwardContext::inference())?;

    println!("\nEdges (source -> target):");
    for (src, tgt) in edges.iter() {
        println!("  {} -> {}", src, tgt);
    }

    println!("\nOutput node features:");
    for (i, row) in out.output.outer_iter().enumerate() {
        println!("  node {}: {:.4}", i, row);
    }

    if let Some(weights) = out.attention_weights {
        println!("\nAttention weights per edge:");
        for ((src, tgt), w) in edges.iter().zip(weights.column(0).iter()) {
            println!("  {} -> {}: {:.4}", src, tgt, w);
        }
    }

    println!("\nParameters: {}", layer.num_parameters());
    Ok(())
}

fn rows_to_array(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n = rows.len();
    let f = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != f) {
        anyhow::bail!("feature rows have differing lengths");
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((n, f), flat)?)
}

fn array_to_rows(array: &Array2<f64>) -> Vec<Vec<f64>> {
    array.outer_iter().map(|row| row.to_vec()).collect()
}
