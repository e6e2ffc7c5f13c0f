//! Integration tests for graph attention layers and models

use approx::assert_abs_diff_eq;
use graph_attention::gat::elu;
use graph_attention::ops::scatter_add;
use graph_attention::prelude::*;
use ndarray::{array, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn random_features(n: usize, f: usize) -> Array2<f64> {
    Array2::random((n, f), Uniform::new(-1.0, 1.0))
}

fn logging_layer(config: LayerConfig) -> EdgeIndexLayer {
    EdgeIndexLayer::new(config.log_attention_weights(true).seed(Some(99))).unwrap()
}

#[test]
fn test_attention_sums_to_one_per_target() {
    let n = 12;
    let edges = EdgeIndexBuilder::random(n, Some(4)).with_self_loops(n);
    let layer = logging_layer(LayerConfig::new(7, 5, 4));

    let out = layer
        .forward(&random_features(n, 7), &edges, &mut ForwardContext::inference())
        .unwrap();
    let attention = out.attention_weights.unwrap();

    assert_eq!(attention.dim(), (edges.num_edges(), 4));
    assert!(attention.iter().all(|&w| (0.0..=1.0).contains(&w)));

    let sums = scatter_add(&attention, edges.targets(), n);
    for v in sums.iter() {
        assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_isolated_node_outputs_bias() {
    // Node 3 has no incoming edges
    let edges = EdgeIndex::from_pairs(&[(0, 1), (1, 2), (2, 0), (3, 0)]);
    let mut layer = EdgeIndexLayer::new(
        LayerConfig::new(4, 3, 2)
            .activation(Activation::Identity)
            .seed(Some(5)),
    )
    .unwrap();
    let bias = array![0.1, -0.2, 0.3, -0.4, 0.5, -0.6];
    if let Some(b) = layer.bias_mut() {
        b.assign(&bias);
    }

    let out = layer
        .forward(&random_features(4, 4), &edges, &mut ForwardContext::inference())
        .unwrap();

    for (got, want) in out.output.row(3).iter().zip(bias.iter()) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
    }
}

#[test]
fn test_projection_matches_matrix_product() {
    let layer = EdgeIndexLayer::new(LayerConfig::new(5, 3, 2).seed(Some(8))).unwrap();
    let x = random_features(4, 5);

    let projected = layer.project(&x).unwrap();
    let flat = x.dot(layer.weight());

    assert_eq!(projected.dim(), (4, 2, 3));
    for node in 0..4 {
        for head in 0..2 {
            for f in 0..3 {
                assert_abs_diff_eq!(projected[[node, head, f]], flat[[node, head * 3 + f]], epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_edge_order_does_not_change_output() {
    let n = 7;
    let edges = EdgeIndexBuilder::random(n, Some(12)).with_self_loops(n);
    let order: Vec<usize> = (0..edges.num_edges()).rev().collect();
    let reordered = edges.permuted(&order);

    let layer = logging_layer(LayerConfig::new(3, 4, 2));
    let x = random_features(n, 3);

    let a = layer.forward(&x, &edges, &mut ForwardContext::inference()).unwrap();
    let b = layer.forward(&x, &reordered, &mut ForwardContext::inference()).unwrap();

    for (u, v) in a.output.iter().zip(b.output.iter()) {
        assert_abs_diff_eq!(*u, *v, epsilon = 1e-12);
    }

    // Weights follow their edges
    let wa = a.attention_weights.unwrap();
    let wb = b.attention_weights.unwrap();
    for (k, &orig) in order.iter().enumerate() {
        for h in 0..2 {
            assert_abs_diff_eq!(wb[[k, h]], wa[[orig, h]], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_self_loops_receive_attention() {
    let n = 3;
    let edges = EdgeIndexBuilder::path(n).with_self_loops(n);
    let layer = logging_layer(LayerConfig::new(2, 2, 1));

    let out = layer
        .forward(&random_features(n, 2), &edges, &mut ForwardContext::inference())
        .unwrap();
    let attention = out.attention_weights.unwrap();

    for (e, (src, tgt)) in edges.iter().enumerate() {
        if src == tgt {
            assert!(attention[[e, 0]] > 0.0);
        }
    }
    // Node 0 only has its self-loop
    let self_edge = edges.iter().position(|e| e == (0, 0)).unwrap();
    assert_abs_diff_eq!(attention[[self_edge, 0]], 1.0, epsilon = 1e-9);
}

#[test]
fn test_directed_cycle_copies_source_projection() {
    let edges = EdgeIndexBuilder::cycle(4);
    let layer = logging_layer(LayerConfig::new(2, 3, 1));
    let x = array![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.5], [0.25, -0.75]];

    let out = layer.forward(&x, &edges, &mut ForwardContext::inference()).unwrap();
    let projected = layer.project(&x).unwrap().index_axis_move(Axis(1), 0);
    let bias = layer.bias().unwrap();

    // One incoming edge per node: full attention on it
    for w in out.attention_weights.unwrap().iter() {
        assert_abs_diff_eq!(*w, 1.0, epsilon = 1e-9);
    }

    for (src, tgt) in edges.iter() {
        for f in 0..3 {
            let expected = elu(projected[[src, f]] + bias[f], 1.0);
            assert_abs_diff_eq!(out.output[[tgt, f]], expected, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_inference_is_deterministic() {
    let n = 6;
    let edges = EdgeIndexBuilder::complete(n);
    let model = GatModel::new(ModelConfig {
        num_of_layers: 3,
        num_heads_per_layer: vec![1, 1, 1],
        num_features_per_layer: vec![4, 6, 3],
        seed: Some(1),
        ..ModelConfig::default()
    })
    .unwrap();
    let x = random_features(n, 4);

    let a = model.forward(&x, &edges, &mut ForwardContext::inference()).unwrap();
    let b = model.forward(&x, &edges, &mut ForwardContext::inference()).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.dim(), (n, 3));
}

#[test]
fn test_model_from_toml_config() {
    let config = Config::from_toml(
        r#"
        [model]
        num_of_layers = 3
        num_heads_per_layer = [1, 1, 1]
        num_features_per_layer = [5, 4, 2]
        dropout = 0.1
        log_attention_weights = true
        seed = 3

        [run]
        training = true
        seed = 9
        "#,
    )
    .unwrap();

    let model = GatModel::new(config.model.clone()).unwrap();
    let n = 5;
    let out = model
        .forward_with_attention(
            &random_features(n, 5),
            &EdgeIndexBuilder::cycle(n).with_self_loops(n),
            &mut config.run.context(),
        )
        .unwrap();

    assert!(config.run.context().is_training());
    assert_eq!(out.output.dim(), (n, 2));
    assert_eq!(out.attention_weights.len(), 2);
    for row in out.output.outer_iter() {
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_mismatched_wiring_reports_layer() {
    let model = GatModel::new(ModelConfig {
        num_of_layers: 3,
        num_heads_per_layer: vec![1, 2, 1],
        num_features_per_layer: vec![5, 4, 2],
        seed: Some(3),
        ..ModelConfig::default()
    })
    .unwrap();

    let err = model
        .forward(&random_features(5, 5), &EdgeIndexBuilder::cycle(5), &mut ForwardContext::inference())
        .unwrap_err();
    assert!(matches!(err, GatError::LayerShapeMismatch { layer: 1, expected: 4, got: 8 }));
}

#[test]
fn test_unsupported_variants_are_config_errors() {
    for kind in [LayerKind::Dense, LayerKind::Reference] {
        let err = GatModel::new(ModelConfig {
            layer_kind: kind,
            num_of_layers: 2,
            num_heads_per_layer: vec![1, 1],
            num_features_per_layer: vec![3, 3],
            ..ModelConfig::default()
        })
        .unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), format!("Layer type {} not yet supported", kind));
    }
}

#[test]
fn test_dense_adjacency_conversion_matches_builder() {
    let edges = EdgeIndexBuilder::cycle(5);
    let dense = edges.to_dense(5);
    let back = EdgeIndex::from_dense(&dense);

    assert_eq!(back.num_edges(), 5);
    for (src, tgt) in edges.iter() {
        assert!(back.has_edge(src, tgt));
    }
}

#[test]
fn test_empty_edge_index_outputs_activated_bias() {
    let n = 4;
    let edges = EdgeIndex::from_pairs(&[]);
    let mut layer = EdgeIndexLayer::new(
        LayerConfig::new(3, 2, 2)
            .log_attention_weights(true)
            .seed(Some(6)),
    )
    .unwrap();
    let bias = array![0.5, -1.0, 0.0, -0.25];
    if let Some(b) = layer.bias_mut() {
        b.assign(&bias);
    }

    let out = layer
        .forward(&random_features(n, 3), &edges, &mut ForwardContext::inference())
        .unwrap();

    assert_eq!(out.attention_weights.map(|w| w.dim()), Some((0, 2)));
    assert_eq!(out.output.dim(), (n, 4));
    for row in out.output.outer_iter() {
        for (got, b) in row.iter().zip(bias.iter()) {
            assert_abs_diff_eq!(*got, elu(*b, 1.0), epsilon = 1e-12);
        }
    }
}
