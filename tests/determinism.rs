use rand::rngs::StdRng;
use rand::SeedableRng;
use u_mapgen::generator::{DoorConfig, GenerationResult, GeneratorConfig, LayoutGenerator};
use u_mapgen::geometry::GridPolygon;
use u_mapgen::graph::{AdjacencyGraph, BreadthFirstDecomposer};
use u_mapgen::spaces::GridConfigurationSpaces;

fn spaces(doors: DoorConfig) -> GridConfigurationSpaces {
    GridConfigurationSpaces::new(
        vec![
            GridPolygon::rectangle(3, 3).unwrap(),
            GridPolygon::rectangle(5, 3).unwrap(),
            GridPolygon::rectangle(3, 5).unwrap(),
        ],
        doors.minimum_contact(),
    )
    .unwrap()
}

fn assert_identical(a: &GenerationResult, b: &GenerationResult) {
    assert_eq!(a.valid, b.valid);
    assert_eq!(a.iterations, b.iterations);
    assert_eq!(a.accepted_moves, b.accepted_moves);
    assert_eq!(a.energy_history, b.energy_history);
    assert_eq!(a.layout.doors(), b.layout.doors());
    for node in 0..a.layout.vertices_count() {
        assert_eq!(
            a.layout.configuration(node),
            b.layout.configuration(node),
            "node {node} differs"
        );
    }
}

#[test]
fn test_same_seed_same_layout() {
    let doors = DoorConfig::default();
    let config = GeneratorConfig::default()
        .with_doors(doors)
        .with_max_iterations(5_000)
        .with_seed(2024);
    let generator = LayoutGenerator::new(spaces(doors), config).unwrap();
    let graph =
        AdjacencyGraph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (4, 5)]).unwrap();

    let first = generator.generate(&graph).unwrap();
    let second = generator.generate(&graph).unwrap();
    assert_identical(&first, &second);
}

#[test]
fn test_same_rng_seed_same_layout_with_chains() {
    let doors = DoorConfig::default();
    let config = GeneratorConfig::default()
        .with_doors(doors)
        .with_max_iterations(5_000);
    let generator =
        LayoutGenerator::with_decomposer(spaces(doors), BreadthFirstDecomposer::new(3), config)
            .unwrap();
    let graph = AdjacencyGraph::from_edges(
        8,
        &[(0, 1), (1, 2), (2, 3), (1, 4), (4, 5), (5, 6), (6, 7), (7, 4)],
    )
    .unwrap();

    let first = generator
        .generate_with_rng(&graph, &mut StdRng::seed_from_u64(7))
        .unwrap();
    let second = generator
        .generate_with_rng(&graph, &mut StdRng::seed_from_u64(7))
        .unwrap();
    assert_identical(&first, &second);
}
