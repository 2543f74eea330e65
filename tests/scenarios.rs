use rand::rngs::StdRng;
use rand::SeedableRng;
use u_mapgen::generator::{DoorConfig, GeneratorConfig, LayoutGenerator};
use u_mapgen::geometry::{GridPolygon, IntLine, IntVector2};
use u_mapgen::graph::{AdjacencyGraph, Graph};
use u_mapgen::layout::Layout;
use u_mapgen::spaces::{ConfigurationSpaces, GridConfigurationSpaces};
use u_mapgen::LayoutError;

fn unit_generator(seed: u64) -> LayoutGenerator<GridConfigurationSpaces> {
    let doors = DoorConfig::new(0, 1);
    let spaces =
        GridConfigurationSpaces::new(vec![GridPolygon::rectangle(1, 1).unwrap()], doors.minimum_contact())
            .unwrap();
    let config = GeneratorConfig::default().with_doors(doors).with_seed(seed);
    LayoutGenerator::new(spaces, config).unwrap()
}

fn assert_no_overlaps(layout: &Layout) {
    let placed: Vec<_> = layout.placed().collect();
    for (i, &(a, ca)) in placed.iter().enumerate() {
        for &(b, cb) in &placed[i + 1..] {
            let overlap = u_mapgen::geometry::GridPolygonOverlap.overlap_area(
                ca.shape(),
                ca.position(),
                cb.shape(),
                cb.position(),
            );
            assert_eq!(overlap, 0, "nodes {a} and {b} overlap");
        }
    }
}

fn assert_doors_on_shared_boundary(layout: &Layout) {
    for door in layout.doors() {
        assert_eq!(door.line.length(), 1);
        let a = layout.configuration(door.from).unwrap();
        let b = layout.configuration(door.to).unwrap();
        let on_boundary = |c: &u_mapgen::layout::Configuration| {
            c.shape().lines().iter().any(|l| {
                let l = l.translated(c.position());
                let (lo, hi) = (l.from.min(l.to), l.from.max(l.to));
                let (dlo, dhi) = (door.line.from.min(door.line.to), door.line.from.max(door.line.to));
                l.is_horizontal() == door.line.is_horizontal()
                    && lo <= dlo
                    && dhi <= hi
                    && ((l.is_horizontal() && lo.y == dlo.y) || (!l.is_horizontal() && lo.x == dlo.x))
            })
        };
        assert!(on_boundary(a), "door {door:?} is not on node {}", door.from);
        assert!(on_boundary(b), "door {door:?} is not on node {}", door.to);
    }
}

#[test]
fn test_second_unit_square_touches_on_first_attempt() {
    let generator = unit_generator(1);
    let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let layout = generator
        .add_chain_to_layout(&graph, &generator.initial_layout(&graph), &[0, 1], &mut rng)
        .unwrap();

    let second = layout.configuration(1).unwrap();
    assert_eq!(second.energy(), 0.0);
    assert_eq!(second.overlap_area(), 0);
    assert_eq!(second.move_distance(), 0.0);
    assert!(generator
        .spaces()
        .have_valid_position(second, layout.configuration(0).unwrap()));
}

#[test]
fn test_unit_square_door_lies_on_shared_side() {
    let generator = unit_generator(3);
    let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();

    let result = generator.generate(&graph).unwrap();
    assert!(result.valid);
    assert_eq!(result.iterations, 0);

    // node 1 sits left of node 0, so they share the side x = 0
    let doors = result.layout.doors();
    assert_eq!(doors.len(), 1);
    let expected = IntLine::new(IntVector2::new(0, 0), IntVector2::new(0, 1));
    assert!(doors[0].line == expected || doors[0].line == expected.switch_orientation());
}

#[test]
fn test_path_is_valid_without_annealing() {
    let generator = unit_generator(5);
    let graph = AdjacencyGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();

    let result = generator.generate(&graph).unwrap();
    assert!(result.valid);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.layout.doors().len(), 2);
    assert_no_overlaps(&result.layout);
}

#[test]
fn test_four_cycle_of_unit_squares_converges() {
    let generator = unit_generator(42);
    let graph = AdjacencyGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();

    let result = generator.generate(&graph).unwrap();
    assert!(result.valid);
    assert!(result.iterations > 0);
    assert_eq!(result.layout.energy(), 0.0);
    assert!(result.layout.are_configurations_valid());
    assert_eq!(result.layout.doors().len(), 4);
    assert_no_overlaps(&result.layout);
    assert_doors_on_shared_boundary(&result.layout);

    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        let ca = result.layout.configuration(a).unwrap();
        let cb = result.layout.configuration(b).unwrap();
        assert!(generator.spaces().have_valid_position(ca, cb));
    }
}

#[test]
fn test_rooms_with_margins_get_doors() {
    let doors = DoorConfig::new(1, 1);
    let spaces = GridConfigurationSpaces::new(
        vec![
            GridPolygon::rectangle(3, 3).unwrap(),
            GridPolygon::rectangle(5, 3).unwrap(),
        ],
        doors.minimum_contact(),
    )
    .unwrap();
    let config = GeneratorConfig::default().with_doors(doors).with_seed(9);
    let generator = LayoutGenerator::new(spaces, config).unwrap();
    // rooms of height 3 cannot form triangles with a contact of 3, so a tree
    let graph = AdjacencyGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (1, 4)]).unwrap();

    let result = generator.generate(&graph).unwrap();
    assert!(result.valid);
    assert_eq!(result.layout.doors().len(), graph.edges().len());
    assert_no_overlaps(&result.layout);
    assert_doors_on_shared_boundary(&result.layout);
}

#[test]
fn test_l_shaped_rooms_get_doors() {
    let doors = DoorConfig::default();
    let l_shape = GridPolygon::new(vec![
        IntVector2::new(0, 0),
        IntVector2::new(0, 4),
        IntVector2::new(2, 4),
        IntVector2::new(2, 2),
        IntVector2::new(4, 2),
        IntVector2::new(4, 0),
    ])
    .unwrap();
    let graph = AdjacencyGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();

    for seed in 0..20 {
        let spaces = GridConfigurationSpaces::new(
            vec![l_shape.clone(), GridPolygon::rectangle(3, 3).unwrap()],
            doors.minimum_contact(),
        )
        .unwrap();
        let config = GeneratorConfig::default().with_doors(doors).with_seed(seed);
        let generator = LayoutGenerator::new(spaces, config).unwrap();

        let result = generator.generate(&graph).unwrap();
        assert!(result.valid, "seed {seed}");
        assert_eq!(result.layout.doors().len(), graph.edges().len());
        assert_no_overlaps(&result.layout);
        assert_doors_on_shared_boundary(&result.layout);
    }
}

#[test]
fn test_isolated_node_fails_generation() {
    let generator = unit_generator(1);
    let graph = AdjacencyGraph::from_edges(3, &[(0, 1)]).unwrap();

    assert_eq!(
        generator.generate(&graph).unwrap_err(),
        LayoutError::IsolatedNode { node: 2 }
    );
}

#[test]
fn test_single_node_graph_is_isolated() {
    let generator = unit_generator(1);
    let graph = AdjacencyGraph::new(1);
    assert_eq!(graph.vertices_count(), 1);

    assert_eq!(
        generator.generate(&graph).unwrap_err(),
        LayoutError::IsolatedNode { node: 0 }
    );
}
