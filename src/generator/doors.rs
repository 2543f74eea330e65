//! Door candidates and door assignment.

use super::config::DoorConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{GridPolygon, IntLine};
use crate::graph::Graph;
use crate::layout::{Door, Layout};
use crate::spaces::ConfigurationSpaces;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Door candidates of every distinct catalog shape, in shape-local
/// coordinates.
#[derive(Debug, Clone)]
pub struct DoorCatalog {
    config: DoorConfig,
    doors: HashMap<GridPolygon, Vec<IntLine>>,
}

impl DoorCatalog {
    pub fn new(shapes: &[Arc<GridPolygon>], config: DoorConfig) -> Self {
        let mut doors = HashMap::new();
        for shape in shapes {
            if !doors.contains_key(shape.as_ref()) {
                doors.insert(GridPolygon::clone(shape), door_candidates(shape, config));
            }
        }
        Self { config, doors }
    }

    pub fn config(&self) -> DoorConfig {
        self.config
    }

    /// Candidates of `shape`; empty for shapes outside the catalog.
    pub fn doors(&self, shape: &GridPolygon) -> &[IntLine] {
        self.doors.get(shape).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Picks one door for every graph edge whose endpoints are both placed.
    ///
    /// Candidates of the lower node are matched against the translated
    /// candidates of the higher node in either orientation; one match is
    /// chosen uniformly. An edge without a match whose endpoints `spaces`
    /// considers touching is an inconsistency between the configuration
    /// spaces and the door catalog and fails with
    /// [`LayoutError::DoorMismatch`].
    pub fn assign<G, C, R>(
        &self,
        graph: &G,
        layout: &Layout,
        spaces: &C,
        rng: &mut R,
    ) -> LayoutResult<Vec<Door>>
    where
        G: Graph,
        C: ConfigurationSpaces,
        R: Rng,
    {
        let mut doors = Vec::new();

        for (v1, c1) in layout.placed() {
            for &v2 in graph.neighbours(v1) {
                if v2 <= v1 {
                    continue;
                }
                let Some(c2) = layout.configuration(v2) else {
                    continue;
                };

                let targets: HashSet<IntLine> = self
                    .doors(c2.shape())
                    .iter()
                    .map(|d| d.translated(c2.position()))
                    .collect();
                let found: Vec<IntLine> = self
                    .doors(c1.shape())
                    .iter()
                    .map(|d| d.translated(c1.position()))
                    .filter(|d| targets.contains(d) || targets.contains(&d.switch_orientation()))
                    .collect();

                match found.choose(rng) {
                    Some(&line) => doors.push(Door { from: v1, to: v2, line }),
                    None if spaces.have_valid_position(c1, c2) => {
                        return Err(LayoutError::DoorMismatch { from: v1, to: v2 });
                    }
                    None => warn!(from = v1, to = v2, "adjacent nodes do not touch, no door placed"),
                }
            }
        }

        Ok(doors)
    }
}

/// Door candidates along the boundary of `polygon`.
pub fn door_candidates(polygon: &GridPolygon, config: DoorConfig) -> Vec<IntLine> {
    polygon
        .lines()
        .into_iter()
        .filter(|line| line.length() > 2 * config.margin)
        .flat_map(|line| line.shrink_uniform(config.margin).sub_segments(config.length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntVector2;
    use crate::graph::AdjacencyGraph;
    use crate::layout::Configuration;
    use crate::spaces::GridConfigurationSpaces;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_node_layout(spaces: &GridConfigurationSpaces, second: IntVector2) -> Layout {
        let shape = &spaces.shapes()[0];
        let mut layout = Layout::new(2);
        layout.set_configuration(0, Configuration::new(Arc::clone(shape), IntVector2::ZERO));
        layout.set_configuration(1, Configuration::new(Arc::clone(shape), second));
        layout
    }

    fn is_segment(line: &IntLine, a: IntVector2, b: IntVector2) -> bool {
        *line == IntLine::new(a, b) || *line == IntLine::new(b, a)
    }

    #[test]
    fn test_candidates_respect_margin() {
        let square = GridPolygon::rectangle(3, 3).unwrap();
        let doors = door_candidates(&square, DoorConfig::new(1, 1));
        // one middle unit per side
        assert_eq!(doors.len(), 4);
        assert!(doors.iter().all(|d| d.length() == 1));

        let unit = GridPolygon::rectangle(1, 1).unwrap();
        assert!(door_candidates(&unit, DoorConfig::new(1, 1)).is_empty());
        assert_eq!(door_candidates(&unit, DoorConfig::new(0, 1)).len(), 4);

        let wide = GridPolygon::rectangle(5, 1).unwrap();
        // two long sides of 5 shrink to 3 and hold 2 doors of length 2 each
        assert_eq!(door_candidates(&wide, DoorConfig::new(1, 2)).len(), 4);
    }

    #[test]
    fn test_unit_squares_share_their_common_side() {
        let spaces =
            GridConfigurationSpaces::new(vec![GridPolygon::rectangle(1, 1).unwrap()], 1).unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), DoorConfig::new(0, 1));
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let layout = two_node_layout(&spaces, IntVector2::new(1, 0));
        let mut rng = StdRng::seed_from_u64(1);

        let doors = catalog.assign(&graph, &layout, &spaces, &mut rng).unwrap();
        assert_eq!(doors.len(), 1);
        assert_eq!((doors[0].from, doors[0].to), (0, 1));
        assert!(is_segment(
            &doors[0].line,
            IntVector2::new(1, 0),
            IntVector2::new(1, 1)
        ));
    }

    #[test]
    fn test_margin_keeps_door_off_corners() {
        let spaces =
            GridConfigurationSpaces::new(vec![GridPolygon::rectangle(3, 3).unwrap()], 3).unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), DoorConfig::new(1, 1));
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let layout = two_node_layout(&spaces, IntVector2::new(0, 3));
        let mut rng = StdRng::seed_from_u64(1);

        let doors = catalog.assign(&graph, &layout, &spaces, &mut rng).unwrap();
        assert_eq!(doors.len(), 1);
        assert!(is_segment(
            &doors[0].line,
            IntVector2::new(1, 3),
            IntVector2::new(2, 3)
        ));
    }

    #[test]
    fn test_touching_without_candidates_is_an_error() {
        // the spaces accept unit contacts but a margin of 1 leaves unit squares without doors
        let spaces =
            GridConfigurationSpaces::new(vec![GridPolygon::rectangle(1, 1).unwrap()], 1).unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), DoorConfig::new(1, 1));
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let layout = two_node_layout(&spaces, IntVector2::new(0, 1));
        let mut rng = StdRng::seed_from_u64(1);

        let result = catalog.assign(&graph, &layout, &spaces, &mut rng);
        assert_eq!(result, Err(LayoutError::DoorMismatch { from: 0, to: 1 }));
    }

    fn l_shape() -> GridPolygon {
        GridPolygon::new(vec![
            IntVector2::new(0, 0),
            IntVector2::new(0, 4),
            IntVector2::new(2, 4),
            IntVector2::new(2, 2),
            IntVector2::new(4, 2),
            IntVector2::new(4, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_room_in_a_notch_is_not_a_mismatch() {
        let doors = DoorConfig::default();
        let spaces = GridConfigurationSpaces::new(
            vec![l_shape(), GridPolygon::rectangle(3, 3).unwrap()],
            doors.minimum_contact(),
        )
        .unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), doors);
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let mut layout = Layout::new(2);
        layout.set_configuration(
            0,
            Configuration::new(Arc::clone(&spaces.shapes()[0]), IntVector2::ZERO),
        );
        // touches both notch sides for 2 units each, with no door candidate on either
        layout.set_configuration(
            1,
            Configuration::new(Arc::clone(&spaces.shapes()[1]), IntVector2::new(2, 2)),
        );
        let mut rng = StdRng::seed_from_u64(1);

        let doors = catalog.assign(&graph, &layout, &spaces, &mut rng).unwrap();
        assert!(doors.is_empty());
    }

    #[test]
    fn test_every_accepted_relation_holds_a_door() {
        let doors = DoorConfig::default();
        let spaces = GridConfigurationSpaces::new(
            vec![
                l_shape(),
                GridPolygon::rectangle(3, 3).unwrap(),
                GridPolygon::rectangle(4, 2).unwrap(),
            ],
            doors.minimum_contact(),
        )
        .unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), doors);
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let mut relations = 0;
        for a in spaces.shapes() {
            for b in spaces.shapes() {
                for &offset in spaces.space(a, b) {
                    let mut layout = Layout::new(2);
                    layout.set_configuration(0, Configuration::new(Arc::clone(a), offset));
                    layout.set_configuration(1, Configuration::new(Arc::clone(b), IntVector2::ZERO));
                    let assigned = catalog.assign(&graph, &layout, &spaces, &mut rng).unwrap();
                    assert_eq!(assigned.len(), 1, "no door at offset {offset} of {a:?} to {b:?}");
                    relations += 1;
                }
            }
        }
        assert!(relations > 0);
    }

    #[test]
    fn test_non_touching_edge_gets_no_door() {
        let spaces =
            GridConfigurationSpaces::new(vec![GridPolygon::rectangle(1, 1).unwrap()], 1).unwrap();
        let catalog = DoorCatalog::new(spaces.shapes(), DoorConfig::new(0, 1));
        let graph = AdjacencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let layout = two_node_layout(&spaces, IntVector2::new(4, 4));
        let mut rng = StdRng::seed_from_u64(1);

        let doors = catalog.assign(&graph, &layout, &spaces, &mut rng).unwrap();
        assert!(doors.is_empty());
    }
}
