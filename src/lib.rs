//! Incremental grid layout generation by simulated annealing.
//!
//! Given an adjacency graph and a catalog of orthogonal grid polygons, the
//! crate assigns every node a shape and an integer position such that
//! adjacent nodes touch along a shared boundary, no two shapes overlap, and
//! every edge gets a door on the shared boundary.
//!
//! - **Geometry**: integer vectors, lines, rectangles and orthogonal
//!   polygons with overlap and contact queries.
//! - **Graph**: the adjacency capability and chain decomposers.
//! - **Spaces**: configuration spaces answering where a shape may sit
//!   relative to its neighbours, with a precomputed reference engine.
//! - **Layout**: immutable per-node configurations with cached energy and
//!   neighbour validity, shared between cheap layout clones.
//! - **Generator**: greedy chain seeding, annealing with incremental energy
//!   updates, drift correction and door assignment.
//!
//! # Example
//!
//! ```
//! use u_mapgen::generator::{DoorConfig, GeneratorConfig, LayoutGenerator};
//! use u_mapgen::geometry::GridPolygon;
//! use u_mapgen::graph::AdjacencyGraph;
//! use u_mapgen::spaces::GridConfigurationSpaces;
//!
//! let doors = DoorConfig::new(1, 1);
//! let shapes = vec![
//!     GridPolygon::rectangle(3, 3).unwrap(),
//!     GridPolygon::rectangle(5, 3).unwrap(),
//! ];
//! let spaces = GridConfigurationSpaces::new(shapes, doors.minimum_contact()).unwrap();
//! let generator = LayoutGenerator::new(
//!     spaces,
//!     GeneratorConfig::default().with_doors(doors).with_seed(1),
//! )
//! .unwrap();
//!
//! let graph = AdjacencyGraph::from_edges(4, &[(0, 1), (1, 2), (1, 3)]).unwrap();
//! let result = generator.generate(&graph).unwrap();
//! assert!(result.valid);
//! assert_eq!(result.layout.doors().len(), 3);
//! ```

pub mod error;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod spaces;

pub use error::{LayoutError, LayoutResult};
