//! Chain seeding, perturbation and incremental energy bookkeeping.

use super::config::GeneratorConfig;
use super::doors::DoorCatalog;
use super::energy::{EnergyMode, EnergyModel};
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{GridRectangle, IntVector2};
use crate::graph::{Graph, GraphDecomposer, SingleChainDecomposer};
use crate::layout::{Configuration, Layout, ValidityMask};
use crate::spaces::ConfigurationSpaces;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Incremental layout generator.
///
/// Owns the configuration spaces, the chain decomposer and the energy model
/// derived from the shape catalog. Every operation takes the layout it works
/// on and returns a new one; the generator itself is immutable, so one
/// instance can serve any number of runs.
///
/// # Examples
///
/// ```
/// use u_mapgen::generator::{DoorConfig, GeneratorConfig, LayoutGenerator};
/// use u_mapgen::geometry::GridPolygon;
/// use u_mapgen::graph::AdjacencyGraph;
/// use u_mapgen::spaces::GridConfigurationSpaces;
///
/// let doors = DoorConfig::new(0, 1);
/// let spaces = GridConfigurationSpaces::new(
///     vec![GridPolygon::rectangle(1, 1).unwrap()],
///     doors.minimum_contact(),
/// )
/// .unwrap();
/// let config = GeneratorConfig::default().with_doors(doors).with_seed(7);
/// let generator = LayoutGenerator::new(spaces, config).unwrap();
///
/// let graph = AdjacencyGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
/// let result = generator.generate(&graph).unwrap();
/// assert!(result.valid);
/// assert_eq!(result.layout.doors().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutGenerator<C, D = SingleChainDecomposer> {
    spaces: C,
    decomposer: D,
    config: GeneratorConfig,
    energy: EnergyModel,
    doors: DoorCatalog,
}

impl<C: ConfigurationSpaces> LayoutGenerator<C> {
    /// A generator laying out the whole graph as one chain.
    pub fn new(spaces: C, config: GeneratorConfig) -> LayoutResult<Self> {
        Self::with_decomposer(spaces, SingleChainDecomposer, config)
    }
}

impl<C: ConfigurationSpaces, D: GraphDecomposer> LayoutGenerator<C, D> {
    pub fn with_decomposer(spaces: C, decomposer: D, config: GeneratorConfig) -> LayoutResult<Self> {
        config.validate().map_err(LayoutError::Config)?;
        let energy = EnergyModel::new(spaces.shapes())?;
        let doors = DoorCatalog::new(spaces.shapes(), config.doors);

        Ok(Self {
            spaces,
            decomposer,
            config,
            energy,
            doors,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn spaces(&self) -> &C {
        &self.spaces
    }

    pub fn decomposer(&self) -> &D {
        &self.decomposer
    }

    pub fn energy_model(&self) -> &EnergyModel {
        &self.energy
    }

    pub fn door_catalog(&self) -> &DoorCatalog {
        &self.doors
    }

    /// An empty layout with one unplaced slot per graph node.
    pub fn initial_layout<G: Graph>(&self, graph: &G) -> Layout {
        Layout::new(graph.vertices_count())
    }

    /// Places every node of `chain` greedily and brings the bookkeeping of
    /// the whole layout up to date.
    pub fn add_chain_to_layout<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &Layout,
        chain: &[usize],
        rng: &mut R,
    ) -> LayoutResult<Layout> {
        let mut layout = layout.clone();
        for &node in chain {
            self.add_node(graph, &mut layout, node, rng);
        }

        self.recompute_validity_vectors(graph, &mut layout)?;
        self.recompute_energies(graph, &mut layout);

        debug!(
            chain_len = chain.len(),
            placed = layout.placed_count(),
            energy = layout.energy(),
            "chain seeded"
        );
        Ok(layout)
    }

    /// Greedy placement of a single node.
    ///
    /// A node without placed neighbours goes to the origin with a random
    /// shape. Otherwise every catalog shape is tried at every position of the
    /// maximum intersection of its placed neighbours' spaces, in catalog
    /// order and ascending position order; the first candidate with strictly
    /// minimal energy wins. Without any candidate the node is dropped onto
    /// its first placed neighbour with a random shape.
    ///
    /// The new configuration carries no validity mask or energy; callers
    /// recompute both once the chain is placed.
    pub fn add_node<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &mut Layout,
        node: usize,
        rng: &mut R,
    ) {
        let neighbours: Vec<&Configuration> = graph
            .neighbours(node)
            .iter()
            .filter_map(|&n| layout.configuration(n))
            .collect();

        if neighbours.is_empty() {
            let shape = self.spaces.random_shape(rng);
            layout.set_configuration(node, Configuration::new(shape, IntVector2::ZERO));
            return;
        }

        let mut best: Option<(f64, Configuration)> = None;
        for shape in self.spaces.shapes() {
            let candidate = Configuration::new(Arc::clone(shape), IntVector2::ZERO);
            for position in self.spaces.maximum_intersection(&neighbours, &candidate) {
                let candidate = candidate.with_position(position);
                let energy = self
                    .energy
                    .node_energy(graph, layout, node, &candidate, EnergyMode::Full)
                    .energy;
                if best.as_ref().is_none_or(|(e, _)| energy < *e) {
                    best = Some((energy, candidate));
                }
            }
        }

        let configuration = match best {
            Some((_, configuration)) => configuration,
            None => {
                let anchor = neighbours[0].position();
                trace!(node, "no candidate position, stacking onto a neighbour");
                Configuration::new(self.spaces.random_shape(rng), anchor)
            }
        };
        layout.set_configuration(node, configuration);
    }

    /// Perturbs one random node of `chain`.
    ///
    /// Returns the perturbed layout and the change of the aggregate energy.
    ///
    /// # Errors
    ///
    /// Fails if `chain` is empty or contains an unplaced node.
    pub fn perturb<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &Layout,
        chain: &[usize],
        rng: &mut R,
    ) -> LayoutResult<(Layout, f64)> {
        if chain.is_empty() {
            return Err(LayoutError::Decomposition("cannot perturb an empty chain".into()));
        }
        let node = chain[rng.random_range(0..chain.len())];

        let perturbed = if rng.random::<f64>() < self.config.shape_perturb_chance {
            self.perturb_shape(graph, layout, node, rng)?
        } else {
            self.perturb_position(graph, layout, node, rng)?
        };

        let delta = perturbed.energy() - layout.energy();
        Ok((perturbed, delta))
    }

    /// Replaces the shape of `node` by a different catalog shape.
    ///
    /// Falls back to [`perturb_position`](Self::perturb_position) when the
    /// catalog has no shape other than the current one.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::Unplaced`] if `node` is not placed in `layout`.
    pub fn perturb_shape<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &Layout,
        node: usize,
        rng: &mut R,
    ) -> LayoutResult<Layout> {
        let current = layout
            .configuration(node)
            .ok_or(LayoutError::Unplaced { node })?;
        if self.spaces.shapes().iter().all(|s| s == current.shape()) {
            return self.perturb_position(graph, layout, node, rng);
        }

        let shape = loop {
            let shape = self.spaces.random_shape(rng);
            if shape != *current.shape() {
                break shape;
            }
        };

        let configuration = current.with_shape(shape);
        self.update_layout_after_perturbation(graph, layout, node, configuration)
    }

    /// Moves `node` to a random position of the maximum intersection of its
    /// placed neighbours' spaces, keeping the position if there is none.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::Unplaced`] if `node` is not placed in `layout`.
    pub fn perturb_position<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &Layout,
        node: usize,
        rng: &mut R,
    ) -> LayoutResult<Layout> {
        let current = layout
            .configuration(node)
            .ok_or(LayoutError::Unplaced { node })?;
        let neighbours: Vec<&Configuration> = graph
            .neighbours(node)
            .iter()
            .filter_map(|&n| layout.configuration(n))
            .collect();

        let position = self
            .spaces
            .random_intersection(&neighbours, current, rng)
            .unwrap_or(current.position());

        let configuration = current.with_position(position);
        self.update_layout_after_perturbation(graph, layout, node, configuration)
    }

    /// Replaces the configuration of `node` and updates the bookkeeping of
    /// the affected nodes only.
    ///
    /// Placed neighbours are re-validated; those that are or were invalid
    /// get their energy recomputed. Every other placed node has its overlap
    /// adjusted by the difference between the old and the new configuration.
    /// The outcome equals a full [`recompute_validity_vectors`] followed by
    /// [`recompute_energies`] on the modified layout.
    ///
    /// [`recompute_validity_vectors`]: Self::recompute_validity_vectors
    /// [`recompute_energies`]: Self::recompute_energies
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::Unplaced`] if `node` is not placed in `layout`.
    pub fn update_layout_after_perturbation<G: Graph>(
        &self,
        graph: &G,
        layout: &Layout,
        node: usize,
        configuration: Configuration,
    ) -> LayoutResult<Layout> {
        let old = layout
            .configuration(node)
            .ok_or(LayoutError::Unplaced { node })?;

        let mut updated = layout.clone();
        updated.set_configuration(node, configuration.clone());

        let neighbours = graph.neighbours(node);
        // relations left out of the loop below are valid on both sides
        let mut mask = ValidityMask::new(neighbours.len());

        for (i, &neighbour) in neighbours.iter().enumerate() {
            let Some(nc) = layout.configuration(neighbour) else {
                continue;
            };
            let Some(index) = graph.neighbour_index(neighbour, node) else {
                continue;
            };

            let valid = self.spaces.have_valid_position(&configuration, nc);
            let was_invalid = nc.invalid_neighbours().is_invalid(index);

            if was_invalid || !valid {
                let nc = nc.with_validity(nc.invalid_neighbours().with(index, !valid));
                mask.set(i, !valid);

                let energy = self
                    .energy
                    .node_energy(graph, &updated, neighbour, &nc, EnergyMode::Full);
                updated.set_configuration(neighbour, energy.apply(&nc));
            }
        }

        let others: Vec<(usize, Configuration)> = layout
            .placed()
            .filter(|&(i, _)| i != node && !neighbours.contains(&i))
            .map(|(i, other)| (i, self.energy.update_overlap(old, &configuration, other)))
            .collect();
        for (i, other) in others {
            updated.set_configuration(i, other);
        }

        let configuration = configuration.with_validity(mask);
        let energy = self
            .energy
            .node_energy(graph, &updated, node, &configuration, EnergyMode::Full);
        updated.set_configuration(node, energy.apply(&configuration));

        Ok(updated)
    }

    /// Pulls `chain` back towards the rest of the layout when it has drifted
    /// away.
    ///
    /// Compares the bounding box of the chain with the bounding box of every
    /// other placed node. A gap above four average shape sizes always
    /// triggers a correction, a gap above two sizes does so with probability
    /// 0.5. The chain is translated by 90% of the gap along the axis with the
    /// larger gap, and the bookkeeping of the corrected layout is recomputed
    /// from scratch.
    ///
    /// Returns `None` when no correction applies, including when no node
    /// outside the chain is placed yet.
    pub fn too_far<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &Layout,
        chain: &[usize],
        rng: &mut R,
    ) -> LayoutResult<Option<Layout>> {
        let mut inside: Option<GridRectangle> = None;
        let mut outside: Option<GridRectangle> = None;
        for (i, configuration) in layout.placed() {
            let rect = configuration.bounding_rectangle();
            let bounds = if chain.contains(&i) {
                &mut inside
            } else {
                &mut outside
            };
            *bounds = Some(match bounds.take() {
                Some(b) => union(b, rect),
                None => rect,
            });
        }

        let (Some(inside), Some(outside)) = (inside, outside) else {
            return Ok(None);
        };

        let diff_x = gap(inside.a.x, inside.b.x, outside.a.x, outside.b.x);
        let diff_y = gap(inside.a.y, inside.b.y, outside.a.y, outside.b.y);
        let max_diff = diff_x.abs().max(diff_y.abs());
        let average_size = self.energy.average_size();

        let triggered = max_diff > 4 * average_size
            || (max_diff > 2 * average_size && rng.random::<f64>() < 0.5);
        if !triggered {
            return Ok(None);
        }

        let shift = if diff_x.abs() > diff_y.abs() {
            IntVector2::new((0.9 * diff_x as f64) as i32, 0)
        } else {
            IntVector2::new(0, (0.9 * diff_y as f64) as i32)
        };
        trace!(?shift, gap = max_diff, "pulling drifted chain back");

        let mut corrected = layout.clone();
        for &node in chain {
            if let Some(c) = layout.configuration(node) {
                corrected.set_configuration(node, c.with_position(c.position() + shift));
            }
        }

        self.recompute_validity_vectors(graph, &mut corrected)?;
        self.recompute_energies(graph, &mut corrected);
        Ok(Some(corrected))
    }

    /// Rebuilds the validity mask of every placed node.
    ///
    /// Bit `i` is set when the neighbour at position `i` is placed and not in
    /// a valid relation. Unplaced neighbours count as valid.
    ///
    /// # Errors
    ///
    /// [`LayoutError::IsolatedNode`] if a placed node has no neighbours.
    pub fn recompute_validity_vectors<G: Graph>(
        &self,
        graph: &G,
        layout: &mut Layout,
    ) -> LayoutResult<()> {
        let mut masks = Vec::with_capacity(layout.placed_count());

        for (node, configuration) in layout.placed() {
            let neighbours = graph.neighbours(node);
            if neighbours.is_empty() {
                return Err(LayoutError::IsolatedNode { node });
            }

            let mut mask = ValidityMask::new(neighbours.len());
            for (i, &neighbour) in neighbours.iter().enumerate() {
                if let Some(nc) = layout.configuration(neighbour) {
                    if !self.spaces.have_valid_position(configuration, nc) {
                        mask.set(i, true);
                    }
                }
            }
            masks.push((node, configuration.with_validity(mask)));
        }

        for (node, configuration) in masks {
            layout.set_configuration(node, configuration);
        }
        Ok(())
    }

    /// Rebuilds the energy terms of every placed node.
    ///
    /// Uses the validity masks to skip valid neighbours, so the masks must be
    /// current.
    pub fn recompute_energies<G: Graph>(&self, graph: &G, layout: &mut Layout) {
        let current: &Layout = layout;
        let energies: Vec<(usize, Configuration)> = current
            .placed()
            .map(|(node, configuration)| {
                let energy =
                    self.energy
                        .node_energy(graph, current, node, configuration, EnergyMode::Fast);
                (node, energy.apply(configuration))
            })
            .collect();

        for (node, configuration) in energies {
            layout.set_configuration(node, configuration);
        }
    }

    /// A layout is valid when no relation is violated and its energy is
    /// exactly zero.
    pub fn is_valid(&self, layout: &Layout) -> bool {
        layout.are_configurations_valid() && layout.energy() == 0.0
    }

    /// Assigns doors to `layout`.
    pub fn add_doors<G: Graph, R: Rng>(
        &self,
        graph: &G,
        layout: &mut Layout,
        rng: &mut R,
    ) -> LayoutResult<()> {
        let doors = self.doors.assign(graph, layout, &self.spaces, rng)?;
        info!(doors = doors.len(), "doors assigned");
        layout.set_doors(doors);
        Ok(())
    }
}

fn union(a: GridRectangle, b: GridRectangle) -> GridRectangle {
    GridRectangle::new(
        IntVector2::new(a.a.x.min(b.a.x), a.a.y.min(b.a.y)),
        IntVector2::new(a.b.x.max(b.b.x), a.b.y.max(b.b.y)),
    )
}

/// Signed translation closing the gap between `[min1, max1]` and
/// `[min2, max2]`, zero when the intervals overlap.
fn gap(min1: i32, max1: i32, min2: i32, max2: i32) -> i32 {
    let below = min1 - max2;
    let above = min2 - max1;
    if below <= 0 && above <= 0 {
        0
    } else if below > above {
        max2 - min1
    } else {
        min2 - max1
    }
}
