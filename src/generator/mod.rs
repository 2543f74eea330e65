//! Incremental layout generation.
//!
//! The graph is laid out chain by chain. Each chain is seeded greedily next
//! to the already placed nodes and then annealed: single-node perturbations
//! are scored by the [`EnergyModel`] and accepted by a Metropolis criterion
//! until the layout reaches zero energy with every neighbour relation valid.
//! Once all chains are valid, doors are placed on the shared boundaries.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod annealing;
mod config;
mod doors;
mod energy;
mod layout_generator;

pub use annealing::GenerationResult;
pub use config::{CoolingSchedule, DoorConfig, GeneratorConfig};
pub use doors::{door_candidates, DoorCatalog};
pub use energy::{EnergyMode, EnergyModel, NodeEnergy};
pub use layout_generator::LayoutGenerator;
