//! Chain-by-chain annealing loop.

use super::config::{CoolingSchedule, GeneratorConfig};
use super::layout_generator::LayoutGenerator;
use crate::error::{LayoutError, LayoutResult};
use crate::graph::{Graph, GraphDecomposer};
use crate::layout::Layout;
use crate::spaces::ConfigurationSpaces;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The final layout when `valid`, otherwise the lowest-energy layout
    /// seen for the chain that failed.
    pub layout: Layout,

    /// Whether every chain validated and doors were assigned.
    pub valid: bool,

    /// Total number of perturbations over all chains.
    pub iterations: usize,

    /// Number of accepted perturbations (including improvements).
    pub accepted_moves: usize,

    /// Number of perturbations that lowered the energy.
    pub improving_moves: usize,

    /// Number of drift corrections applied.
    pub drift_corrections: usize,

    /// Number of chains that reached a valid state.
    pub chains_completed: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Lowest energy of each annealed chain, sampled at regular intervals.
    pub energy_history: Vec<f64>,
}

/// Outcome of annealing a single chain.
enum ChainOutcome {
    Validated(Layout),
    Exhausted(Layout),
    Cancelled(Layout),
}

#[derive(Default)]
struct Counters {
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
    drift_corrections: usize,
    energy_history: Vec<f64>,
}

impl<C: ConfigurationSpaces, D: GraphDecomposer> LayoutGenerator<C, D> {
    /// Generates a layout using the configured seed, or a random one.
    pub fn generate<G: Graph>(&self, graph: &G) -> LayoutResult<GenerationResult> {
        let mut rng = match self.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        self.generate_with_rng(graph, &mut rng)
    }

    /// Generates a layout drawing every random decision from `rng`.
    pub fn generate_with_rng<G: Graph, R: Rng>(
        &self,
        graph: &G,
        rng: &mut R,
    ) -> LayoutResult<GenerationResult> {
        self.generate_with_cancel(graph, rng, None)
    }

    /// Generates a layout with an optional cancellation token, checked once
    /// per temperature step.
    ///
    /// # Errors
    ///
    /// Fails when the decomposer does not partition the graph, when a placed
    /// node has no neighbours, or when a validated layout has an edge without
    /// a door.
    pub fn generate_with_cancel<G: Graph, R: Rng>(
        &self,
        graph: &G,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> LayoutResult<GenerationResult> {
        let chains = self.decomposer().chains(graph);
        check_partition(&chains, graph.vertices_count())?;

        let mut layout = self.initial_layout(graph);
        let mut counters = Counters::default();
        let mut chains_completed = 0usize;

        for (index, chain) in chains.iter().enumerate() {
            if chain.is_empty() {
                chains_completed += 1;
                continue;
            }

            let seeded = self.add_chain_to_layout(graph, &layout, chain, rng)?;
            debug!(chain = index, nodes = chain.len(), "annealing chain");

            match self.anneal_chain(graph, seeded, chain, rng, cancel.as_deref(), &mut counters)? {
                ChainOutcome::Validated(next) => {
                    info!(
                        chain = index,
                        iterations = counters.iterations,
                        "chain validated"
                    );
                    layout = next;
                    chains_completed += 1;
                }
                ChainOutcome::Exhausted(best) => {
                    warn!(
                        chain = index,
                        energy = best.energy(),
                        "iteration budget exhausted before the chain became valid"
                    );
                    return Ok(counters.finish(best, false, chains_completed, false));
                }
                ChainOutcome::Cancelled(best) => {
                    return Ok(counters.finish(best, false, chains_completed, true));
                }
            }
        }

        self.add_doors(graph, &mut layout, rng)?;
        Ok(counters.finish(layout, true, chains_completed, false))
    }

    fn anneal_chain<G: Graph, R: Rng>(
        &self,
        graph: &G,
        seeded: Layout,
        chain: &[usize],
        rng: &mut R,
        cancel: Option<&AtomicBool>,
        counters: &mut Counters,
    ) -> LayoutResult<ChainOutcome> {
        if self.is_valid(&seeded) {
            return Ok(ChainOutcome::Validated(seeded));
        }

        let config = self.config();
        let mut current = seeded;
        let mut best = current.clone();
        let mut best_energy = best.energy();

        let mut temperature = config.initial_temperature;
        let mut chain_iterations = 0usize;
        let mut average_delta: Option<f64> = None;
        let mut averaged_moves = 0usize;

        let linear_max_steps = compute_linear_steps(config);
        let history_interval = 100.max(config.iterations_per_temperature);
        counters.energy_history.push(best_energy);

        let mut step = 0usize;

        while temperature > config.min_temperature {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Ok(ChainOutcome::Cancelled(best));
            }

            if config.drift_correction {
                if let Some(corrected) = self.too_far(graph, &current, chain, rng)? {
                    current = corrected;
                    counters.drift_corrections += 1;
                    if self.is_valid(&current) {
                        return Ok(ChainOutcome::Validated(current));
                    }
                }
            }

            let inner_iters = match config.cooling {
                CoolingSchedule::LundyMees { .. } => 1,
                _ => config.iterations_per_temperature,
            };

            for _ in 0..inner_iters {
                if config.max_iterations > 0 && chain_iterations >= config.max_iterations {
                    break;
                }

                let (candidate, delta) = self.perturb(graph, &current, chain, rng)?;

                // Uphill moves are measured in units of the mean accepted change.
                let accept = if delta <= 0.0 {
                    if delta < 0.0 {
                        counters.improving_moves += 1;
                    }
                    true
                } else {
                    let scale = *average_delta.get_or_insert(delta);
                    let probability = (-delta / (scale * temperature)).exp();
                    rng.random_range(0.0..1.0) < probability
                };

                chain_iterations += 1;
                counters.iterations += 1;

                if accept {
                    counters.accepted_moves += 1;
                    if delta != 0.0 {
                        averaged_moves += 1;
                        let mean = average_delta.unwrap_or(0.0);
                        average_delta = Some(mean + (delta.abs() - mean) / averaged_moves as f64);
                    }
                    current = candidate;

                    if current.energy() < best_energy {
                        best = current.clone();
                        best_energy = best.energy();
                    }
                    if self.is_valid(&current) {
                        counters.energy_history.push(0.0);
                        return Ok(ChainOutcome::Validated(current));
                    }
                }

                if chain_iterations.is_multiple_of(history_interval) {
                    counters.energy_history.push(best_energy);
                }
            }

            if config.max_iterations > 0 && chain_iterations >= config.max_iterations {
                break;
            }

            temperature = cool(temperature, config, step, linear_max_steps);
            step += 1;
        }

        if counters
            .energy_history
            .last()
            .is_none_or(|&last| (last - best_energy).abs() > 1e-15)
        {
            counters.energy_history.push(best_energy);
        }
        Ok(ChainOutcome::Exhausted(best))
    }
}

impl Counters {
    fn finish(
        self,
        layout: Layout,
        valid: bool,
        chains_completed: usize,
        cancelled: bool,
    ) -> GenerationResult {
        GenerationResult {
            layout,
            valid,
            iterations: self.iterations,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            drift_corrections: self.drift_corrections,
            chains_completed,
            cancelled,
            energy_history: self.energy_history,
        }
    }
}

/// Every node must appear in exactly one chain.
fn check_partition(chains: &[Vec<usize>], vertices_count: usize) -> LayoutResult<()> {
    let mut seen = vec![false; vertices_count];
    for &node in chains.iter().flatten() {
        match seen.get_mut(node) {
            None => {
                return Err(LayoutError::Decomposition(format!(
                    "node {node} is out of range for {vertices_count} nodes"
                )))
            }
            Some(true) => {
                return Err(LayoutError::Decomposition(format!(
                    "node {node} appears in more than one chain"
                )))
            }
            Some(slot) => *slot = true,
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(LayoutError::Decomposition(format!(
            "node {missing} is not in any chain"
        )));
    }
    Ok(())
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &GeneratorConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if step + 1 >= linear_max_steps {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Number of temperature steps for linear cooling.
fn compute_linear_steps(config: &GeneratorConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 {
                config.max_iterations / config.iterations_per_temperature
            } else {
                100
            }
        }
        _ => 0,
    }
}
