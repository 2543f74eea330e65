//! Generator configuration and cooling schedules.

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / steps`.
    ///
    /// `steps` is `max_iterations / iterations_per_temperature` when a
    /// budget is set, 100 otherwise.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// One iteration per temperature step.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.98 }
    }
}

/// Door catalog parameters.
///
/// Every boundary segment longer than `2 * margin` is shrunk by `margin` at
/// both ends and split into door candidates of `length` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoorConfig {
    pub margin: i32,
    pub length: i32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            margin: 1,
            length: 1,
        }
    }
}

impl DoorConfig {
    pub fn new(margin: i32, length: i32) -> Self {
        Self { margin, length }
    }

    /// Shortest straight contact that can hold a door.
    ///
    /// A stretch this long on one edge of both shapes contains a whole
    /// door candidate of each, so configuration spaces built with it accept
    /// only relations the door pass can serve.
    pub fn minimum_contact(&self) -> i64 {
        self.length as i64 + 2 * self.margin as i64
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.margin < 0 {
            return Err(format!("door margin must be non-negative, got {}", self.margin));
        }
        if self.length <= 0 {
            return Err(format!("door length must be positive, got {}", self.length));
        }
        Ok(())
    }
}

/// Configuration for the layout generator.
///
/// Temperatures are relative: an uphill move of `delta` is accepted with
/// probability `exp(-delta / (avg_delta * T))`, where `avg_delta` is the
/// running mean of accepted energy changes. The defaults accept an average
/// uphill move with probability 0.2 at the start and 0.007 at the end.
///
/// # Examples
///
/// ```
/// use u_mapgen::generator::{CoolingSchedule, GeneratorConfig};
///
/// let config = GeneratorConfig::default()
///     .with_initial_temperature(0.8)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.95 })
///     .with_iterations_per_temperature(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Initial temperature.
    pub initial_temperature: f64,

    /// Annealing of a chain stops when the temperature drops below this.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Perturbations at each temperature level.
    ///
    /// For `LundyMees`, this is ignored (1 iteration per temperature).
    pub iterations_per_temperature: usize,

    /// Maximum perturbations per chain (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Probability that a perturbation replaces the shape instead of
    /// moving the node.
    pub shape_perturb_chance: f64,

    /// Pull a drifting chain back towards the rest of the layout once per
    /// temperature step.
    pub drift_correction: bool,

    /// Door catalog parameters.
    pub doors: DoorConfig,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 0.6,
            min_temperature: 0.2,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 500,
            max_iterations: 0,
            shape_perturb_chance: 0.4,
            drift_correction: true,
            doors: DoorConfig::default(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_shape_perturb_chance(mut self, p: f64) -> Self {
        self.shape_perturb_chance = p;
        self
    }

    pub fn with_drift_correction(mut self, enabled: bool) -> Self {
        self.drift_correction = enabled;
        self
    }

    pub fn with_doors(mut self, doors: DoorConfig) -> Self {
        self.doors = doors;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.shape_perturb_chance) {
            return Err(format!(
                "shape_perturb_chance must be in [0, 1], got {}",
                self.shape_perturb_chance
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Linear => {}
        }
        self.doors.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert!((config.initial_temperature - 0.6).abs() < 1e-12);
        assert!((config.shape_perturb_chance - 0.4).abs() < 1e-12);
        assert_eq!(config.iterations_per_temperature, 500);
        assert_eq!(config.doors, DoorConfig::new(1, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = GeneratorConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = GeneratorConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config =
            GeneratorConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_beta() {
        let config =
            GeneratorConfig::default().with_cooling(CoolingSchedule::LundyMees { beta: -1.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_perturb_chance() {
        let config = GeneratorConfig::default().with_shape_perturb_chance(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_doors() {
        let config = GeneratorConfig::default().with_doors(DoorConfig::new(-1, 1));
        assert!(config.validate().is_err());
        let config = GeneratorConfig::default().with_doors(DoorConfig::new(0, 0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimum_contact() {
        assert_eq!(DoorConfig::new(1, 1).minimum_contact(), 3);
        assert_eq!(DoorConfig::new(0, 1).minimum_contact(), 1);
    }
}
