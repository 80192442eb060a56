use composer_core::errors::{ComposeError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// YAML-configurable knobs of the search loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Probability of feeding one output into a second pending slot of the same type.
    #[serde(default = "default_branch_probability")]
    pub branch_probability: f64,
    /// Depth-dependent softmax temperature.
    #[serde(default)]
    pub temperature: TemperatureSchedule,
    /// Rule merging output and input resemblance near the depth limit.
    #[serde(default)]
    pub combination: ResemblanceCombination,
    /// Give zero probability to primitives that cannot close any frontier slot.
    #[serde(default = "default_mask_unproductive")]
    pub mask_unproductive: bool,
    /// Outer iteration guard; tripping it triggers the constant fallback.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Consecutive degenerate steps before a warning is logged.
    #[serde(default = "default_degenerate_warn_after")]
    pub degenerate_warn_after: usize,
}

fn default_branch_probability() -> f64 {
    0.2
}

fn default_mask_unproductive() -> bool {
    true
}

fn default_max_steps() -> usize {
    10_000
}

fn default_degenerate_warn_after() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            branch_probability: default_branch_probability(),
            temperature: TemperatureSchedule::default(),
            combination: ResemblanceCombination::default(),
            mask_unproductive: default_mask_unproductive(),
            max_steps: default_max_steps(),
            degenerate_warn_after: default_degenerate_warn_after(),
        }
    }
}

impl SearchConfig {
    /// Parses a configuration document and validates it.
    pub fn from_yaml_str(source: &str) -> Result<Self, ComposeError> {
        let config: SearchConfig = serde_yaml::from_str(source)
            .map_err(|err| ComposeError::Serde(ErrorInfo::new("config-parse-yaml", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ComposeError> {
        serde_yaml::to_string(self)
            .map_err(|err| ComposeError::Serde(ErrorInfo::new("config-write-yaml", err.to_string())))
    }

    /// Rejects values outside their documented ranges.
    pub fn validate(&self) -> Result<(), ComposeError> {
        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                "branch-probability-out-of-range",
                "branch_probability must lie in [0, 1]",
            )
            .with_context("branch_probability", self.branch_probability.to_string())));
        }
        if self.max_steps == 0 {
            return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                "zero-max-steps",
                "max_steps must be positive",
            )));
        }
        self.temperature.validate()?;
        self.combination.validate()
    }
}

/// Softmax temperature as a function of search depth.
///
/// The distribution is sharpest when the first primitive is chosen and while
/// the search is closing in on the depth limit; it is flattest in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSchedule {
    /// Temperature used at depth 0.
    #[serde(default = "default_opening")]
    pub opening: f64,
    /// Temperature used at intermediate depths.
    #[serde(default = "default_exploring")]
    pub exploring: f64,
    /// Temperature used inside the closing window.
    #[serde(default = "default_closing")]
    pub closing: f64,
    /// Depths before `max_depth` that count as closing.
    #[serde(default = "default_closing_window")]
    pub closing_window: u32,
}

fn default_opening() -> f64 {
    0.35
}

fn default_exploring() -> f64 {
    0.7
}

fn default_closing() -> f64 {
    0.35
}

fn default_closing_window() -> u32 {
    2
}

impl Default for TemperatureSchedule {
    fn default() -> Self {
        Self {
            opening: default_opening(),
            exploring: default_exploring(),
            closing: default_closing(),
            closing_window: default_closing_window(),
        }
    }
}

impl TemperatureSchedule {
    /// Returns whether `depth` lies inside the closing window.
    pub fn is_closing(&self, depth: u32, max_depth: u32) -> bool {
        depth.saturating_add(self.closing_window) >= max_depth
    }

    /// Temperature for the given depth.
    pub fn at(&self, depth: u32, max_depth: u32) -> f64 {
        match (depth == 0, self.is_closing(depth, max_depth)) {
            (true, true) => self.opening.min(self.closing),
            (true, false) => self.opening,
            (false, true) => self.closing,
            (false, false) => self.exploring,
        }
    }

    fn validate(&self) -> Result<(), ComposeError> {
        for (name, value) in [
            ("opening", self.opening),
            ("exploring", self.exploring),
            ("closing", self.closing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ComposeError::InvalidSpecification(
                    ErrorInfo::new(
                        "non-positive-temperature",
                        "temperatures must be finite and positive",
                    )
                    .with_context("field", name)
                    .with_context("value", value.to_string()),
                ));
            }
        }
        if self.opening > self.exploring || self.closing > self.exploring {
            return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                "temperature-schedule-shape",
                "opening and closing temperatures must not exceed the exploring temperature",
            )
            .with_context("opening", self.opening.to_string())
            .with_context("exploring", self.exploring.to_string())
            .with_context("closing", self.closing.to_string())));
        }
        Ok(())
    }
}

/// How output and input resemblance merge inside the closing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ResemblanceCombination {
    /// `output_weight * r_out + input_weight * r_in`.
    WeightedSum {
        /// Weight of the frontier (output) resemblance.
        #[serde(default = "default_half")]
        output_weight: f64,
        /// Weight of the goal (input) resemblance.
        #[serde(default = "default_half")]
        input_weight: f64,
    },
    /// `max(r_out, r_in)`.
    Max,
    /// `r_out * r_in`.
    Product,
}

fn default_half() -> f64 {
    0.5
}

impl Default for ResemblanceCombination {
    fn default() -> Self {
        ResemblanceCombination::WeightedSum {
            output_weight: default_half(),
            input_weight: default_half(),
        }
    }
}

impl ResemblanceCombination {
    /// Merges the two resemblance values of one primitive.
    pub fn combine(&self, r_out: f64, r_in: f64) -> f64 {
        match self {
            ResemblanceCombination::WeightedSum {
                output_weight,
                input_weight,
            } => output_weight * r_out + input_weight * r_in,
            ResemblanceCombination::Max => r_out.max(r_in),
            ResemblanceCombination::Product => r_out * r_in,
        }
    }

    fn validate(&self) -> Result<(), ComposeError> {
        if let ResemblanceCombination::WeightedSum {
            output_weight,
            input_weight,
        } = self
        {
            let valid = |w: f64| w.is_finite() && w >= 0.0;
            if !valid(*output_weight) || !valid(*input_weight) || output_weight + input_weight <= 0.0 {
                return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                    "invalid-combination-weights",
                    "weights must be finite, non-negative and not both zero",
                )
                .with_context("output_weight", output_weight.to_string())
                .with_context("input_weight", input_weight.to_string())));
            }
        }
        Ok(())
    }
}
