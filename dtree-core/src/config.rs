use thiserror::Error;

/// Tunable parameters for dataset generation, tree growth and scheduling.
///
/// All times are in seconds. Layout fractions are relative to the
/// viewport size at the moment a node is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// A leaf needs at least this many points to be split.
    pub min_points_to_split: usize,
    /// Leaves at this depth or deeper are never split.
    pub max_depth: u32,
    /// Best gain must reach this value for a split to be applied.
    pub min_gain: f32,
    /// Minimum time between two split attempts.
    pub split_interval: f64,
    /// Fixed period of the scheduler tick.
    pub tick_interval: f64,
    /// Split attempts allowed before the clock is reset.
    pub max_iterations: u32,
    /// Viewport area covered by one generated point.
    pub area_per_point: f32,
    /// Horizontal child offset at depth 0, as a fraction of the width.
    pub base_spread_frac: f32,
    /// Vertical distance between tree levels, as a fraction of the height.
    pub level_spacing_frac: f32,
    /// Vertical position of the root, as a fraction of the height.
    pub root_y_frac: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_points_to_split: 10,
            max_depth: 4,
            min_gain: 0.01,
            split_interval: 2.0,
            tick_interval: 0.1,
            max_iterations: 100,
            area_per_point: 4000.0,
            base_spread_frac: 0.15,
            level_spacing_frac: 0.12,
            root_y_frac: 0.1,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive, finite number of seconds (got {value})")]
    InvalidInterval { name: &'static str, value: f64 },

    #[error("{name} must be at least 1")]
    ZeroLimit { name: &'static str },

    #[error("min_gain must be finite and non-negative (got {0})")]
    InvalidMinGain(f32),

    #[error("area_per_point must be positive and finite (got {0})")]
    InvalidAreaPerPoint(f32),

    #[error("{name} must lie in (0, 1] (got {value})")]
    FractionOutOfRange { name: &'static str, value: f32 },
}

impl Config {
    /// Checks that every parameter is usable by the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("split_interval", self.split_interval),
            ("tick_interval", self.tick_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }

        if self.min_points_to_split == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "min_points_to_split",
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroLimit { name: "max_depth" });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_iterations",
            });
        }

        if !(self.min_gain.is_finite() && self.min_gain >= 0.0) {
            return Err(ConfigError::InvalidMinGain(self.min_gain));
        }
        if !(self.area_per_point.is_finite() && self.area_per_point > 0.0) {
            return Err(ConfigError::InvalidAreaPerPoint(self.area_per_point));
        }

        for (name, value) in [
            ("base_spread_frac", self.base_spread_frac),
            ("level_spacing_frac", self.level_spacing_frac),
            ("root_y_frac", self.root_y_frac),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }

        Ok(())
    }
}
