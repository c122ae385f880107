//! Immutable configuration for path smoothing, steering and the agent body.
//!
//! Every value is plain data: callers build a [`NavConfig`], validate it
//! once, and pass it into the smoothing and steering calls. Nothing here is
//! mutated behind the caller's back, so one configuration can be shared by
//! many agents or swapped atomically between destinations.
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_AGENT_RADIUS, DEFAULT_AGENT_SPEED, DEFAULT_OVERSMOOTHING_THRESHOLD,
    DEFAULT_SAMPLES_PER_CURVE, DEFAULT_STEERING_DAMPING, DEFAULT_TANGENT_LENGTH,
    DEFAULT_TURN_RATE, MAX_STEERING_DAMPING, SURFACE_SNAP_FACTOR,
};
use crate::surface::AreaMask;

/// Reasons a configuration value is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value fell outside its accepted range.
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable description of the accepted range.
        expected: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Curves need at least their two endpoints sampled.
    #[error("samples_per_curve must be at least 2, got {0}")]
    TooFewSamples(usize),
}

fn check(
    field: &'static str,
    expected: &'static str,
    value: f32,
    accept: impl FnOnce(f32) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && accept(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected,
            value,
        })
    }
}

/// Tunables for curve construction and path filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Length of the tangent handles placed at every corner.
    pub tangent_length: f32,
    /// Number of points sampled along each curve.
    pub samples_per_curve: usize,
    /// Samples whose direction dotted with the curve chord is at or below
    /// this value are discarded as overshoot. Range `[-1, 1]`.
    pub oversmoothing_threshold: f32,
    /// Minimum separation between consecutive waypoints, usually the
    /// agent radius.
    pub merge_distance: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            tangent_length: DEFAULT_TANGENT_LENGTH,
            samples_per_curve: DEFAULT_SAMPLES_PER_CURVE,
            oversmoothing_threshold: DEFAULT_OVERSMOOTHING_THRESHOLD,
            merge_distance: DEFAULT_AGENT_RADIUS,
        }
    }
}

impl SmoothingConfig {
    /// Radius used when re-snapping filtered waypoints onto the surface.
    #[must_use]
    pub fn snap_radius(&self) -> f32 {
        self.merge_distance * SURFACE_SNAP_FACTOR
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "smoothing.tangent_length",
            "finite and non-negative",
            self.tangent_length,
            |v| v >= 0.0,
        )?;
        if self.samples_per_curve < 2 {
            return Err(ConfigError::TooFewSamples(self.samples_per_curve));
        }
        check(
            "smoothing.oversmoothing_threshold",
            "within [-1, 1]",
            self.oversmoothing_threshold,
            |v| (-1.0..=1.0).contains(&v),
        )?;
        check(
            "smoothing.merge_distance",
            "finite and non-negative",
            self.merge_distance,
            |v| v >= 0.0,
        )
    }
}

/// Tunables for the damped heading blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// How slowly the heading catches up with the target direction.
    /// Range `[0, 1)`; zero snaps almost immediately.
    pub damping: f32,
    /// Growth rate of the blend factor per second since the last waypoint.
    pub turn_rate: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_STEERING_DAMPING,
            turn_rate: DEFAULT_TURN_RATE,
        }
    }
}

impl SteeringConfig {
    /// Blend factor for a given time since the last waypoint change.
    #[must_use]
    pub fn blend_factor(&self, elapsed: f32) -> f32 {
        crate::vector_math::clamp01(elapsed * self.turn_rate * (1.0 - self.damping))
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "steering.damping",
            "within [0, 0.99]",
            self.damping,
            |v| (0.0..=MAX_STEERING_DAMPING).contains(&v),
        )?;
        check(
            "steering.turn_rate",
            "finite and non-negative",
            self.turn_rate,
            |v| v >= 0.0,
        )
    }
}

/// Physical description of the steered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    /// Arrival tolerance around each waypoint.
    pub radius: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Height of the agent pivot above the surface.
    pub base_offset: f32,
    /// World up axis.
    pub up: Vec3,
    /// Areas the agent may walk on.
    pub area_mask: AreaMask,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            radius: DEFAULT_AGENT_RADIUS,
            speed: DEFAULT_AGENT_SPEED,
            base_offset: 0.0,
            up: Vec3::Y,
            area_mask: AreaMask::ALL,
        }
    }
}

impl AgentProfile {
    /// Offset from a surface point to the agent's pivot.
    #[must_use]
    pub fn pivot_offset(&self) -> Vec3 {
        self.up * self.base_offset
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("agent.radius", "finite and positive", self.radius, |v| {
            v > 0.0
        })?;
        check("agent.speed", "finite and non-negative", self.speed, |v| {
            v >= 0.0
        })?;
        check("agent.base_offset", "finite", self.base_offset, |_| true)?;
        check("agent.up", "a non-zero vector", self.up.length(), |v| {
            v > 0.0
        })
    }
}

/// Complete per-agent navigation configuration.
///
/// # Examples
/// ```
/// use smooth_nav::config::NavConfig;
///
/// let config: NavConfig = serde_json::from_str(r#"{ "steering": { "damping": 0.5 } }"#)
///     .expect("valid json");
/// assert!(config.validate().is_ok());
/// assert!((config.steering.damping - 0.5).abs() < f32::EPSILON);
/// assert_eq!(config.smoothing.samples_per_curve, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Curve construction and filtering.
    pub smoothing: SmoothingConfig,
    /// Heading blend.
    pub steering: SteeringConfig,
    /// Agent body.
    pub agent: AgentProfile,
}

impl NavConfig {
    /// Builds a configuration whose merge distance matches the agent radius.
    #[must_use]
    pub fn for_agent(agent: AgentProfile) -> Self {
        Self {
            smoothing: SmoothingConfig {
                merge_distance: agent.radius,
                ..SmoothingConfig::default()
            },
            steering: SteeringConfig::default(),
            agent,
        }
    }

    /// Validates all three sections.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smoothing.validate()?;
        self.steering.validate()?;
        self.agent.validate()
    }
}
