//! Per-tick motion along a waypoint path.
//!
//! [`MotionController`] owns the current [`WaypointPath`], a cursor into it
//! and the damped [`SteeringState`]. Each call to
//! [`MotionController::advance`] either consumes the waypoint the agent has
//! reached or blends the heading and facing towards it and moves the body.
//! The blend factor grows with the time spent on the current waypoint, so
//! turns look the same at any frame rate.

mod body;

use glam::Vec3;
use log::debug;

pub use body::{AgentBody, SurfaceMover};

use crate::config::{AgentProfile, SteeringConfig};
use crate::smoothing::WaypointPath;
use crate::vector_math::{look_rotation, safe_normalize};

/// Whether the controller still has waypoints to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// The cursor has reached the end of the path.
    Idle,
    /// A waypoint remains ahead of the agent.
    Seeking,
}

/// Blended heading and the time since the last waypoint change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringState {
    /// Heading the agent currently travels along; not necessarily unit
    /// length while blending.
    pub heading: Vec3,
    /// Seconds since the last waypoint advance or path replacement.
    pub elapsed: f32,
}

/// Cursor-driven state machine steering an [`AgentBody`] along a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionController {
    path: WaypointPath,
    cursor: usize,
    steering: SteeringState,
}

impl MotionController {
    /// Controller that starts seeking the first waypoint of `path`.
    #[must_use]
    pub fn new(path: WaypointPath) -> Self {
        Self {
            path,
            cursor: 0,
            steering: SteeringState::default(),
        }
    }

    /// Swaps in `path`, rewinding the cursor and clearing the steering state.
    pub fn replace_path(&mut self, path: WaypointPath) {
        *self = Self::new(path);
    }

    /// Stores `path` for display only; the controller is left idle.
    pub fn disable_with(&mut self, path: WaypointPath) {
        let cursor = path.len();
        *self = Self {
            path,
            cursor,
            steering: SteeringState::default(),
        };
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MotionState {
        if self.cursor < self.path.len() {
            MotionState::Seeking
        } else {
            MotionState::Idle
        }
    }

    /// Index of the waypoint being sought.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The path being followed.
    #[must_use]
    pub const fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// The steering state.
    #[must_use]
    pub const fn steering(&self) -> &SteeringState {
        &self.steering
    }

    /// World position the pivot is steered towards, lifted by the agent's
    /// base offset.
    #[must_use]
    pub fn current_target(&self, profile: &AgentProfile) -> Option<Vec3> {
        self.path
            .get(self.cursor)
            .map(|waypoint| waypoint + profile.pivot_offset())
    }

    /// Runs one tick of `dt` seconds.
    ///
    /// A waypoint within the agent radius is consumed and the tick continues
    /// towards the next one; consuming the last waypoint ends the tick
    /// without moving.
    pub fn advance<B>(
        &mut self,
        body: &mut B,
        profile: &AgentProfile,
        config: &SteeringConfig,
        dt: f32,
    ) -> MotionState
    where
        B: AgentBody + ?Sized,
    {
        let Some(mut target) = self.current_target(profile) else {
            return MotionState::Idle;
        };

        if body.position().distance(target) <= profile.radius {
            self.cursor += 1;
            self.steering.elapsed = 0.0;
            debug!("reached waypoint {}/{}", self.cursor, self.path.len());
            match self.current_target(profile) {
                Some(next) => target = next,
                None => return MotionState::Idle,
            }
        }

        let raw_direction = safe_normalize(target - body.position());
        let factor = config.blend_factor(self.steering.elapsed);
        self.steering.heading = self.steering.heading.lerp(raw_direction, factor);
        if let Some(facing) = look_rotation(raw_direction, profile.up) {
            let blended = body.rotation().lerp(facing, factor);
            body.set_rotation(blended);
        }
        body.move_agent(self.steering.heading * profile.speed * dt);
        self.steering.elapsed += dt;
        MotionState::Seeking
    }
}
