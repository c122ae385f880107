//! Per-agent navigation facade.
//!
//! A [`SmoothAgent`] owns one agent's configuration, waypoint path, cursor
//! and steering state. It exposes the control surface used by drivers:
//! smoothed and raw destination requests, a per-tick [`SmoothAgent::advance`],
//! and read-only views of the current path.

use bevy::prelude::Component;
use glam::Vec3;
use log::info;

use crate::config::{ConfigError, NavConfig};
use crate::smoothing::{PathSmoother, SmoothingError, WaypointPath};
use crate::snapshot::WaypointSnapshot;
use crate::steering::{AgentBody, MotionController, MotionState};
use crate::surface::{CornerSequence, NavigationSurface, SurfaceError};

/// Navigation owned by the host engine, used for raw destination requests.
///
/// The autopilot plans and drives the agent itself; the returned corners are
/// kept for display only.
pub trait Autopilot {
    /// Hands `target` to the host navigation and returns its corner
    /// sequence.
    ///
    /// # Errors
    /// Returns [`SurfaceError`] when the host cannot reach `target`.
    fn navigate_to(&mut self, target: Vec3) -> Result<CornerSequence, SurfaceError>;
}

impl<A: Autopilot + ?Sized> Autopilot for &mut A {
    fn navigate_to(&mut self, target: Vec3) -> Result<CornerSequence, SurfaceError> {
        (**self).navigate_to(target)
    }
}

/// One agent's smoothing and steering state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SmoothAgent {
    config: NavConfig,
    smoother: PathSmoother,
    motion: MotionController,
}

impl SmoothAgent {
    /// Validates `config` and creates an idle agent.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found in `config`.
    pub fn new(config: NavConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let smoother = PathSmoother::new(config.smoothing.clone())?;
        Ok(Self {
            config,
            smoother,
            motion: MotionController::default(),
        })
    }

    /// The configuration this agent was built with.
    #[must_use]
    pub const fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Plans a smoothed path from `origin` to `target` and starts seeking it.
    ///
    /// `origin` is the agent's pivot; the surface is queried from the point
    /// beneath it. On failure the previous path stays active.
    ///
    /// # Errors
    /// Returns [`SmoothingError`] when the surface finds no path.
    pub fn set_destination<S>(
        &mut self,
        surface: &S,
        origin: Vec3,
        target: Vec3,
    ) -> Result<&WaypointPath, SmoothingError>
    where
        S: NavigationSurface + ?Sized,
    {
        let foot = origin - self.config.agent.pivot_offset();
        let path = self
            .smoother
            .plan(surface, foot, target, self.config.agent.area_mask)?;
        info!("new smoothed path to {target} with {} waypoints", path.len());
        self.motion.replace_path(path);
        Ok(self.motion.path())
    }

    /// Delegates travel to `autopilot` and keeps its corners for display.
    ///
    /// The controller stays idle so it does not fight the autopilot. On
    /// failure the previous path stays active.
    ///
    /// # Errors
    /// Returns [`SurfaceError`] when the autopilot cannot reach `target`.
    pub fn set_raw_destination<A>(
        &mut self,
        autopilot: &mut A,
        target: Vec3,
    ) -> Result<&WaypointPath, SurfaceError>
    where
        A: Autopilot + ?Sized,
    {
        let corners = autopilot.navigate_to(target)?;
        info!("raw path to {target} with {} corners", corners.len());
        self.motion.disable_with(corners.into());
        Ok(self.motion.path())
    }

    /// Steers `body` for one tick of `dt` seconds.
    pub fn advance<B>(&mut self, body: &mut B, dt: f32) -> MotionState
    where
        B: AgentBody + ?Sized,
    {
        self.motion
            .advance(body, &self.config.agent, &self.config.steering, dt)
    }

    /// Drops the current path and goes idle.
    pub fn halt(&mut self) {
        self.motion.replace_path(WaypointPath::default());
    }

    /// Current waypoints, read-only.
    #[must_use]
    pub const fn waypoints(&self) -> &WaypointPath {
        self.motion.path()
    }

    /// Index of the waypoint being sought.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.motion.cursor()
    }

    /// Whether the agent is still following its own path.
    #[must_use]
    pub const fn state(&self) -> MotionState {
        self.motion.state()
    }

    /// Detached copy of the waypoints and cursor.
    #[must_use]
    pub fn snapshot(&self) -> WaypointSnapshot {
        WaypointSnapshot::new(self.waypoints().as_slice().to_vec(), self.cursor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SteeringConfig;
    use rstest::rstest;

    #[rstest]
    fn rejects_invalid_configuration() {
        let config = NavConfig {
            steering: SteeringConfig {
                damping: 1.5,
                ..SteeringConfig::default()
            },
            ..NavConfig::default()
        };
        assert!(SmoothAgent::new(config).is_err());
    }

    #[rstest]
    fn new_agent_is_idle_with_empty_snapshot() {
        let agent = SmoothAgent::new(NavConfig::default()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(agent.state(), MotionState::Idle);
        assert_eq!(agent.snapshot(), WaypointSnapshot::default());
    }
}
