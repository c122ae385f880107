//! Bevy plugin wiring smooth agents into the ECS schedule.
//!
//! Destinations arrive as [`MoveRequest`] events handled by an observer.
//! `Update` then runs, in order, the raw-path autopilot, the smooth steering
//! controller and the waypoint snapshot export. Failures are raised as
//! [`NavigationFailed`] events and logged.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use glam::Vec3;
use log::error;
use thiserror::Error;

use crate::agent::{Autopilot, SmoothAgent};
use crate::config::AgentProfile;
use crate::scenario::MoveMode;
use crate::snapshot::WaypointSnapshot;
use crate::steering::SurfaceMover;
use crate::surface::{AreaMask, CornerSequence, NavigationSurface, SurfaceError};
use crate::vector_math::look_rotation;

/// The navigable surface shared by every agent.
#[derive(Resource)]
pub struct NavSurface(pub Box<dyn NavigationSurface + Send + Sync>);

impl NavSurface {
    /// Wraps a concrete surface.
    pub fn new(surface: impl NavigationSurface + Send + Sync + 'static) -> Self {
        Self(Box::new(surface))
    }
}

/// Request to send `agent` towards `target`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    /// Entity carrying a [`SmoothAgent`].
    pub agent: Entity,
    /// Destination on the surface.
    pub target: Vec3,
    /// Smoothed or raw travel.
    pub mode: MoveMode,
}

/// Request to teleport `agent`, stopping any travel in progress.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WarpRequest {
    /// Entity to move.
    pub agent: Entity,
    /// New pivot position.
    pub position: Vec3,
}

/// Event raised when a move request cannot be honoured.
#[derive(Event, Debug, Clone, Error)]
#[error("navigation failed for {agent:?}: {detail}")]
pub struct NavigationFailed {
    /// Agent whose request failed.
    pub agent: Entity,
    /// Description of the underlying error.
    pub detail: String,
}

impl NavigationFailed {
    /// Convenience constructor used by observers.
    pub fn new(agent: Entity, detail: impl Into<String>) -> Self {
        Self {
            agent,
            detail: detail.into(),
        }
    }
}

/// Corner-to-corner mover used for raw destinations.
///
/// Travels straight between the host's corners at the agent's speed,
/// facing the direction of travel.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct DirectAutopilot {
    corners: Vec<Vec3>,
    next: usize,
}

impl DirectAutopilot {
    /// Starts following `corners`.
    pub fn follow(&mut self, corners: &CornerSequence) {
        self.corners = corners.as_slice().to_vec();
        self.next = 0;
    }

    /// Abandons the current route.
    pub fn stop(&mut self) {
        self.corners.clear();
        self.next = 0;
    }

    /// Whether a route is being followed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.next < self.corners.len()
    }

    /// Moves `transform` up to `speed × dt` along the route.
    pub fn step(&mut self, transform: &mut Transform, profile: &AgentProfile, dt: f32) {
        let pivot = profile.pivot_offset();
        let mut budget = profile.speed * dt;
        while let Some(corner) = self.corners.get(self.next) {
            let target = *corner + pivot;
            let to_target = target - transform.translation;
            let distance = to_target.length();
            if distance <= budget {
                transform.translation = target;
                budget -= distance;
                self.next += 1;
                continue;
            }
            if let Some(facing) = look_rotation(to_target, profile.up) {
                transform.rotation = facing;
            }
            transform.translation += to_target / distance * budget;
            break;
        }
    }
}

struct SurfaceAutopilot<'a, S: ?Sized> {
    surface: &'a S,
    origin: Vec3,
    mask: AreaMask,
    pilot: &'a mut DirectAutopilot,
}

impl<S: NavigationSurface + ?Sized> Autopilot for SurfaceAutopilot<'_, S> {
    fn navigate_to(&mut self, target: Vec3) -> Result<CornerSequence, SurfaceError> {
        let corners = self.surface.compute_path(self.origin, target, self.mask)?;
        self.pilot.follow(&corners);
        Ok(corners)
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn handle_move_request(
    event: On<MoveRequest>,
    nav_surface: Option<Res<NavSurface>>,
    mut agents: Query<(&mut SmoothAgent, &Transform, Option<&mut DirectAutopilot>)>,
    mut commands: Commands,
) {
    let MoveRequest {
        agent: entity,
        target,
        mode,
    } = *event.event();
    let Some(surface) = nav_surface else {
        commands.trigger(NavigationFailed::new(entity, "no navigation surface"));
        return;
    };
    let Ok((mut agent, transform, direct)) = agents.get_mut(entity) else {
        commands.trigger(NavigationFailed::new(entity, "entity is not a smooth agent"));
        return;
    };

    let result = match (mode, direct) {
        (MoveMode::Smoothed, maybe_pilot) => {
            if let Some(mut pilot) = maybe_pilot {
                pilot.stop();
            }
            agent
                .set_destination(&*surface.0, transform.translation, target)
                .map(|_| ())
                .map_err(|err| err.to_string())
        }
        (MoveMode::Raw, Some(mut pilot)) => {
            let profile = &agent.config().agent;
            let mut autopilot = SurfaceAutopilot {
                surface: &*surface.0,
                origin: transform.translation - profile.pivot_offset(),
                mask: profile.area_mask,
                pilot: &mut pilot,
            };
            agent
                .set_raw_destination(&mut autopilot, target)
                .map(|_| ())
                .map_err(|err| err.to_string())
        }
        (MoveMode::Raw, None) => Err("agent has no DirectAutopilot".to_owned()),
    };

    if let Err(detail) = result {
        commands.trigger(NavigationFailed::new(entity, detail));
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn handle_warp_request(
    event: On<WarpRequest>,
    mut agents: Query<(&mut Transform, Option<&mut SmoothAgent>, Option<&mut DirectAutopilot>)>,
) {
    let WarpRequest { agent, position } = *event.event();
    let Ok((mut transform, smooth_agent, direct)) = agents.get_mut(agent) else {
        return;
    };
    transform.translation = position;
    if let Some(mut smooth) = smooth_agent {
        smooth.halt();
    }
    if let Some(mut pilot) = direct {
        pilot.stop();
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_navigation_failure(event: On<NavigationFailed>) {
    let NavigationFailed { agent, detail } = event.event();
    error!("move request for {agent:?} failed: {detail}");
}

/// Drives raw routes at agent speed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn autopilot_system(
    time: Res<Time>,
    mut agents: Query<(&SmoothAgent, &mut DirectAutopilot, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (agent, mut pilot, mut transform) in &mut agents {
        if pilot.is_active() {
            pilot.step(&mut transform, &agent.config().agent, dt);
        }
    }
}

/// Advances every smooth agent by one tick, clipping moves to the surface
/// when one is installed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn steer_agents_system(
    time: Res<Time>,
    nav_surface: Option<Res<NavSurface>>,
    mut agents: Query<(&mut SmoothAgent, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut agent, mut transform) in &mut agents {
        match nav_surface.as_deref() {
            Some(NavSurface(surface)) => {
                let profile = agent.config().agent.clone();
                let mut mover = SurfaceMover::new(&mut *transform, &**surface, &profile);
                agent.advance(&mut mover, dt);
            }
            None => {
                agent.advance(&mut *transform, dt);
            }
        }
    }
}

/// Mirrors each agent's waypoints into a [`WaypointSnapshot`] component.
pub fn publish_snapshots_system(
    mut commands: Commands,
    mut agents: Query<(Entity, &SmoothAgent, Option<&mut WaypointSnapshot>)>,
) {
    for (entity, agent, existing) in &mut agents {
        let snapshot = agent.snapshot();
        match existing {
            Some(mut current) => {
                if *current != snapshot {
                    *current = snapshot;
                }
            }
            None => {
                commands.entity(entity).insert(snapshot);
            }
        }
    }
}

/// Plugin installing the move-request observers and per-tick systems.
#[derive(Default)]
pub struct SmoothNavPlugin;

impl Plugin for SmoothNavPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(handle_move_request);
        app.add_observer(handle_warp_request);
        app.add_observer(log_navigation_failure);
        app.add_systems(
            Update,
            (
                autopilot_system,
                steer_agents_system,
                publish_snapshots_system,
            )
                .chain(),
        );
    }
}
