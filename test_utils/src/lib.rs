//! Utility helpers for tests.
//!
//! Surfaces, bodies and a Bevy harness shared by the integration suites.

pub mod harness;
pub mod surface;

use glam::Vec3;
use smooth_nav::steering::{AgentBody, MotionState};
use smooth_nav::SmoothAgent;

pub use harness::{run_serial, NavHarness};
pub use surface::OpenSurface;

/// Assert that two vectors are within `tolerance` of each other.
///
/// # Panics
/// Panics with both vectors and their distance when they are too far apart.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// test_utils::assert_vec3_near(Vec3::X, Vec3::new(1.0, 0.0, 1e-5), 1e-3);
/// ```
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
    let distance = actual.distance(expected);
    assert!(
        distance <= tolerance,
        "expected {expected:?}, got {actual:?} (off by {distance})"
    );
}

/// Minimal body that applies every displacement verbatim and counts moves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicBody {
    /// Pivot position.
    pub position: Vec3,
    /// Facing.
    pub rotation: glam::Quat,
    /// Number of `move_agent` calls received.
    pub moves: usize,
}

impl KinematicBody {
    /// Body standing at `position`, facing the default direction.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl AgentBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> glam::Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: glam::Quat) {
        self.rotation = rotation;
    }

    fn move_agent(&mut self, displacement: Vec3) {
        self.position += displacement;
        self.moves += 1;
    }
}

/// Ticks `agent` until it goes idle, returning the number of ticks taken.
///
/// # Panics
/// Panics if the agent is still seeking after `max_ticks`.
pub fn run_until_idle<B: AgentBody>(
    agent: &mut SmoothAgent,
    body: &mut B,
    dt: f32,
    max_ticks: usize,
) -> usize {
    for tick in 1..=max_ticks {
        if agent.advance(body, dt) == MotionState::Idle {
            return tick;
        }
    }
    panic!(
        "agent still seeking after {max_ticks} ticks at {:?}",
        body.position()
    );
}
