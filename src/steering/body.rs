//! The mover contract used by the motion controller.

use bevy::prelude::Transform;
use glam::{Quat, Vec3};
use log::debug;

use crate::config::AgentProfile;
use crate::constants::SURFACE_SNAP_FACTOR;
use crate::surface::NavigationSurface;

/// A body the motion controller can orient and displace.
pub trait AgentBody {
    /// Current pivot position.
    fn position(&self) -> Vec3;
    /// Current facing.
    fn rotation(&self) -> Quat;
    /// Replaces the facing.
    fn set_rotation(&mut self, rotation: Quat);
    /// Applies `displacement`, subject to whatever constraints the body
    /// enforces.
    fn move_agent(&mut self, displacement: Vec3);
}

impl AgentBody for Transform {
    fn position(&self) -> Vec3 {
        self.translation
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn move_agent(&mut self, displacement: Vec3) {
        self.translation += displacement;
    }
}

impl<B: AgentBody + ?Sized> AgentBody for &mut B {
    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn rotation(&self) -> Quat {
        (**self).rotation()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        (**self).set_rotation(rotation);
    }

    fn move_agent(&mut self, displacement: Vec3) {
        (**self).move_agent(displacement);
    }
}

/// Wraps a body so every move lands back on the navigable surface.
///
/// After each displacement the agent's foot is snapped to the nearest
/// surface point within `radius × 1.5`. A move that would leave the surface
/// entirely is refused.
#[derive(Debug)]
pub struct SurfaceMover<'a, B: ?Sized, S: ?Sized> {
    body: &'a mut B,
    surface: &'a S,
    profile: &'a AgentProfile,
}

impl<'a, B, S> SurfaceMover<'a, B, S>
where
    B: AgentBody + ?Sized,
    S: NavigationSurface + ?Sized,
{
    /// Binds `body` to `surface` using the agent's radius, offset and mask.
    pub const fn new(body: &'a mut B, surface: &'a S, profile: &'a AgentProfile) -> Self {
        Self {
            body,
            surface,
            profile,
        }
    }
}

impl<B, S> AgentBody for SurfaceMover<'_, B, S>
where
    B: AgentBody + ?Sized,
    S: NavigationSurface + ?Sized,
{
    fn position(&self) -> Vec3 {
        self.body.position()
    }

    fn rotation(&self) -> Quat {
        self.body.rotation()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.body.set_rotation(rotation);
    }

    fn move_agent(&mut self, displacement: Vec3) {
        let pivot = self.profile.pivot_offset();
        let current = self.body.position();
        let foot = current + displacement - pivot;
        let radius = self.profile.radius * SURFACE_SNAP_FACTOR;
        match self
            .surface
            .sample_nearest(foot, radius, self.profile.area_mask)
        {
            Some(ground) => self.body.move_agent(ground + pivot - current),
            None => debug!("refusing move to {foot}: no surface within {radius}"),
        }
    }
}
