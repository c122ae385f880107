//! Block-grid navigable surface.
//!
//! The floor is made of unit blocks on the XZ plane. Each column keeps its
//! highest block; the walkable face sits [`BLOCK_TOP_OFFSET`] above the block
//! level and may be tilted by a [`BlockSlope`]. Pathfinding is not performed
//! here: [`FloorPlan::compute_path`] replays recorded corner routes or accepts
//! a straight segment that stays on the floor.

use glam::Vec3;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::{AreaMask, CornerSequence, NavigationSurface, SurfaceError};
use crate::constants::{BLOCK_TOP_OFFSET, ROUTE_MATCH_DISTANCE, SEGMENT_PROBE_SPACING};

/// Gradient of a block's top face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockSlope {
    /// Height change per unit along X.
    pub grad_x: f32,
    /// Height change per unit along Z.
    pub grad_z: f32,
}

/// A unit block occupying `[x, x + 1] × [z, z + 1]` on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Column X index.
    pub x: i32,
    /// Column Z index.
    pub z: i32,
    /// Stack level; the walkable face is one unit above it.
    #[serde(default)]
    pub level: i32,
    /// Optional tilt of the top face.
    #[serde(default)]
    pub slope: Option<BlockSlope>,
    /// Area index checked against an [`AreaMask`].
    #[serde(default)]
    pub area: u8,
}

impl Block {
    /// Flat block of area zero.
    #[must_use]
    pub const fn flat(x: i32, z: i32, level: i32) -> Self {
        Self {
            x,
            z,
            level,
            slope: None,
            area: 0,
        }
    }

    /// Height of the walkable face at horizontal position `(px, pz)`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "Block coordinates are small grid indices."
    )]
    pub fn floor_height_at(&self, px: f32, pz: f32) -> f32 {
        let base = self.level as f32 + BLOCK_TOP_OFFSET;
        self.slope.map_or(base, |s| {
            base + (px - self.x as f32) * s.grad_x + (pz - self.z as f32) * s.grad_z
        })
    }

    /// Closest point on this block's walkable face to `point`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "Block coordinates are small grid indices."
    )]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let (min_x, min_z) = (self.x as f32, self.z as f32);
        let px = point.x.clamp(min_x, min_x + 1.0);
        let pz = point.z.clamp(min_z, min_z + 1.0);
        Vec3::new(px, self.floor_height_at(px, pz), pz)
    }
}

/// Serializable description of a floor: blocks plus recorded routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    /// Blocks making up the floor.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Recorded corner routes, each from some start to a destination.
    #[serde(default)]
    pub routes: Vec<Vec<Vec3>>,
}

/// Navigable surface built from unit blocks.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::surface::{AreaMask, FloorPlan, NavigationSurface};
///
/// let mut floor = FloorPlan::default();
/// floor.add_rect((0, 0), (3, 1), 0);
///
/// let snapped = floor.sample_nearest(Vec3::new(1.5, 0.0, 0.5), 2.0, AreaMask::ALL);
/// assert_eq!(snapped, Some(Vec3::new(1.5, 1.0, 0.5)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    columns: HashMap<(i32, i32), Block>,
    routes: Vec<Vec<Vec3>>,
}

impl From<FloorLayout> for FloorPlan {
    fn from(layout: FloorLayout) -> Self {
        let mut plan = Self::default();
        for block in layout.blocks {
            plan.add_block(block);
        }
        for route in layout.routes {
            plan.add_route(route);
        }
        plan
    }
}

impl FloorPlan {
    /// Inserts `block`, keeping only the highest block of each column.
    pub fn add_block(&mut self, block: Block) {
        self.columns
            .entry((block.x, block.z))
            .and_modify(|existing| {
                if block.level >= existing.level {
                    *existing = block;
                }
            })
            .or_insert(block);
    }

    /// Fills the half-open rectangle `[min, max)` of columns with flat blocks.
    pub fn add_rect(&mut self, min: (i32, i32), max: (i32, i32), level: i32) {
        for x in min.0..max.0 {
            for z in min.1..max.1 {
                self.add_block(Block::flat(x, z, level));
            }
        }
    }

    /// Records a corner route for [`NavigationSurface::compute_path`] to
    /// replay. Routes with fewer than two corners are ignored.
    pub fn add_route(&mut self, route: Vec<Vec3>) {
        if route.len() >= 2 {
            self.routes.push(route);
        } else {
            log::debug!("ignoring recorded route with {} corners", route.len());
        }
    }

    /// Number of occupied columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Highest block in the column containing `point`, if any.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Floored world coordinates map onto small grid indices."
    )]
    pub fn block_under(&self, point: Vec3) -> Option<&Block> {
        self.columns
            .get(&(point.x.floor() as i32, point.z.floor() as i32))
    }

    fn replay_route(&self, start: Vec3, end: Vec3) -> Option<Vec<Vec3>> {
        let route = self
            .routes
            .iter()
            .filter_map(|route| {
                let last = route.last()?;
                let gap = last.distance(end);
                (gap <= ROUTE_MATCH_DISTANCE).then_some((gap, route))
            })
            .min_by_key(|(gap, _)| OrderedFloat(*gap))
            .map(|(_, route)| route)?;

        let interior = route.get(1..route.len() - 1).unwrap_or_default();
        let mut corners = Vec::with_capacity(interior.len() + 2);
        corners.push(start);
        corners.extend_from_slice(interior);
        corners.push(end);
        Some(corners)
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "Probe counts are small and derived from finite segment lengths."
    )]
    fn segment_on_floor(&self, start: Vec3, end: Vec3, mask: AreaMask) -> bool {
        let probes = (start.distance(end) / SEGMENT_PROBE_SPACING).ceil().max(1.0) as usize;
        (0..=probes).all(|i| {
            let probe = start.lerp(end, i as f32 / probes as f32);
            self.block_under(probe)
                .is_some_and(|block| mask.allows(block.area))
        })
    }
}

impl NavigationSurface for FloorPlan {
    fn compute_path(
        &self,
        start: Vec3,
        end: Vec3,
        mask: AreaMask,
    ) -> Result<CornerSequence, SurfaceError> {
        let no_path = || SurfaceError::NoPath { start, end };
        let from = self
            .sample_nearest(start, ROUTE_MATCH_DISTANCE, mask)
            .ok_or_else(no_path)?;
        let to = self
            .sample_nearest(end, ROUTE_MATCH_DISTANCE, mask)
            .ok_or_else(no_path)?;

        if let Some(corners) = self.replay_route(from, to) {
            return CornerSequence::new(corners);
        }
        if self.segment_on_floor(from, to, mask) {
            return Ok(CornerSequence::direct(from, to));
        }
        Err(no_path())
    }

    fn sample_nearest(&self, point: Vec3, max_radius: f32, mask: AreaMask) -> Option<Vec3> {
        self.columns
            .values()
            .filter(|block| mask.allows(block.area))
            .map(|block| block.closest_point(point))
            .map(|candidate| (candidate.distance(point), candidate))
            .filter(|(distance, _)| *distance <= max_radius)
            .min_by_key(|(distance, _)| OrderedFloat(*distance))
            .map(|(_, candidate)| candidate)
    }
}
