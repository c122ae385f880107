//! Default tunables shared by the smoothing pipeline, the steering controller
//! and the stand-in navigation surface.

/// Length of the tangent handles placed at each corner.
pub const DEFAULT_TANGENT_LENGTH: f32 = 0.25;
/// Number of samples taken along every Bézier curve.
pub const DEFAULT_SAMPLES_PER_CURVE: usize = 10;
/// Dot-product threshold at or below which a sample counts as overshoot.
pub const DEFAULT_OVERSMOOTHING_THRESHOLD: f32 = 0.0;
/// Physical radius of an agent; doubles as the arrival tolerance.
pub const DEFAULT_AGENT_RADIUS: f32 = 0.5;
/// Agent travel speed in world units per second.
pub const DEFAULT_AGENT_SPEED: f32 = 3.5;
/// How slowly the blended heading catches up with the target direction.
pub const DEFAULT_STEERING_DAMPING: f32 = 0.25;
/// Rate at which the heading blend factor grows per second.
pub const DEFAULT_TURN_RATE: f32 = 1.0;
/// Largest accepted steering damping; a damping of one never turns.
pub const MAX_STEERING_DAMPING: f32 = 0.99;
/// Multiplier applied to the merge distance when re-snapping waypoints
/// onto the navigable surface.
pub const SURFACE_SNAP_FACTOR: f32 = 1.5;
/// Offset from a block's base to its walkable top face.
pub const BLOCK_TOP_OFFSET: f32 = 1.0;
/// Maximum distance between a recorded route's last corner and a requested
/// destination for the route to be replayed.
pub const ROUTE_MATCH_DISTANCE: f32 = 1.0;
/// Spacing of the probes used to check that a straight segment stays on the
/// floor.
pub const SEGMENT_PROBE_SPACING: f32 = 0.25;
