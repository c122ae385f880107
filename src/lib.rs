#![cfg_attr(docsrs, feature(doc_cfg))]
//! Bézier path smoothing and damped steering for navigation agents.
//!
//! Raw corner sequences from a navigable surface are fitted with cubic
//! curves, sampled, filtered and re-validated into waypoints
//! ([`smoothing`]). A per-tick controller then steers an agent through them
//! with time-scaled heading blending ([`steering`]). [`plugin`] wires both
//! into a Bevy app and [`simulation`] runs scripted scenarios headlessly.
pub mod agent;
pub mod config;
pub mod constants;
pub mod logging;
pub mod plugin;
pub mod scenario;
pub mod simulation;
pub mod smoothing;
pub mod snapshot;
pub mod steering;
pub mod surface;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use agent::{Autopilot, SmoothAgent};
pub use config::{AgentProfile, ConfigError, NavConfig, SmoothingConfig, SteeringConfig};
pub use logging::init as init_logging;
pub use plugin::{
    DirectAutopilot, MoveRequest, NavSurface, NavigationFailed, SmoothNavPlugin, WarpRequest,
};
pub use scenario::{MoveMode, MoveTask, Scenario, ScenarioCommand, ScenarioFile, ScenarioStep};
pub use simulation::{run_headless, SimulationError, SimulationReport};
pub use smoothing::{PathSmoother, SmoothingError, WaypointPath};
pub use snapshot::WaypointSnapshot;
pub use steering::{AgentBody, MotionController, MotionState, SurfaceMover};
pub use surface::{AreaMask, CornerSequence, FloorPlan, NavigationSurface, SurfaceError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use smooth_nav::prelude::*;
    //! ```

    pub use crate::AgentBody;
    pub use crate::AreaMask;
    pub use crate::CornerSequence;
    pub use crate::MotionState;
    pub use crate::NavConfig;
    pub use crate::NavigationSurface;
    pub use crate::PathSmoother;
    pub use crate::SmoothAgent;
    pub use crate::SmoothNavPlugin;
    pub use crate::WaypointPath;
}
