//! Bevy app harness for navigation behaviour tests.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use smooth_nav::plugin::{DirectAutopilot, MoveRequest, NavSurface, SmoothNavPlugin};
use smooth_nav::scenario::MoveMode;
use smooth_nav::snapshot::WaypointSnapshot;
use smooth_nav::surface::NavigationSurface;
use smooth_nav::{NavConfig, SmoothAgent};

/// Ticks per simulated second used by the harness clock.
pub const TICK_RATE: u32 = 60;

struct GuardedApp(App);

// SAFETY: rspec fixtures must be `Clone + Send + Sync` and suites are run
// serially through `run_serial`. Every access to the app goes through the
// mutex, so forwarding `Send`/`Sync` is sound for this test-only wrapper.
unsafe impl Send for GuardedApp {}
unsafe impl Sync for GuardedApp {}

/// Shared Bevy app with the navigation plugin and at most one agent.
#[derive(Clone)]
pub struct NavHarness {
    app: Arc<Mutex<GuardedApp>>,
    agent: Option<Entity>,
}

impl fmt::Debug for NavHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavHarness")
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

impl Default for NavHarness {
    fn default() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(SmoothNavPlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                1.0 / f64::from(TICK_RATE),
            )));
        app.update();
        Self {
            app: Arc::new(Mutex::new(GuardedApp(app))),
            agent: None,
        }
    }
}

impl NavHarness {
    fn lock(&self) -> MutexGuard<'_, GuardedApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs `surface` as the shared navigation surface.
    pub fn with_surface(self, surface: impl NavigationSurface + Send + Sync + 'static) -> Self {
        self.lock().0.insert_resource(NavSurface::new(surface));
        self
    }

    /// Spawns the agent at `position` unless one exists already.
    ///
    /// # Panics
    /// Panics if `config` is invalid.
    pub fn spawn_agent(&mut self, config: NavConfig, position: Vec3) {
        if self.agent.is_some() {
            return;
        }
        let agent = SmoothAgent::new(config).unwrap_or_else(|e| panic!("invalid config: {e}"));
        let id = self
            .lock()
            .0
            .world_mut()
            .spawn((agent, DirectAutopilot::default(), Transform::from_translation(position)))
            .id();
        self.agent = Some(id);
    }

    /// The spawned agent entity.
    ///
    /// # Panics
    /// Panics if no agent was spawned.
    pub fn agent(&self) -> Entity {
        self.agent.unwrap_or_else(|| panic!("agent not spawned"))
    }

    /// Triggers a move request for the agent.
    pub fn request(&self, target: Vec3, mode: MoveMode) {
        let agent = self.agent();
        self.lock().0.world_mut().trigger(MoveRequest {
            agent,
            target,
            mode,
        });
    }

    /// Runs `count` app updates.
    pub fn tick(&self, count: usize) {
        let mut guard = self.lock();
        for _ in 0..count {
            guard.0.update();
        }
    }

    /// Ticks until `done` holds for the agent, up to `max_ticks`.
    /// Returns the number of ticks run, or `None` on timeout.
    pub fn tick_until(&self, max_ticks: usize, done: impl Fn(&SmoothAgent, Vec3) -> bool) -> Option<usize> {
        let agent = self.agent();
        let mut guard = self.lock();
        for tick in 1..=max_ticks {
            guard.0.update();
            let world = guard.0.world();
            let reached = world
                .get::<SmoothAgent>(agent)
                .zip(world.get::<Transform>(agent))
                .is_some_and(|(smooth, transform)| done(smooth, transform.translation));
            if reached {
                return Some(tick);
            }
        }
        None
    }

    /// Current pivot position of the agent.
    ///
    /// # Panics
    /// Panics if the agent has no transform.
    pub fn position(&self) -> Vec3 {
        let agent = self.agent();
        self.lock()
            .0
            .world()
            .get::<Transform>(agent)
            .map(|transform| transform.translation)
            .unwrap_or_else(|| panic!("agent has no Transform"))
    }

    /// Copy of the agent's navigation component.
    ///
    /// # Panics
    /// Panics if the agent has no [`SmoothAgent`].
    pub fn smooth_agent(&self) -> SmoothAgent {
        let agent = self.agent();
        self.lock()
            .0
            .world()
            .get::<SmoothAgent>(agent)
            .cloned()
            .unwrap_or_else(|| panic!("agent has no SmoothAgent"))
    }

    /// The published waypoint snapshot, if any.
    pub fn snapshot(&self) -> Option<WaypointSnapshot> {
        let agent = self.agent();
        self.lock().0.world().get::<WaypointSnapshot>(agent).cloned()
    }

    /// Whether the raw-path autopilot is moving the agent.
    pub fn autopilot_active(&self) -> bool {
        let agent = self.agent();
        self.lock()
            .0
            .world()
            .get::<DirectAutopilot>(agent)
            .is_some_and(DirectAutopilot::is_active)
    }
}

/// Runs an rspec suite serially so the shared app stays on one thread.
///
/// # Panics
/// Panics if the rspec configuration cannot be built.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    Runner::new(config, vec![logger]).run(suite);
}
