//! Headless scenario runner.
//!
//! Builds a Bevy app with [`MinimalPlugins`] and [`SmoothNavPlugin`], spawns
//! one agent on the scenario's floor and feeds the scenario's commands into
//! the app at a fixed tick rate until the scenario finishes or the tick limit
//! is hit.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use glam::Vec3;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::agent::SmoothAgent;
use crate::config::ConfigError;
use crate::plugin::{
    DirectAutopilot, MoveRequest, NavSurface, NavigationFailed, SmoothNavPlugin, WarpRequest,
};
use crate::scenario::{
    MoveMode, MoveRecord, ScenarioCommand, ScenarioError, ScenarioFile, TaskStatus,
};
use crate::snapshot::WaypointSnapshot;
use crate::surface::FloorPlan;

/// Failures that stop a headless run before it starts or mid-way.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The scenario description is invalid.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// The agent configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The tick rate must be positive.
    #[error("tick rate must be positive")]
    ZeroTickRate,
    /// The agent entity vanished from the world.
    #[error("agent entity disappeared during the run")]
    AgentLost,
}

/// Summary of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Ticks simulated.
    pub ticks: u32,
    /// Simulated seconds.
    pub seconds: f32,
    /// Whether the scenario ran to completion.
    pub completed: bool,
    /// Every finished move, in order.
    pub moves: Vec<MoveRecord>,
    /// Navigation failures raised during the run.
    pub failures: Vec<String>,
    /// Total distance covered by the agent pivot.
    pub distance: f32,
    /// Final pivot position.
    pub final_position: Vec3,
    /// Waypoints of the last smoothed or raw request.
    pub last_path: WaypointSnapshot,
}

impl SimulationReport {
    /// Moves of one mode that arrived.
    pub fn arrivals(&self, mode: MoveMode) -> impl Iterator<Item = &MoveRecord> + '_ {
        self.moves.iter().filter(move |record| {
            record.mode == mode && record.status == TaskStatus::Arrived
        })
    }
}

#[derive(Resource, Default)]
struct FailureLog(Vec<String>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn record_failure(event: On<NavigationFailed>, mut failures: ResMut<FailureLog>) {
    failures.0.push(event.event().to_string());
}

fn pivot_of(app: &App, agent: Entity) -> Result<Vec3, SimulationError> {
    app.world()
        .get::<Transform>(agent)
        .map(|transform| transform.translation)
        .ok_or(SimulationError::AgentLost)
}

/// Runs `file`'s comparison scenario at `tick_rate` ticks per second for at
/// most `max_ticks` ticks.
///
/// # Errors
/// Returns [`SimulationError`] for invalid input or a lost agent entity.
#[expect(
    clippy::cast_precision_loss,
    reason = "Tick counts stay far below f32 precision limits."
)]
pub fn run_headless(
    file: &ScenarioFile,
    tick_rate: u32,
    max_ticks: u32,
) -> Result<SimulationReport, SimulationError> {
    file.validate()?;
    if tick_rate == 0 {
        return Err(SimulationError::ZeroTickRate);
    }
    let agent = SmoothAgent::new(file.config.clone())?;
    let step = Duration::from_secs_f64(1.0 / f64::from(tick_rate));
    let dt = step.as_secs_f32();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SmoothNavPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(NavSurface::new(FloorPlan::from(file.floor.clone())))
        .init_resource::<FailureLog>()
        .add_observer(record_failure);

    let spawn = file.start + file.config.agent.pivot_offset();
    let entity = app
        .world_mut()
        .spawn((agent, DirectAutopilot::default(), Transform::from_translation(spawn)))
        .id();
    // The first update only primes the clock.
    app.update();

    let mut scenario = file.scenario();
    let mut position = pivot_of(&app, entity)?;
    let mut distance = 0.0;
    let mut ticks = 0;
    let mut failures_seen = 0;

    while ticks < max_ticks && !scenario.is_finished() {
        match scenario.tick(dt, position) {
            Some(ScenarioCommand::SetDestination(target)) => {
                app.world_mut().trigger(MoveRequest {
                    agent: entity,
                    target,
                    mode: MoveMode::Smoothed,
                });
            }
            Some(ScenarioCommand::SetRawDestination(target)) => {
                app.world_mut().trigger(MoveRequest {
                    agent: entity,
                    target,
                    mode: MoveMode::Raw,
                });
            }
            Some(ScenarioCommand::Warp(to)) => {
                app.world_mut().trigger(WarpRequest {
                    agent: entity,
                    position: to,
                });
                position = to;
            }
            None => {}
        }

        app.update();
        ticks += 1;

        let failure_count = app.world().resource::<FailureLog>().0.len();
        if failure_count > failures_seen {
            warn!("navigation failed; cancelling scenario");
            failures_seen = failure_count;
            scenario.cancel();
        }

        let next = pivot_of(&app, entity)?;
        distance += next.distance(position);
        position = next;
    }

    let completed = scenario.is_finished()
        && scenario
            .records()
            .iter()
            .all(|record| record.status == TaskStatus::Arrived);
    let last_path = app
        .world()
        .get::<SmoothAgent>(entity)
        .map(SmoothAgent::snapshot)
        .ok_or(SimulationError::AgentLost)?;
    let failures = app.world().resource::<FailureLog>().0.clone();
    info!(
        "simulated {ticks} ticks: {} moves, completed={completed}",
        scenario.records().len()
    );

    Ok(SimulationReport {
        ticks,
        seconds: ticks as f32 * dt,
        completed,
        moves: scenario.records().to_vec(),
        failures,
        distance,
        final_position: position,
        last_path,
    })
}
