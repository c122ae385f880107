//! Scripted destination sequences.
//!
//! A [`MoveTask`] resolves once the agent is within its radius of a target
//! or is cancelled from outside. A [`Scenario`] composes tasks, pauses and
//! warps into a sequence that a driver polls every tick; each poll yields at
//! most one [`ScenarioCommand`] for the driver to apply.
//!
//! [`ScenarioFile`] is the JSON description consumed by the headless
//! simulation: agent configuration, floor layout, spawn point and stops.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AgentProfile, ConfigError, NavConfig};
use crate::surface::floor::{Block, FloorLayout};

/// How a destination is travelled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// Along the smoothed path, steered by the agent's own controller.
    Smoothed,
    /// Along the raw corners, driven by the host autopilot.
    Raw,
}

/// Resolution state of a [`MoveTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Still travelling.
    Pending,
    /// The agent came within the arrival radius.
    Arrived,
    /// Cancelled before arrival.
    Cancelled,
}

/// "Move to a point, resolve when within radius."
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTask {
    target: Vec3,
    radius: f32,
    offset: Vec3,
    status: TaskStatus,
}

impl MoveTask {
    /// Task for `target` using the agent's arrival radius and pivot offset.
    #[must_use]
    pub fn new(target: Vec3, profile: &AgentProfile) -> Self {
        Self {
            target,
            radius: profile.radius,
            offset: profile.pivot_offset(),
            status: TaskStatus::Pending,
        }
    }

    /// Surface point being travelled to.
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Current status without polling.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Checks arrival for the agent pivot at `position`.
    ///
    /// The task resolves when the pivot is strictly closer than the radius
    /// to the lifted target. Resolved tasks keep their status.
    pub fn poll(&mut self, position: Vec3) -> TaskStatus {
        if self.status == TaskStatus::Pending
            && position.distance(self.target + self.offset) < self.radius
        {
            self.status = TaskStatus::Arrived;
        }
        self.status
    }

    /// Resolves a pending task as cancelled.
    pub fn cancel(&mut self) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::Cancelled;
        }
    }
}

/// One step of a [`Scenario`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum ScenarioStep {
    /// Travel to `target` and wait for arrival.
    MoveTo {
        /// Destination on the surface.
        target: Vec3,
        /// Smoothed or raw travel.
        mode: MoveMode,
    },
    /// Wait for `seconds` of simulated time.
    Pause {
        /// Duration of the pause.
        seconds: f32,
    },
    /// Teleport the agent pivot to `position`.
    Warp {
        /// New pivot position.
        position: Vec3,
    },
    /// Remember the agent's current position.
    Checkpoint,
    /// Teleport back to the last checkpoint.
    Rewind,
}

/// Action the driver must apply on behalf of a [`Scenario`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioCommand {
    /// Request a smoothed path to the point.
    SetDestination(Vec3),
    /// Request a raw path to the point.
    SetRawDestination(Vec3),
    /// Teleport the agent pivot.
    Warp(Vec3),
}

/// Outcome of a finished move, in simulated seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    /// Destination of the move.
    pub target: Vec3,
    /// How it was travelled.
    pub mode: MoveMode,
    /// Arrived or cancelled.
    pub status: TaskStatus,
    /// Time spent travelling.
    pub seconds: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Active {
    Moving {
        task: MoveTask,
        mode: MoveMode,
        seconds: f32,
    },
    Pausing(f32),
}

/// Sequential composition of moves, pauses and warps.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use smooth_nav::config::AgentProfile;
/// use smooth_nav::scenario::{MoveMode, Scenario, ScenarioCommand, ScenarioStep};
///
/// let target = Vec3::new(4.0, 0.0, 0.0);
/// let mut scenario = Scenario::new(
///     vec![ScenarioStep::MoveTo { target, mode: MoveMode::Smoothed }],
///     &AgentProfile::default(),
/// );
/// assert_eq!(scenario.tick(0.1, Vec3::ZERO), Some(ScenarioCommand::SetDestination(target)));
/// assert_eq!(scenario.tick(0.1, Vec3::ZERO), None);
/// assert_eq!(scenario.tick(0.1, target), None);
/// assert!(scenario.is_finished());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    steps: Vec<ScenarioStep>,
    next: usize,
    active: Option<Active>,
    checkpoint: Option<Vec3>,
    profile: AgentProfile,
    records: Vec<MoveRecord>,
}

impl Scenario {
    /// Scenario running `steps` for an agent described by `profile`.
    #[must_use]
    pub fn new(steps: Vec<ScenarioStep>, profile: &AgentProfile) -> Self {
        Self {
            steps,
            next: 0,
            active: None,
            checkpoint: None,
            profile: profile.clone(),
            records: Vec::new(),
        }
    }

    /// Side-by-side showcase: every stop is reached smoothed, then the agent
    /// returns to where that run began and reaches it again raw. Each run is
    /// followed by a pause of `pause` seconds.
    #[must_use]
    pub fn comparison(stops: &[Vec3], pause: f32, profile: &AgentProfile) -> Self {
        let steps = stops
            .iter()
            .flat_map(|&target| {
                [
                    ScenarioStep::Checkpoint,
                    ScenarioStep::MoveTo {
                        target,
                        mode: MoveMode::Smoothed,
                    },
                    ScenarioStep::Pause { seconds: pause },
                    ScenarioStep::Rewind,
                    ScenarioStep::MoveTo {
                        target,
                        mode: MoveMode::Raw,
                    },
                    ScenarioStep::Pause { seconds: pause },
                ]
            })
            .collect();
        Self::new(steps, profile)
    }

    /// The scripted steps.
    #[must_use]
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Finished moves so far.
    #[must_use]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Whether every step has completed or the scenario was cancelled.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.active.is_none() && self.next >= self.steps.len()
    }

    /// Cancels the running task and drops the remaining steps.
    pub fn cancel(&mut self) {
        if let Some(Active::Moving {
            mut task,
            mode,
            seconds,
        }) = self.active.take()
        {
            task.cancel();
            self.finish_move(&task, mode, seconds);
        }
        self.next = self.steps.len();
    }

    /// Advances the scenario by `dt` seconds with the agent pivot at
    /// `position`, returning the next command to apply, if any.
    pub fn tick(&mut self, dt: f32, position: Vec3) -> Option<ScenarioCommand> {
        loop {
            match self.active.take() {
                Some(Active::Moving {
                    mut task,
                    mode,
                    seconds,
                }) => {
                    let elapsed = seconds + dt;
                    if task.poll(position) == TaskStatus::Pending {
                        self.active = Some(Active::Moving {
                            task,
                            mode,
                            seconds: elapsed,
                        });
                        return None;
                    }
                    self.finish_move(&task, mode, elapsed);
                }
                Some(Active::Pausing(remaining)) => {
                    let left = remaining - dt;
                    if left > 0.0 {
                        self.active = Some(Active::Pausing(left));
                        return None;
                    }
                }
                None => {}
            }

            let step = *self.steps.get(self.next)?;
            self.next += 1;
            match step {
                ScenarioStep::MoveTo { target, mode } => {
                    debug!("scenario step {}: {mode:?} move to {target}", self.next);
                    self.active = Some(Active::Moving {
                        task: MoveTask::new(target, &self.profile),
                        mode,
                        seconds: 0.0,
                    });
                    return Some(match mode {
                        MoveMode::Smoothed => ScenarioCommand::SetDestination(target),
                        MoveMode::Raw => ScenarioCommand::SetRawDestination(target),
                    });
                }
                ScenarioStep::Pause { seconds } => {
                    self.active = Some(Active::Pausing(seconds));
                    return None;
                }
                ScenarioStep::Warp { position: to } => return Some(ScenarioCommand::Warp(to)),
                ScenarioStep::Checkpoint => self.checkpoint = Some(position),
                ScenarioStep::Rewind => {
                    if let Some(to) = self.checkpoint {
                        return Some(ScenarioCommand::Warp(to));
                    }
                    debug!("rewind without checkpoint; skipping");
                }
            }
        }
    }

    fn finish_move(&mut self, task: &MoveTask, mode: MoveMode, seconds: f32) {
        info!(
            "{mode:?} move to {} {:?} after {seconds:.2}s",
            task.target(),
            task.status()
        );
        self.records.push(MoveRecord {
            target: task.target(),
            mode,
            status: task.status(),
            seconds,
        });
    }
}

/// Failures loading a scenario description.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The JSON did not match the scenario schema.
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The embedded configuration is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The pause duration must be finite and non-negative.
    #[error("pause_secs must be finite and non-negative, got {0}")]
    InvalidPause(f32),
}

/// JSON description of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    /// Agent configuration.
    pub config: NavConfig,
    /// Floor blocks and recorded routes.
    pub floor: FloorLayout,
    /// Surface point the agent spawns on.
    pub start: Vec3,
    /// Destinations visited by the comparison run.
    pub stops: Vec<Vec3>,
    /// Pause after each run, in seconds.
    pub pause_secs: f32,
}

impl Default for ScenarioFile {
    fn default() -> Self {
        Self {
            config: NavConfig::default(),
            floor: FloorLayout::default(),
            start: Vec3::ZERO,
            stops: Vec::new(),
            pause_secs: 1.0,
        }
    }
}

impl ScenarioFile {
    /// Parses and validates a scenario from JSON text.
    ///
    /// # Errors
    /// Returns [`ScenarioError`] for malformed JSON or invalid values.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let file: Self = serde_json::from_str(text)?;
        file.validate()?;
        Ok(file)
    }

    /// Reads, parses and validates a scenario file.
    ///
    /// # Errors
    /// Returns [`ScenarioError`] when the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks the configuration and pause duration.
    ///
    /// # Errors
    /// Returns the first [`ScenarioError`] found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.config.validate()?;
        if !(self.pause_secs.is_finite() && self.pause_secs >= 0.0) {
            return Err(ScenarioError::InvalidPause(self.pause_secs));
        }
        Ok(())
    }

    /// The comparison scenario over this file's stops.
    #[must_use]
    pub fn scenario(&self) -> Scenario {
        Scenario::comparison(&self.stops, self.pause_secs, &self.config.agent)
    }

    /// L-shaped corridor: out to the far end of the bend and back again.
    #[must_use]
    pub fn demo() -> Self {
        let mut blocks = Vec::new();
        for x in 0..12 {
            for z in 0..12 {
                if z < 3 || x >= 9 {
                    blocks.push(Block::flat(x, z, 0));
                }
            }
        }
        let near = Vec3::new(1.5, 1.0, 1.5);
        let bend = Vec3::new(10.5, 1.0, 1.5);
        let far = Vec3::new(10.5, 1.0, 10.5);
        Self {
            config: NavConfig::default(),
            floor: FloorLayout {
                blocks,
                routes: vec![vec![near, bend, far], vec![far, bend, near]],
            },
            start: near,
            stops: vec![far, near],
            pause_secs: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn profile() -> AgentProfile {
        AgentProfile::default()
    }

    #[rstest]
    #[case::outside(Vec3::new(0.6, 0.0, 0.0), TaskStatus::Pending)]
    #[case::on_boundary(Vec3::new(0.5, 0.0, 0.0), TaskStatus::Pending)]
    #[case::inside(Vec3::new(0.49, 0.0, 0.0), TaskStatus::Arrived)]
    fn move_task_arrives_strictly_inside_radius(
        profile: AgentProfile,
        #[case] position: Vec3,
        #[case] expected: TaskStatus,
    ) {
        let mut task = MoveTask::new(Vec3::ZERO, &profile);
        assert_eq!(task.poll(position), expected);
    }

    #[rstest]
    fn move_task_target_is_lifted_by_offset() {
        let profile = AgentProfile {
            base_offset: 2.0,
            ..AgentProfile::default()
        };
        let mut task = MoveTask::new(Vec3::ZERO, &profile);
        assert_eq!(task.poll(Vec3::ZERO), TaskStatus::Pending);
        assert_eq!(task.poll(Vec3::Y * 2.0), TaskStatus::Arrived);
    }

    #[rstest]
    fn cancelled_task_never_arrives(profile: AgentProfile) {
        let mut task = MoveTask::new(Vec3::ZERO, &profile);
        task.cancel();
        assert_eq!(task.poll(Vec3::ZERO), TaskStatus::Cancelled);
    }

    #[rstest]
    fn comparison_expands_each_stop(profile: AgentProfile) {
        let scenario = Scenario::comparison(&[Vec3::X, Vec3::Z], 1.0, &profile);
        assert_eq!(scenario.steps().len(), 12);
        assert_eq!(scenario.steps().first(), Some(&ScenarioStep::Checkpoint));
        assert_eq!(
            scenario.steps().get(4),
            Some(&ScenarioStep::MoveTo {
                target: Vec3::X,
                mode: MoveMode::Raw
            })
        );
    }

    #[rstest]
    fn pause_waits_for_simulated_time(profile: AgentProfile) {
        let mut scenario = Scenario::new(
            vec![
                ScenarioStep::Pause { seconds: 0.25 },
                ScenarioStep::Warp { position: Vec3::X },
            ],
            &profile,
        );
        assert_eq!(scenario.tick(0.125, Vec3::ZERO), None);
        assert_eq!(scenario.tick(0.125, Vec3::ZERO), None);
        assert_eq!(
            scenario.tick(0.125, Vec3::ZERO),
            Some(ScenarioCommand::Warp(Vec3::X))
        );
        assert!(scenario.is_finished());
    }

    #[rstest]
    fn rewind_returns_to_checkpoint(profile: AgentProfile) {
        let start = Vec3::new(3.0, 1.0, 3.0);
        let mut scenario = Scenario::comparison(&[Vec3::X * 10.0], 0.0, &profile);
        assert_eq!(
            scenario.tick(0.1, start),
            Some(ScenarioCommand::SetDestination(Vec3::X * 10.0))
        );
        assert_eq!(scenario.tick(0.1, Vec3::X * 10.0), None);
        assert_eq!(
            scenario.tick(0.1, Vec3::X * 10.0),
            Some(ScenarioCommand::Warp(start))
        );
        assert_eq!(
            scenario.tick(0.1, start),
            Some(ScenarioCommand::SetRawDestination(Vec3::X * 10.0))
        );
        assert_eq!(scenario.records().len(), 1);
    }

    #[rstest]
    fn cancel_records_pending_move(profile: AgentProfile) {
        let mut scenario = Scenario::comparison(&[Vec3::X * 10.0], 0.0, &profile);
        scenario.tick(0.1, Vec3::ZERO);
        scenario.cancel();
        assert!(scenario.is_finished());
        assert_eq!(scenario.tick(0.1, Vec3::X * 10.0), None);
        assert_eq!(
            scenario.records().first().map(|r| r.status),
            Some(TaskStatus::Cancelled)
        );
    }

    #[rstest]
    fn scenario_file_fills_defaults() {
        let file = ScenarioFile::from_json(r#"{ "stops": [[1.0, 0.0, 1.0]] }"#)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(file.stops, vec![Vec3::new(1.0, 0.0, 1.0)]);
        assert_eq!(file.config, NavConfig::default());
    }

    #[rstest]
    #[case::bad_json("{ not json")]
    #[case::bad_damping(r#"{ "config": { "steering": { "damping": 2.0 } } }"#)]
    #[case::negative_pause(r#"{ "pause_secs": -1.0 }"#)]
    fn scenario_file_rejects_invalid_input(#[case] text: &str) {
        assert!(ScenarioFile::from_json(text).is_err());
    }

    #[rstest]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here.json");
        match ScenarioFile::load(path) {
            Err(ScenarioError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
