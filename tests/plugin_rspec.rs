//! Behaviour tests for `SmoothNavPlugin` using rust-rspec.
//!
//! Agents travel the L-shaped demo corridor inside a Bevy app, either along
//! their own smoothed path or along raw corners driven by the autopilot.

use glam::Vec3;
use rspec::block::Context as Scenario;
use smooth_nav::scenario::{MoveMode, ScenarioFile};
use smooth_nav::steering::MotionState;
use smooth_nav::surface::FloorPlan;
use smooth_nav::NavConfig;
use test_utils::{assert_vec3_near, run_serial, NavHarness};

const MAX_TICKS: usize = 3_000;

fn near() -> Vec3 {
    Vec3::new(1.5, 1.0, 1.5)
}

fn bend() -> Vec3 {
    Vec3::new(10.5, 1.0, 1.5)
}

fn far() -> Vec3 {
    Vec3::new(10.5, 1.0, 10.5)
}

fn corridor() -> NavHarness {
    let mut harness =
        NavHarness::default().with_surface(FloorPlan::from(ScenarioFile::demo().floor));
    harness.spawn_agent(NavConfig::default(), near());
    harness
}

fn arrive_smoothed(harness: &mut NavHarness) {
    if !harness.smooth_agent().waypoints().is_empty() {
        return;
    }
    harness.request(far(), MoveMode::Smoothed);
    harness.tick_until(MAX_TICKS, |agent, _| agent.state() == MotionState::Idle);
}

#[test]
fn smoothed_request_reaches_the_far_end() {
    run_serial(&rspec::given(
        "an agent at the near end of the corridor",
        corridor(),
        |scenario: &mut Scenario<NavHarness>| {
            scenario.before_each(arrive_smoothed);

            scenario.then("the agent ends within its radius of the target", |harness| {
                let radius = harness.smooth_agent().config().agent.radius;
                assert!(harness.position().distance(far()) <= radius);
            });

            scenario.then("the path ends at the requested target", |harness| {
                assert_eq!(harness.smooth_agent().waypoints().last(), Some(far()));
            });

            scenario.then("the published snapshot is finished", |harness| {
                let snapshot = harness
                    .snapshot()
                    .unwrap_or_else(|| panic!("no snapshot published"));
                assert!(snapshot.is_finished());
                assert_eq!(snapshot.points.len(), harness.smooth_agent().waypoints().len());
            });

            scenario.then("the autopilot never engaged", |harness| {
                assert!(!harness.autopilot_active());
            });
        },
    ));
}

#[test]
fn raw_request_hands_travel_to_the_autopilot() {
    let harness = corridor();
    harness.request(far(), MoveMode::Raw);

    run_serial(&rspec::given(
        "a raw request towards the far end",
        harness,
        |scenario: &mut Scenario<NavHarness>| {
            scenario.then("the raw corners are kept for display", |harness| {
                let agent = harness.smooth_agent();
                assert_eq!(agent.waypoints().as_slice(), &[near(), bend(), far()]);
            });

            scenario.then("the smooth controller stays idle", |harness| {
                let agent = harness.smooth_agent();
                assert_eq!(agent.state(), MotionState::Idle);
                assert_eq!(agent.cursor(), agent.waypoints().len());
            });

            scenario.when("the app runs until the autopilot stops", |scenario| {
                scenario.before_each(|harness| {
                    harness.tick_until(MAX_TICKS, |_, position| position == far());
                });

                scenario.then("the agent stands on the final corner", |harness| {
                    assert_vec3_near(harness.position(), far(), 1e-4);
                    assert!(!harness.autopilot_active());
                });
            });
        },
    ));
}

#[test]
fn failed_request_keeps_the_previous_path() {
    let mut harness = corridor();
    arrive_smoothed(&mut harness);
    let before = harness.smooth_agent().waypoints().clone();
    harness.request(Vec3::new(4.5, 1.0, 8.5), MoveMode::Smoothed);

    run_serial(&rspec::given(
        "an unreachable target after a completed trip",
        harness,
        |scenario: &mut Scenario<NavHarness>| {
            scenario.then("the previous waypoints are still in place", move |harness| {
                assert_eq!(harness.smooth_agent().waypoints(), &before);
            });

            scenario.then("the agent stays where it stopped", |harness| {
                let position = harness.position();
                harness.tick(5);
                assert_vec3_near(harness.position(), position, 1e-6);
            });
        },
    ));
}
