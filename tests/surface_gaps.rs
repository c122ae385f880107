//! Smoothed travel over a surface with gaps next to the route.

use glam::Vec3;
use rstest::{fixture, rstest};
use smooth_nav::smoothing::SmoothingError;
use smooth_nav::surface::SurfaceError;
use smooth_nav::{NavConfig, SmoothAgent};
use test_utils::{run_until_idle, KinematicBody, OpenSurface};

const GAP_MIN: (f32, f32) = (4.01, 0.3);
const GAP_MAX: (f32, f32) = (5.0, 3.7);

fn in_gap(point: Vec3) -> bool {
    (GAP_MIN.0..=GAP_MAX.0).contains(&point.x) && (GAP_MIN.1..=GAP_MAX.1).contains(&point.z)
}

fn bends() -> [Vec3; 2] {
    [Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 4.0)]
}

fn destination() -> Vec3 {
    Vec3::new(0.0, 0.0, 4.0)
}

#[fixture]
fn agent() -> SmoothAgent {
    SmoothAgent::new(NavConfig::default()).unwrap_or_else(|e| panic!("config: {e}"))
}

#[rstest]
fn waypoints_over_a_gap_are_dropped(mut agent: SmoothAgent) {
    let open = OpenSurface::flat(0.0).with_via(bends());
    let gapped = open.clone().with_hole(GAP_MIN, GAP_MAX);
    let full_len = agent
        .set_destination(&open, Vec3::ZERO, destination())
        .unwrap_or_else(|e| panic!("{e}"))
        .len();
    assert!(agent.waypoints().as_slice().iter().any(|p| in_gap(*p)));

    let path = agent
        .set_destination(&gapped, Vec3::ZERO, destination())
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(path.len() < full_len);
    assert!(path.as_slice().iter().all(|p| !in_gap(*p)));
    assert_eq!(path.last(), Some(destination()));
}

#[rstest]
fn agent_still_arrives_after_dropped_waypoints(mut agent: SmoothAgent) {
    let surface = OpenSurface::flat(0.0)
        .with_via(bends())
        .with_hole(GAP_MIN, GAP_MAX);
    let mut body = KinematicBody::at(Vec3::ZERO);
    agent
        .set_destination(&surface, Vec3::ZERO, destination())
        .unwrap_or_else(|e| panic!("{e}"));

    let ticks = run_until_idle(&mut agent, &mut body, 1.0 / 60.0, 5_000);

    assert!(ticks > 1);
    assert_eq!(agent.cursor(), agent.waypoints().len());
    assert!(body.position.distance(destination()) <= agent.config().agent.radius);
}

#[rstest]
fn destination_inside_a_hole_is_rejected(mut agent: SmoothAgent) {
    let surface = OpenSurface::flat(0.0).with_hole((-1.0, 3.0), (1.0, 5.0));

    let result = agent.set_destination(&surface, Vec3::ZERO, destination());

    assert_eq!(
        result.err(),
        Some(SmoothingError::Surface(SurfaceError::NoPath {
            start: Vec3::ZERO,
            end: destination(),
        }))
    );
    assert!(agent.waypoints().is_empty());
}
