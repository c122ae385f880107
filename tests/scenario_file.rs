//! Loading scenario descriptions from JSON.

use std::path::{Path, PathBuf};

use glam::Vec3;
use rstest::rstest;
use smooth_nav::scenario::{ScenarioError, ScenarioFile, ScenarioStep};
use smooth_nav::surface::{AreaMask, FloorPlan, NavigationSurface};
use smooth_nav::ConfigError;

fn bundled() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/l_corridor.json")
}

#[rstest]
fn bundled_corridor_loads_with_overrides() {
    let file = ScenarioFile::load(&bundled()).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(file.config.smoothing.samples_per_curve, 12);
    assert!((file.config.agent.radius - 0.4).abs() < f32::EPSILON);
    assert_eq!(file.floor.blocks.len(), 63);
    assert_eq!(file.stops.len(), 2);
    assert_eq!(file.scenario().steps().first(), Some(&ScenarioStep::Checkpoint));
}

#[rstest]
fn bundled_corridor_routes_around_the_bend() {
    let file = ScenarioFile::load(&bundled()).unwrap_or_else(|e| panic!("{e}"));
    let floor = FloorPlan::from(file.floor);
    let far = Vec3::new(10.5, 1.0, 10.5);

    let corners = floor
        .compute_path(file.start, far, AreaMask::ALL)
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(
        corners.as_slice(),
        &[file.start, Vec3::new(10.5, 1.0, 1.5), far]
    );
}

#[rstest]
fn omitted_sections_take_defaults() {
    let file = ScenarioFile::from_json(r#"{ "stops": [[1.0, 0.0, 2.0]] }"#)
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(file.stops, vec![Vec3::new(1.0, 0.0, 2.0)]);
    assert!((file.pause_secs - 1.0).abs() < f32::EPSILON);
    assert!(file.floor.blocks.is_empty());
}

#[rstest]
fn invalid_configuration_is_reported() {
    let result = ScenarioFile::from_json(r#"{ "config": { "steering": { "damping": 1.0 } } }"#);
    assert!(matches!(
        result,
        Err(ScenarioError::Config(ConfigError::OutOfRange { .. }))
    ));
}

#[rstest]
fn malformed_json_is_a_parse_error() {
    let result = ScenarioFile::from_json("{ stops: ");
    assert!(matches!(result, Err(ScenarioError::Parse(_))));
}

#[rstest]
fn missing_file_names_the_path() {
    let path = Path::new("demos/does_not_exist.json");
    let err = ScenarioFile::load(path).err().unwrap_or_else(|| panic!("load succeeded"));
    assert!(err.to_string().contains("does_not_exist.json"), "{err}");
}
