use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use commonroad_pb_converter::commonroad_pb::{
    self as pb, dynamic_obstacle::Prediction, integer_exact_or_interval,
    obstacle_type_enum::ObstacleType, scenario_tag_enum::ScenarioTag, state,
};
use commonroad_pb_converter::reader::{CommonRoadFileReader, ScenarioReader};
use commonroad_pb_converter::{convert_file, ConvertError, FileFormat};
use prost::Message;
use tempfile::TempDir;

const FIXTURE: &str = "ZAM_Intersection-1_1_T-1.xml";
const LEGACY_FIXTURE: &str = "ZAM_Legacy-1_1_T-1.xml";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Copies a fixture into a fresh directory so outputs land next to it.
fn staged(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::copy(fixture_path(name), &path).unwrap();
    (dir, path)
}

fn staged_fixture() -> (TempDir, PathBuf) {
    staged(FIXTURE)
}

fn converter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_commonroad-pb-converter"))
}

fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn converts_next_to_the_input() {
    let (dir, input) = staged_fixture();
    let original = fs::read(&input).unwrap();

    let output = convert_file(&input).unwrap();

    assert_eq!(output, dir.path().join("ZAM_Intersection-1_1_T-1.pb"));
    assert_eq!(dir_entries(dir.path()), vec![output.clone(), input.clone()]);
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn written_file_holds_the_whole_scenario() {
    let (_dir, input) = staged_fixture();

    let output = convert_file(&input).unwrap();
    let commonroad = pb::CommonRoad::decode(fs::read(&output).unwrap().as_slice()).unwrap();

    assert_eq!(commonroad.information.benchmark_id, "ZAM_Intersection-1_1_T-1");
    assert_eq!(commonroad.information.commonroad_version, "2020a");
    assert_eq!(commonroad.information.time_step_size, 0.1);
    assert_eq!(commonroad.information.author.as_deref(), Some("Test Author"));
    assert_eq!(commonroad.location.as_ref().unwrap().geo_name_id, Some(-999));
    assert_eq!(
        commonroad.scenario_tags,
        vec![
            i32::from(ScenarioTag::Urban),
            i32::from(ScenarioTag::Intersection),
            i32::from(ScenarioTag::TurnLeft),
        ]
    );

    assert_eq!(commonroad.lanelets.len(), 3);
    let first = &commonroad.lanelets[0];
    assert_eq!(first.successors, vec![2]);
    assert_eq!(first.adjacent_left, Some(3));
    assert_eq!(first.stop_line.as_ref().unwrap().traffic_light_ref, Some(301));
    assert_eq!(first.traffic_sign_refs, vec![201]);

    assert_eq!(commonroad.traffic_signs[0].traffic_sign_elements[0].traffic_sign_id, "274");
    assert_eq!(commonroad.traffic_lights[0].cycle_elements.len(), 4);
    assert_eq!(commonroad.traffic_lights[0].time_offset, Some(10));
    assert_eq!(commonroad.intersections[0].incomings[0].successors_straight, vec![2]);

    assert_eq!(
        commonroad.static_obstacles[0].obstacle_type(),
        ObstacleType::ParkedVehicle
    );
    let dynamic = &commonroad.dynamic_obstacles[0];
    assert_eq!(dynamic.obstacle_type(), ObstacleType::Car);
    assert_eq!(
        dynamic.initial_signal_state.as_ref().unwrap().indicator_left,
        Some(true)
    );
    match &dynamic.prediction {
        Some(Prediction::TrajectoryPrediction(prediction)) => {
            assert_eq!(prediction.trajectory.initial_time_step, 1);
            assert_eq!(prediction.trajectory.states.len(), 2);
        }
        other => panic!("unexpected prediction {:?}", other),
    }

    let goal = &commonroad.planning_problems[0].goal_states[0];
    assert_eq!(
        goal.time_step.exact_or_interval,
        Some(integer_exact_or_interval::ExactOrInterval::Interval(
            pb::IntegerInterval { start: 20, end: 40 }
        ))
    );
    assert_eq!(
        goal.position,
        Some(state::Position::Lanelets(pb::LaneletRefs {
            lanelet_ids: vec![2]
        }))
    );
}

#[test]
fn protobuf_output_reads_back_unchanged() {
    let (_dir, input) = staged_fixture();
    let reader = CommonRoadFileReader;

    let (scenario, problems) = reader.read(&input, FileFormat::Xml).unwrap();
    let output = convert_file(&input).unwrap();
    let (restored, restored_problems) = reader.read(&output, FileFormat::Protobuf).unwrap();

    assert_eq!(
        restored.to_commonroad(&restored_problems),
        scenario.to_commonroad(&problems)
    );
    assert_eq!(restored.source(), Some(output.as_path()));
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.xml");

    let err = convert_file(&input).unwrap_err();

    assert!(matches!(err, ConvertError::MissingInput(ref path) if *path == input));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn malformed_xml_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.xml");
    fs::write(&input, "<commonRoad benchmarkID=\"x\"><lanelet id=\"1\">").unwrap();

    let err = convert_file(&input).unwrap_err();

    assert!(matches!(err, ConvertError::Xml(_)));
    assert_eq!(dir_entries(dir.path()), vec![input]);
}

#[test]
fn invalid_content_leaves_no_output() {
    let (dir, input) = staged_fixture();
    let xml = fs::read_to_string(&input)
        .unwrap()
        .replace("<type>car</type>", "<type>hovercraft</type>");
    fs::write(&input, xml).unwrap();

    let err = convert_file(&input).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid scenario: dynamic obstacle 601: unknown obstacle type 'hovercraft'"
    );
    assert_eq!(dir_entries(dir.path()), vec![input]);
}

#[test]
fn protobuf_input_is_not_overwritten() {
    let (_dir, input) = staged_fixture();
    let output = convert_file(&input).unwrap();
    let converter = commonroad_pb_converter::Converter::with_formats(
        CommonRoadFileReader,
        commonroad_pb_converter::writer::CommonRoadFileWriter,
        FileFormat::Protobuf,
        FileFormat::Protobuf,
    );

    let err = converter.convert(&output).unwrap_err();

    assert!(matches!(err, ConvertError::WouldOverwriteInput(_)));
}

#[test]
fn one_status_line_names_the_input() {
    let (_dir, input) = staged_fixture();
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_writer(buffer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || convert_file(&input)).unwrap();

    let output = buffer.contents();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1, "unexpected output: {}", output);
    assert!(lines[0].contains(&format!("converting {}", input.display())));
}

#[test]
fn legacy_obstacles_are_converted_by_role() {
    let (_dir, input) = staged(LEGACY_FIXTURE);

    let output = convert_file(&input).unwrap();
    let commonroad = pb::CommonRoad::decode(fs::read(&output).unwrap().as_slice()).unwrap();

    assert_eq!(commonroad.information.commonroad_version, "2018b");
    assert_eq!(
        commonroad.scenario_tags,
        vec![i32::from(ScenarioTag::Urban), i32::from(ScenarioTag::MultiLane)]
    );
    assert_eq!(commonroad.static_obstacles.len(), 1);
    assert_eq!(commonroad.static_obstacles[0].static_obstacle_id, 10);
    assert_eq!(
        commonroad.static_obstacles[0].obstacle_type(),
        ObstacleType::ParkedVehicle
    );
    assert_eq!(commonroad.dynamic_obstacles.len(), 1);
    let dynamic = &commonroad.dynamic_obstacles[0];
    assert_eq!(dynamic.dynamic_obstacle_id, 11);
    match &dynamic.prediction {
        Some(Prediction::TrajectoryPrediction(prediction)) => {
            assert_eq!(prediction.trajectory.initial_time_step, 1);
            assert_eq!(prediction.trajectory.states.len(), 1);
        }
        other => panic!("unexpected prediction {:?}", other),
    }
    assert_eq!(commonroad.planning_problems.len(), 1);
}

#[test]
fn binary_exits_zero_after_converting() {
    let (dir, input) = staged_fixture();

    let result = converter().arg(&input).output().unwrap();

    assert_eq!(result.status.code(), Some(0));
    assert!(dir.path().join("ZAM_Intersection-1_1_T-1.pb").exists());
    let stdout = String::from_utf8(result.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "unexpected output: {}", stdout);
    let (prefix, rest) = lines[0].split_once("converting ").unwrap();
    assert_eq!(rest, input.display().to_string());
    assert!(!prefix.contains(':'), "status line carries a timestamp: {}", lines[0]);
}

#[test]
fn binary_exits_one_for_a_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.xml");

    let result = converter().arg(&input).output().unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn binary_exits_two_without_a_path() {
    let result = converter().output().unwrap();

    assert_eq!(result.status.code(), Some(2));
    assert!(!result.stderr.is_empty());
}
