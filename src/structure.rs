use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use std::fmt;

use serde::de::{EnumAccess, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_xml_rs::from_reader;
use tracing::{debug, warn};

use crate::error::ConvertError;

const KNOWN_VERSIONS: [&str; 2] = ["2018b", "2020a"];

#[derive(Deserialize, Clone, Debug)]
#[serde(rename = "commonRoad")]
pub struct CommonRoadFile {
    #[serde(rename = "commonRoadVersion")]
    pub version: String,
    #[serde(rename = "benchmarkID")]
    pub benchmark_id: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub affiliation: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "timeStepSize")]
    pub time_step_size: f64,
    pub location: Option<Location>,
    /// 2018b tags, a whitespace separated attribute.
    pub tags: Option<String>,
    #[serde(rename = "scenarioTags")]
    pub scenario_tags: Option<ScenarioTags>,
    #[serde(rename = "lanelet", default)]
    pub lanelets: Vec<Lanelet>,
    #[serde(rename = "trafficSign", default)]
    pub traffic_signs: Vec<TrafficSign>,
    #[serde(rename = "trafficLight", default)]
    pub traffic_lights: Vec<TrafficLight>,
    #[serde(rename = "intersection", default)]
    pub intersections: Vec<Intersection>,
    #[serde(rename = "staticObstacle", default)]
    pub static_obstacles: Vec<StaticObstacle>,
    #[serde(rename = "dynamicObstacle", default)]
    pub dynamic_obstacles: Vec<DynamicObstacle>,
    /// 2018b obstacles; `role` tells static and dynamic ones apart.
    #[serde(rename = "obstacle", default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(rename = "planningProblem", default)]
    pub planning_problems: Vec<PlanningProblem>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Location {
    #[serde(rename = "geoNameId")]
    pub geo_name_id: Option<i64>,
    #[serde(rename = "gpsLatitude")]
    pub gps_latitude: Option<f64>,
    #[serde(rename = "gpsLongitude")]
    pub gps_longitude: Option<f64>,
}

/// Name of an empty child element, `Urban` for `<Urban/>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementName(pub String);

impl<'de> Deserialize<'de> for ElementName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NameVisitor;

        impl<'de> Visitor<'de> for NameVisitor {
            type Value = ElementName;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an empty element")
            }

            fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
                let (name, variant): (String, _) = data.variant()?;
                variant.unit_variant()?;
                Ok(ElementName(name))
            }
        }

        deserializer.deserialize_enum("ElementName", &[], NameVisitor)
    }
}

/// `<scenarioTags>`: one empty element per tag, spelled `urban` or `Urban`
/// depending on the writer.
#[derive(Deserialize, Clone, Debug)]
pub struct ScenarioTags {
    #[serde(rename = "$value", default)]
    pub names: Vec<ElementName>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// `ref` attribute pointing at another element's id.
#[derive(Deserialize, Clone, Debug)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub id: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Adjacent {
    #[serde(rename = "ref")]
    pub id: u32,
    #[serde(rename = "drivingDir")]
    pub driving_dir: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Bound {
    #[serde(rename = "point", default)]
    pub points: Vec<Point>,
    #[serde(rename = "lineMarking")]
    pub line_marking: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StopLine {
    #[serde(rename = "point", default)]
    pub points: Vec<Point>,
    #[serde(rename = "lineMarking")]
    pub line_marking: String,
    #[serde(rename = "trafficSignRef", default)]
    pub traffic_sign_refs: Vec<Ref>,
    #[serde(rename = "trafficLightRef")]
    pub traffic_light_ref: Option<Ref>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Lanelet {
    pub id: u32,
    #[serde(rename = "leftBound")]
    pub left_bound: Bound,
    #[serde(rename = "rightBound")]
    pub right_bound: Bound,
    #[serde(rename = "predecessor", default)]
    pub predecessors: Vec<Ref>,
    #[serde(rename = "successor", default)]
    pub successors: Vec<Ref>,
    #[serde(rename = "adjacentLeft")]
    pub adjacent_left: Option<Adjacent>,
    #[serde(rename = "adjacentRight")]
    pub adjacent_right: Option<Adjacent>,
    #[serde(rename = "stopLine")]
    pub stop_line: Option<StopLine>,
    #[serde(rename = "laneletType", default)]
    pub lanelet_types: Vec<String>,
    #[serde(rename = "userOneWay", default)]
    pub user_one_way: Vec<String>,
    #[serde(rename = "userBidirectional", default)]
    pub user_bidirectional: Vec<String>,
    #[serde(rename = "trafficSignRef", default)]
    pub traffic_sign_refs: Vec<Ref>,
    #[serde(rename = "trafficLightRef", default)]
    pub traffic_light_refs: Vec<Ref>,
    /// 2018b only; later versions model speed limits as traffic signs.
    #[serde(rename = "speedLimit")]
    pub speed_limit: Option<f64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TrafficSignElement {
    #[serde(rename = "trafficSignID")]
    pub sign_id: String,
    #[serde(rename = "additionalValue", default)]
    pub additional_values: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TrafficSign {
    pub id: u32,
    #[serde(rename = "trafficSignElement", default)]
    pub elements: Vec<TrafficSignElement>,
    pub position: Option<Position>,
    #[serde(rename = "virtual")]
    pub is_virtual: Option<bool>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CycleElement {
    pub duration: u32,
    pub color: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TrafficLightCycle {
    #[serde(rename = "cycleElement", default)]
    pub elements: Vec<CycleElement>,
    #[serde(rename = "timeOffset")]
    pub time_offset: Option<u32>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TrafficLight {
    pub id: u32,
    pub cycle: Option<TrafficLightCycle>,
    pub position: Option<Position>,
    pub direction: Option<String>,
    pub active: Option<bool>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Incoming {
    pub id: u32,
    #[serde(rename = "incomingLanelet", default)]
    pub incoming_lanelets: Vec<Ref>,
    #[serde(rename = "successorsRight", default)]
    pub successors_right: Vec<Ref>,
    #[serde(rename = "successorsStraight", default)]
    pub successors_straight: Vec<Ref>,
    #[serde(rename = "successorsLeft", default)]
    pub successors_left: Vec<Ref>,
    #[serde(rename = "isLeftOf")]
    pub is_left_of: Option<Ref>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Crossing {
    #[serde(rename = "crossingLanelet", default)]
    pub lanelets: Vec<Ref>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Intersection {
    pub id: u32,
    #[serde(rename = "incoming", default)]
    pub incomings: Vec<Incoming>,
    pub crossing: Option<Crossing>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Rectangle {
    pub length: f64,
    pub width: f64,
    pub orientation: Option<f64>,
    pub center: Option<Point>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Circle {
    pub radius: f64,
    pub center: Option<Point>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Polygon {
    #[serde(rename = "point", default)]
    pub points: Vec<Point>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Shape {
    #[serde(rename = "rectangle", default)]
    pub rectangles: Vec<Rectangle>,
    #[serde(rename = "circle", default)]
    pub circles: Vec<Circle>,
    #[serde(rename = "polygon", default)]
    pub polygons: Vec<Polygon>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Position {
    pub point: Option<Point>,
    #[serde(rename = "rectangle", default)]
    pub rectangles: Vec<Rectangle>,
    #[serde(rename = "circle", default)]
    pub circles: Vec<Circle>,
    #[serde(rename = "polygon", default)]
    pub polygons: Vec<Polygon>,
    #[serde(rename = "lanelet", default)]
    pub lanelets: Vec<Ref>,
}

/// `<exact>` or `<intervalStart>`/`<intervalEnd>` with a floating point value.
#[derive(Deserialize, Clone, Debug)]
pub struct FloatValue {
    pub exact: Option<f64>,
    #[serde(rename = "intervalStart")]
    pub interval_start: Option<f64>,
    #[serde(rename = "intervalEnd")]
    pub interval_end: Option<f64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct IntegerValue {
    pub exact: Option<i32>,
    #[serde(rename = "intervalStart")]
    pub interval_start: Option<i32>,
    #[serde(rename = "intervalEnd")]
    pub interval_end: Option<i32>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct State {
    pub position: Option<Position>,
    pub orientation: Option<FloatValue>,
    pub time: IntegerValue,
    pub velocity: Option<FloatValue>,
    pub acceleration: Option<FloatValue>,
    #[serde(rename = "yawRate")]
    pub yaw_rate: Option<FloatValue>,
    #[serde(rename = "slipAngle")]
    pub slip_angle: Option<FloatValue>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StaticObstacle {
    pub id: u32,
    #[serde(rename = "type")]
    pub obstacle_type: String,
    pub shape: Shape,
    #[serde(rename = "initialState")]
    pub initial_state: State,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Trajectory {
    #[serde(rename = "state", default)]
    pub states: Vec<State>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Occupancy {
    pub shape: Shape,
    pub time: IntegerValue,
}

#[derive(Deserialize, Clone, Debug)]
pub struct OccupancySet {
    #[serde(rename = "occupancy", default)]
    pub occupancies: Vec<Occupancy>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SignalState {
    pub time: IntegerValue,
    pub horn: Option<bool>,
    #[serde(rename = "indicatorLeft")]
    pub indicator_left: Option<bool>,
    #[serde(rename = "indicatorRight")]
    pub indicator_right: Option<bool>,
    #[serde(rename = "brakingLights")]
    pub braking_lights: Option<bool>,
    #[serde(rename = "hazardWarningLights")]
    pub hazard_warning_lights: Option<bool>,
    #[serde(rename = "flashingBlueLights")]
    pub flashing_blue_lights: Option<bool>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SignalSeries {
    #[serde(rename = "signalState", default)]
    pub states: Vec<SignalState>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DynamicObstacle {
    pub id: u32,
    #[serde(rename = "type")]
    pub obstacle_type: String,
    pub shape: Shape,
    #[serde(rename = "initialState")]
    pub initial_state: State,
    pub trajectory: Option<Trajectory>,
    #[serde(rename = "occupancySet")]
    pub occupancy_set: Option<OccupancySet>,
    #[serde(rename = "initialSignalState")]
    pub initial_signal_state: Option<SignalState>,
    #[serde(rename = "signalSeries")]
    pub signal_series: Option<SignalSeries>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Obstacle {
    pub id: u32,
    pub role: String,
    #[serde(rename = "type")]
    pub obstacle_type: String,
    pub shape: Shape,
    #[serde(rename = "initialState")]
    pub initial_state: State,
    pub trajectory: Option<Trajectory>,
    #[serde(rename = "occupancySet")]
    pub occupancy_set: Option<OccupancySet>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PlanningProblem {
    pub id: u32,
    #[serde(rename = "initialState")]
    pub initial_state: State,
    #[serde(rename = "goalState", default)]
    pub goal_states: Vec<State>,
}

pub fn parse_xml_file(path: &Path) -> Result<CommonRoadFile, ConvertError> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let reader = BufReader::new(file);
    let document: CommonRoadFile = from_reader(reader)?;

    if !KNOWN_VERSIONS.contains(&document.version.as_str()) {
        warn!(
            "Unrecognized CommonRoad version {} in {:?}",
            document.version, path
        );
    }

    debug!(
        "Read {} lanelets, {} obstacles, {} planning problems from {:?}",
        document.lanelets.len(),
        document.static_obstacles.len()
            + document.dynamic_obstacles.len()
            + document.obstacles.len(),
        document.planning_problems.len(),
        path
    );

    Ok(document)
}
