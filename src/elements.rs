use std::str::FromStr;

use crate::commonroad_pb::{
    self as pb, driving_dir_enum::DrivingDir, dynamic_obstacle::Prediction,
    float_exact_or_interval, integer_exact_or_interval, lanelet_type_enum::LaneletType,
    line_marking_enum::LineMarking, obstacle_type_enum::ObstacleType, road_user_enum::RoadUser,
    scenario_tag_enum::ScenarioTag, shape, state,
    traffic_light_color_enum::TrafficLightColor,
    traffic_light_direction_enum::TrafficLightDirection,
};
use crate::error::ParseError;
use crate::structure;

fn unknown(kind: &str, value: &str) -> ParseError {
    ParseError::new(&format!("unknown {} '{}'", kind, value))
}

impl FromStr for LineMarking {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashed" => Ok(LineMarking::Dashed),
            "solid" => Ok(LineMarking::Solid),
            "broad_dashed" => Ok(LineMarking::BroadDashed),
            "broad_solid" => Ok(LineMarking::BroadSolid),
            "unknown" => Ok(LineMarking::Unknown),
            "no_marking" => Ok(LineMarking::NoMarking),
            _ => Err(unknown("line marking", s)),
        }
    }
}

impl FromStr for DrivingDir {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same" => Ok(DrivingDir::Same),
            "opposite" => Ok(DrivingDir::Opposite),
            _ => Err(unknown("driving direction", s)),
        }
    }
}

impl FromStr for LaneletType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(LaneletType::Unknown),
            "urban" => Ok(LaneletType::Urban),
            "country" => Ok(LaneletType::Country),
            "highway" => Ok(LaneletType::Highway),
            "driveWay" => Ok(LaneletType::DriveWay),
            "mainCarriageWay" => Ok(LaneletType::MainCarriageWay),
            "accessRamp" => Ok(LaneletType::AccessRamp),
            "exitRamp" => Ok(LaneletType::ExitRamp),
            "shoulder" => Ok(LaneletType::Shoulder),
            "busLane" => Ok(LaneletType::BusLane),
            "busStop" => Ok(LaneletType::BusStop),
            "bicycleLane" => Ok(LaneletType::BicycleLane),
            "sidewalk" => Ok(LaneletType::Sidewalk),
            "crosswalk" => Ok(LaneletType::Crosswalk),
            "interstate" => Ok(LaneletType::Interstate),
            "intersection" => Ok(LaneletType::Intersection),
            _ => Err(unknown("lanelet type", s)),
        }
    }
}

impl FromStr for RoadUser {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(RoadUser::Vehicle),
            "car" => Ok(RoadUser::Car),
            "truck" => Ok(RoadUser::Truck),
            "bus" => Ok(RoadUser::Bus),
            "priorityVehicle" => Ok(RoadUser::PriorityVehicle),
            "motorcycle" => Ok(RoadUser::Motorcycle),
            "bicycle" => Ok(RoadUser::Bicycle),
            "pedestrian" => Ok(RoadUser::Pedestrian),
            "train" => Ok(RoadUser::Train),
            "taxi" => Ok(RoadUser::Taxi),
            _ => Err(unknown("road user", s)),
        }
    }
}

impl FromStr for ObstacleType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ObstacleType::Unknown),
            "car" => Ok(ObstacleType::Car),
            "truck" => Ok(ObstacleType::Truck),
            "bus" => Ok(ObstacleType::Bus),
            "bicycle" => Ok(ObstacleType::Bicycle),
            "pedestrian" => Ok(ObstacleType::Pedestrian),
            "priorityVehicle" => Ok(ObstacleType::PriorityVehicle),
            "parkedVehicle" => Ok(ObstacleType::ParkedVehicle),
            "constructionZone" => Ok(ObstacleType::ConstructionZone),
            "train" => Ok(ObstacleType::Train),
            "roadBoundary" => Ok(ObstacleType::RoadBoundary),
            "motorcycle" => Ok(ObstacleType::Motorcycle),
            "taxi" => Ok(ObstacleType::Taxi),
            "building" => Ok(ObstacleType::Building),
            "pillar" => Ok(ObstacleType::Pillar),
            "median_strip" => Ok(ObstacleType::MedianStrip),
            _ => Err(unknown("obstacle type", s)),
        }
    }
}

impl FromStr for TrafficLightColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(TrafficLightColor::Red),
            "redYellow" => Ok(TrafficLightColor::RedYellow),
            "green" => Ok(TrafficLightColor::Green),
            "yellow" => Ok(TrafficLightColor::Yellow),
            "inactive" => Ok(TrafficLightColor::Inactive),
            _ => Err(unknown("traffic light color", s)),
        }
    }
}

impl FromStr for TrafficLightDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(TrafficLightDirection::Right),
            "straight" => Ok(TrafficLightDirection::Straight),
            "left" => Ok(TrafficLightDirection::Left),
            "leftStraight" => Ok(TrafficLightDirection::LeftStraight),
            "straightRight" => Ok(TrafficLightDirection::StraightRight),
            "leftRight" => Ok(TrafficLightDirection::LeftRight),
            "all" => Ok(TrafficLightDirection::All),
            _ => Err(unknown("traffic light direction", s)),
        }
    }
}

fn parse_all<T>(values: &[String]) -> Result<Vec<i32>, ParseError>
where
    T: FromStr<Err = ParseError> + Into<i32>,
{
    values
        .iter()
        .map(|v| v.parse::<T>().map(Into::into))
        .collect()
}

fn ids(refs: &[structure::Ref]) -> Vec<u32> {
    refs.iter().map(|r| r.id).collect()
}

impl From<&structure::Point> for pb::Point {
    fn from(value: &structure::Point) -> Self {
        pb::Point {
            x: value.x,
            y: value.y,
        }
    }
}

impl TryFrom<&structure::FloatValue> for pb::FloatExactOrInterval {
    type Error = ParseError;

    fn try_from(value: &structure::FloatValue) -> Result<Self, Self::Error> {
        use float_exact_or_interval::ExactOrInterval;

        let exact_or_interval = match (value.exact, value.interval_start, value.interval_end) {
            (Some(exact), None, None) => ExactOrInterval::Exact(exact),
            (None, Some(start), Some(end)) if start <= end => {
                ExactOrInterval::Interval(pb::FloatInterval { start, end })
            }
            (None, Some(start), Some(end)) => {
                return Err(ParseError::new(&format!(
                    "interval start {} exceeds end {}",
                    start, end
                )))
            }
            _ => {
                return Err(ParseError::new(
                    "expected either an exact value or a complete interval",
                ))
            }
        };
        Ok(pb::FloatExactOrInterval {
            exact_or_interval: Some(exact_or_interval),
        })
    }
}

impl TryFrom<&structure::IntegerValue> for pb::IntegerExactOrInterval {
    type Error = ParseError;

    fn try_from(value: &structure::IntegerValue) -> Result<Self, Self::Error> {
        use integer_exact_or_interval::ExactOrInterval;

        let exact_or_interval = match (value.exact, value.interval_start, value.interval_end) {
            (Some(exact), None, None) => ExactOrInterval::Exact(exact),
            (None, Some(start), Some(end)) if start <= end => {
                ExactOrInterval::Interval(pb::IntegerInterval { start, end })
            }
            (None, Some(start), Some(end)) => {
                return Err(ParseError::new(&format!(
                    "interval start {} exceeds end {}",
                    start, end
                )))
            }
            _ => {
                return Err(ParseError::new(
                    "expected either an exact value or a complete interval",
                ))
            }
        };
        Ok(pb::IntegerExactOrInterval {
            exact_or_interval: Some(exact_or_interval),
        })
    }
}

fn float_value(
    value: &Option<structure::FloatValue>,
    name: &str,
) -> Result<Option<pb::FloatExactOrInterval>, ParseError> {
    value
        .as_ref()
        .map(|v| pb::FloatExactOrInterval::try_from(v).map_err(|e| e.within(name)))
        .transpose()
}

fn integer_value(
    value: &structure::IntegerValue,
    name: &str,
) -> Result<pb::IntegerExactOrInterval, ParseError> {
    pb::IntegerExactOrInterval::try_from(value).map_err(|e| e.within(name))
}

/// First time step covered by a value, used as the initial step of predictions.
fn first_time_step(value: &pb::IntegerExactOrInterval) -> i32 {
    match &value.exact_or_interval {
        Some(integer_exact_or_interval::ExactOrInterval::Exact(e)) => *e,
        Some(integer_exact_or_interval::ExactOrInterval::Interval(i)) => i.start,
        None => 0,
    }
}

fn convert_shapes(
    rectangles: &[structure::Rectangle],
    circles: &[structure::Circle],
    polygons: &[structure::Polygon],
) -> Result<Vec<pb::Shape>, ParseError> {
    let mut shapes = Vec::new();

    for rectangle in rectangles {
        if rectangle.length <= 0.0 || rectangle.width <= 0.0 {
            return Err(ParseError::new("rectangle needs a positive length and width"));
        }
        shapes.push(shape::Shape::Rectangle(pb::Rectangle {
            length: rectangle.length,
            width: rectangle.width,
            center: rectangle.center.as_ref().map(Into::into),
            orientation: rectangle.orientation,
        }));
    }

    for circle in circles {
        if circle.radius <= 0.0 {
            return Err(ParseError::new("circle needs a positive radius"));
        }
        shapes.push(shape::Shape::Circle(pb::Circle {
            radius: circle.radius,
            center: circle.center.as_ref().map(Into::into),
        }));
    }

    for polygon in polygons {
        if polygon.points.len() < 3 {
            return Err(ParseError::new(&format!(
                "polygon needs at least three vertices, found {}",
                polygon.points.len()
            )));
        }
        shapes.push(shape::Shape::Polygon(pb::Polygon {
            vertices: polygon.points.iter().map(Into::into).collect(),
        }));
    }

    Ok(shapes
        .into_iter()
        .map(|s| pb::Shape { shape: Some(s) })
        .collect())
}

/// Collapses several shapes into a shape group.
fn single_shape(mut shapes: Vec<pb::Shape>) -> Result<pb::Shape, ParseError> {
    match shapes.len() {
        0 => Err(ParseError::new("shape is empty")),
        1 => Ok(shapes.remove(0)),
        _ => Ok(pb::Shape {
            shape: Some(shape::Shape::ShapeGroup(pb::ShapeGroup { shapes })),
        }),
    }
}

impl TryFrom<&structure::Shape> for pb::Shape {
    type Error = ParseError;

    fn try_from(value: &structure::Shape) -> Result<Self, Self::Error> {
        single_shape(convert_shapes(
            &value.rectangles,
            &value.circles,
            &value.polygons,
        )?)
        .map_err(|e| e.within("shape"))
    }
}

impl TryFrom<&structure::Position> for state::Position {
    type Error = ParseError;

    fn try_from(value: &structure::Position) -> Result<Self, Self::Error> {
        if let Some(point) = &value.point {
            return Ok(state::Position::Point(point.into()));
        }
        if !value.lanelets.is_empty() {
            return Ok(state::Position::Lanelets(pb::LaneletRefs {
                lanelet_ids: ids(&value.lanelets),
            }));
        }
        let shapes = convert_shapes(&value.rectangles, &value.circles, &value.polygons)?;
        single_shape(shapes)
            .map(state::Position::Shape)
            .map_err(|e| e.within("position"))
    }
}

impl TryFrom<&structure::State> for pb::State {
    type Error = ParseError;

    fn try_from(value: &structure::State) -> Result<Self, Self::Error> {
        Ok(pb::State {
            time_step: integer_value(&value.time, "time")?,
            position: value
                .position
                .as_ref()
                .map(state::Position::try_from)
                .transpose()?,
            orientation: float_value(&value.orientation, "orientation")?,
            velocity: float_value(&value.velocity, "velocity")?,
            acceleration: float_value(&value.acceleration, "acceleration")?,
            yaw_rate: float_value(&value.yaw_rate, "yawRate")?,
            slip_angle: float_value(&value.slip_angle, "slipAngle")?,
        })
    }
}

impl TryFrom<&structure::Bound> for pb::Bound {
    type Error = ParseError;

    fn try_from(value: &structure::Bound) -> Result<Self, Self::Error> {
        if value.points.len() < 2 {
            return Err(ParseError::new("bound needs at least two points"));
        }
        Ok(pb::Bound {
            points: value.points.iter().map(Into::into).collect(),
            line_marking: value
                .line_marking
                .as_deref()
                .map(|m| m.parse::<LineMarking>().map(Into::into))
                .transpose()?,
        })
    }
}

impl TryFrom<&structure::StopLine> for pb::StopLine {
    type Error = ParseError;

    fn try_from(value: &structure::StopLine) -> Result<Self, Self::Error> {
        Ok(pb::StopLine {
            points: value.points.iter().map(Into::into).collect(),
            line_marking: value.line_marking.parse::<LineMarking>()?.into(),
            traffic_sign_refs: ids(&value.traffic_sign_refs),
            traffic_light_ref: value.traffic_light_ref.as_ref().map(|r| r.id),
        })
    }
}

fn adjacent(
    value: &Option<structure::Adjacent>,
) -> Result<(Option<u32>, Option<i32>), ParseError> {
    match value {
        Some(adjacent) => Ok((
            Some(adjacent.id),
            Some(adjacent.driving_dir.parse::<DrivingDir>()?.into()),
        )),
        None => Ok((None, None)),
    }
}

impl TryFrom<&structure::Lanelet> for pb::Lanelet {
    type Error = ParseError;

    fn try_from(value: &structure::Lanelet) -> Result<Self, Self::Error> {
        let convert = || -> Result<pb::Lanelet, ParseError> {
            let (adjacent_left, adjacent_left_dir) = adjacent(&value.adjacent_left)?;
            let (adjacent_right, adjacent_right_dir) = adjacent(&value.adjacent_right)?;
            Ok(pb::Lanelet {
                lanelet_id: value.id,
                left_bound: pb::Bound::try_from(&value.left_bound)
                    .map_err(|e| e.within("leftBound"))?,
                right_bound: pb::Bound::try_from(&value.right_bound)
                    .map_err(|e| e.within("rightBound"))?,
                predecessors: ids(&value.predecessors),
                successors: ids(&value.successors),
                adjacent_left,
                adjacent_left_dir,
                adjacent_right,
                adjacent_right_dir,
                stop_line: value
                    .stop_line
                    .as_ref()
                    .map(pb::StopLine::try_from)
                    .transpose()?,
                lanelet_types: parse_all::<LaneletType>(&value.lanelet_types)?,
                user_one_way: parse_all::<RoadUser>(&value.user_one_way)?,
                user_bidirectional: parse_all::<RoadUser>(&value.user_bidirectional)?,
                traffic_sign_refs: ids(&value.traffic_sign_refs),
                traffic_light_refs: ids(&value.traffic_light_refs),
            })
        };
        convert().map_err(|e| e.within(&format!("lanelet {}", value.id)))
    }
}

fn position_point(
    position: &Option<structure::Position>,
) -> Result<Option<pb::Point>, ParseError> {
    match position {
        None => Ok(None),
        Some(p) => p
            .point
            .as_ref()
            .map(|point| Some(point.into()))
            .ok_or_else(|| ParseError::new("position must be a point")),
    }
}

impl TryFrom<&structure::TrafficSign> for pb::TrafficSign {
    type Error = ParseError;

    fn try_from(value: &structure::TrafficSign) -> Result<Self, Self::Error> {
        Ok(pb::TrafficSign {
            traffic_sign_id: value.id,
            traffic_sign_elements: value
                .elements
                .iter()
                .map(|e| pb::TrafficSignElement {
                    traffic_sign_id: e.sign_id.clone(),
                    additional_values: e.additional_values.clone(),
                })
                .collect(),
            position: position_point(&value.position)
                .map_err(|e| e.within(&format!("traffic sign {}", value.id)))?,
            r#virtual: value.is_virtual,
        })
    }
}

impl TryFrom<&structure::TrafficLight> for pb::TrafficLight {
    type Error = ParseError;

    fn try_from(value: &structure::TrafficLight) -> Result<Self, Self::Error> {
        let convert = || -> Result<pb::TrafficLight, ParseError> {
            let (cycle_elements, time_offset) = match &value.cycle {
                Some(cycle) => (
                    cycle
                        .elements
                        .iter()
                        .map(|e| {
                            Ok(pb::TrafficLightCycleElement {
                                color: e.color.parse::<TrafficLightColor>()?.into(),
                                duration: e.duration,
                            })
                        })
                        .collect::<Result<Vec<_>, ParseError>>()?,
                    cycle.time_offset,
                ),
                None => (Vec::new(), None),
            };
            Ok(pb::TrafficLight {
                traffic_light_id: value.id,
                cycle_elements,
                time_offset,
                position: position_point(&value.position)?,
                direction: value
                    .direction
                    .as_deref()
                    .map(|d| d.parse::<TrafficLightDirection>().map(Into::into))
                    .transpose()?,
                active: value.active,
            })
        };
        convert().map_err(|e| e.within(&format!("traffic light {}", value.id)))
    }
}

impl From<&structure::Intersection> for pb::Intersection {
    fn from(value: &structure::Intersection) -> Self {
        pb::Intersection {
            intersection_id: value.id,
            incomings: value
                .incomings
                .iter()
                .map(|incoming| pb::Incoming {
                    incoming_id: incoming.id,
                    incoming_lanelets: ids(&incoming.incoming_lanelets),
                    successors_right: ids(&incoming.successors_right),
                    successors_straight: ids(&incoming.successors_straight),
                    successors_left: ids(&incoming.successors_left),
                    is_left_of: incoming.is_left_of.as_ref().map(|r| r.id),
                })
                .collect(),
            crossing_lanelets: value
                .crossing
                .as_ref()
                .map(|c| ids(&c.lanelets))
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<&structure::StaticObstacle> for pb::StaticObstacle {
    type Error = ParseError;

    fn try_from(value: &structure::StaticObstacle) -> Result<Self, Self::Error> {
        let convert = || -> Result<pb::StaticObstacle, ParseError> {
            Ok(pb::StaticObstacle {
                static_obstacle_id: value.id,
                obstacle_type: value.obstacle_type.parse::<ObstacleType>()?.into(),
                shape: pb::Shape::try_from(&value.shape)?,
                initial_state: pb::State::try_from(&value.initial_state)
                    .map_err(|e| e.within("initialState"))?,
            })
        };
        convert().map_err(|e| e.within(&format!("static obstacle {}", value.id)))
    }
}

fn signal_state(value: &structure::SignalState) -> Result<pb::SignalState, ParseError> {
    Ok(pb::SignalState {
        time_step: integer_value(&value.time, "time")?,
        horn: value.horn,
        indicator_left: value.indicator_left,
        indicator_right: value.indicator_right,
        braking_lights: value.braking_lights,
        hazard_warning_lights: value.hazard_warning_lights,
        flashing_blue_lights: value.flashing_blue_lights,
    })
}

fn prediction(
    value: &structure::DynamicObstacle,
    shape: &pb::Shape,
) -> Result<Option<Prediction>, ParseError> {
    match (&value.trajectory, &value.occupancy_set) {
        (Some(_), Some(_)) => Err(ParseError::new(
            "obstacle has both a trajectory and an occupancy set",
        )),
        (Some(trajectory), None) => {
            let states = trajectory
                .states
                .iter()
                .map(pb::State::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.within("trajectory"))?;
            let first = states
                .first()
                .ok_or_else(|| ParseError::new("trajectory has no states"))?;
            Ok(Some(Prediction::TrajectoryPrediction(
                pb::TrajectoryPrediction {
                    trajectory: pb::Trajectory {
                        initial_time_step: first_time_step(&first.time_step),
                        states,
                    },
                    shape: shape.clone(),
                },
            )))
        }
        (None, Some(set)) => {
            let occupancies = set
                .occupancies
                .iter()
                .map(|o| {
                    Ok(pb::Occupancy {
                        time_step: integer_value(&o.time, "time")?,
                        shape: pb::Shape::try_from(&o.shape)?,
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()
                .map_err(|e| e.within("occupancySet"))?;
            let first = occupancies
                .first()
                .ok_or_else(|| ParseError::new("occupancy set is empty"))?;
            Ok(Some(Prediction::SetBasedPrediction(pb::SetBasedPrediction {
                initial_time_step: first_time_step(&first.time_step),
                occupancies,
            })))
        }
        (None, None) => Ok(None),
    }
}

impl TryFrom<&structure::DynamicObstacle> for pb::DynamicObstacle {
    type Error = ParseError;

    fn try_from(value: &structure::DynamicObstacle) -> Result<Self, Self::Error> {
        let convert = || -> Result<pb::DynamicObstacle, ParseError> {
            let shape = pb::Shape::try_from(&value.shape)?;
            Ok(pb::DynamicObstacle {
                dynamic_obstacle_id: value.id,
                obstacle_type: value.obstacle_type.parse::<ObstacleType>()?.into(),
                initial_state: pb::State::try_from(&value.initial_state)
                    .map_err(|e| e.within("initialState"))?,
                prediction: prediction(value, &shape)?,
                shape,
                initial_signal_state: value
                    .initial_signal_state
                    .as_ref()
                    .map(signal_state)
                    .transpose()
                    .map_err(|e| e.within("initialSignalState"))?,
                signal_series: value
                    .signal_series
                    .as_ref()
                    .map(|s| s.states.iter().map(signal_state).collect::<Result<Vec<_>, _>>())
                    .transpose()
                    .map_err(|e| e.within("signalSeries"))?
                    .unwrap_or_default(),
            })
        };
        convert().map_err(|e| e.within(&format!("dynamic obstacle {}", value.id)))
    }
}

impl TryFrom<&structure::PlanningProblem> for pb::PlanningProblem {
    type Error = ParseError;

    fn try_from(value: &structure::PlanningProblem) -> Result<Self, Self::Error> {
        let convert = || -> Result<pb::PlanningProblem, ParseError> {
            if value.goal_states.is_empty() {
                return Err(ParseError::new("no goal state"));
            }
            Ok(pb::PlanningProblem {
                planning_problem_id: value.id,
                initial_state: pb::State::try_from(&value.initial_state)
                    .map_err(|e| e.within("initialState"))?,
                goal_states: value
                    .goal_states
                    .iter()
                    .map(pb::State::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| e.within("goalState"))?,
            })
        };
        convert().map_err(|e| e.within(&format!("planning problem {}", value.id)))
    }
}

impl From<&structure::Location> for pb::Location {
    fn from(value: &structure::Location) -> Self {
        pb::Location {
            geo_name_id: value.geo_name_id,
            gps_latitude: value.gps_latitude,
            gps_longitude: value.gps_longitude,
        }
    }
}

impl FromStr for ScenarioTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interstate" => Ok(ScenarioTag::Interstate),
            "highway" => Ok(ScenarioTag::Highway),
            "urban" => Ok(ScenarioTag::Urban),
            "comfort" => Ok(ScenarioTag::Comfort),
            "critical" => Ok(ScenarioTag::Critical),
            "evasive" => Ok(ScenarioTag::Evasive),
            "cut_in" => Ok(ScenarioTag::CutIn),
            "illegal_cutin" => Ok(ScenarioTag::IllegalCutin),
            "intersection" => Ok(ScenarioTag::Intersection),
            "lane_change" => Ok(ScenarioTag::LaneChange),
            "lane_following" => Ok(ScenarioTag::LaneFollowing),
            "merging_lanes" => Ok(ScenarioTag::MergingLanes),
            "multi_lane" => Ok(ScenarioTag::MultiLane),
            "oncoming_traffic" => Ok(ScenarioTag::OncomingTraffic),
            "no_oncoming_traffic" => Ok(ScenarioTag::NoOncomingTraffic),
            "parallel_lanes" => Ok(ScenarioTag::ParallelLanes),
            "race_track" => Ok(ScenarioTag::RaceTrack),
            "roundabout" => Ok(ScenarioTag::Roundabout),
            "rural" => Ok(ScenarioTag::Rural),
            "simulated" => Ok(ScenarioTag::Simulated),
            "single_lane" => Ok(ScenarioTag::SingleLane),
            "slip_road" => Ok(ScenarioTag::SlipRoad),
            "speed_limit" => Ok(ScenarioTag::SpeedLimit),
            "traffic_jam" => Ok(ScenarioTag::TrafficJam),
            "turn_left" => Ok(ScenarioTag::TurnLeft),
            "turn_right" => Ok(ScenarioTag::TurnRight),
            "two_lane" => Ok(ScenarioTag::TwoLane),
            "emergency_braking" => Ok(ScenarioTag::EmergencyBraking),
            _ => Err(unknown("scenario tag", s)),
        }
    }
}

/// Tags in enum order, each listed once.
pub fn scenario_tags<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<i32>, ParseError> {
    let mut values = names
        .into_iter()
        .map(|name| name.parse::<ScenarioTag>().map(i32::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.within("scenarioTags"))?;
    values.sort_unstable();
    values.dedup();
    Ok(values)
}

/// A 2018b `<obstacle>`, sorted into the static or dynamic kind by its role.
#[derive(Debug)]
pub enum Obstacle {
    Static(pb::StaticObstacle),
    Dynamic(pb::DynamicObstacle),
}

impl TryFrom<&structure::Obstacle> for Obstacle {
    type Error = ParseError;

    fn try_from(value: &structure::Obstacle) -> Result<Self, Self::Error> {
        match value.role.as_str() {
            "static" => {
                if value.trajectory.is_some() || value.occupancy_set.is_some() {
                    return Err(ParseError::new("static obstacle has a prediction")
                        .within(&format!("obstacle {}", value.id)));
                }
                let obstacle = structure::StaticObstacle {
                    id: value.id,
                    obstacle_type: value.obstacle_type.clone(),
                    shape: value.shape.clone(),
                    initial_state: value.initial_state.clone(),
                };
                pb::StaticObstacle::try_from(&obstacle).map(Obstacle::Static)
            }
            "dynamic" => {
                let obstacle = structure::DynamicObstacle {
                    id: value.id,
                    obstacle_type: value.obstacle_type.clone(),
                    shape: value.shape.clone(),
                    initial_state: value.initial_state.clone(),
                    trajectory: value.trajectory.clone(),
                    occupancy_set: value.occupancy_set.clone(),
                    initial_signal_state: None,
                    signal_series: None,
                };
                pb::DynamicObstacle::try_from(&obstacle).map(Obstacle::Dynamic)
            }
            other => Err(unknown("obstacle role", other).within(&format!("obstacle {}", value.id))),
        }
    }
}
