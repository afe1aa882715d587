use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::commonroad_pb as pb;
use crate::elements;
use crate::error::ParseError;
use crate::structure::CommonRoadFile;

/// Road network, obstacles and meta information of one scenario file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub information: pb::ScenarioMetaInformation,
    pub location: Option<pb::Location>,
    pub scenario_tags: Vec<i32>,
    pub lanelets: Vec<pb::Lanelet>,
    pub traffic_signs: Vec<pb::TrafficSign>,
    pub traffic_lights: Vec<pb::TrafficLight>,
    pub intersections: Vec<pb::Intersection>,
    pub static_obstacles: Vec<pb::StaticObstacle>,
    pub dynamic_obstacles: Vec<pb::DynamicObstacle>,
    source: Option<PathBuf>,
}

/// Planning problems stored alongside a scenario.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanningProblemSet {
    pub planning_problems: Vec<pb::PlanningProblem>,
}

impl Scenario {
    pub fn new(information: pb::ScenarioMetaInformation) -> Self {
        Scenario {
            information,
            location: None,
            scenario_tags: Vec::new(),
            lanelets: Vec::new(),
            traffic_signs: Vec::new(),
            traffic_lights: Vec::new(),
            intersections: Vec::new(),
            static_obstacles: Vec::new(),
            dynamic_obstacles: Vec::new(),
            source: None,
        }
    }

    /// File the scenario was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn benchmark_id(&self) -> &str {
        &self.information.benchmark_id
    }

    pub(crate) fn from_document(
        document: &CommonRoadFile,
        source: &Path,
    ) -> Result<(Scenario, PlanningProblemSet), ParseError> {
        let information = pb::ScenarioMetaInformation {
            benchmark_id: document.benchmark_id.clone(),
            commonroad_version: document.version.clone(),
            date: document.date.clone(),
            author: document.author.clone(),
            affiliation: document.affiliation.clone(),
            source: document.source.clone(),
            time_step_size: document.time_step_size,
        };

        let tag_names = document
            .scenario_tags
            .iter()
            .flat_map(|t| t.names.iter().map(|n| n.0.as_str()))
            .chain(document.tags.iter().flat_map(|t| t.split_whitespace()));

        let mut static_obstacles = document
            .static_obstacles
            .iter()
            .map(pb::StaticObstacle::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mut dynamic_obstacles = document
            .dynamic_obstacles
            .iter()
            .map(pb::DynamicObstacle::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        for obstacle in &document.obstacles {
            match elements::Obstacle::try_from(obstacle)? {
                elements::Obstacle::Static(o) => static_obstacles.push(o),
                elements::Obstacle::Dynamic(o) => dynamic_obstacles.push(o),
            }
        }

        for lanelet in document.lanelets.iter().filter(|l| l.speed_limit.is_some()) {
            warn!(
                "lanelet {}: speedLimit has no protobuf counterpart and is dropped",
                lanelet.id
            );
        }

        let scenario = Scenario {
            information,
            location: document.location.as_ref().map(pb::Location::from),
            scenario_tags: elements::scenario_tags(tag_names)?,
            lanelets: document
                .lanelets
                .iter()
                .map(pb::Lanelet::try_from)
                .collect::<Result<_, _>>()?,
            traffic_signs: document
                .traffic_signs
                .iter()
                .map(pb::TrafficSign::try_from)
                .collect::<Result<_, _>>()?,
            traffic_lights: document
                .traffic_lights
                .iter()
                .map(pb::TrafficLight::try_from)
                .collect::<Result<_, _>>()?,
            intersections: document
                .intersections
                .iter()
                .map(pb::Intersection::from)
                .collect(),
            static_obstacles,
            dynamic_obstacles,
            source: Some(source.to_path_buf()),
        };

        let problems = PlanningProblemSet {
            planning_problems: document
                .planning_problems
                .iter()
                .map(pb::PlanningProblem::try_from)
                .collect::<Result<_, _>>()?,
        };

        scenario.warn_dangling_references();

        Ok((scenario, problems))
    }

    pub(crate) fn from_commonroad(
        commonroad: pb::CommonRoad,
        source: &Path,
    ) -> (Scenario, PlanningProblemSet) {
        let scenario = Scenario {
            information: commonroad.information,
            location: commonroad.location,
            scenario_tags: commonroad.scenario_tags,
            lanelets: commonroad.lanelets,
            traffic_signs: commonroad.traffic_signs,
            traffic_lights: commonroad.traffic_lights,
            intersections: commonroad.intersections,
            static_obstacles: commonroad.static_obstacles,
            dynamic_obstacles: commonroad.dynamic_obstacles,
            source: Some(source.to_path_buf()),
        };
        let problems = PlanningProblemSet {
            planning_problems: commonroad.planning_problems,
        };
        (scenario, problems)
    }

    /// Assembles the single message written to protobuf files.
    pub fn to_commonroad(&self, problems: &PlanningProblemSet) -> pb::CommonRoad {
        pb::CommonRoad {
            information: self.information.clone(),
            location: self.location.clone(),
            scenario_tags: self.scenario_tags.clone(),
            lanelets: self.lanelets.clone(),
            traffic_signs: self.traffic_signs.clone(),
            traffic_lights: self.traffic_lights.clone(),
            intersections: self.intersections.clone(),
            static_obstacles: self.static_obstacles.clone(),
            dynamic_obstacles: self.dynamic_obstacles.clone(),
            planning_problems: problems.planning_problems.clone(),
        }
    }

    fn warn_dangling_references(&self) {
        let known: HashSet<u32> = self.lanelets.iter().map(|l| l.lanelet_id).collect();

        for lanelet in &self.lanelets {
            let referenced = lanelet
                .predecessors
                .iter()
                .chain(&lanelet.successors)
                .chain(&lanelet.adjacent_left)
                .chain(&lanelet.adjacent_right);
            for id in referenced.filter(|id| !known.contains(*id)) {
                warn!(
                    "Lanelet {} references unknown lanelet {}",
                    lanelet.lanelet_id, id
                );
            }
        }

        for intersection in &self.intersections {
            let referenced = intersection
                .incomings
                .iter()
                .flat_map(|i| {
                    i.incoming_lanelets
                        .iter()
                        .chain(&i.successors_right)
                        .chain(&i.successors_straight)
                        .chain(&i.successors_left)
                })
                .chain(&intersection.crossing_lanelets);
            for id in referenced.filter(|id| !known.contains(*id)) {
                warn!(
                    "Intersection {} references unknown lanelet {}",
                    intersection.intersection_id, id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn information() -> pb::ScenarioMetaInformation {
        pb::ScenarioMetaInformation {
            benchmark_id: "DEU_Test-1_1_T-1".to_string(),
            commonroad_version: "2020a".to_string(),
            date: None,
            author: None,
            affiliation: None,
            source: None,
            time_step_size: 0.1,
        }
    }

    #[test]
    fn commonroad_message_splits_back_into_scenario_and_problems() {
        let mut scenario = Scenario::new(information());
        scenario.scenario_tags = vec![pb::scenario_tag_enum::ScenarioTag::Urban.into()];
        let problems = PlanningProblemSet {
            planning_problems: vec![pb::PlanningProblem {
                planning_problem_id: 100,
                ..Default::default()
            }],
        };

        let commonroad = scenario.to_commonroad(&problems);
        assert_eq!(commonroad.planning_problems.len(), 1);
        assert_eq!(commonroad.information.benchmark_id, "DEU_Test-1_1_T-1");

        let (restored, restored_problems) =
            Scenario::from_commonroad(commonroad, Path::new("DEU_Test-1_1_T-1.pb"));
        assert_eq!(restored.scenario_tags, scenario.scenario_tags);
        assert_eq!(restored.information, scenario.information);
        assert_eq!(restored_problems, problems);
        assert_eq!(restored.source(), Some(Path::new("DEU_Test-1_1_T-1.pb")));
    }

    #[test]
    fn new_scenario_has_no_source() {
        let scenario = Scenario::new(information());
        assert!(scenario.source().is_none());
        assert_eq!(scenario.benchmark_id(), "DEU_Test-1_1_T-1");
    }
}
