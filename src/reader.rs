use std::fs;
use std::path::Path;

use prost::Message;
use tracing::debug;

use crate::commonroad_pb::CommonRoad;
use crate::error::ConvertError;
use crate::format::FileFormat;
use crate::scenario::{PlanningProblemSet, Scenario};
use crate::structure;

/// Loads a scenario and its planning problems from a file.
pub trait ScenarioReader {
    fn read(
        &self,
        path: &Path,
        format: FileFormat,
    ) -> Result<(Scenario, PlanningProblemSet), ConvertError>;
}

/// Reads CommonRoad XML and protobuf files.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonRoadFileReader;

impl ScenarioReader for CommonRoadFileReader {
    fn read(
        &self,
        path: &Path,
        format: FileFormat,
    ) -> Result<(Scenario, PlanningProblemSet), ConvertError> {
        debug!("Reading {:?} as {}", path, format);
        match format {
            FileFormat::Xml => {
                let document = structure::parse_xml_file(path)?;
                Ok(Scenario::from_document(&document, path)?)
            }
            FileFormat::Protobuf => {
                let bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
                let commonroad = CommonRoad::decode(bytes.as_slice())?;
                Ok(Scenario::from_commonroad(commonroad, path))
            }
        }
    }
}
