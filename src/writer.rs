use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use prost::Message;
use tracing::debug;

use crate::error::ConvertError;
use crate::format::FileFormat;
use crate::scenario::{PlanningProblemSet, Scenario};

/// Stores a scenario and its planning problems, returning the written path.
pub trait ScenarioWriter {
    fn write(
        &self,
        scenario: &Scenario,
        problems: &PlanningProblemSet,
        format: FileFormat,
    ) -> Result<PathBuf, ConvertError>;
}

/// Writes CommonRoad protobuf files next to the file the scenario came from.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonRoadFileWriter;

impl CommonRoadFileWriter {
    /// `<dir>/<stem>.<ext>` of the source file, or `./<benchmark id>.<ext>`
    /// for scenarios that were not read from disk.
    pub fn output_path(scenario: &Scenario, format: FileFormat) -> PathBuf {
        match scenario.source() {
            Some(source) => source.with_extension(format.extension()),
            None => Path::new(".").join(format!(
                "{}.{}",
                scenario.benchmark_id(),
                format.extension()
            )),
        }
    }
}

impl ScenarioWriter for CommonRoadFileWriter {
    fn write(
        &self,
        scenario: &Scenario,
        problems: &PlanningProblemSet,
        format: FileFormat,
    ) -> Result<PathBuf, ConvertError> {
        if format != FileFormat::Protobuf {
            return Err(ConvertError::UnsupportedFormat(format));
        }

        let path = Self::output_path(scenario, format);
        if scenario.source() == Some(path.as_path()) {
            return Err(ConvertError::WouldOverwriteInput(path));
        }

        let bytes = scenario.to_commonroad(problems).encode_to_vec();

        let mut file = File::create(&path).map_err(|e| ConvertError::io(&path, e))?;
        file.write_all(&bytes)
            .map_err(|e| ConvertError::io(&path, e))?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commonroad_pb as pb;

    fn scenario() -> Scenario {
        Scenario::new(pb::ScenarioMetaInformation {
            benchmark_id: "USA_US101-1_1_T-1".to_string(),
            commonroad_version: "2020a".to_string(),
            time_step_size: 0.1,
            ..Default::default()
        })
    }

    #[test]
    fn unread_scenarios_are_named_after_their_benchmark() {
        assert_eq!(
            CommonRoadFileWriter::output_path(&scenario(), FileFormat::Protobuf),
            Path::new(".").join("USA_US101-1_1_T-1.pb")
        );
    }

    #[test]
    fn xml_output_is_unsupported() {
        let result = CommonRoadFileWriter.write(
            &scenario(),
            &PlanningProblemSet::default(),
            FileFormat::Xml,
        );
        assert!(matches!(
            result,
            Err(ConvertError::UnsupportedFormat(FileFormat::Xml))
        ));
    }
}
