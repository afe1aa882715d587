pub mod cli;
pub mod commonroad_pb;
mod elements;
mod error;
mod format;
pub mod reader;
pub mod scenario;
mod structure;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::info;

pub use error::{ConvertError, ParseError};
pub use format::FileFormat;
use reader::{CommonRoadFileReader, ScenarioReader};
use writer::{CommonRoadFileWriter, ScenarioWriter};

static INIT: Once = Once::new();

pub fn initialize_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .without_time()
            .with_target(false)
            .init();
    });
}

/// Reads a scenario in one format and writes it back in another.
pub struct Converter<R, W> {
    reader: R,
    writer: W,
    source: FileFormat,
    target: FileFormat,
}

impl<R: ScenarioReader, W: ScenarioWriter> Converter<R, W> {
    /// XML to protobuf.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_formats(reader, writer, FileFormat::Xml, FileFormat::Protobuf)
    }

    pub fn with_formats(reader: R, writer: W, source: FileFormat, target: FileFormat) -> Self {
        Converter {
            reader,
            writer,
            source,
            target,
        }
    }

    pub fn convert(&self, path: &Path) -> Result<PathBuf, ConvertError> {
        if !path.exists() {
            return Err(ConvertError::MissingInput(path.to_path_buf()));
        }

        info!("converting {}", path.display());

        let (scenario, problems) = self.reader.read(path, self.source)?;
        self.writer.write(&scenario, &problems, self.target)
    }
}

/// Converts a CommonRoad XML file into `<stem>.pb` next to it.
pub fn convert_file(xml_file: &Path) -> Result<PathBuf, ConvertError> {
    Converter::new(CommonRoadFileReader, CommonRoadFileWriter).convert(xml_file)
}
