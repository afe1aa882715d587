use std::fmt;

/// On-disk representations of a CommonRoad scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xml,
    Protobuf,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Xml => "xml",
            FileFormat::Protobuf => "pb",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileFormat::Xml => write!(f, "XML"),
            FileFormat::Protobuf => write!(f, "protobuf"),
        }
    }
}
