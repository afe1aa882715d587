use std::path::PathBuf;

use thiserror::Error;

use crate::format::FileFormat;

/// Well-formed input that does not describe a valid scenario.
#[derive(Debug, Error, PartialEq)]
#[error("{msg}")]
pub struct ParseError {
    msg: String,
}

impl ParseError {
    pub fn new(msg: &str) -> Self {
        ParseError {
            msg: msg.to_string(),
        }
    }

    /// Prefixes the message with the element the error occurred in.
    pub fn within(self, element: &str) -> Self {
        ParseError {
            msg: format!("{}: {}", element, self.msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("file does not exist: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse XML: {0}")]
    Xml(#[from] serde_xml_rs::Error),
    #[error("invalid scenario: {0}")]
    Invalid(#[from] ParseError),
    #[error("failed to decode protobuf: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("writing {0} files is not supported")]
    UnsupportedFormat(FileFormat),
    #[error("refusing to overwrite input file {}", .0.display())]
    WouldOverwriteInput(PathBuf),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
