use std::path::PathBuf;

use clap::Parser;

/// Convert a CommonRoad XML scenario into the protobuf format
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the CommonRoad XML scenario file
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn takes_a_single_path() {
        let args = Args::try_parse_from(["commonroad-pb-converter", "scenario.xml"]).unwrap();
        assert_eq!(args.path, PathBuf::from("scenario.xml"));
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        let err = Args::try_parse_from(["commonroad-pb-converter"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_paths_are_rejected() {
        assert!(Args::try_parse_from(["commonroad-pb-converter", "a.xml", "b.xml"]).is_err());
    }
}
