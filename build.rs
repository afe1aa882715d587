use std::error::Error;

const PROTO_DIR: &str = "proto";
const PROTO_FILE: &str = "proto/commonroad.proto";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={}", PROTO_FILE);

    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    prost_build::compile_protos(&[PROTO_FILE], &[PROTO_DIR])?;
    Ok(())
}
