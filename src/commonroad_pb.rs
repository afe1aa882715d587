//! prost messages for the CommonRoad protobuf format, generated from
//! `proto/commonroad.proto` by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/commonroad.rs"));
