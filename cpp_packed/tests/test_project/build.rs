use std::{env, path::PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    cpp_packed::Config::new("assets.json")
        .root("blobs")
        .namespace("test::res")
        .varname("blobs")
        .build(out_dir.join("blobs.hpp"), out_dir.join("blobs.cpp"))
        .expect("Failed to pack assets");
}
