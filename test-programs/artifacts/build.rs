use std::env;
use std::path::PathBuf;
use std::process::Command;

use heck::ToShoutySnakeCase;

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=../src");
    println!("cargo:rerun-if-changed=../../src");
    println!("cargo:rerun-if-changed=../../macro/src");

    let status = Command::new(env::var("CARGO").unwrap())
        .arg("build")
        .arg("--package=test-programs")
        .arg("--target=wasm32-wasip2")
        .env("CARGO_TARGET_DIR", &out_dir)
        .env("CARGO_PROFILE_DEV_DEBUG", "1")
        .env_remove("CARGO_ENCODED_RUSTFLAGS")
        .status()
        .expect("failed to run cargo to build test programs");
    assert!(status.success(), "building test programs failed");

    let meta = cargo_metadata::MetadataCommand::new()
        .exec()
        .expect("failed to read cargo metadata");
    let targets = meta
        .packages
        .iter()
        .find(|p| p.name == "test-programs")
        .expect("test-programs package is part of the workspace")
        .targets
        .iter()
        .filter(|t| t.kind.iter().any(|k| k == "bin"))
        .map(|t| t.name.clone())
        .collect::<Vec<_>>();

    let mut generated_code = String::new();
    for target in targets {
        let wasm = out_dir
            .join("wasm32-wasip2")
            .join("debug")
            .join(format!("{target}.wasm"));
        let const_name = target.to_shouty_snake_case();
        generated_code += &format!(
            "pub const {const_name}: &str = {:?};\n",
            wasm.to_str().expect("wasm path is utf-8")
        );
    }
    std::fs::write(out_dir.join("gen.rs"), generated_code).expect("failed to write gen.rs");
}
