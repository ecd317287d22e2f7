// build.rs

use std::path::Path;
use std::process::Command;

const SHADERS: &[(&str, &str)] = &[
    ("shaders/shader.vert", "shaders/vert.spv"),
    ("shaders/shader.frag", "shaders/frag.spv"),
];

fn main() {
    for (source, output) in SHADERS {
        println!("cargo::rerun-if-changed={}", source);

        if !Path::new(source).exists() {
            println!("cargo::warning=shader source `{}` not found", source);
            continue;
        }

        // The engine loads SPIR-V from disk at startup, so a missing compiler
        // only matters when running the binary.
        match Command::new("glslc").args([*source, "-o", *output]).status() {
            Err(err) => {
                println!("cargo::warning=glslc unavailable ({}), `{}` not rebuilt", err, output);
            }
            Ok(status) if !status.success() => {
                println!("cargo::warning=glslc failed on `{}` ({})", source, status);
            }
            Ok(_) => {}
        }
    }
}
